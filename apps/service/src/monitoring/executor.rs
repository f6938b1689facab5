use std::sync::Arc;

use tracing::{debug, info};
use url::Url;

use super::checker::{Checker, ProbeError};
use super::types::CheckOutcome;

/// Scheme applied to targets given without one
const DEFAULT_SCHEME: &str = "https://";

/// Prefix `target` with `https://` unless it already names http or https
pub fn normalize_target(target: &str) -> String {
    let has_scheme = ["http://", "https://"]
        .iter()
        .any(|scheme| target.get(..scheme.len()).is_some_and(|p| p.eq_ignore_ascii_case(scheme)));

    if has_scheme { target.to_string() } else { format!("{DEFAULT_SCHEME}{target}") }
}

/// Monitoring executor - runs one check against one target
pub struct ProbeExecutor {
    checker: Arc<dyn Checker>,
}

impl ProbeExecutor {
    pub fn new(checker: Arc<dyn Checker>) -> Self {
        Self { checker }
    }

    /// Check `target` once. Every failure is returned as a failed outcome.
    pub async fn check(&self, target: &str) -> CheckOutcome {
        let normalized = normalize_target(target);

        let url = match Url::parse(&normalized).map_err(ProbeError::from) {
            Ok(url) => url,
            Err(e) => {
                debug!("Rejected target {}: {}", target, e);
                return CheckOutcome::failure(format!("Failed to create request: {e}"));
            }
        };

        debug!("Dispatching GET {}", url);

        match self.checker.probe(&url).await {
            Ok(latency) => CheckOutcome::success(latency),
            Err(e) => {
                info!("Check for {} failed: {}", target, e);
                CheckOutcome::failure(format!("Request failed: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::types::CheckStatus;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every URL it is asked to probe
    #[derive(Default)]
    struct RecordingChecker {
        seen: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl Checker for RecordingChecker {
        async fn probe(&self, url: &Url) -> Result<Duration, ProbeError> {
            self.seen.lock().unwrap().push(url.to_string());
            if self.fail {
                Err(ProbeError::Timeout(Duration::from_secs(5)))
            } else {
                Ok(Duration::from_millis(42))
            }
        }
    }

    #[test]
    fn test_normalize_target() {
        assert_eq!(normalize_target("example.com"), "https://example.com");
        assert_eq!(normalize_target("http://example.com"), "http://example.com");
        assert_eq!(normalize_target("https://example.com/x"), "https://example.com/x");
        assert_eq!(normalize_target("HTTPS://example.com"), "HTTPS://example.com");
        assert_eq!(normalize_target("ftp://example.com"), "https://ftp://example.com");
    }

    #[tokio::test]
    async fn test_schemeless_target_dispatched_over_https() {
        let checker = Arc::new(RecordingChecker::default());
        let executor = ProbeExecutor::new(checker.clone());

        let outcome = executor.check("example.com").await;

        assert_eq!(checker.seen.lock().unwrap().as_slice(), ["https://example.com/"]);
        assert_eq!(outcome.status(), CheckStatus::Success);
        assert_eq!(outcome.loss(), "0%");
        assert_eq!(outcome.latency(), Some("42.00 ms"));
        assert!(outcome.error().is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_outcome() {
        let checker = Arc::new(RecordingChecker { fail: true, ..Default::default() });
        let executor = ProbeExecutor::new(checker);

        let outcome = executor.check("https://example.com").await;

        assert_eq!(outcome.status(), CheckStatus::Failed);
        assert_eq!(outcome.loss(), "100%");
        assert!(outcome.latency().is_none());
        assert_eq!(outcome.error(), Some("Request failed: timed out after 5s"));
    }

    #[tokio::test]
    async fn test_malformed_target_never_dispatched() {
        let checker = Arc::new(RecordingChecker::default());
        let executor = ProbeExecutor::new(checker.clone());

        let outcome = executor.check("exa mple.com:notaport").await;

        assert!(checker.seen.lock().unwrap().is_empty());
        assert_eq!(outcome.status(), CheckStatus::Failed);
        assert!(outcome.error().unwrap().starts_with("Failed to create request: invalid target:"));
    }
}
