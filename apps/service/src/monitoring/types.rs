use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Loss indicator reported for a reachable target
pub const LOSS_NONE: &str = "0%";
/// Loss indicator reported for an unreachable target
pub const LOSS_TOTAL: &str = "100%";

/// Status of a completed check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Success,
    Failed,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Success => write!(f, "success"),
            CheckStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Latest result of checking one target.
///
/// Built only through [`CheckOutcome::success`] and [`CheckOutcome::failure`],
/// so a successful outcome always carries a latency and never an error, and a
/// failed one the other way round. Deserialization enforces the same rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOutcome")]
pub struct CheckOutcome {
    status: CheckStatus,

    /// Binary reachability indicator, `"0%"` or `"100%"`
    loss: String,

    /// Elapsed time of the check, e.g. `"123.45 ms"`
    #[serde(rename = "avg_time", default, skip_serializing_if = "Option::is_none")]
    latency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Wire form accepted before the status/field pairing is checked
#[derive(Deserialize)]
struct RawOutcome {
    status: CheckStatus,
    loss: String,
    #[serde(default)]
    avg_time: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl TryFrom<RawOutcome> for CheckOutcome {
    type Error = String;

    fn try_from(raw: RawOutcome) -> Result<Self, Self::Error> {
        let (latency, error) = match (raw.status, raw.avg_time, raw.error) {
            (CheckStatus::Success, Some(latency), None) if raw.loss == LOSS_NONE => {
                (Some(latency), None)
            }
            (CheckStatus::Failed, None, Some(error)) if raw.loss == LOSS_TOTAL => {
                (None, Some(error))
            }
            (status, _, _) => {
                return Err(format!(
                    "{status} outcome needs loss {} and only {}",
                    if status == CheckStatus::Success { LOSS_NONE } else { LOSS_TOTAL },
                    if status == CheckStatus::Success { "avg_time" } else { "error" },
                ));
            }
        };

        Ok(Self { status: raw.status, loss: raw.loss, latency, error })
    }
}

impl CheckOutcome {
    /// Outcome of a check that got a response after `elapsed`
    pub fn success(elapsed: Duration) -> Self {
        Self {
            status: CheckStatus::Success,
            loss: LOSS_NONE.to_string(),
            latency: Some(format_latency(elapsed)),
            error: None,
        }
    }

    /// Outcome of a check that never got a response
    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Failed,
            loss: LOSS_TOTAL.to_string(),
            latency: None,
            error: Some(reason.into()),
        }
    }

    pub fn status(&self) -> CheckStatus {
        self.status
    }

    pub fn loss(&self) -> &str {
        &self.loss
    }

    pub fn latency(&self) -> Option<&str> {
        self.latency.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.status == CheckStatus::Success
    }
}

/// Milliseconds with two decimals, e.g. `"123.45 ms"`
pub fn format_latency(elapsed: Duration) -> String {
    format!("{:.2} ms", elapsed.as_secs_f64() * 1000.0)
}
