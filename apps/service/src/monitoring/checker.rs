use std::error::Error as StdError;
use std::time::{Duration, Instant};

use thiserror::Error;
use url::Url;

/// Default bound on a single check
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a single probe produced no response
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid target: {0}")]
    InvalidTarget(#[from] url::ParseError),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {}", error_chain(.0))]
    Connect(#[source] reqwest::Error),

    #[error("{}", error_chain(.0))]
    Transport(#[source] reqwest::Error),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Joins an error and its sources, e.g. `error sending request: tcp connect error: Connection refused`
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Transport used to reach a target
#[async_trait::async_trait]
pub trait Checker: Send + Sync {
    /// Dispatch one request to `url` and return the time until it resolved
    async fn probe(&self, url: &Url) -> Result<Duration, ProbeError>;
}

/// HTTP/HTTPS checker issuing a single GET per probe
pub struct HttpChecker {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpChecker {
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("siteping/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ProbeError::ClientBuild)?;

        Ok(Self { client, timeout })
    }

    fn classify(&self, error: reqwest::Error) -> ProbeError {
        if error.is_timeout() {
            ProbeError::Timeout(self.timeout)
        } else if error.is_connect() {
            ProbeError::Connect(error)
        } else {
            ProbeError::Transport(error)
        }
    }
}

#[async_trait::async_trait]
impl Checker for HttpChecker {
    async fn probe(&self, url: &Url) -> Result<Duration, ProbeError> {
        let start = Instant::now();

        let response =
            self.client.get(url.clone()).send().await.map_err(|e| self.classify(e))?;

        let latency = start.elapsed();

        // Any response counts as reachable, 4xx and 5xx included
        tracing::trace!("{} answered with {}", url, response.status());
        drop(response);

        Ok(latency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves `response` to every connection on a random local port
    async fn serve(response: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    let _ = stream.read(&mut buf).await;
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        Url::parse(&format!("http://{addr}/")).unwrap()
    }

    #[tokio::test]
    async fn test_http_probe_success() {
        let url = serve("HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok").await;
        let checker = HttpChecker::new(DEFAULT_TIMEOUT).unwrap();

        let latency = checker.probe(&url).await.unwrap();
        assert!(latency < DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn test_http_error_status_is_reachable() {
        let url = serve(
            "HTTP/1.1 503 Service Unavailable\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;
        let checker = HttpChecker::new(DEFAULT_TIMEOUT).unwrap();

        assert!(checker.probe(&url).await.is_ok());
    }

    #[tokio::test]
    async fn test_http_probe_connection_refused() {
        // Bind then drop to get a port nobody listens on
        let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();
        let url = Url::parse(&format!("http://{addr}/")).unwrap();
        let checker = HttpChecker::new(DEFAULT_TIMEOUT).unwrap();

        let error = checker.probe(&url).await.unwrap_err();
        assert!(!error.to_string().is_empty());
    }

    #[tokio::test]
    async fn test_http_probe_times_out() {
        // Accepts but never answers
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        let timeout = Duration::from_millis(300);
        let checker = HttpChecker::new(timeout).unwrap();
        let url = Url::parse(&format!("http://{addr}/")).unwrap();

        let start = Instant::now();
        let error = checker.probe(&url).await.unwrap_err();

        assert!(matches!(error, ProbeError::Timeout(t) if t == timeout), "got {error:?}");
        assert!(start.elapsed() < timeout + Duration::from_secs(1));
    }
}
