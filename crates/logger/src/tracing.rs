use std::env::var;

use tracing::{level_filters::LevelFilter, warn};
use tracing_subscriber::{Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the log layer, selected with `RUST_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    Pretty,
    #[default]
    Compact,
}

impl LogFormat {
    /// Unknown values fall back to the compact format.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

pub fn init() {
    initialize_tracing(LevelFilter::INFO);
}

/// Initialize tracing subscriber, honouring `RUST_LOG` and `RUST_LOG_FORMAT`.
fn initialize_tracing(level: LevelFilter) {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let log_format = var("RUST_LOG_FORMAT").map(|raw| LogFormat::parse(&raw)).unwrap_or_default();

    let log_layer = match log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().with_filter(env_filter).boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().with_filter(env_filter).boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_filter(env_filter)
            .boxed(),
    };

    if tracing_subscriber::registry().with(log_layer).try_init().is_err() {
        warn!("Tracing subscriber already initialized, keeping the existing one");
    }
}
