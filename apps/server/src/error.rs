use std::io::Error as IoError;

use siteping_service::config::ConfigError;
use siteping_service::monitoring::SchedulerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0:#}")]
    Io(#[from] IoError),
    #[error("Address parsing error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0:#}")]
    Monitor(#[from] anyhow::Error),
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
}
