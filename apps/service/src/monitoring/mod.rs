/// Monitoring engine module - periodic reachability checks
///
/// This module is responsible for:
/// - Executing HTTP/HTTPS checks with a bounded timeout
/// - Scheduling a probe round per period
/// - Keeping the latest outcome per target for readers
pub mod checker;
pub mod executor;
pub mod query;
pub mod scheduler;
pub mod store;
pub mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use crate::config::MonitorConfig;

pub use checker::{Checker, HttpChecker, ProbeError};
pub use executor::ProbeExecutor;
pub use query::ResultsQuery;
pub use scheduler::{MonitoringScheduler, SchedulerError, SchedulerState};
pub use store::ResultStore;
pub use types::{CheckOutcome, CheckStatus};

/// Scheduler and read handle sharing one result store
pub struct Monitor {
    pub scheduler: MonitoringScheduler,
    pub query: ResultsQuery,
}

/// Wire an HTTP checker, executor, store and scheduler from `config`
pub fn build_monitor(config: &MonitorConfig, cancel: CancellationToken) -> Result<Monitor> {
    let checker =
        HttpChecker::new(config.timeout()).context("Failed to create the HTTP checker")?;
    let executor = Arc::new(ProbeExecutor::new(Arc::new(checker)));
    let store = Arc::new(ResultStore::new());

    let scheduler = MonitoringScheduler::new(
        executor,
        store.clone(),
        config.targets.clone(),
        config.interval(),
        cancel,
    );

    Ok(Monitor { scheduler, query: ResultsQuery::new(store) })
}
