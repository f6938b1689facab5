use std::collections::HashMap;
use std::sync::Arc;

use super::store::ResultStore;
use super::types::CheckOutcome;

/// Read side of the monitor, handed to request handlers
#[derive(Debug, Clone)]
pub struct ResultsQuery {
    store: Arc<ResultStore>,
}

impl ResultsQuery {
    pub fn new(store: Arc<ResultStore>) -> Self {
        Self { store }
    }

    /// Current results. Targets never checked yet are absent.
    pub async fn get_results(&self) -> HashMap<String, CheckOutcome> {
        self.store.snapshot().await
    }
}
