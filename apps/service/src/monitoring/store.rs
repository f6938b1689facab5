use std::collections::HashMap;

use tokio::sync::RwLock;

use super::types::CheckOutcome;

/// Latest outcome per target, keyed by the target string as configured
#[derive(Debug, Default)]
pub struct ResultStore {
    results: RwLock<HashMap<String, CheckOutcome>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is stored for `target`
    pub async fn upsert(&self, target: impl Into<String>, outcome: CheckOutcome) {
        self.results.write().await.insert(target.into(), outcome);
    }

    /// Independent copy of every stored outcome
    pub async fn snapshot(&self) -> HashMap<String, CheckOutcome> {
        self.results.read().await.clone()
    }

    pub async fn get(&self, target: &str) -> Option<CheckOutcome> {
        self.results.read().await.get(target).cloned()
    }

    pub async fn len(&self) -> usize {
        self.results.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.results.read().await.is_empty()
    }
}
