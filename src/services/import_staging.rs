use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::models::NewProduct;

/// Validated import rows waiting for an explicit commit, one batch per session user.
#[derive(Clone, Default)]
pub struct ImportStaging {
    batches: Arc<RwLock<HashMap<String, Vec<NewProduct>>>>,
}

impl ImportStaging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever the user had staged before.
    pub async fn stage(&self, username: &str, rows: Vec<NewProduct>) -> usize {
        let count = rows.len();
        self.batches
            .write()
            .await
            .insert(username.to_string(), rows);
        count
    }

    pub async fn peek(&self, username: &str) -> Vec<NewProduct> {
        self.batches
            .read()
            .await
            .get(username)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn take(&self, username: &str) -> Option<Vec<NewProduct>> {
        self.batches.write().await.remove(username)
    }

    pub async fn clear(&self, username: &str) {
        self.batches.write().await.remove(username);
    }
}
