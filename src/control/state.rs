use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::RaceConfig;

/// Single-slot holder for the configuration the next `/start` will use.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    inner: Arc<RwLock<Option<RaceConfig>>>,
}

impl ConfigStore {
    #[must_use]
    pub fn new(initial: Option<RaceConfig>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    pub async fn set(&self, config: RaceConfig) {
        *self.inner.write().await = Some(config);
    }

    pub async fn get(&self) -> Option<RaceConfig> {
        self.inner.read().await.clone()
    }
}
