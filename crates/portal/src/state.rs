use std::sync::Arc;

use gazette_sync::engine::SyncEngine;

use crate::config::PortalConfig;

/// Shared application state, passed to all handlers via Axum's `State`
/// extractor. Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    engine: SyncEngine,
    config: PortalConfig,
}

impl AppState {
    pub fn new(engine: SyncEngine, config: PortalConfig) -> Self {
        Self {
            inner: Arc::new(InnerState { engine, config }),
        }
    }

    pub fn engine(&self) -> &SyncEngine {
        &self.inner.engine
    }

    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }
}
