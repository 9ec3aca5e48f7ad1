use std::sync::Arc;

use crate::config::Config;
use crate::store::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide store handle, built once at startup and closed on shutdown.
    pub store: Arc<dyn ProfileStore>,
    pub config: Config,
}
