use std::sync::Arc;

use crate::config::AppConfig;
use crate::views::ViewEngine;

/// The shared application state.
///
/// Cheap to clone; handed to every handler through axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// The template cache.
    ///
    /// Populated from the configured view root by the scanner; reloaded by the
    /// watcher task or through `POST /views/reload`.
    pub views: ViewEngine,
}

impl AppState {
    /// Creates the state with an empty template cache built from `config`.
    pub fn new(config: AppConfig) -> Self {
        let views = ViewEngine::new(config.views.clone(), config.scan_defaults.clone());
        Self { config: Arc::new(config), views }
    }
}
