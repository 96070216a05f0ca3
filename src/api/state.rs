//! Application state shared by the handlers

use std::sync::Arc;

use crate::infrastructure::services::ResourceService;

/// Application state, cloned into every request
#[derive(Debug, Clone)]
pub struct AppState {
    pub resources: Arc<ResourceService>,
}

impl AppState {
    pub fn new(resources: Arc<ResourceService>) -> Self {
        Self { resources }
    }
}
