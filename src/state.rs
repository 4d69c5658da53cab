use std::sync::Arc;

use crate::database::store::StudentStore;

/// Shared by every request. The store is created once at startup and only
/// ever reached through this handle.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StudentStore>,
}

impl AppState {
    pub fn new(store: impl StudentStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
