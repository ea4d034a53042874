use std::sync::Arc;

use gymtrack_domain::Service;
use gymtrack_storage::DocumentStore;

pub type App = Service<DocumentStore>;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<App>,
}

impl AppState {
    #[must_use]
    pub fn new(service: App) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
