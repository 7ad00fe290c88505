use std::sync::Arc;

use crate::assets::AssetStore;
use crate::auth::jwt::AuthConfig;
use crate::store::DocumentStore;

/// Shared handles injected into every handler. The store and asset store are
/// trait objects so tests can substitute in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub assets: Arc<dyn AssetStore>,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        assets: Arc<dyn AssetStore>,
        auth: Arc<AuthConfig>,
    ) -> Self {
        Self {
            store,
            assets,
            auth,
        }
    }
}
