//! Application state shared across handlers

use std::sync::Arc;
use volunhub_auth::AuthService;
use volunhub_db::UserStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// User store (used directly only by the health probe)
    pub store: Arc<dyn UserStore>,
    /// Authentication service
    pub auth: Arc<AuthService>,
    /// Mark session cookies `Secure` (production deployments)
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, auth: Arc<AuthService>, secure_cookies: bool) -> Self {
        Self {
            store,
            auth,
            secure_cookies,
        }
    }
}
