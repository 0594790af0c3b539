use std::sync::Arc;

use crate::auth::{AuthService, JwtKeys};
use crate::config::AppConfig;
use crate::database::{ItemStore, UserStore};
use crate::services::ItemService;

/// Shared handler state. Everything in here is immutable; mutable state lives in the database.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub items: Arc<ItemService>,
}

impl AppState {
    pub fn new(config: &AppConfig, users: Arc<dyn UserStore>, items: Arc<dyn ItemStore>) -> Self {
        let keys = JwtKeys::new(
            config.security.jwt_secret.as_bytes(),
            config.security.jwt_expiry_minutes,
        );
        Self {
            auth: Arc::new(AuthService::new(users, keys, config.security.bcrypt_cost)),
            items: Arc::new(ItemService::new(
                items,
                config.api.default_page_size,
                config.api.max_page_size,
            )),
        }
    }
}
