pub mod migrate;
pub mod user;

use crate::auth::{AuthService, JwtKeys};
use crate::config::AppConfig;
use crate::database::{DatabaseManager, PgUserStore};
use std::sync::Arc;

/// Build an `AuthService` over a live pool for account commands.
pub(crate) async fn auth_service(
    config: &AppConfig,
) -> anyhow::Result<(DatabaseManager, AuthService)> {
    let manager = DatabaseManager::connect(&config.database).await?;
    let keys = JwtKeys::new(
        config.security.jwt_secret.as_bytes(),
        config.security.jwt_expiry_minutes,
    );
    let service = AuthService::new(
        Arc::new(PgUserStore::new(manager.pool().clone())),
        keys,
        config.security.bcrypt_cost,
    );
    Ok((manager, service))
}
