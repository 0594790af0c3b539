use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::User;
use crate::database::store::UserStore;
use crate::types::Role;

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let row = sqlx::query_as::<_, (i64, String, String, String)>(
            "SELECT id, username, password, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(id, username, password_hash, role)| {
            let role = role
                .parse::<Role>()
                .map_err(|e| DatabaseError::Sqlx(sqlx::Error::Decode(Box::new(e))))?;
            Ok(User {
                id,
                username,
                password_hash,
                role,
            })
        })
        .transpose()
    }

    async fn insert(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Option<i64>, DatabaseError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (username, password, role) VALUES ($1, $2, $3)
             ON CONFLICT (username) DO NOTHING
             RETURNING id",
        )
        .bind(username)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    async fn set_role(&self, username: &str, role: Role) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE users SET role = $1 WHERE username = $2")
            .bind(role.as_str())
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
