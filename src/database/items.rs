use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::StoredItem;
use crate::database::store::{ItemSearch, ItemStore};
use crate::filter::{ItemFilter, Pagination};

#[derive(Clone)]
pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn insert(&self, document: &Value) -> Result<i64, DatabaseError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO \"data\" (data) VALUES ($1) RETURNING id",
        )
        .bind(document)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn fetch(&self, id: i64) -> Result<Option<StoredItem>, DatabaseError> {
        let row =
            sqlx::query_as::<_, (i64, Value)>("SELECT id, data FROM \"data\" WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(id, data)| StoredItem { id, data }))
    }

    async fn search(
        &self,
        filter: &ItemFilter,
        pagination: &Pagination,
    ) -> Result<ItemSearch, DatabaseError> {
        let page_sql = filter.to_sql(pagination);
        let count_sql = filter.to_count_sql();
        tracing::debug!(query = %page_sql.query, params = ?page_sql.params, "item search");

        // Page and total must come from the same snapshot
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let mut q = sqlx::query_as::<_, (i64, Value)>(&page_sql.query);
        for p in page_sql.params.iter() {
            q = q.bind(p);
        }
        let rows = q.fetch_all(&mut *tx).await?;

        let mut c = sqlx::query_scalar::<_, i64>(&count_sql.query);
        for p in count_sql.params.iter() {
            c = c.bind(p);
        }
        let total = c.fetch_one(&mut *tx).await?;
        tx.commit().await?;

        Ok(ItemSearch {
            rows: rows
                .into_iter()
                .map(|(id, data)| StoredItem { id, data })
                .collect(),
            total,
        })
    }

    async fn replace(&self, id: i64, document: &Value) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE \"data\" SET data = $1 WHERE id = $2")
            .bind(document)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM \"data\" WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
