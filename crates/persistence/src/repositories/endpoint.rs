//! Issuer endpoint repository for database operations.

use domain::models::{Endpoint, EndpointRecord};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::endpoint::EndpointEntity;
use crate::metrics::{QueryTimer, Table};

/// Repository for issuer endpoint database operations.
#[derive(Clone)]
pub struct EndpointRepository {
    pool: PgPool,
}

impl EndpointRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one endpoint. Fails with a unique violation if the issuer
    /// already has an endpoint with the same name.
    pub async fn create(
        &self,
        issuer_id: Uuid,
        record: &EndpointRecord,
    ) -> Result<Endpoint, sqlx::Error> {
        let timer = QueryTimer::new(Table::Endpoints, "create");
        let result = sqlx::query_as::<_, EndpointEntity>(
            r#"
            INSERT INTO oauth2_endpoints (issuer_id, name, url)
            VALUES ($1, $2, $3)
            RETURNING id, issuer_id, name, url, created_at
            "#,
        )
        .bind(issuer_id)
        .bind(&record.name)
        .bind(&record.url)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);

        Ok(result?.into())
    }

    /// List an issuer's endpoints in creation order.
    pub async fn list_for_issuer(&self, issuer_id: Uuid) -> Result<Vec<Endpoint>, sqlx::Error> {
        let timer = QueryTimer::new(Table::Endpoints, "list_for_issuer");
        let result = sqlx::query_as::<_, EndpointEntity>(
            r#"
            SELECT id, issuer_id, name, url, created_at
            FROM oauth2_endpoints
            WHERE issuer_id = $1
            ORDER BY seq
            "#,
        )
        .bind(issuer_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);

        Ok(result?.into_iter().map(Into::into).collect())
    }
}
