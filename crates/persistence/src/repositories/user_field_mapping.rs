//! User field mapping repository for database operations.

use domain::models::{FieldMappingRecord, UserFieldMapping};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::user_field_mapping::UserFieldMappingEntity;
use crate::metrics::{QueryTimer, Table};

/// Repository for user field mapping database operations.
#[derive(Clone)]
pub struct UserFieldMappingRepository {
    pool: PgPool,
}

impl UserFieldMappingRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one mapping. Fails with a unique violation if the issuer
    /// already maps the same external field.
    pub async fn create(
        &self,
        issuer_id: Uuid,
        record: &FieldMappingRecord,
    ) -> Result<UserFieldMapping, sqlx::Error> {
        let timer = QueryTimer::new(Table::UserFieldMappings, "create");
        let result = sqlx::query_as::<_, UserFieldMappingEntity>(
            r#"
            INSERT INTO oauth2_user_field_mappings (issuer_id, external_field, internal_field)
            VALUES ($1, $2, $3)
            RETURNING id, issuer_id, external_field, internal_field, created_at
            "#,
        )
        .bind(issuer_id)
        .bind(&record.external_field)
        .bind(&record.internal_field)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);

        Ok(result?.into())
    }

    /// List an issuer's mappings in creation order.
    pub async fn list_for_issuer(
        &self,
        issuer_id: Uuid,
    ) -> Result<Vec<UserFieldMapping>, sqlx::Error> {
        let timer = QueryTimer::new(Table::UserFieldMappings, "list_for_issuer");
        let result = sqlx::query_as::<_, UserFieldMappingEntity>(
            r#"
            SELECT id, issuer_id, external_field, internal_field, created_at
            FROM oauth2_user_field_mappings
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
