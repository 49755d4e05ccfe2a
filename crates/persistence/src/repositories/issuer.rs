//! OAuth2 issuer repository for database operations.

use domain::models::{Issuer, ProviderDescriptor};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::issuer::IssuerEntity;
use crate::metrics::{QueryTimer, Table};

const ISSUER_COLUMNS: &str = "id, name, icon_url, base_url, login_scopes, login_scopes_offline, \
     visibility, service_type, enabled, created_at, updated_at";

/// Repository for issuer database operations.
#[derive(Clone)]
pub struct IssuerRepository {
    pool: PgPool,
}

impl IssuerRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an issuer built from a provider descriptor.
    pub async fn create(&self, descriptor: &ProviderDescriptor) -> Result<Issuer, sqlx::Error> {
        let timer = QueryTimer::new(Table::Issuers, "create");
        let query = format!(
            r#"
            INSERT INTO oauth2_issuers
                (name, icon_url, base_url, login_scopes, login_scopes_offline, visibility, service_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            ISSUER_COLUMNS
        );
        let result = sqlx::query_as::<_, IssuerEntity>(&query)
            .bind(&descriptor.name)
            .bind(&descriptor.icon_url)
            .bind(&descriptor.base_url)
            .bind(descriptor.login_scopes.to_string())
            .bind(descriptor.login_scopes_offline.to_string())
            .bind(descriptor.visibility.code())
            .bind(descriptor.service_type.as_str())
            .fetch_one(&self.pool)
            .await;
        timer.finish(&result);

        result?.try_into()
    }

    /// Find an issuer by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Issuer>, sqlx::Error> {
        let timer = QueryTimer::new(Table::Issuers, "find_by_id");
        let query = format!("SELECT {} FROM oauth2_issuers WHERE id = $1", ISSUER_COLUMNS);
        let result = sqlx::query_as::<_, IssuerEntity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.finish(&result);

        result?.map(Issuer::try_from).transpose()
    }

    /// List all issuers, oldest first.
    pub async fn list(&self) -> Result<Vec<Issuer>, sqlx::Error> {
        let timer = QueryTimer::new(Table::Issuers, "list");
        let query = format!(
            "SELECT {} FROM oauth2_issuers ORDER BY created_at, id",
            ISSUER_COLUMNS
        );
        let result = sqlx::query_as::<_, IssuerEntity>(&query)
            .fetch_all(&self.pool)
            .await;
        timer.finish(&result);

        result?.into_iter().map(Issuer::try_from).collect()
    }
}
