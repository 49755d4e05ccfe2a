//! PostgreSQL-backed issuer store.

use domain::models::{
    Endpoint, EndpointRecord, FieldMappingRecord, Issuer, ProviderDescriptor, UserFieldMapping,
};
use domain::services::{IssuerStore, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repositories::{EndpointRepository, IssuerRepository, UserFieldMappingRepository};

/// PostgreSQL error codes reported as constraint conflicts.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Converts a sqlx error into a store error.
pub fn store_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if let Some(code) = db_err.code() {
            if code == UNIQUE_VIOLATION || code == FOREIGN_KEY_VIOLATION {
                return StoreError::Conflict(db_err.message().to_string());
            }
        }
    }
    StoreError::Other(err.to_string())
}

/// Issuer store over the three OAuth2 repositories.
#[derive(Clone)]
pub struct PgIssuerStore {
    issuers: IssuerRepository,
    endpoints: EndpointRepository,
    field_mappings: UserFieldMappingRepository,
}

impl PgIssuerStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            issuers: IssuerRepository::new(pool.clone()),
            endpoints: EndpointRepository::new(pool.clone()),
            field_mappings: UserFieldMappingRepository::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl IssuerStore for PgIssuerStore {
    async fn create_issuer(&self, descriptor: &ProviderDescriptor) -> Result<Issuer, StoreError> {
        self.issuers.create(descriptor).await.map_err(store_error)
    }

    async fn create_endpoint(
        &self,
        issuer_id: Uuid,
        record: &EndpointRecord,
    ) -> Result<Endpoint, StoreError> {
        self.endpoints
            .create(issuer_id, record)
            .await
            .map_err(store_error)
    }

    async fn create_field_mapping(
        &self,
        issuer_id: Uuid,
        record: &FieldMappingRecord,
    ) -> Result<UserFieldMapping, StoreError> {
        self.field_mappings
            .create(issuer_id, record)
            .await
            .map_err(store_error)
    }

    async fn find_issuer(&self, issuer_id: Uuid) -> Result<Option<Issuer>, StoreError> {
        self.issuers.find_by_id(issuer_id).await.map_err(store_error)
    }

    async fn list_issuers(&self) -> Result<Vec<Issuer>, StoreError> {
        self.issuers.list().await.map_err(store_error)
    }

    async fn list_endpoints(&self, issuer_id: Uuid) -> Result<Vec<Endpoint>, StoreError> {
        self.endpoints
            .list_for_issuer(issuer_id)
            .await
            .map_err(store_error)
    }

    async fn list_field_mappings(
        &self,
        issuer_id: Uuid,
    ) -> Result<Vec<UserFieldMapping>, StoreError> {
        self.field_mappings
            .list_for_issuer(issuer_id)
            .await
            .map_err(store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_error_is_other() {
        let err = store_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Other(_)));
    }
}
