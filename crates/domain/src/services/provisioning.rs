//! Issuer provisioning.
//!
//! Turns a provider's builders into persisted records: the issuer first,
//! then each endpoint, then each field mapping, one `create` call per record
//! in the order the builders return them. Nothing is rolled back when a
//! later call fails; the error reports how far provisioning got so the admin
//! can finish or clean up by hand.

use chrono::Utc;
use std::sync::Mutex;
use thiserror::Error;
use uuid::Uuid;

use crate::models::endpoint::{Endpoint, EndpointRecord};
use crate::models::field_mapping::{FieldMappingRecord, UserFieldMapping};
use crate::models::issuer::{CreateIssuerRequest, Issuer, ProviderDescriptor, ServiceType};
use crate::services::registry::ProviderRegistry;

/// Error type for issuer store operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness or foreign key constraint rejected the record.
    #[error("Constraint violation: {0}")]
    Conflict(String),

    #[error("Store error: {0}")]
    Other(String),
}

/// Persistence for issuers, their endpoints and their field mappings.
///
/// `create_*` methods assign an identifier on success and fail on
/// constraint violations such as a duplicate endpoint name for one issuer.
#[async_trait::async_trait]
pub trait IssuerStore: Send + Sync {
    async fn create_issuer(&self, descriptor: &ProviderDescriptor) -> Result<Issuer, StoreError>;

    async fn create_endpoint(
        &self,
        issuer_id: Uuid,
        record: &EndpointRecord,
    ) -> Result<Endpoint, StoreError>;

    async fn create_field_mapping(
        &self,
        issuer_id: Uuid,
        record: &FieldMappingRecord,
    ) -> Result<UserFieldMapping, StoreError>;

    async fn find_issuer(&self, issuer_id: Uuid) -> Result<Option<Issuer>, StoreError>;

    async fn list_issuers(&self) -> Result<Vec<Issuer>, StoreError>;

    async fn list_endpoints(&self, issuer_id: Uuid) -> Result<Vec<Endpoint>, StoreError>;

    async fn list_field_mappings(
        &self,
        issuer_id: Uuid,
    ) -> Result<Vec<UserFieldMapping>, StoreError>;
}

/// Error type for provisioning.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("No provider registered for service type: {0}")]
    UnknownServiceType(ServiceType),

    #[error("Failed to create issuer: {0}")]
    Issuer(#[source] StoreError),

    /// The issuer exists but not every endpoint or mapping was created.
    #[error(
        "Issuer {issuer_id} partially provisioned ({created_endpoints} endpoint(s), {created_mappings} mapping(s) created): {source}"
    )]
    Partial {
        issuer_id: Uuid,
        created_endpoints: usize,
        created_mappings: usize,
        #[source]
        source: StoreError,
    },
}

/// Issuer together with everything created for it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProvisionedIssuer {
    pub issuer: Issuer,
    pub endpoints: Vec<Endpoint>,
    pub field_mappings: Vec<UserFieldMapping>,
}

/// Provisions an issuer of the requested service type.
///
/// Provider records are created before the request's extra records.
pub async fn provision_issuer(
    store: &dyn IssuerStore,
    registry: &ProviderRegistry,
    request: &CreateIssuerRequest,
) -> Result<ProvisionedIssuer, ProvisionError> {
    let hooks = registry
        .get(request.service_type)
        .ok_or(ProvisionError::UnknownServiceType(request.service_type))?;

    let descriptor = request.apply_to((hooks.build_defaults)());

    let mut endpoint_records = (hooks.build_endpoints)(&descriptor);
    endpoint_records.extend(request.extra_endpoints());

    let mut mapping_records = (hooks.build_mappings)(&descriptor);
    mapping_records.extend(request.extra_field_mappings());

    let issuer = store
        .create_issuer(&descriptor)
        .await
        .map_err(ProvisionError::Issuer)?;

    tracing::info!(
        issuer_id = %issuer.id,
        service_type = %issuer.service_type,
        endpoints = endpoint_records.len(),
        mappings = mapping_records.len(),
        "Provisioning OAuth2 issuer"
    );

    let mut endpoints = Vec::with_capacity(endpoint_records.len());
    for record in &endpoint_records {
        match store.create_endpoint(issuer.id, record).await {
            Ok(endpoint) => endpoints.push(endpoint),
            Err(source) => {
                tracing::warn!(
                    issuer_id = %issuer.id,
                    endpoint = %record.name,
                    error = %source,
                    "Endpoint creation failed, issuer left partially provisioned"
                );
                return Err(ProvisionError::Partial {
                    issuer_id: issuer.id,
                    created_endpoints: endpoints.len(),
                    created_mappings: 0,
                    source,
                });
            }
        }
    }

    let mut field_mappings = Vec::with_capacity(mapping_records.len());
    for record in &mapping_records {
        match store.create_field_mapping(issuer.id, record).await {
            Ok(mapping) => field_mappings.push(mapping),
            Err(source) => {
                tracing::warn!(
                    issuer_id = %issuer.id,
                    external_field = %record.external_field,
                    error = %source,
                    "Field mapping creation failed, issuer left partially provisioned"
                );
                return Err(ProvisionError::Partial {
                    issuer_id: issuer.id,
                    created_endpoints: endpoints.len(),
                    created_mappings: field_mappings.len(),
                    source,
                });
            }
        }
    }

    Ok(ProvisionedIssuer {
        issuer,
        endpoints,
        field_mappings,
    })
}

#[derive(Default)]
struct InMemoryState {
    issuers: Vec<Issuer>,
    endpoints: Vec<Endpoint>,
    field_mappings: Vec<UserFieldMapping>,
}

/// In-memory issuer store for tests and local runs.
///
/// Enforces the same uniqueness rules as the database schema.
#[derive(Default)]
pub struct InMemoryIssuerStore {
    state: Mutex<InMemoryState>,
}

impl InMemoryIssuerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, InMemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Other("in-memory store poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl IssuerStore for InMemoryIssuerStore {
    async fn create_issuer(&self, descriptor: &ProviderDescriptor) -> Result<Issuer, StoreError> {
        let now = Utc::now();
        let issuer = Issuer {
            id: Uuid::new_v4(),
            name: descriptor.name.clone(),
            icon_url: descriptor.icon_url.clone(),
            base_url: descriptor.base_url.clone(),
            login_scopes: descriptor.login_scopes.clone(),
            login_scopes_offline: descriptor.login_scopes_offline.clone(),
            visibility: descriptor.visibility,
            service_type: descriptor.service_type,
            enabled: true,
            created_at: now,
            updated_at: now,
        };
        self.lock()?.issuers.push(issuer.clone());
        Ok(issuer)
    }

    async fn create_endpoint(
        &self,
        issuer_id: Uuid,
        record: &EndpointRecord,
    ) -> Result<Endpoint, StoreError> {
        let mut state = self.lock()?;
        if !state.issuers.iter().any(|i| i.id == issuer_id) {
            return Err(StoreError::Conflict(format!("issuer {} not found", issuer_id)));
        }
        if state
            .endpoints
            .iter()
            .any(|e| e.issuer_id == issuer_id && e.name == record.name)
        {
            return Err(StoreError::Conflict(format!(
                "endpoint {} already exists",
                record.name
            )));
        }

        let endpoint = Endpoint {
            id: Uuid::new_v4(),
            issuer_id,
            name: record.name.clone(),
            url: record.url.clone(),
            created_at: Utc::now(),
        };
        state.endpoints.push(endpoint.clone());
        Ok(endpoint)
    }

    async fn create_field_mapping(
        &self,
        issuer_id: Uuid,
        record: &FieldMappingRecord,
    ) -> Result<UserFieldMapping, StoreError> {
        let mut state = self.lock()?;
        if !state.issuers.iter().any(|i| i.id == issuer_id) {
            return Err(StoreError::Conflict(format!("issuer {} not found", issuer_id)));
        }
        if state
            .field_mappings
            .iter()
            .any(|m| m.issuer_id == issuer_id && m.external_field == record.external_field)
        {
            return Err(StoreError::Conflict(format!(
                "mapping for {} already exists",
                record.external_field
            )));
        }

        let mapping = UserFieldMapping {
            id: Uuid::new_v4(),
            issuer_id,
            external_field: record.external_field.clone(),
            internal_field: record.internal_field.clone(),
            created_at: Utc::now(),
        };
        state.field_mappings.push(mapping.clone());
        Ok(mapping)
    }

    async fn find_issuer(&self, issuer_id: Uuid) -> Result<Option<Issuer>, StoreError> {
        Ok(self
            .lock()?
            .issuers
            .iter()
            .find(|i| i.id == issuer_id)
            .cloned())
    }

    async fn list_issuers(&self) -> Result<Vec<Issuer>, StoreError> {
        Ok(self.lock()?.issuers.clone())
    }

    async fn list_endpoints(&self, issuer_id: Uuid) -> Result<Vec<Endpoint>, StoreError> {
        Ok(self
            .lock()?
            .endpoints
            .iter()
            .filter(|e| e.issuer_id == issuer_id)
            .cloned()
            .collect())
    }

    async fn list_field_mappings(
        &self,
        issuer_id: Uuid,
    ) -> Result<Vec<UserFieldMapping>, StoreError> {
        Ok(self
            .lock()?
            .field_mappings
            .iter()
            .filter(|m| m.issuer_id == issuer_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::issuer::Visibility;
    use crate::services::registry::default_registry;
    use serde_json::json;

    fn request(value: serde_json::Value) -> CreateIssuerRequest {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_provision_apple_issuer() {
        let store = InMemoryIssuerStore::new();
        let registry = default_registry();

        let provisioned = provision_issuer(
            &store,
            &registry,
            &request(json!({"service_type": "apple"})),
        )
        .await
        .unwrap();

        assert_eq!(provisioned.issuer.name, "Apple");
        assert_eq!(provisioned.issuer.visibility, Visibility::Everywhere);

        let names: Vec<&str> = provisioned
            .endpoints
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["authorization_endpoint", "token_endpoint", "userinfo_endpoint"]
        );
        assert_eq!(provisioned.field_mappings.len(), 5);

        let stored = store.list_endpoints(provisioned.issuer.id).await.unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[2].url, "");
    }

    #[tokio::test]
    async fn test_provision_applies_overrides_and_extras() {
        let store = InMemoryIssuerStore::new();
        let registry = default_registry();

        let provisioned = provision_issuer(
            &store,
            &registry,
            &request(json!({
                "service_type": "apple",
                "name": "Sign in with Apple",
                "visibility": "login_page",
                "endpoints": [{"name": "revocation_endpoint", "url": "https://appleid.apple.com/auth/revoke"}],
                "field_mappings": [{"external_field": "sub", "internal_field": "idnumber"}]
            })),
        )
        .await
        .unwrap();

        assert_eq!(provisioned.issuer.name, "Sign in with Apple");
        assert_eq!(provisioned.issuer.visibility, Visibility::LoginPage);
        assert_eq!(provisioned.endpoints.len(), 4);
        assert_eq!(provisioned.endpoints[3].name, "revocation_endpoint");
        assert_eq!(provisioned.field_mappings.len(), 6);
        assert_eq!(provisioned.field_mappings[5].internal_field, "idnumber");
    }

    #[tokio::test]
    async fn test_provision_partial_failure_keeps_earlier_records() {
        let store = InMemoryIssuerStore::new();
        let registry = default_registry();

        let result = provision_issuer(
            &store,
            &registry,
            &request(json!({
                "service_type": "apple",
                "field_mappings": [{"external_field": "email", "internal_field": "username"}]
            })),
        )
        .await;

        match result {
            Err(ProvisionError::Partial {
                issuer_id,
                created_endpoints,
                created_mappings,
                source,
            }) => {
                assert_eq!(created_endpoints, 3);
                assert_eq!(created_mappings, 5);
                assert!(matches!(source, StoreError::Conflict(_)));

                // No rollback
                assert!(store.find_issuer(issuer_id).await.unwrap().is_some());
                assert_eq!(store.list_field_mappings(issuer_id).await.unwrap().len(), 5);
            }
            other => panic!("expected partial failure, got {:?}", other.map(|p| p.issuer.id)),
        }
    }

    #[tokio::test]
    async fn test_provision_duplicate_endpoint_stops_before_mappings() {
        let store = InMemoryIssuerStore::new();
        let registry = default_registry();

        let result = provision_issuer(
            &store,
            &registry,
            &request(json!({
                "service_type": "apple",
                "endpoints": [{"name": "token_endpoint", "url": "https://example.com/token"}]
            })),
        )
        .await;

        match result {
            Err(ProvisionError::Partial {
                issuer_id,
                created_endpoints,
                created_mappings,
                ..
            }) => {
                assert_eq!(created_endpoints, 3);
                assert_eq!(created_mappings, 0);
                assert!(store.list_field_mappings(issuer_id).await.unwrap().is_empty());
            }
            other => panic!("expected partial failure, got {:?}", other.map(|p| p.issuer.id)),
        }
    }

    #[tokio::test]
    async fn test_provision_unknown_service_type() {
        let store = InMemoryIssuerStore::new();
        let registry = ProviderRegistry::new();

        let result =
            provision_issuer(&store, &registry, &request(json!({"service_type": "apple"}))).await;
        assert!(matches!(
            result,
            Err(ProvisionError::UnknownServiceType(ServiceType::Apple))
        ));
        assert!(store.list_issuers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_in_memory_store_rejects_unknown_issuer() {
        let store = InMemoryIssuerStore::new();
        let result = store
            .create_endpoint(Uuid::new_v4(), &EndpointRecord::new("token_endpoint", ""))
            .await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }
}
