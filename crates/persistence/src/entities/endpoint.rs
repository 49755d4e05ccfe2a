//! Issuer endpoint entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the oauth2_endpoints table.
#[derive(Debug, Clone, FromRow)]
pub struct EndpointEntity {
    pub id: Uuid,
    pub issuer_id: Uuid,
    pub name: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl From<EndpointEntity> for domain::models::Endpoint {
    fn from(entity: EndpointEntity) -> Self {
        Self {
            id: entity.id,
            issuer_id: entity.issuer_id,
            name: entity.name,
            url: entity.url,
            created_at: entity.created_at,
        }
    }
}
