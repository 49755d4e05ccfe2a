//! User field mapping entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the oauth2_user_field_mappings table.
#[derive(Debug, Clone, FromRow)]
pub struct UserFieldMappingEntity {
    pub id: Uuid,
    pub issuer_id: Uuid,
    pub external_field: String,
    pub internal_field: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserFieldMappingEntity> for domain::models::UserFieldMapping {
    fn from(entity: UserFieldMappingEntity) -> Self {
        Self {
            id: entity.id,
            issuer_id: entity.issuer_id,
            external_field: entity.external_field,
            internal_field: entity.internal_field,
            created_at: entity.created_at,
        }
    }
}
