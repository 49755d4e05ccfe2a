//! User field mapping domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Rule translating a provider profile field to an internal account field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FieldMappingRecord {
    pub external_field: String,
    pub internal_field: String,
}

impl FieldMappingRecord {
    pub fn new(external: impl Into<String>, internal: impl Into<String>) -> Self {
        Self {
            external_field: external.into(),
            internal_field: internal.into(),
        }
    }
}

/// Persisted field mapping belonging to an issuer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UserFieldMapping {
    pub id: Uuid,
    pub issuer_id: Uuid,
    pub external_field: String,
    pub internal_field: String,
    pub created_at: DateTime<Utc>,
}

impl From<&UserFieldMapping> for FieldMappingRecord {
    fn from(mapping: &UserFieldMapping) -> Self {
        FieldMappingRecord::new(mapping.external_field.clone(), mapping.internal_field.clone())
    }
}

/// Field mapping supplied by an admin when provisioning an issuer.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct FieldMappingInput {
    #[validate(length(min = 1, max = 64, message = "External field must be 1-64 characters"))]
    pub external_field: String,

    #[validate(length(min = 1, max = 64, message = "Internal field must be 1-64 characters"))]
    pub internal_field: String,
}

impl From<&FieldMappingInput> for FieldMappingRecord {
    fn from(input: &FieldMappingInput) -> Self {
        FieldMappingRecord::new(input.external_field.clone(), input.internal_field.clone())
    }
}
