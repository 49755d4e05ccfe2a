//! Issuer endpoint domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Name of the authorization endpoint record.
pub const AUTHORIZATION_ENDPOINT: &str = "authorization_endpoint";
/// Name of the token endpoint record.
pub const TOKEN_ENDPOINT: &str = "token_endpoint";
/// Name of the userinfo endpoint record.
pub const USERINFO_ENDPOINT: &str = "userinfo_endpoint";

/// A named endpoint URL to persist for an issuer.
///
/// An empty `url` means the endpoint exists but is not called over the
/// network; for `userinfo_endpoint` it selects local identity-token decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EndpointRecord {
    pub name: String,
    pub url: String,
}

impl EndpointRecord {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Whether this record disables network access for its endpoint.
    pub fn is_local(&self) -> bool {
        self.url.is_empty()
    }
}

/// Persisted endpoint belonging to an issuer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Endpoint {
    pub id: Uuid,
    pub issuer_id: Uuid,
    pub name: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Endpoint> for EndpointRecord {
    fn from(endpoint: &Endpoint) -> Self {
        EndpointRecord::new(endpoint.name.clone(), endpoint.url.clone())
    }
}

/// Endpoint supplied by an admin when provisioning an issuer.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct EndpointInput {
    #[validate(length(min = 1, max = 100, message = "Endpoint name must be 1-100 characters"))]
    pub name: String,

    #[validate(
        length(max = 2048, message = "URL must be at most 2048 characters"),
        custom(function = "shared::validation::validate_endpoint_url")
    )]
    #[serde(default)]
    pub url: String,
}

impl From<&EndpointInput> for EndpointRecord {
    fn from(input: &EndpointInput) -> Self {
        EndpointRecord::new(input.name.clone(), input.url.clone())
    }
}

/// Looks up an endpoint record by name.
pub fn find_endpoint<'a>(records: &'a [EndpointRecord], name: &str) -> Option<&'a EndpointRecord> {
    records.iter().find(|r| r.name == name)
}
