//! User info resolution for OAuth2 issuers.
//!
//! Standard providers expose a userinfo endpoint that is called with the
//! access token; the raw profile it returns is translated through the
//! issuer's field mappings. Some providers only ship claims inside the
//! identity token. An issuer signals that by persisting an empty
//! `userinfo_endpoint`, and the provider's local extractor is used instead.

use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::endpoint::{find_endpoint, EndpointRecord, USERINFO_ENDPOINT};
use crate::models::field_mapping::FieldMappingRecord;
use crate::models::token::{TokenBundle, UserInfo};

/// Error type for user info extraction. Both kinds end the login attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Malformed identity token: {0}")]
    MalformedToken(String),

    #[error("Missing claim: {0}")]
    MissingClaim(String),
}

impl From<shared::jwt::JwtError> for ExtractionError {
    fn from(err: shared::jwt::JwtError) -> Self {
        ExtractionError::MalformedToken(err.to_string())
    }
}

/// Local extractor turning a token bundle into user info.
pub type ExtractUserInfoFn = fn(&TokenBundle) -> Result<UserInfo, ExtractionError>;

/// How user info is obtained for an issuer.
#[derive(Debug, Clone)]
pub enum UserInfoStrategy {
    /// Call the userinfo endpoint with the access token.
    Remote { url: String },
    /// Decode the identity token locally, no network call.
    LocalToken(ExtractUserInfoFn),
}

impl UserInfoStrategy {
    pub fn is_local(&self) -> bool {
        matches!(self, UserInfoStrategy::LocalToken(_))
    }

    /// Short name used in responses and metric labels.
    pub fn label(&self) -> &'static str {
        match self {
            UserInfoStrategy::Remote { .. } => "remote",
            UserInfoStrategy::LocalToken(_) => "local",
        }
    }
}

/// Picks the user info strategy from an issuer's endpoints.
///
/// Returns `None` when the issuer has no userinfo endpoint at all, or when
/// it asks for local extraction but its provider has no extractor.
pub fn select_strategy(
    endpoints: &[EndpointRecord],
    local_extractor: Option<ExtractUserInfoFn>,
) -> Option<UserInfoStrategy> {
    let userinfo = find_endpoint(endpoints, USERINFO_ENDPOINT)?;

    if userinfo.is_local() {
        local_extractor.map(UserInfoStrategy::LocalToken)
    } else {
        Some(UserInfoStrategy::Remote {
            url: userinfo.url.clone(),
        })
    }
}

/// Translates a raw provider profile through the issuer's field mappings.
///
/// Mappings are applied in order; external fields missing from the profile
/// or mapped to null are skipped, and the first mapping to reach an internal
/// field wins. Non-string values are rendered as JSON text.
pub fn map_user_fields(raw: &Value, mappings: &[FieldMappingRecord]) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();

    for mapping in mappings {
        let value = match lookup_field(raw, &mapping.external_field) {
            Some(Value::Null) | None => continue,
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        fields
            .entry(mapping.internal_field.clone())
            .or_insert(value);
    }

    fields
}

/// Finds a field by exact key first, then by `-`-separated path.
///
/// `picture-data-url` resolves to `picture.data.url` when the profile nests it.
fn lookup_field<'a>(raw: &'a Value, external: &str) -> Option<&'a Value> {
    if let Some(value) = raw.get(external) {
        return Some(value);
    }

    if !external.contains('-') {
        return None;
    }

    external
        .split('-')
        .try_fold(raw, |current, key| current.get(key))
}

/// Builds user info from a mapped remote profile.
pub fn user_info_from_profile(
    raw: &Value,
    mappings: &[FieldMappingRecord],
) -> Result<UserInfo, ExtractionError> {
    if !raw.is_object() {
        return Err(ExtractionError::MalformedToken(
            "userinfo response is not a JSON object".to_string(),
        ));
    }

    UserInfo::from_fields(map_user_fields(raw, mappings))
        .map_err(|field| ExtractionError::MissingClaim(field.to_string()))
}
