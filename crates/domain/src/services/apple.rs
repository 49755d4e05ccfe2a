//! Sign in with Apple provider.
//!
//! Apple does not implement OIDC discovery or a userinfo endpoint. The
//! issuer is registered with an empty `userinfo_endpoint`, and the user's
//! identity is read from the `email` claim of the identity token returned
//! by the token endpoint. That email doubles as the username because Apple
//! does not always send a separate stable name claim.
//!
//! The token's signature is not verified here; it arrives directly from
//! Apple's token endpoint over TLS during the authorization-code exchange.

use crate::models::endpoint::{
    EndpointRecord, AUTHORIZATION_ENDPOINT, TOKEN_ENDPOINT, USERINFO_ENDPOINT,
};
use crate::models::field_mapping::FieldMappingRecord;
use crate::models::issuer::{ProviderDescriptor, ScopeSet, ServiceType, Visibility};
use crate::models::token::{TokenBundle, UserInfo, EMAIL_FIELD};
use crate::services::userinfo::ExtractionError;

pub const APPLE_NAME: &str = "Apple";
pub const APPLE_ICON_URL: &str = "https://www.apple.com/apple-touch-icon.png";
pub const APPLE_LOGIN_SCOPES: &str = "public_profile email";
pub const APPLE_AUTHORIZATION_URL: &str = "https://appleid.apple.com/auth/authorize";
pub const APPLE_TOKEN_URL: &str = "https://appleid.apple.com/auth/token";

/// External to internal field names for Apple profiles.
const APPLE_FIELD_MAPPINGS: [(&str, &str); 5] = [
    ("name", "alternatename"),
    ("last_name", "lastname"),
    ("email", "email"),
    ("first_name", "firstname"),
    ("picture-data-url", "picture"),
];

/// Default configuration for a new Apple issuer.
pub fn build_defaults() -> ProviderDescriptor {
    ProviderDescriptor {
        name: APPLE_NAME.to_string(),
        icon_url: APPLE_ICON_URL.to_string(),
        base_url: String::new(),
        login_scopes: ScopeSet::parse(APPLE_LOGIN_SCOPES),
        login_scopes_offline: ScopeSet::parse(APPLE_LOGIN_SCOPES),
        visibility: Visibility::Everywhere,
        service_type: ServiceType::Apple,
    }
}

/// Endpoint records to persist, in creation order.
///
/// The userinfo endpoint is deliberately empty so user info is read from
/// the identity token.
pub fn build_endpoint_records(_descriptor: &ProviderDescriptor) -> Vec<EndpointRecord> {
    vec![
        EndpointRecord::new(AUTHORIZATION_ENDPOINT, APPLE_AUTHORIZATION_URL),
        EndpointRecord::new(TOKEN_ENDPOINT, APPLE_TOKEN_URL),
        EndpointRecord::new(USERINFO_ENDPOINT, ""),
    ]
}

/// Field mapping records to persist, in creation order.
pub fn build_field_mapping_records(_descriptor: &ProviderDescriptor) -> Vec<FieldMappingRecord> {
    APPLE_FIELD_MAPPINGS
        .iter()
        .map(|(external, internal)| FieldMappingRecord::new(*external, *internal))
        .collect()
}

/// Reads the user's identity from the bundle's identity token.
pub fn extract_user_info(bundle: &TokenBundle) -> Result<UserInfo, ExtractionError> {
    let claims = shared::jwt::decode_unverified_payload(&bundle.id_token)?;

    let email = claims
        .get(EMAIL_FIELD)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ExtractionError::MissingClaim(EMAIL_FIELD.to_string()))?;

    tracing::debug!(
        has_sub = claims.contains_key("sub"),
        "Extracted Apple user info from identity token"
    );

    Ok(UserInfo::new(email, email))
}
