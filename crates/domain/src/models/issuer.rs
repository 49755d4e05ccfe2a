//! OAuth2 issuer domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::endpoint::{EndpointInput, EndpointRecord};
use super::field_mapping::{FieldMappingInput, FieldMappingRecord};

/// Provider implementation an issuer was created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Apple,
    Custom,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Apple => "apple",
            ServiceType::Custom => "custom",
        }
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "apple" => Ok(ServiceType::Apple),
            "custom" => Ok(ServiceType::Custom),
            _ => Err(format!("Unknown service type: {}", s)),
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the issuer is offered to users.
///
/// Stored as the host framework's numeric codes: 0 nowhere (services only),
/// 1 everywhere, 2 login page only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Nowhere,
    #[default]
    Everywhere,
    LoginPage,
}

impl Visibility {
    pub fn code(&self) -> i16 {
        match self {
            Visibility::Nowhere => 0,
            Visibility::Everywhere => 1,
            Visibility::LoginPage => 2,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Visibility::Nowhere),
            1 => Some(Visibility::Everywhere),
            2 => Some(Visibility::LoginPage),
            _ => None,
        }
    }

    /// Whether the issuer shows up as a login option.
    pub fn shows_on_login_page(&self) -> bool {
        matches!(self, Visibility::Everywhere | Visibility::LoginPage)
    }
}

/// Ordered, duplicate-free set of OAuth2 scopes.
///
/// Serialized as the space-separated string sent in the `scope` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopeSet(Vec<String>);

impl ScopeSet {
    /// Parses a space-separated scope string, keeping first occurrences.
    pub fn parse(raw: &str) -> Self {
        let mut scopes: Vec<String> = Vec::new();
        for scope in raw.split_whitespace() {
            if !scopes.iter().any(|s| s == scope) {
                scopes.push(scope.to_string());
            }
        }
        Self(scopes)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, scope: &str) -> bool {
        self.0.iter().any(|s| s == scope)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ScopeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

impl Serialize for ScopeSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ScopeSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ScopeSet::parse(&raw))
    }
}

/// Static configuration for an identity provider.
///
/// Built once when the provider is registered; the endpoint and field-mapping
/// records derived from it are persisted separately, one record each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProviderDescriptor {
    pub name: String,
    pub icon_url: String,
    pub base_url: String,
    pub login_scopes: ScopeSet,
    pub login_scopes_offline: ScopeSet,
    pub visibility: Visibility,
    pub service_type: ServiceType,
}

/// Persisted issuer registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Issuer {
    pub id: Uuid,
    pub name: String,
    pub icon_url: String,
    pub base_url: String,
    pub login_scopes: ScopeSet,
    pub login_scopes_offline: ScopeSet,
    pub visibility: Visibility,
    pub service_type: ServiceType,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Issuer {
    /// The static configuration this issuer was created with.
    pub fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor {
            name: self.name.clone(),
            icon_url: self.icon_url.clone(),
            base_url: self.base_url.clone(),
            login_scopes: self.login_scopes.clone(),
            login_scopes_offline: self.login_scopes_offline.clone(),
            visibility: self.visibility,
            service_type: self.service_type,
        }
    }
}

/// Request payload for provisioning an issuer from a service type.
///
/// Every field except `service_type` overrides the provider defaults.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateIssuerRequest {
    pub service_type: ServiceType,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(custom(function = "shared::validation::validate_icon_url"))]
    pub icon_url: Option<String>,

    #[validate(custom(function = "shared::validation::validate_endpoint_url"))]
    pub base_url: Option<String>,

    #[validate(custom(function = "shared::validation::validate_scope_list"))]
    pub login_scopes: Option<String>,

    #[validate(custom(function = "shared::validation::validate_scope_list"))]
    pub login_scopes_offline: Option<String>,

    pub visibility: Option<Visibility>,

    /// Extra endpoints created after the provider's own.
    #[serde(default)]
    #[validate(nested)]
    pub endpoints: Vec<EndpointInput>,

    /// Extra field mappings created after the provider's own.
    #[serde(default)]
    #[validate(nested)]
    pub field_mappings: Vec<FieldMappingInput>,
}

impl CreateIssuerRequest {
    /// Applies the request's overrides on top of provider defaults.
    pub fn apply_to(&self, mut descriptor: ProviderDescriptor) -> ProviderDescriptor {
        if let Some(ref name) = self.name {
            descriptor.name = name.clone();
        }
        if let Some(ref icon_url) = self.icon_url {
            descriptor.icon_url = icon_url.clone();
        }
        if let Some(ref base_url) = self.base_url {
            descriptor.base_url = base_url.clone();
        }
        if let Some(ref scopes) = self.login_scopes {
            descriptor.login_scopes = ScopeSet::parse(scopes);
        }
        if let Some(ref scopes) = self.login_scopes_offline {
            descriptor.login_scopes_offline = ScopeSet::parse(scopes);
        }
        if let Some(visibility) = self.visibility {
            descriptor.visibility = visibility;
        }
        descriptor
    }

    pub fn extra_endpoints(&self) -> Vec<EndpointRecord> {
        self.endpoints.iter().map(EndpointRecord::from).collect()
    }

    pub fn extra_field_mappings(&self) -> Vec<FieldMappingRecord> {
        self.field_mappings
            .iter()
            .map(FieldMappingRecord::from)
            .collect()
    }
}
