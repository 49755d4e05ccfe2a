//! Registry of provider implementations keyed by service type.
//!
//! Built once at startup and shared read-only. Each entry is a set of plain
//! function pointers, so looking up a provider never allocates or dispatches
//! through a trait object.

use std::collections::HashMap;

use crate::models::endpoint::EndpointRecord;
use crate::models::field_mapping::FieldMappingRecord;
use crate::models::issuer::{ProviderDescriptor, ScopeSet, ServiceType, Visibility};
use crate::services::apple;
use crate::services::userinfo::{select_strategy, ExtractUserInfoFn, UserInfoStrategy};

/// Provider hooks used to provision issuers and resolve user info.
#[derive(Debug, Clone, Copy)]
pub struct ProviderHooks {
    pub build_defaults: fn() -> ProviderDescriptor,
    pub build_endpoints: fn(&ProviderDescriptor) -> Vec<EndpointRecord>,
    pub build_mappings: fn(&ProviderDescriptor) -> Vec<FieldMappingRecord>,
    /// Local extractor for providers that ship claims in the identity token.
    pub extract_user_info: Option<ExtractUserInfoFn>,
}

impl ProviderHooks {
    /// User info strategy for an issuer created from these hooks.
    pub fn strategy_for(&self, endpoints: &[EndpointRecord]) -> Option<UserInfoStrategy> {
        select_strategy(endpoints, self.extract_user_info)
    }
}

/// Explicit table of provider implementations.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<ServiceType, ProviderHooks>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers hooks for a service type, replacing any previous entry.
    pub fn register(&mut self, service_type: ServiceType, hooks: ProviderHooks) -> &mut Self {
        self.providers.insert(service_type, hooks);
        self
    }

    pub fn get(&self, service_type: ServiceType) -> Option<&ProviderHooks> {
        self.providers.get(&service_type)
    }

    /// Registered service types, sorted by tag.
    pub fn service_types(&self) -> Vec<ServiceType> {
        let mut types: Vec<ServiceType> = self.providers.keys().copied().collect();
        types.sort_by_key(|t| t.as_str());
        types
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Hooks for Sign in with Apple.
pub fn apple_hooks() -> ProviderHooks {
    ProviderHooks {
        build_defaults: apple::build_defaults,
        build_endpoints: apple::build_endpoint_records,
        build_mappings: apple::build_field_mapping_records,
        extract_user_info: Some(apple::extract_user_info),
    }
}

/// Hooks for a blank issuer whose endpoints are supplied by the admin.
pub fn custom_hooks() -> ProviderHooks {
    ProviderHooks {
        build_defaults: custom_defaults,
        build_endpoints: no_endpoints,
        build_mappings: no_mappings,
        extract_user_info: None,
    }
}

fn custom_defaults() -> ProviderDescriptor {
    ProviderDescriptor {
        name: "Custom".to_string(),
        icon_url: String::new(),
        base_url: String::new(),
        login_scopes: ScopeSet::parse("openid profile email"),
        login_scopes_offline: ScopeSet::parse("openid profile email offline_access"),
        visibility: Visibility::Everywhere,
        service_type: ServiceType::Custom,
    }
}

fn no_endpoints(_descriptor: &ProviderDescriptor) -> Vec<EndpointRecord> {
    Vec::new()
}

fn no_mappings(_descriptor: &ProviderDescriptor) -> Vec<FieldMappingRecord> {
    Vec::new()
}

/// Registry with every built-in provider.
pub fn default_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry
        .register(ServiceType::Apple, apple_hooks())
        .register(ServiceType::Custom, custom_hooks());
    registry
}
