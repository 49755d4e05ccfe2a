//! Provider catalog endpoints.
//!
//! Public, read-only views of the provider registry: which service types can
//! be provisioned and what an issuer of each type starts with.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::{EndpointRecord, FieldMappingRecord, ProviderDescriptor, ServiceType};
use domain::services::ProviderHooks;
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;

/// One registered provider.
#[derive(Debug, Serialize)]
pub struct ServiceSummary {
    pub service_type: ServiceType,
    pub name: String,
    /// Whether user info is read from the identity token by default.
    pub local_userinfo: bool,
    /// Whether a default issuer of this type is offered on the login page.
    pub shows_on_login_page: bool,
    /// Default login scopes, one entry per scope.
    pub login_scopes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ServiceListResponse {
    pub services: Vec<ServiceSummary>,
}

/// Everything a new issuer of a service type is provisioned with.
#[derive(Debug, Serialize)]
pub struct ProviderDefaultsResponse {
    pub descriptor: ProviderDescriptor,
    pub endpoints: Vec<EndpointRecord>,
    pub field_mappings: Vec<FieldMappingRecord>,
    /// `local`, `remote`, or null when the defaults carry no usable strategy.
    pub userinfo_strategy: Option<&'static str>,
}

impl ProviderDefaultsResponse {
    fn from_hooks(hooks: &ProviderHooks) -> Self {
        let descriptor = (hooks.build_defaults)();
        let endpoints = (hooks.build_endpoints)(&descriptor);
        let field_mappings = (hooks.build_mappings)(&descriptor);
        let userinfo_strategy = hooks.strategy_for(&endpoints).map(|s| s.label());

        Self {
            descriptor,
            endpoints,
            field_mappings,
            userinfo_strategy,
        }
    }
}

/// List registered service types.
///
/// GET /api/v1/oauth2/services
pub async fn list_services(State(state): State<AppState>) -> Json<ServiceListResponse> {
    let services = state
        .registry
        .service_types()
        .into_iter()
        .filter_map(|service_type| {
            let hooks = state.registry.get(service_type)?;
            let defaults = ProviderDefaultsResponse::from_hooks(hooks);
            let descriptor = defaults.descriptor;
            Some(ServiceSummary {
                service_type,
                local_userinfo: defaults.userinfo_strategy == Some("local"),
                shows_on_login_page: descriptor.visibility.shows_on_login_page(),
                login_scopes: descriptor.login_scopes.iter().map(str::to_string).collect(),
                name: descriptor.name,
            })
        })
        .collect();

    Json(ServiceListResponse { services })
}

/// Default descriptor, endpoints and mappings for a service type.
///
/// GET /api/v1/oauth2/services/:service_type/defaults
pub async fn get_service_defaults(
    State(state): State<AppState>,
    Path(service_type): Path<String>,
) -> Result<Json<ProviderDefaultsResponse>, ApiError> {
    let hooks = service_type
        .parse::<ServiceType>()
        .ok()
        .and_then(|t| state.registry.get(t))
        .ok_or_else(|| ApiError::NotFound(format!("Unknown service type: {}", service_type)))?;

    Ok(Json(ProviderDefaultsResponse::from_hooks(hooks)))
}
