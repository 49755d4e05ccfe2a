//! Admin endpoints for provisioning and inspecting OAuth2 issuers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{CreateIssuerRequest, Endpoint, EndpointRecord, Issuer, UserFieldMapping};
use domain::services::{provision_issuer, select_strategy, ProvisionedIssuer};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_issuer_provisioned;

#[derive(Debug, Serialize)]
pub struct IssuerListResponse {
    pub issuers: Vec<Issuer>,
    pub count: usize,
}

/// Issuer with its endpoints and field mappings.
#[derive(Debug, Serialize)]
pub struct IssuerDetailResponse {
    pub issuer: Issuer,
    pub endpoints: Vec<Endpoint>,
    pub field_mappings: Vec<UserFieldMapping>,
    pub userinfo_strategy: Option<&'static str>,
}

/// Provision an issuer from a registered service type.
///
/// POST /api/v1/admin/oauth2/issuers
///
/// Records are created one at a time without a transaction. A failure after
/// the issuer row exists leaves the records created so far in place and is
/// reported with their counts. Bodies that do not deserialize, including
/// unknown service types, are rejected as validation errors.
pub async fn create_issuer(
    State(state): State<AppState>,
    payload: Result<Json<CreateIssuerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProvisionedIssuer>), ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let service_type = request.service_type.as_str();
    match provision_issuer(state.store.as_ref(), &state.registry, &request).await {
        Ok(provisioned) => {
            record_issuer_provisioned(service_type, "created");
            tracing::info!(
                issuer_id = %provisioned.issuer.id,
                service_type = service_type,
                "OAuth2 issuer provisioned"
            );
            Ok((StatusCode::CREATED, Json(provisioned)))
        }
        Err(err) => {
            record_issuer_provisioned(service_type, "failed");
            Err(err.into())
        }
    }
}

/// List issuers.
///
/// GET /api/v1/admin/oauth2/issuers
pub async fn list_issuers(
    State(state): State<AppState>,
) -> Result<Json<IssuerListResponse>, ApiError> {
    let issuers = state.store.list_issuers().await?;
    Ok(Json(IssuerListResponse {
        count: issuers.len(),
        issuers,
    }))
}

/// Get one issuer with its endpoints and field mappings.
///
/// GET /api/v1/admin/oauth2/issuers/:id
pub async fn get_issuer(
    State(state): State<AppState>,
    Path(issuer_id): Path<Uuid>,
) -> Result<Json<IssuerDetailResponse>, ApiError> {
    let issuer = state
        .store
        .find_issuer(issuer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Issuer not found".into()))?;

    let endpoints = state.store.list_endpoints(issuer_id).await?;
    let field_mappings = state.store.list_field_mappings(issuer_id).await?;

    let records: Vec<EndpointRecord> = endpoints.iter().map(EndpointRecord::from).collect();
    let extractor = state
        .registry
        .get(issuer.service_type)
        .and_then(|hooks| hooks.extract_user_info);
    let userinfo_strategy = select_strategy(&records, extractor).map(|s| s.label());

    Ok(Json(IssuerDetailResponse {
        issuer,
        endpoints,
        field_mappings,
        userinfo_strategy,
    }))
}
