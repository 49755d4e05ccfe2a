//! User info resolution endpoint.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use domain::models::{EndpointRecord, FieldMappingRecord, TokenBundle, UserInfo};
use domain::services::{select_strategy, ExtractionError, UserInfoStrategy};
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_user_info_resolution;
use crate::services::resolve_user_info;

#[derive(Debug, Serialize)]
pub struct UserInfoResponse {
    pub issuer_id: Uuid,
    pub strategy: &'static str,
    pub user: UserInfo,
}

/// Turn a token bundle from the issuer's token endpoint into user info.
///
/// POST /api/v1/oauth2/issuers/:id/userinfo
///
/// Issuers with an empty userinfo endpoint decode the identity token
/// locally; others call the endpoint with the access token. A bundle whose
/// fields have the wrong JSON types is treated as a malformed token.
pub async fn resolve_for_issuer(
    State(state): State<AppState>,
    Path(issuer_id): Path<Uuid>,
    payload: Result<Json<TokenBundle>, JsonRejection>,
) -> Result<Json<UserInfoResponse>, ApiError> {
    let issuer = state
        .store
        .find_issuer(issuer_id)
        .await?
        .filter(|issuer| issuer.enabled)
        .ok_or_else(|| ApiError::NotFound("Issuer not found".into()))?;

    let bundle = match payload {
        Ok(Json(bundle)) => bundle,
        Err(JsonRejection::JsonDataError(err)) => {
            return Err(ExtractionError::MalformedToken(err.body_text()).into())
        }
        Err(rejection) => return Err(rejection.into()),
    };

    let endpoints: Vec<EndpointRecord> = state
        .store
        .list_endpoints(issuer_id)
        .await?
        .iter()
        .map(EndpointRecord::from)
        .collect();

    let extractor = state
        .registry
        .get(issuer.service_type)
        .and_then(|hooks| hooks.extract_user_info);

    let strategy = select_strategy(&endpoints, extractor).ok_or_else(|| {
        ApiError::Unprocessable("Issuer has no usable userinfo strategy".into())
    })?;

    let mappings: Vec<FieldMappingRecord> = match strategy {
        UserInfoStrategy::Remote { .. } => state
            .store
            .list_field_mappings(issuer_id)
            .await?
            .iter()
            .map(FieldMappingRecord::from)
            .collect(),
        UserInfoStrategy::LocalToken(_) => Vec::new(),
    };

    let result = resolve_user_info(&strategy, &bundle, &mappings, &state.userinfo_client).await;
    record_user_info_resolution(
        strategy.label(),
        if result.is_ok() { "success" } else { "failure" },
    );

    Ok(Json(UserInfoResponse {
        issuer_id,
        strategy: strategy.label(),
        user: result?,
    }))
}
