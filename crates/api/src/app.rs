use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::{default_registry, IssuerStore, ProviderRegistry};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, request_span, require_admin};
use crate::routes::{admin_issuers, health, oauth2_services, userinfo};
use crate::services::{RemoteUserInfoClient, RemoteUserInfoError};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub registry: Arc<ProviderRegistry>,
    pub store: Arc<dyn IssuerStore>,
    pub userinfo_client: RemoteUserInfoClient,
}

impl AppState {
    /// Builds state with the built-in provider registry.
    pub fn new(
        config: Config,
        pool: PgPool,
        store: Arc<dyn IssuerStore>,
    ) -> Result<Self, RemoteUserInfoError> {
        let userinfo_client = RemoteUserInfoClient::new(config.oauth.remote_userinfo_timeout_ms)?;

        Ok(Self {
            pool,
            config: Arc::new(config),
            registry: Arc::new(default_registry()),
            store,
            userinfo_client,
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Admin routes (require admin API key)
    let admin_routes = Router::new()
        .route(
            "/api/v1/admin/oauth2/issuers",
            post(admin_issuers::create_issuer).get(admin_issuers::list_issuers),
        )
        .route(
            "/api/v1/admin/oauth2/issuers/:id",
            get(admin_issuers::get_issuer),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // OAuth2 routes used during login (no API key)
    let oauth2_routes = Router::new()
        .route("/api/v1/oauth2/services", get(oauth2_services::list_services))
        .route(
            "/api/v1/oauth2/services/:service_type/defaults",
            get(oauth2_services::get_service_defaults),
        )
        .route(
            "/api/v1/oauth2/issuers/:id/userinfo",
            post(userinfo::resolve_for_issuer),
        );

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(oauth2_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}
