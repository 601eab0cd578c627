//! # API REST
//!
//! REST API implementation for the Agnos patient registry.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - Bearer token authentication of `/patient/*` routes
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON binding, CORS, request tracing)
//!
//! Uses `api-shared` for request/response bodies and session tokens, and `agnos-core` for the
//! registry itself. The server binary lives in the workspace root.

#![warn(rust_2018_idioms)]

pub mod auth;
pub mod error;
mod handlers;

use agnos_core::{PatientService, StaffService};
use api_shared::{dto, HealthRes, TokenSigner};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

/// Application state for the REST API server
///
/// Shared by all request handlers: the registry services and the token signer used to issue
/// and verify session tokens.
#[derive(Clone)]
pub struct AppState {
    pub staff_service: Arc<StaffService>,
    pub patient_service: Arc<PatientService>,
    pub tokens: Arc<TokenSigner>,
}

impl AppState {
    pub fn new(
        staff_service: StaffService,
        patient_service: PatientService,
        tokens: TokenSigner,
    ) -> Self {
        Self {
            staff_service: Arc::new(staff_service),
            patient_service: Arc::new(patient_service),
            tokens: Arc::new(tokens),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::staff::create_staff,
        handlers::staff::login,
        handlers::patient::search_patients,
    ),
    components(schemas(
        HealthRes,
        dto::CreateStaffReq,
        dto::CreateStaffRes,
        dto::LoginReq,
        dto::LoginRes,
        dto::PatientSearchReq,
        dto::PatientSearchRes,
        dto::PatientRes,
        dto::ErrorRes,
    )),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Builds the REST router with every route, the Swagger UI and the shared layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::health))
        .route("/health", get(handlers::health::health))
        .route("/staff/create", post(handlers::staff::create_staff))
        .route("/staff/login", post(handlers::staff::login))
        .route("/patient/search", post(handlers::patient::search_patients))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
