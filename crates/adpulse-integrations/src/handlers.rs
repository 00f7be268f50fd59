use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use utoipa::OpenApi;

use adpulse_connectors::{Platform, TestOutcome};
use adpulse_core::problem::{bad_request, internal_server_error, not_found};
use adpulse_core::{Problem, ServiceError};

use crate::service::IntegrationService;
use crate::types::{CreateIntegrationRequest, IntegrationInfo, TestConnectionRequest};

pub struct AppState {
    pub integration_service: Arc<IntegrationService>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        test_connection,
        create_integration,
        list_company_integrations,
        get_integration,
        delete_integration
    ),
    components(schemas(
        CreateIntegrationRequest,
        TestConnectionRequest,
        IntegrationInfo,
        TestOutcome
    )),
    tags((name = "Integrations", description = "Platform integration management"))
)]
pub struct IntegrationsApiDoc;

pub fn configure_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/integrations", post(create_integration))
        .route("/integrations/test", post(test_connection))
        .route("/integrations/{id}", get(get_integration))
        .route("/integrations/{id}", delete(delete_integration))
        .route(
            "/companies/{id}/integrations",
            get(list_company_integrations),
        )
}

fn to_problem(err: ServiceError) -> Problem {
    match err {
        ServiceError::NotFound { resource } => not_found(resource),
        ServiceError::Validation { message } => bad_request(message),
        other => internal_server_error(other.to_string()),
    }
}

/// Test platform credentials without saving anything
#[utoipa::path(
    post,
    path = "/integrations/test",
    tag = "Integrations",
    request_body = TestConnectionRequest,
    responses(
        (status = 200, description = "Test outcome", body = TestOutcome),
        (status = 400, description = "Unknown platform")
    )
)]
async fn test_connection(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TestConnectionRequest>,
) -> Result<impl IntoResponse, Problem> {
    let platform = Platform::from_str(&request.platform)
        .map_err(|_| bad_request(format!("Unknown platform '{}'", request.platform)))?;

    let outcome = state
        .integration_service
        .test_connection(platform, &request.credentials)
        .await
        .map_err(to_problem)?;

    Ok((StatusCode::OK, Json(outcome)))
}

/// Create an integration; credentials are tested, then stored encrypted
#[utoipa::path(
    post,
    path = "/integrations",
    tag = "Integrations",
    request_body = CreateIntegrationRequest,
    responses(
        (status = 201, description = "Integration created", body = IntegrationInfo),
        (status = 400, description = "Unknown platform or failing connection test"),
        (status = 404, description = "Company not found")
    )
)]
async fn create_integration(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateIntegrationRequest>,
) -> Result<impl IntoResponse, Problem> {
    let integration = state
        .integration_service
        .create(request)
        .await
        .map_err(to_problem)?;

    Ok((StatusCode::CREATED, Json(integration)))
}

/// List a company's integrations
#[utoipa::path(
    get,
    path = "/companies/{id}/integrations",
    tag = "Integrations",
    params(("id" = i32, Path, description = "Company id")),
    responses(
        (status = 200, description = "Integrations for the company", body = Vec<IntegrationInfo>)
    )
)]
async fn list_company_integrations(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    let integrations = state
        .integration_service
        .list_for_company(id)
        .await
        .map_err(to_problem)?;

    Ok((StatusCode::OK, Json(integrations)))
}

/// Get one integration
#[utoipa::path(
    get,
    path = "/integrations/{id}",
    tag = "Integrations",
    params(("id" = i32, Path, description = "Integration id")),
    responses(
        (status = 200, description = "Integration details", body = IntegrationInfo),
        (status = 404, description = "Integration not found")
    )
)]
async fn get_integration(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    let integration = state.integration_service.get(id).await.map_err(to_problem)?;
    Ok((StatusCode::OK, Json(integration)))
}

/// Delete an integration; campaigns and metrics stay with the company
#[utoipa::path(
    delete,
    path = "/integrations/{id}",
    tag = "Integrations",
    params(("id" = i32, Path, description = "Integration id")),
    responses(
        (status = 204, description = "Integration deleted"),
        (status = 404, description = "Integration not found")
    )
)]
async fn delete_integration(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    state
        .integration_service
        .delete(id)
        .await
        .map_err(to_problem)?;

    Ok(StatusCode::NO_CONTENT)
}
