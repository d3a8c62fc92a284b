// src/handlers/credit.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, roles::{AdminRole, RequireRole}},
    models::credit::{
        AdminUpdateCreditRequestPayload, CreateCreditRequestPayload, CreditRequest,
    },
};

// POST /api/credit-requests — exige empreendedor totalmente aprovado
// e empresa com status aprovada
#[utoipa::path(
    post,
    path = "/api/credit-requests",
    tag = "Credit",
    request_body = CreateCreditRequestPayload,
    responses(
        (status = 201, description = "Solicitação criada", body = CreditRequest),
        (status = 409, description = "Empresa não aprovada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_credit_request(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
    Json(payload): Json<CreateCreditRequestPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let request = app_state.credit_service.create(&account, &payload).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

// GET /api/credit-requests
#[utoipa::path(
    get,
    path = "/api/credit-requests",
    tag = "Credit",
    responses((status = 200, description = "Solicitações do chamador", body = Vec<CreditRequest>)),
    security(("api_jwt" = []))
)]
pub async fn list_credit_requests(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let requests = app_state.credit_service.list_for(&account).await?;
    Ok(Json(requests))
}

// PATCH /api/admin/credit-requests/{id}
#[utoipa::path(
    patch,
    path = "/api/admin/credit-requests/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da solicitação")),
    request_body = AdminUpdateCreditRequestPayload,
    responses(
        (status = 200, description = "Solicitação atualizada", body = CreditRequest),
        (status = 409, description = "Transição de status inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_update_credit_request(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
    _admin: RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdminUpdateCreditRequestPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let request = app_state
        .credit_service
        .admin_update(id, account.user.id, &payload)
        .await?;
    Ok(Json(request))
}
