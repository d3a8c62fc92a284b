// src/handlers/registrations.rs
//
// Decisões do back-office sobre cadastros de investidores e
// empreendedores: aprovação/reprovação agregada e approve-field.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, roles::{AdminRole, RequireRole}},
    models::auth::{RejectPayload, Requirement, Role, RoleState},
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveFieldPayload {
    pub field: Requirement,
    pub approved: bool,
}

// POST /api/admin/investors/{id}/approve
#[utoipa::path(
    post,
    path = "/api/admin/investors/{id}/approve",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Cadastro de investidor aprovado", body = RoleState),
        (status = 409, description = "Status atual não permite aprovação")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_investor(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
    _admin: RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let state = app_state
        .approval_service
        .approve(id, Role::Investidor, account.user.id)
        .await?;
    Ok(Json(state))
}

// POST /api/admin/investors/{id}/reject
#[utoipa::path(
    post,
    path = "/api/admin/investors/{id}/reject",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = RejectPayload,
    responses((status = 200, description = "Cadastro de investidor reprovado", body = RoleState)),
    security(("api_jwt" = []))
)]
pub async fn reject_investor(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
    _admin: RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let state = app_state
        .approval_service
        .reject(id, Role::Investidor, account.user.id, &payload.reason)
        .await?;
    Ok(Json(state))
}

// PATCH /api/admin/investors/{id}/approve-field — liga/desliga uma flag
// sem tocar no status agregado
#[utoipa::path(
    patch,
    path = "/api/admin/investors/{id}/approve-field",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = ApproveFieldPayload,
    responses((status = 200, description = "Flag atualizada", body = RoleState)),
    security(("api_jwt" = []))
)]
pub async fn approve_investor_field(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveFieldPayload>,
) -> Result<impl IntoResponse, AppError> {
    let state = app_state
        .approval_service
        .approve_field(id, Role::Investidor, payload.field, payload.approved)
        .await?;
    Ok(Json(state))
}

// POST /api/admin/entrepreneurs/{id}/approve
#[utoipa::path(
    post,
    path = "/api/admin/entrepreneurs/{id}/approve",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses((status = 200, description = "Cadastro de empreendedor aprovado", body = RoleState)),
    security(("api_jwt" = []))
)]
pub async fn approve_entrepreneur(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
    _admin: RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let state = app_state
        .approval_service
        .approve(id, Role::Empreendedor, account.user.id)
        .await?;
    Ok(Json(state))
}

// POST /api/admin/entrepreneurs/{id}/reject
#[utoipa::path(
    post,
    path = "/api/admin/entrepreneurs/{id}/reject",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = RejectPayload,
    responses((status = 200, description = "Cadastro de empreendedor reprovado", body = RoleState)),
    security(("api_jwt" = []))
)]
pub async fn reject_entrepreneur(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
    _admin: RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let state = app_state
        .approval_service
        .reject(id, Role::Empreendedor, account.user.id, &payload.reason)
        .await?;
    Ok(Json(state))
}

// PATCH /api/admin/entrepreneurs/{id}/approve-field
#[utoipa::path(
    patch,
    path = "/api/admin/entrepreneurs/{id}/approve-field",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = ApproveFieldPayload,
    responses((status = 200, description = "Flag atualizada", body = RoleState)),
    security(("api_jwt" = []))
)]
pub async fn approve_entrepreneur_field(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveFieldPayload>,
) -> Result<impl IntoResponse, AppError> {
    let state = app_state
        .approval_service
        .approve_field(id, Role::Empreendedor, payload.field, payload.approved)
        .await?;
    Ok(Json(state))
}
