// src/handlers/profile.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, roles::{AdminRole, RequireRole}},
    models::{
        auth::Role,
        profile::{ChangeStatus, PendingProfileChange},
    },
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitChangePayload {
    pub tipo_usuario: Role,

    // Objeto JSON: nome do campo editável -> valor proposto
    pub changed_fields: Value,
}

// POST /api/profile/changes — cria a pendência; o perfil vivo não muda
#[utoipa::path(
    post,
    path = "/api/profile/changes",
    tag = "Profile",
    request_body = SubmitChangePayload,
    responses(
        (status = 201, description = "Alteração submetida", body = PendingProfileChange),
        (status = 400, description = "Campos inválidos"),
        (status = 409, description = "Já existe alteração pendente")
    ),
    security(("api_jwt" = []))
)]
pub async fn submit_change(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
    Json(payload): Json<SubmitChangePayload>,
) -> Result<impl IntoResponse, AppError> {
    let change = app_state
        .profile_service
        .submit_change(&account, payload.tipo_usuario, payload.changed_fields)
        .await?;
    Ok((StatusCode::CREATED, Json(change)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListChangesQuery {
    pub status: Option<ChangeStatus>,
    pub tipo_usuario: Option<Role>,
}

// GET /api/admin/pending-profile-changes
#[utoipa::path(
    get,
    path = "/api/admin/pending-profile-changes",
    tag = "Admin",
    params(
        ("status" = Option<ChangeStatus>, Query, description = "Filtro de status"),
        ("tipoUsuario" = Option<Role>, Query, description = "Filtro de papel")
    ),
    responses((status = 200, description = "Alterações, mais recentes primeiro", body = Vec<PendingProfileChange>)),
    security(("api_jwt" = []))
)]
pub async fn list_changes(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminRole>,
    Query(query): Query<ListChangesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let changes = app_state
        .profile_service
        .list(query.status, query.tipo_usuario)
        .await?;
    Ok(Json(changes))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewChangePayload {
    pub approved: bool,
    pub comment: Option<String>,
}

// POST /api/admin/pending-profile-changes/{id}/review
#[utoipa::path(
    post,
    path = "/api/admin/pending-profile-changes/{id}/review",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da alteração")),
    request_body = ReviewChangePayload,
    responses(
        (status = 200, description = "Alteração revisada", body = PendingProfileChange),
        (status = 404, description = "Alteração não encontrada"),
        (status = 409, description = "Alteração já revisada")
    ),
    security(("api_jwt" = []))
)]
pub async fn review_change(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
    _admin: RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewChangePayload>,
) -> Result<impl IntoResponse, AppError> {
    let change = app_state
        .profile_service
        .review(id, account.user.id, payload.approved, payload.comment.as_deref())
        .await?;
    Ok(Json(change))
}
