// src/handlers/notifications.rs

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
    models::notification::{CreateNotificationPayload, Notification, UnreadCountResponse},
};

// --- Rotas administrativas ---

// GET /api/admin/notifications — inclui as inativas
#[utoipa::path(
    get,
    path = "/api/admin/notifications",
    tag = "Admin",
    responses((status = 200, description = "Todas as notificações", body = Vec<Notification>)),
    security(("api_jwt" = []))
)]
pub async fn admin_list_notifications(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminRole>,
) -> Result<impl IntoResponse, AppError> {
    let notifications = app_state.notification_service.list_all().await?;
    Ok(Json(notifications))
}

// POST /api/admin/notifications
#[utoipa::path(
    post,
    path = "/api/admin/notifications",
    tag = "Admin",
    request_body = CreateNotificationPayload,
    responses(
        (status = 201, description = "Notificação criada", body = Notification),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_create_notification(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
    _admin: RequireRole<AdminRole>,
    Json(payload): Json<CreateNotificationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let notification = app_state
        .notification_service
        .create(account.user.id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(notification)))
}

// PUT /api/admin/notifications/{id}
#[utoipa::path(
    put,
    path = "/api/admin/notifications/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da notificação")),
    request_body = CreateNotificationPayload,
    responses(
        (status = 200, description = "Notificação atualizada", body = Notification),
        (status = 404, description = "Notificação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_update_notification(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateNotificationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let notification = app_state.notification_service.update(id, &payload).await?;
    Ok(Json(notification))
}

// DELETE /api/admin/notifications/{id} — remoção definitiva
#[utoipa::path(
    delete,
    path = "/api/admin/notifications/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da notificação")),
    responses(
        (status = 204, description = "Notificação removida"),
        (status = 404, description = "Notificação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_delete_notification(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.notification_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Lado do usuário ---

// GET /api/notifications — ativas e endereçadas ao chamador
#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "Notifications",
    responses((status = 200, description = "Notificações do chamador", body = Vec<Notification>)),
    security(("api_jwt" = []))
)]
pub async fn list_notifications(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let notifications = app_state.notification_service.list_for(&account).await?;
    Ok(Json(notifications))
}

// GET /api/notifications/unread/count
#[utoipa::path(
    get,
    path = "/api/notifications/unread/count",
    tag = "Notifications",
    responses((status = 200, description = "Total de não lidas", body = UnreadCountResponse)),
    security(("api_jwt" = []))
)]
pub async fn unread_count(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let count = app_state.notification_service.unread_count(&account).await?;
    Ok(Json(UnreadCountResponse { count }))
}

// POST /api/notifications/{id}/read — idempotente
#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    tag = "Notifications",
    params(("id" = Uuid, Path, description = "ID da notificação")),
    responses(
        (status = 204, description = "Marcada como lida"),
        (status = 404, description = "Notificação não encontrada ou não endereçada ao chamador")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_notification_read(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.notification_service.mark_read(&account, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
