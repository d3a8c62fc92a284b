// src/handlers/messages.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::message::{ConversationSummary, Message, SendMessagePayload},
};

// GET /api/messages/conversations — resumos, mais recentes primeiro
#[utoipa::path(
    get,
    path = "/api/messages/conversations",
    tag = "Messages",
    responses((status = 200, description = "Conversas do chamador", body = Vec<ConversationSummary>)),
    security(("api_jwt" = []))
)]
pub async fn list_conversations(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let summaries = app_state.message_service.list_conversations(&account).await?;
    Ok(Json(summaries))
}

// GET /api/messages/{conversation_id}
#[utoipa::path(
    get,
    path = "/api/messages/{conversation_id}",
    tag = "Messages",
    params(("conversation_id" = String, Path, description = "Chave da conversa")),
    responses(
        (status = 200, description = "Mensagens em ordem cronológica", body = Vec<Message>),
        (status = 404, description = "Conversa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_messages(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
    Path(conversation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let messages = app_state
        .message_service
        .list_messages(&account, &conversation_id)
        .await?;
    Ok(Json(messages))
}

// POST /api/messages — sem conversationId, cunha uma conversa nova
#[utoipa::path(
    post,
    path = "/api/messages",
    tag = "Messages",
    request_body = SendMessagePayload,
    responses(
        (status = 201, description = "Mensagem enviada", body = Message),
        (status = 404, description = "Empresa, solicitação ou conversa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn send_message(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
    Json(payload): Json<SendMessagePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let message = app_state.message_service.send(&account, &payload).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

// PATCH /api/messages/{conversation_id}/read — marca as mensagens
// endereçadas ao lado do chamador
#[utoipa::path(
    patch,
    path = "/api/messages/{conversation_id}/read",
    tag = "Messages",
    params(("conversation_id" = String, Path, description = "Chave da conversa")),
    responses(
        (status = 204, description = "Mensagens marcadas como lidas"),
        (status = 404, description = "Conversa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_conversation_read(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
    Path(conversation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .message_service
        .mark_read(&account, &conversation_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
