// src/middleware/auth.rs

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{common::error::AppError, config::AppState, models::auth::UserAccount};

// Valida o bearer token e injeta a conta (usuário + papéis) nos
// "extensions" da requisição.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: axum::http::Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(auth) = auth_header.ok_or(AppError::InvalidToken)?;

    let account = app_state.auth_service.validate_token(auth.token()).await?;
    request.extensions_mut().insert(account);
    Ok(next.run(request).await)
}

// Extrator para obter a conta autenticada diretamente nos handlers
pub struct AuthenticatedUser(pub UserAccount);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserAccount>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::InvalidToken)
    }
}
