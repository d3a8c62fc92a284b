// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::{field_error, AppError},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, LoginUserPayload, RegisterUserPayload, Role, UserAccount},
};

async fn do_register(
    app_state: &AppState,
    payload: &RegisterUserPayload,
    role: Role,
) -> Result<AuthResponse, AppError> {
    let token = app_state
        .auth_service
        .register_user(
            &payload.nome_completo,
            &payload.email,
            payload.cpf.as_deref(),
            &payload.password,
            payload.telefone.as_deref(),
            payload.endereco.as_ref(),
            role,
        )
        .await?;
    Ok(AuthResponse { token })
}

// POST /api/auth/register — papel vem no corpo
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Usuário registrado", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail ou CPF já em uso")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let role = payload
        .role
        .ok_or_else(|| field_error("role", "required"))?;

    let resp = do_register(&app_state, &payload, role).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

// POST /api/entrepreneurs/register
#[utoipa::path(
    post,
    path = "/api/entrepreneurs/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses((status = 201, description = "Empreendedor registrado", body = AuthResponse))
)]
pub async fn register_entrepreneur(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let resp = do_register(&app_state, &payload, Role::Empreendedor).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

// POST /api/investors/register
#[utoipa::path(
    post,
    path = "/api/investors/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses((status = 201, description = "Investidor registrado", body = AuthResponse))
)]
pub async fn register_investor(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let resp = do_register(&app_state, &payload, Role::Investidor).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login efetuado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let token = app_state
        .auth_service
        .login_user(&payload.identificador, &payload.password)
        .await?;
    Ok(Json(AuthResponse { token }))
}

// POST /api/entrepreneurs/login — exige o papel de empreendedor
#[utoipa::path(
    post,
    path = "/api/entrepreneurs/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login efetuado", body = AuthResponse),
        (status = 403, description = "Conta não possui o papel")
    )
)]
pub async fn login_entrepreneur(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let token = app_state
        .auth_service
        .login_with_role(&payload.identificador, &payload.password, Role::Empreendedor)
        .await?;
    Ok(Json(AuthResponse { token }))
}

// POST /api/investors/login — exige o papel de investidor
#[utoipa::path(
    post,
    path = "/api/investors/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login efetuado", body = AuthResponse),
        (status = 403, description = "Conta não possui o papel")
    )
)]
pub async fn login_investor(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let token = app_state
        .auth_service
        .login_with_role(&payload.identificador, &payload.password, Role::Investidor)
        .await?;
    Ok(Json(AuthResponse { token }))
}

// GET /api/auth/me — conta autenticada com papéis e checklist de aprovação
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses((status = 200, description = "Conta autenticada", body = UserAccount)),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(account): AuthenticatedUser) -> Json<UserAccount> {
    Json(account)
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrantRolePayload {
    pub role: Role,
}

// POST /api/auth/roles — concede um segundo papel (empreendedor <-> investidor)
#[utoipa::path(
    post,
    path = "/api/auth/roles",
    tag = "Auth",
    request_body = GrantRolePayload,
    responses(
        (status = 201, description = "Papel concedido", body = AuthResponse),
        (status = 409, description = "Papel já concedido")
    ),
    security(("api_jwt" = []))
)]
pub async fn grant_role(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
    Json(payload): Json<GrantRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    let token = app_state.auth_service.grant_role(&account, payload.role).await?;
    Ok((StatusCode::CREATED, Json(AuthResponse { token })))
}
