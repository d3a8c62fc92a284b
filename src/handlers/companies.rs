// src/handlers/companies.rs

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
    models::{
        auth::RejectPayload,
        company::{AdminUpdateCompanyPayload, Company, CreateCompanyPayload, UpdateCompanyPayload},
    },
};

// POST /api/companies
#[utoipa::path(
    post,
    path = "/api/companies",
    tag = "Companies",
    request_body = CreateCompanyPayload,
    responses(
        (status = 201, description = "Empresa criada", body = Company),
        (status = 409, description = "CNPJ já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_company(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
    Json(payload): Json<CreateCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let company = app_state.company_service.create(&account, &payload).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

// GET /api/companies — as do dono, ou a rede de aprovadas para investidores
#[utoipa::path(
    get,
    path = "/api/companies",
    tag = "Companies",
    responses((status = 200, description = "Lista de empresas", body = Vec<Company>)),
    security(("api_jwt" = []))
)]
pub async fn list_companies(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let companies = app_state.company_service.list_for(&account).await?;
    Ok(Json(companies))
}

// GET /api/companies/{id}
#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    tag = "Companies",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Empresa", body = Company),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_company(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let company = app_state.company_service.get_for(&account, id).await?;
    Ok(Json(company))
}

// PATCH /api/companies/{id} — campos soft, somente o dono
#[utoipa::path(
    patch,
    path = "/api/companies/{id}",
    tag = "Companies",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    request_body = UpdateCompanyPayload,
    responses((status = 200, description = "Empresa atualizada", body = Company)),
    security(("api_jwt" = []))
)]
pub async fn update_company(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let company = app_state
        .company_service
        .update_soft(&account, id, &payload)
        .await?;
    Ok(Json(company))
}

// --- Rotas administrativas ---

// GET /api/admin/companies
#[utoipa::path(
    get,
    path = "/api/admin/companies",
    tag = "Admin",
    responses((status = 200, description = "Todas as empresas", body = Vec<Company>)),
    security(("api_jwt" = []))
)]
pub async fn admin_list_companies(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminRole>,
) -> Result<impl IntoResponse, AppError> {
    let companies = app_state.company_service.list_all().await?;
    Ok(Json(companies))
}

// POST /api/admin/companies/{id}/approve
#[utoipa::path(
    post,
    path = "/api/admin/companies/{id}/approve",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Empresa aprovada", body = Company),
        (status = 409, description = "Status atual não permite aprovação")
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_approve_company(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
    _admin: RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let company = app_state.company_service.approve(id, account.user.id).await?;
    Ok(Json(company))
}

// POST /api/admin/companies/{id}/reject
#[utoipa::path(
    post,
    path = "/api/admin/companies/{id}/reject",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    request_body = RejectPayload,
    responses(
        (status = 200, description = "Empresa reprovada", body = Company),
        (status = 400, description = "Motivo ausente")
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_reject_company(
    State(app_state): State<AppState>,
    AuthenticatedUser(account): AuthenticatedUser,
    _admin: RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let company = app_state
        .company_service
        .reject(id, account.user.id, &payload.reason)
        .await?;
    Ok(Json(company))
}

// PATCH /api/admin/companies/{id} — status/notas internas/valuation
#[utoipa::path(
    patch,
    path = "/api/admin/companies/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    request_body = AdminUpdateCompanyPayload,
    responses((status = 200, description = "Empresa atualizada", body = Company)),
    security(("api_jwt" = []))
)]
pub async fn admin_update_company(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdminUpdateCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let company = app_state.company_service.admin_update(id, &payload).await?;
    Ok(Json(company))
}
