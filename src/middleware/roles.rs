// src/middleware/roles.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::auth::{Role, UserAccount},
};

/// 1. O Trait que define o papel exigido pela rota.
/// O papel é sempre um parâmetro explícito do guardião; nunca é
/// inferido de trechos da URL.
pub trait RoleDef: Send + Sync + 'static {
    fn role() -> Role;
}

/// 2. O Extractor (Guardião)
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let account = parts
            .extensions
            .get::<UserAccount>()
            .ok_or(AppError::InvalidToken)?;

        if !account.holds(T::role()) {
            return Err(AppError::Forbidden);
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS (TIPOS)
// ---

pub struct AdminRole;
impl RoleDef for AdminRole {
    fn role() -> Role {
        Role::Admin
    }
}

pub struct EmpreendedorRole;
impl RoleDef for EmpreendedorRole {
    fn role() -> Role {
        Role::Empreendedor
    }
}

pub struct InvestidorRole;
impl RoleDef for InvestidorRole {
    fn role() -> Role {
        Role::Investidor
    }
}
