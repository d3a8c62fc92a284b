// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, Role, UserAccount},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, pool: PgPool) -> Self {
        Self { user_repo, jwt_secret, pool }
    }

    // Registra um usuário já com o papel solicitado (empreendedor ou
    // investidor). O papel nasce com todas as flags de verificação falsas
    // e status pendente_analise; admin nunca é auto-registrável.
    pub async fn register_user(
        &self,
        nome_completo: &str,
        email: &str,
        cpf: Option<&str>,
        password: &str,
        telefone: Option<&str>,
        endereco: Option<&Value>,
        role: Role,
    ) -> Result<String, AppError> {
        if role == Role::Admin {
            return Err(AppError::Forbidden);
        }

        // Hashing fora da transação (não toca no banco)
        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // Usuário + papel na mesma transação
        let mut tx = self.pool.begin().await?;

        let new_user = self
            .user_repo
            .create_user(&mut tx, nome_completo, email, cpf, &hashed_password, telefone, endereco)
            .await?;

        self.user_repo.insert_role_state(&mut tx, new_user.id, role).await?;

        tx.commit().await?;

        tracing::info!("Novo {} registrado: {}", role.as_str(), new_user.id);
        self.create_token(new_user.id)
    }

    // Concede um papel adicional a uma conta existente (um empreendedor
    // que também vira investidor, por exemplo). Admin é mutuamente
    // exclusivo com os demais papéis.
    pub async fn grant_role(&self, account: &UserAccount, role: Role) -> Result<String, AppError> {
        if role == Role::Admin || account.holds(Role::Admin) {
            return Err(AppError::Forbidden);
        }
        if account.holds(role) {
            return Err(AppError::UniqueConstraintViolation(format!(
                "papel {} já concedido",
                role.as_str()
            )));
        }
        let mut conn = self.pool.acquire().await?;
        self.user_repo.insert_role_state(&mut conn, account.user.id, role).await?;
        self.create_token(account.user.id)
    }

    pub async fn login_user(&self, identifier: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_identifier(identifier)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !user.ativo {
            return Err(AppError::InvalidCredentials);
        }

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    // As entradas de login por papel (/api/investors/login, etc.) fazem a
    // mesma checagem de credencial e ainda exigem que o papel exista na
    // conta; papel ausente é RoleNotHeld, não "credencial inválida".
    pub async fn login_with_role(
        &self,
        identifier: &str,
        password: &str,
        role: Role,
    ) -> Result<String, AppError> {
        let token = self.login_user(identifier, password).await?;

        let user = self
            .user_repo
            .find_by_identifier(identifier)
            .await?
            .ok_or(AppError::InvalidCredentials)?;
        let state = self.user_repo.find_role_state(user.id, role).await?;
        if state.is_none() {
            return Err(AppError::RoleNotHeld(role.as_str()));
        }

        Ok(token)
    }

    pub async fn validate_token(&self, token: &str) -> Result<UserAccount, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let account = self
            .user_repo
            .load_account(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !account.user.ativo {
            return Err(AppError::InvalidToken);
        }
        Ok(account)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
