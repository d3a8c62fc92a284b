// src/db/user_repo.rs

use serde_json::{Map, Value};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{RegistrationStatus, Requirement, Role, RoleState, User, UserAccount},
};

const USER_COLUMNS: &str =
    "id, nome_completo, email, cpf, password_hash, telefone, endereco, ativo, created_at, updated_at";

// O repositório de usuários: tabela 'users' + 'role_states'.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let maybe_user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Login aceita e-mail ou CPF como identificador.
    pub async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, AppError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1 OR cpf = $1");
        let maybe_user = sqlx::query_as::<_, User>(&query)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Cria um novo usuário, com tratamento específico para duplicados.
    pub async fn create_user(
        &self,
        conn: &mut PgConnection,
        nome_completo: &str,
        email: &str,
        cpf: Option<&str>,
        password_hash: &str,
        telefone: Option<&str>,
        endereco: Option<&Value>,
    ) -> Result<User, AppError> {
        let query = format!(
            r#"
            INSERT INTO users (nome_completo, email, cpf, password_hash, telefone, endereco)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(nome_completo)
            .bind(email)
            .bind(cpf)
            .bind(password_hash)
            .bind(telefone)
            .bind(endereco)
            .fetch_one(conn)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        if let Some(constraint) = db_err.constraint() {
                            return match constraint {
                                "users_email_key" => AppError::EmailAlreadyExists,
                                "users_cpf_key" => AppError::CpfAlreadyExists,
                                _ => AppError::UniqueConstraintViolation(constraint.to_string()),
                            };
                        }
                    }
                }
                e.into()
            })?;

        Ok(user)
    }

    // --- Papéis e aprovação ---

    pub async fn insert_role_state(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        role: Role,
    ) -> Result<RoleState, AppError> {
        let state = sqlx::query_as::<_, RoleState>(
            r#"
            INSERT INTO role_states (user_id, role)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(conn)
        .await?;
        Ok(state)
    }

    pub async fn list_role_states(&self, user_id: Uuid) -> Result<Vec<RoleState>, AppError> {
        let states = sqlx::query_as::<_, RoleState>(
            "SELECT * FROM role_states WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(states)
    }

    pub async fn find_role_state(
        &self,
        user_id: Uuid,
        role: Role,
    ) -> Result<Option<RoleState>, AppError> {
        let state = sqlx::query_as::<_, RoleState>(
            "SELECT * FROM role_states WHERE user_id = $1 AND role = $2",
        )
        .bind(user_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;
        Ok(state)
    }

    // Usuário + todos os papéis, como o middleware injeta na requisição.
    pub async fn load_account(&self, user_id: Uuid) -> Result<Option<UserAccount>, AppError> {
        let Some(user) = self.find_by_id(user_id).await? else {
            return Ok(None);
        };
        let roles = self.list_role_states(user_id).await?;
        Ok(Some(UserAccount { user, roles }))
    }

    // approve-field: liga/desliga exatamente uma flag, sem tocar no status.
    pub async fn set_role_flag(
        &self,
        user_id: Uuid,
        role: Role,
        field: Requirement,
        approved: bool,
    ) -> Result<RoleState, AppError> {
        let column = match field {
            Requirement::CadastroAprovado => "cadastro_aprovado",
            Requirement::EmailConfirmado => "email_confirmado",
            Requirement::DocumentosVerificados => "documentos_verificados",
            Requirement::RendaComprovada => "renda_comprovada",
            Requirement::PerfilInvestidor => "perfil_investidor",
        };
        let query = format!(
            r#"
            UPDATE role_states
            SET {column} = $3, updated_at = now()
            WHERE user_id = $1 AND role = $2
            RETURNING *
            "#
        );
        let state = sqlx::query_as::<_, RoleState>(&query)
            .bind(user_id)
            .bind(role)
            .bind(approved)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::UserNotFound)?;
        Ok(state)
    }

    // Decisão agregada do cadastro (approve/reject/em_analise/incompleto).
    // O guard `status = $6` no WHERE faz do UPDATE a própria transição:
    // se outra decisão chegou antes, nenhuma linha casa e devolvemos None
    // em vez de sobrescrever um estado terminal.
    pub async fn set_role_status(
        &self,
        user_id: Uuid,
        role: Role,
        expected: RegistrationStatus,
        status: RegistrationStatus,
        cadastro_aprovado: Option<bool>,
        motivo_reprovacao: Option<&str>,
    ) -> Result<Option<RoleState>, AppError> {
        let state = sqlx::query_as::<_, RoleState>(
            r#"
            UPDATE role_states
            SET status = $3,
                cadastro_aprovado = COALESCE($4, cadastro_aprovado),
                motivo_reprovacao = COALESCE($5, motivo_reprovacao),
                updated_at = now()
            WHERE user_id = $1 AND role = $2 AND status = $6
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(role)
        .bind(status)
        .bind(cadastro_aprovado)
        .bind(motivo_reprovacao)
        .bind(expected)
        .fetch_optional(&self.pool)
        .await?;
        Ok(state)
    }

    // Aplica os campos de uma alteração de perfil aprovada.
    // As chaves já foram validadas contra a whitelist na submissão.
    pub async fn apply_profile_fields(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        fields: &Map<String, Value>,
    ) -> Result<(), AppError> {
        for (key, value) in fields {
            match key.as_str() {
                "nomeCompleto" => {
                    sqlx::query("UPDATE users SET nome_completo = $2, updated_at = now() WHERE id = $1")
                        .bind(user_id)
                        .bind(value.as_str().unwrap_or_default())
                        .execute(&mut *conn)
                        .await?;
                }
                "email" => {
                    sqlx::query("UPDATE users SET email = $2, updated_at = now() WHERE id = $1")
                        .bind(user_id)
                        .bind(value.as_str().unwrap_or_default())
                        .execute(&mut *conn)
                        .await
                        .map_err(|e| {
                            if let sqlx::Error::Database(db_err) = &e {
                                if db_err.is_unique_violation() {
                                    return AppError::EmailAlreadyExists;
                                }
                            }
                            e.into()
                        })?;
                }
                "telefone" => {
                    sqlx::query("UPDATE users SET telefone = $2, updated_at = now() WHERE id = $1")
                        .bind(user_id)
                        .bind(value.as_str())
                        .execute(&mut *conn)
                        .await?;
                }
                "endereco" => {
                    sqlx::query("UPDATE users SET endereco = $2, updated_at = now() WHERE id = $1")
                        .bind(user_id)
                        .bind(value)
                        .execute(&mut *conn)
                        .await?;
                }
                _ => {}
            }
        }
        Ok(())
    }
}
