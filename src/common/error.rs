use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Cada variante mapeia para um status HTTP em IntoResponse.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("CPF já existe")]
    CpfAlreadyExists,

    #[error("CNPJ já existe")]
    CnpjAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Usuário não possui o papel '{0}'")]
    RoleNotHeld(&'static str),

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Empresa não encontrada")]
    CompanyNotFound,

    #[error("Solicitação de crédito não encontrada")]
    CreditRequestNotFound,

    #[error("Alteração de perfil não encontrada")]
    ProfileChangeNotFound,

    #[error("Notificação não encontrada")]
    NotificationNotFound,

    #[error("Conversa não encontrada")]
    ConversationNotFound,

    // Já existe uma alteração pendente para este usuário.
    #[error("Alteração de perfil já pendente")]
    ChangeAlreadyPending,

    // A alteração já foi revisada; o registro é terminal.
    #[error("Alteração de perfil não está mais pendente")]
    ChangeNotPending,

    #[error("Transição de status inválida: {0} -> {1}")]
    InvalidStatusTransition(&'static str, &'static str),

    #[error("Empresa não está aprovada para solicitar crédito")]
    CompanyNotApproved,

    #[error("Violação de chave única: {0}")]
    UniqueConstraintViolation(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// Helper para erros de validação construídos à mão (fora do derive).
pub fn field_error(field: &'static str, message: &str) -> AppError {
    let mut errs = validator::ValidationErrors::new();
    let mut err = validator::ValidationError::new("invalid");
    err.message = Some(message.to_string().into());
    errs.add(field, err);
    AppError::ValidationError(errs)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso.".to_string()),
            AppError::CpfAlreadyExists => (StatusCode::CONFLICT, "Este CPF já está em uso.".to_string()),
            AppError::CnpjAlreadyExists => (StatusCode::CONFLICT, "Este CNPJ já está cadastrado.".to_string()),

            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "E-mail/CPF ou senha inválidos.".to_string())
            }
            AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente.".to_string())
            }
            AppError::Forbidden => {
                (StatusCode::FORBIDDEN, "Você não tem permissão para realizar esta ação.".to_string())
            }
            AppError::RoleNotHeld(role) => (
                StatusCode::FORBIDDEN,
                format!("Sua conta não possui o papel '{}'.", role),
            ),

            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado.".to_string()),
            AppError::CompanyNotFound => (StatusCode::NOT_FOUND, "Empresa não encontrada.".to_string()),
            AppError::CreditRequestNotFound => {
                (StatusCode::NOT_FOUND, "Solicitação de crédito não encontrada.".to_string())
            }
            AppError::ProfileChangeNotFound => {
                (StatusCode::NOT_FOUND, "Alteração de perfil não encontrada.".to_string())
            }
            AppError::NotificationNotFound => {
                (StatusCode::NOT_FOUND, "Notificação não encontrada.".to_string())
            }
            AppError::ConversationNotFound => {
                (StatusCode::NOT_FOUND, "Conversa não encontrada.".to_string())
            }

            AppError::ChangeAlreadyPending => (
                StatusCode::CONFLICT,
                "Já existe uma alteração de perfil aguardando revisão.".to_string(),
            ),
            AppError::ChangeNotPending => (
                StatusCode::CONFLICT,
                "Esta alteração de perfil já foi revisada.".to_string(),
            ),
            AppError::InvalidStatusTransition(de, para) => (
                StatusCode::CONFLICT,
                format!("Transição de status inválida: {} -> {}.", de, para),
            ),
            AppError::CompanyNotApproved => (
                StatusCode::CONFLICT,
                "Somente empresas aprovadas podem solicitar crédito.".to_string(),
            ),
            AppError::UniqueConstraintViolation(constraint) => (
                StatusCode::CONFLICT,
                format!("Registro duplicado ({}).", constraint),
            ),

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O `tracing` loga a mensagem detalhada; o cliente recebe texto genérico.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
