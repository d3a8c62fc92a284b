// src/models/auth.rs

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

// --- ENUMS ---

// Mapeia o CREATE TYPE user_role do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Empreendedor,
    Investidor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Empreendedor => "empreendedor",
            Role::Investidor => "investidor",
            Role::Admin => "admin",
        }
    }
}

// Status agregado do cadastro de um papel (mesma máquina das empresas).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "registration_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    PendenteAnalise,
    EmAnalise,
    Aprovada,
    Reprovada,
    Incompleto,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::PendenteAnalise => "pendente_analise",
            RegistrationStatus::EmAnalise => "em_analise",
            RegistrationStatus::Aprovada => "aprovada",
            RegistrationStatus::Reprovada => "reprovada",
            RegistrationStatus::Incompleto => "incompleto",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RegistrationStatus::Aprovada | RegistrationStatus::Reprovada)
    }

    // pendente_analise -> em_analise -> {aprovada, reprovada};
    // incompleto só é alcançável a partir de pendente_analise.
    pub fn transition_to(&self, target: RegistrationStatus) -> Result<RegistrationStatus, AppError> {
        use RegistrationStatus::*;
        if self.is_terminal() {
            return Err(AppError::InvalidStatusTransition(self.as_str(), target.as_str()));
        }
        let ok = match (self, target) {
            (PendenteAnalise, EmAnalise) => true,
            (PendenteAnalise, Incompleto) => true,
            (PendenteAnalise | EmAnalise | Incompleto, Aprovada) => true,
            (PendenteAnalise | EmAnalise | Incompleto, Reprovada) => true,
            (Incompleto, EmAnalise) => true,
            _ => false,
        };
        if ok {
            Ok(target)
        } else {
            Err(AppError::InvalidStatusTransition(self.as_str(), target.as_str()))
        }
    }
}

// Requisitos individuais de verificação de um papel.
// Também é o `field` aceito pelo endpoint approve-field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum Requirement {
    CadastroAprovado,
    EmailConfirmado,
    DocumentosVerificados,
    RendaComprovada,
    PerfilInvestidor,
}

impl Requirement {
    // Quais flags precisam estar verdadeiras para o papel ser "utilizável".
    pub fn required_for(role: Role) -> &'static [Requirement] {
        match role {
            Role::Empreendedor => &[
                Requirement::CadastroAprovado,
                Requirement::EmailConfirmado,
                Requirement::DocumentosVerificados,
            ],
            Role::Investidor => &[
                Requirement::CadastroAprovado,
                Requirement::EmailConfirmado,
                Requirement::DocumentosVerificados,
                Requirement::RendaComprovada,
                Requirement::PerfilInvestidor,
            ],
            // Admin não passa por verificação; basta a conta estar ativa.
            Role::Admin => &[],
        }
    }
}

// --- ESTADO DE APROVAÇÃO POR PAPEL ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleState {
    pub user_id: Uuid,
    pub role: Role,
    pub status: RegistrationStatus,
    pub cadastro_aprovado: bool,
    pub email_confirmado: bool,
    pub documentos_verificados: bool,
    pub renda_comprovada: bool,
    pub perfil_investidor: bool,
    pub motivo_reprovacao: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoleState {
    pub fn flag(&self, req: Requirement) -> bool {
        match req {
            Requirement::CadastroAprovado => self.cadastro_aprovado,
            Requirement::EmailConfirmado => self.email_confirmado,
            Requirement::DocumentosVerificados => self.documentos_verificados,
            Requirement::RendaComprovada => self.renda_comprovada,
            Requirement::PerfilInvestidor => self.perfil_investidor,
        }
    }

    // Conjunto de pendências; vazio quando o papel está totalmente aprovado.
    // Nunca falha: é uma projeção de leitura usada para montar checklists.
    pub fn missing_requirements(&self) -> BTreeSet<Requirement> {
        Requirement::required_for(self.role)
            .iter()
            .copied()
            .filter(|req| !self.flag(*req))
            .collect()
    }

    pub fn is_fully_approved(&self) -> bool {
        self.missing_requirements().is_empty()
    }
}

// --- USUÁRIO ---

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub nome_completo: String,
    pub email: String,
    pub cpf: Option<String>,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub telefone: Option<String>,
    pub endereco: Option<Value>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Usuário + papéis carregados. É o que o middleware injeta na requisição
// e o que o /me devolve.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    #[serde(flatten)]
    pub user: User,
    pub roles: Vec<RoleState>,
}

impl UserAccount {
    pub fn holds(&self, role: Role) -> bool {
        self.roles.iter().any(|rs| rs.role == role)
    }

    // Distingue "papel inexistente" (RoleNotHeld) de "papel pendente".
    pub fn role_state(&self, role: Role) -> Result<&RoleState, AppError> {
        self.roles
            .iter()
            .find(|rs| rs.role == role)
            .ok_or(AppError::RoleNotHeld(role.as_str()))
    }

    pub fn missing_requirements(&self, role: Role) -> Result<BTreeSet<Requirement>, AppError> {
        Ok(self.role_state(role)?.missing_requirements())
    }

    pub fn is_fully_approved(&self, role: Role) -> Result<bool, AppError> {
        Ok(self.role_state(role)?.is_fully_approved())
    }
}

// --- PAYLOADS ---

// Dados para registro de um novo usuário (empreendedor ou investidor)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    #[validate(length(min = 3, message = "O nome deve ter no mínimo 3 caracteres."))]
    pub nome_completo: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(equal = 11, message = "O CPF deve ter 11 dígitos."))]
    pub cpf: Option<String>,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    pub telefone: Option<String>,
    pub endereco: Option<Value>,

    // Papel solicitado. Obrigatório no /api/auth/register; as rotas
    // /api/entrepreneurs e /api/investors fixam o papel e ignoram o campo.
    pub role: Option<Role>,
}

// Dados para login (e-mail ou CPF)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginUserPayload {
    #[validate(length(min = 3, message = "Informe o e-mail ou CPF."))]
    pub identificador: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Corpo comum das reprovações administrativas: motivo obrigatório.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectPayload {
    #[validate(length(min = 1, message = "O motivo da reprovação é obrigatório."))]
    pub reason: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role_state(role: Role) -> RoleState {
        RoleState {
            user_id: Uuid::new_v4(),
            role,
            status: RegistrationStatus::PendenteAnalise,
            cadastro_aprovado: false,
            email_confirmado: false,
            documentos_verificados: false,
            renda_comprovada: false,
            perfil_investidor: false,
            motivo_reprovacao: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn account(roles: Vec<RoleState>) -> UserAccount {
        UserAccount {
            user: User {
                id: Uuid::new_v4(),
                nome_completo: "Maria da Silva".into(),
                email: "maria@email.com".into(),
                cpf: Some("12345678900".into()),
                password_hash: "$2b$irrelevante".into(),
                telefone: None,
                endereco: None,
                ativo: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            roles,
        }
    }

    #[test]
    fn empreendedor_totalmente_aprovado_sem_pendencias() {
        let mut rs = role_state(Role::Empreendedor);
        rs.cadastro_aprovado = true;
        rs.email_confirmado = true;
        rs.documentos_verificados = true;

        let conta = account(vec![rs]);
        assert!(conta.is_fully_approved(Role::Empreendedor).unwrap());
        assert!(conta.missing_requirements(Role::Empreendedor).unwrap().is_empty());
    }

    #[test]
    fn qualquer_flag_faltando_derruba_aprovacao() {
        let mut rs = role_state(Role::Investidor);
        rs.cadastro_aprovado = true;
        rs.email_confirmado = true;
        rs.documentos_verificados = true;
        rs.renda_comprovada = true;
        // perfil_investidor segue falso

        let conta = account(vec![rs]);
        assert!(!conta.is_fully_approved(Role::Investidor).unwrap());

        let pendencias = conta.missing_requirements(Role::Investidor).unwrap();
        assert_eq!(pendencias.len(), 1);
        assert!(pendencias.contains(&Requirement::PerfilInvestidor));
    }

    #[test]
    fn papel_nao_detido_e_distinto_de_pendente() {
        let conta = account(vec![role_state(Role::Empreendedor)]);

        // Pendente: retorna Ok(false), com a lista de pendências.
        assert!(!conta.is_fully_approved(Role::Empreendedor).unwrap());

        // Não detido: erro RoleNotHeld, nunca um checklist vazio.
        match conta.is_fully_approved(Role::Investidor) {
            Err(AppError::RoleNotHeld(r)) => assert_eq!(r, "investidor"),
            other => panic!("esperava RoleNotHeld, veio {:?}", other.map(|_| ())),
        }
        assert!(conta.missing_requirements(Role::Investidor).is_err());
    }

    #[test]
    fn maquina_de_status_do_cadastro() {
        use RegistrationStatus::*;

        assert!(PendenteAnalise.transition_to(EmAnalise).is_ok());
        assert!(PendenteAnalise.transition_to(Incompleto).is_ok());
        assert!(EmAnalise.transition_to(Aprovada).is_ok());
        assert!(EmAnalise.transition_to(Reprovada).is_ok());
        assert!(Incompleto.transition_to(EmAnalise).is_ok());

        // incompleto só é alcançável a partir de pendente_analise
        assert!(EmAnalise.transition_to(Incompleto).is_err());

        // estados terminais não saem do lugar
        assert!(Aprovada.transition_to(Reprovada).is_err());
        assert!(Reprovada.transition_to(EmAnalise).is_err());
        assert!(Aprovada.is_terminal());
        assert!(Reprovada.is_terminal());
    }

    #[test]
    fn decisoes_concorrentes_nao_se_sobrescrevem() {
        use RegistrationStatus::*;

        // aprovar e reprovar disputando o mesmo cadastro: a decisão que
        // persistir primeiro vence, e a segunda é um conflito
        let vencedora = EmAnalise.transition_to(Aprovada).unwrap();
        assert!(vencedora.transition_to(Reprovada).is_err());

        let vencedora = EmAnalise.transition_to(Reprovada).unwrap();
        assert!(vencedora.transition_to(Aprovada).is_err());
    }
}
