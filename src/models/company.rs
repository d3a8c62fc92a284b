// src/models/company.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::{field_error, AppError};

// Mapeia o CREATE TYPE company_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "company_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "snake_case")]
pub enum CompanyStatus {
    PendenteAnalise,
    EmAnalise,
    Aprovada,
    Reprovada,
    Incompleto,
}

impl CompanyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyStatus::PendenteAnalise => "pendente_analise",
            CompanyStatus::EmAnalise => "em_analise",
            CompanyStatus::Aprovada => "aprovada",
            CompanyStatus::Reprovada => "reprovada",
            CompanyStatus::Incompleto => "incompleto",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CompanyStatus::Aprovada | CompanyStatus::Reprovada)
    }

    // Mesma máquina dos cadastros: pendente_analise -> em_analise ->
    // {aprovada, reprovada}; incompleto só a partir de pendente_analise.
    pub fn transition_to(&self, target: CompanyStatus) -> Result<CompanyStatus, AppError> {
        use CompanyStatus::*;
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

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub empreendedor_id: Uuid,
    pub razao_social: String,
    pub cnpj: String,
    pub endereco: Option<Value>,
    pub setor: Option<String>,
    pub faturamento_anual: Option<Decimal>,
    pub descricao: Option<String>,
    pub imagens: Vec<String>,
    pub status: CompanyStatus,

    // Notas internas do back-office; nunca devolvidas a quem não é admin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observacoes_internas: Option<String>,

    pub valuation: Option<Decimal>,
    pub motivo_reprovacao: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    // Remove os campos restritos antes de serializar para empreendedores
    // e investidores.
    pub fn scrub_internal(mut self) -> Self {
        self.observacoes_internas = None;
        self
    }

    // Só empresas aprovadas podem ancorar uma nova solicitação de crédito.
    pub fn ensure_credit_eligible(&self) -> Result<(), AppError> {
        if self.status != CompanyStatus::Aprovada {
            return Err(AppError::CompanyNotApproved);
        }
        Ok(())
    }
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyPayload {
    #[validate(length(min = 3, message = "A razão social deve ter no mínimo 3 caracteres."))]
    pub razao_social: String,

    #[validate(length(equal = 14, message = "O CNPJ deve ter 14 dígitos."))]
    pub cnpj: String,

    pub endereco: Option<Value>,
    pub setor: Option<String>,
    pub faturamento_anual: Option<Decimal>,
    pub descricao: Option<String>,

    #[validate(length(max = 10, message = "No máximo 10 imagens por empresa."))]
    #[serde(default)]
    pub imagens: Vec<String>,
}

// Campos "soft" que o dono pode editar sem nova análise completa.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyPayload {
    pub endereco: Option<Value>,
    pub setor: Option<String>,
    pub descricao: Option<String>,

    #[validate(length(max = 10, message = "No máximo 10 imagens por empresa."))]
    pub imagens: Option<Vec<String>>,
}

// Mutação administrativa: status, notas internas e valuation.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateCompanyPayload {
    pub status: Option<CompanyStatus>,
    pub observacoes_internas: Option<String>,
    pub valuation: Option<Decimal>,
    pub motivo_reprovacao: Option<String>,
}

impl AdminUpdateCompanyPayload {
    // Reprovar exige motivo, venha a decisão do /reject dedicado ou
    // deste PATCH genérico.
    pub fn ensure_rejection_reason(&self) -> Result<(), AppError> {
        if self.status == Some(CompanyStatus::Reprovada)
            && self.motivo_reprovacao.as_deref().map_or(true, |m| m.trim().is_empty())
        {
            return Err(field_error(
                "motivoReprovacao",
                "O motivo da reprovação é obrigatório.",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn company(status: CompanyStatus) -> Company {
        Company {
            id: Uuid::new_v4(),
            empreendedor_id: Uuid::new_v4(),
            razao_social: "Padaria Pão Quente Ltda".into(),
            cnpj: "12345678000190".into(),
            endereco: None,
            setor: Some("Alimentação".into()),
            faturamento_anual: None,
            descricao: None,
            imagens: vec![],
            status,
            observacoes_internas: None,
            valuation: None,
            motivo_reprovacao: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn so_empresa_aprovada_ancora_credito() {
        assert!(matches!(
            company(CompanyStatus::PendenteAnalise).ensure_credit_eligible(),
            Err(AppError::CompanyNotApproved)
        ));
        assert!(matches!(
            company(CompanyStatus::EmAnalise).ensure_credit_eligible(),
            Err(AppError::CompanyNotApproved)
        ));
        assert!(company(CompanyStatus::Aprovada).ensure_credit_eligible().is_ok());
    }

    #[test]
    fn reprovacao_via_patch_exige_motivo() {
        let payload = AdminUpdateCompanyPayload {
            status: Some(CompanyStatus::Reprovada),
            observacoes_internas: None,
            valuation: None,
            motivo_reprovacao: None,
        };
        assert!(payload.ensure_rejection_reason().is_err());

        let payload = AdminUpdateCompanyPayload {
            motivo_reprovacao: Some("Documentação divergente".into()),
            ..payload
        };
        assert!(payload.ensure_rejection_reason().is_ok());

        let payload = AdminUpdateCompanyPayload {
            status: Some(CompanyStatus::EmAnalise),
            observacoes_internas: None,
            valuation: None,
            motivo_reprovacao: None,
        };
        assert!(payload.ensure_rejection_reason().is_ok());
    }

    #[test]
    fn maquina_de_status_da_empresa() {
        use CompanyStatus::*;

        assert!(PendenteAnalise.transition_to(EmAnalise).is_ok());
        assert!(PendenteAnalise.transition_to(Incompleto).is_ok());
        assert!(Incompleto.transition_to(Aprovada).is_ok());
        assert!(EmAnalise.transition_to(Reprovada).is_ok());

        assert!(EmAnalise.transition_to(Incompleto).is_err());
        assert!(Aprovada.transition_to(EmAnalise).is_err());
        assert!(Reprovada.transition_to(Aprovada).is_err());
    }
}
