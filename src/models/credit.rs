// src/models/credit.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::{field_error, AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "credit_request_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "snake_case")]
pub enum CreditRequestStatus {
    Pendente,
    EmAnalise,
    Aprovada,
    Reprovada,
}

impl CreditRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreditRequestStatus::Pendente => "pendente",
            CreditRequestStatus::EmAnalise => "em_analise",
            CreditRequestStatus::Aprovada => "aprovada",
            CreditRequestStatus::Reprovada => "reprovada",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CreditRequestStatus::Aprovada | CreditRequestStatus::Reprovada)
    }

    // pendente -> em_analise -> {aprovada, reprovada}; sem estado incompleto.
    pub fn transition_to(&self, target: CreditRequestStatus) -> Result<CreditRequestStatus, AppError> {
        use CreditRequestStatus::*;
        if self.is_terminal() {
            return Err(AppError::InvalidStatusTransition(self.as_str(), target.as_str()));
        }
        let ok = match (self, target) {
            (Pendente, EmAnalise) => true,
            (Pendente | EmAnalise, Aprovada) => true,
            (Pendente | EmAnalise, Reprovada) => true,
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
pub struct CreditRequest {
    pub id: Uuid,
    pub company_id: Uuid,
    pub valor: Decimal,
    pub prazo_meses: i32,
    pub finalidade: String,
    pub status: CreditRequestStatus,
    pub documentos: Vec<String>,
    pub observacoes_analise: Option<String>,
    pub motivo_reprovacao: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- PAYLOADS ---

fn validate_valor(valor: &Decimal) -> Result<(), validator::ValidationError> {
    if *valor <= Decimal::ZERO {
        let mut err = validator::ValidationError::new("invalid_amount");
        err.message = Some("O valor solicitado deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCreditRequestPayload {
    pub company_id: Uuid,

    #[validate(custom(function = "validate_valor"))]
    pub valor: Decimal,

    #[validate(range(min = 1, max = 120, message = "O prazo deve ficar entre 1 e 120 meses."))]
    pub prazo_meses: i32,

    #[validate(length(min = 1, message = "A finalidade é obrigatória."))]
    pub finalidade: String,

    #[serde(default)]
    pub documentos: Vec<String>,
}

// PATCH administrativo: transição de status e/ou notas de análise.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateCreditRequestPayload {
    pub status: Option<CreditRequestStatus>,
    pub observacoes_analise: Option<String>,
    pub motivo_reprovacao: Option<String>,
}

impl AdminUpdateCreditRequestPayload {
    // Reprovar exige motivo, venha a decisão do /reject dedicado ou
    // deste PATCH genérico.
    pub fn ensure_rejection_reason(&self) -> Result<(), AppError> {
        if self.status == Some(CreditRequestStatus::Reprovada)
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

    #[test]
    fn maquina_de_status_do_credito() {
        use CreditRequestStatus::*;

        assert!(Pendente.transition_to(EmAnalise).is_ok());
        assert!(Pendente.transition_to(Aprovada).is_ok());
        assert!(EmAnalise.transition_to(Reprovada).is_ok());

        assert!(Aprovada.transition_to(Reprovada).is_err());
        assert!(Reprovada.transition_to(EmAnalise).is_err());
        assert!(EmAnalise.transition_to(Pendente).is_err());
    }

    #[test]
    fn reprovacao_via_patch_exige_motivo() {
        let payload = AdminUpdateCreditRequestPayload {
            status: Some(CreditRequestStatus::Reprovada),
            observacoes_analise: None,
            motivo_reprovacao: None,
        };
        assert!(payload.ensure_rejection_reason().is_err());

        let payload = AdminUpdateCreditRequestPayload {
            motivo_reprovacao: Some("   ".into()),
            ..payload
        };
        assert!(payload.ensure_rejection_reason().is_err());

        let payload = AdminUpdateCreditRequestPayload {
            motivo_reprovacao: Some("Faturamento insuficiente".into()),
            ..payload
        };
        assert!(payload.ensure_rejection_reason().is_ok());

        // demais transições não exigem motivo
        let payload = AdminUpdateCreditRequestPayload {
            status: Some(CreditRequestStatus::EmAnalise),
            observacoes_analise: None,
            motivo_reprovacao: None,
        };
        assert!(payload.ensure_rejection_reason().is_ok());
    }

    #[test]
    fn valor_deve_ser_positivo() {
        let payload = CreateCreditRequestPayload {
            company_id: Uuid::new_v4(),
            valor: Decimal::ZERO,
            prazo_meses: 12,
            finalidade: "Capital de giro".into(),
            documentos: vec![],
        };
        assert!(payload.validate().is_err());

        let payload = CreateCreditRequestPayload {
            valor: Decimal::new(50_000_00, 2),
            ..payload
        };
        assert!(payload.validate().is_ok());
    }
}
