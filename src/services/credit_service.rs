// src/services/credit_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CompanyRepository, CreditRequestRepository},
    models::{
        auth::{Role, UserAccount},
        credit::{AdminUpdateCreditRequestPayload, CreateCreditRequestPayload, CreditRequest},
    },
};

#[derive(Clone)]
pub struct CreditRequestService {
    credit_repo: CreditRequestRepository,
    company_repo: CompanyRepository,
}

impl CreditRequestService {
    pub fn new(credit_repo: CreditRequestRepository, company_repo: CompanyRepository) -> Self {
        Self { credit_repo, company_repo }
    }

    // Pré-condições: o chamador é dono da empresa, tem o papel de
    // empreendedor totalmente aprovado, e a empresa está aprovada.
    // Registros novos nascem com status pendente.
    pub async fn create(
        &self,
        account: &UserAccount,
        payload: &CreateCreditRequestPayload,
    ) -> Result<CreditRequest, AppError> {
        if !account.is_fully_approved(Role::Empreendedor)? {
            return Err(AppError::Forbidden);
        }

        let company = self
            .company_repo
            .find_by_id(payload.company_id)
            .await?
            .ok_or(AppError::CompanyNotFound)?;

        if company.empreendedor_id != account.user.id {
            return Err(AppError::Forbidden);
        }
        company.ensure_credit_eligible()?;

        self.credit_repo
            .create(
                company.id,
                payload.valor,
                payload.prazo_meses,
                &payload.finalidade,
                &payload.documentos,
            )
            .await
    }

    pub async fn list_for(&self, account: &UserAccount) -> Result<Vec<CreditRequest>, AppError> {
        if account.holds(Role::Admin) {
            return self.credit_repo.list_all().await;
        }
        if account.holds(Role::Empreendedor) {
            return self.credit_repo.list_by_owner(account.user.id).await;
        }
        Err(AppError::RoleNotHeld(Role::Empreendedor.as_str()))
    }

    // PATCH administrativo: transição validada + notas de análise.
    // Reprovar exige motivo, e o guard otimista no UPDATE garante que a
    // segunda de duas decisões concorrentes vira conflito em vez de
    // sobrescrever um estado terminal.
    pub async fn admin_update(
        &self,
        id: Uuid,
        admin_id: Uuid,
        payload: &AdminUpdateCreditRequestPayload,
    ) -> Result<CreditRequest, AppError> {
        payload.ensure_rejection_reason()?;

        let request = self
            .credit_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::CreditRequestNotFound)?;

        if let Some(target) = payload.status {
            request.status.transition_to(target)?;
        }

        let updated = self
            .credit_repo
            .admin_update(
                id,
                payload.status.map(|_| request.status),
                payload.status,
                payload.observacoes_analise.as_deref(),
                payload.motivo_reprovacao.as_deref(),
            )
            .await?;

        match (updated, payload.status) {
            (Some(request), status) => {
                if let Some(target) = status {
                    tracing::info!(
                        "Solicitação {} movida para {} por {}",
                        id,
                        target.as_str(),
                        admin_id
                    );
                }
                Ok(request)
            }
            (None, Some(target)) => {
                let fresh = self
                    .credit_repo
                    .find_by_id(id)
                    .await?
                    .ok_or(AppError::CreditRequestNotFound)?;
                Err(AppError::InvalidStatusTransition(fresh.status.as_str(), target.as_str()))
            }
            (None, None) => Err(AppError::CreditRequestNotFound),
        }
    }
}
