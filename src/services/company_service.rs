// src/services/company_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CompanyRepository,
    models::{
        auth::{Role, UserAccount},
        company::{
            AdminUpdateCompanyPayload, Company, CompanyStatus, CreateCompanyPayload,
            UpdateCompanyPayload,
        },
    },
};

#[derive(Clone)]
pub struct CompanyService {
    company_repo: CompanyRepository,
}

impl CompanyService {
    pub fn new(company_repo: CompanyRepository) -> Self {
        Self { company_repo }
    }

    // Empresas nascem pendente_analise; só o admin muda status.
    pub async fn create(
        &self,
        owner: &UserAccount,
        payload: &CreateCompanyPayload,
    ) -> Result<Company, AppError> {
        if !owner.holds(Role::Empreendedor) {
            return Err(AppError::RoleNotHeld(Role::Empreendedor.as_str()));
        }

        self.company_repo
            .create(
                owner.user.id,
                &payload.razao_social,
                &payload.cnpj,
                payload.endereco.as_ref(),
                payload.setor.as_deref(),
                payload.faturamento_anual,
                payload.descricao.as_deref(),
                &payload.imagens,
            )
            .await
    }

    // Visibilidade: o dono vê as suas; investidores só veem aprovadas
    // (e nunca as notas internas); admin vê tudo pelas rotas /admin.
    pub async fn get_for(&self, account: &UserAccount, id: Uuid) -> Result<Company, AppError> {
        let company = self
            .company_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::CompanyNotFound)?;

        if company.empreendedor_id == account.user.id {
            return Ok(company.scrub_internal());
        }
        if account.holds(Role::Investidor) && company.status == CompanyStatus::Aprovada {
            return Ok(company.scrub_internal());
        }
        Err(AppError::CompanyNotFound)
    }

    pub async fn list_for(&self, account: &UserAccount) -> Result<Vec<Company>, AppError> {
        let companies = if account.holds(Role::Empreendedor) {
            self.company_repo.list_by_owner(account.user.id).await?
        } else if account.holds(Role::Investidor) {
            // A "rede" de empresas navegável pelos investidores
            self.company_repo.list_approved().await?
        } else {
            return Err(AppError::Forbidden);
        };
        Ok(companies.into_iter().map(Company::scrub_internal).collect())
    }

    // Edição soft pelo dono (endereço, setor, descrição, imagens).
    pub async fn update_soft(
        &self,
        account: &UserAccount,
        id: Uuid,
        payload: &UpdateCompanyPayload,
    ) -> Result<Company, AppError> {
        let company = self
            .company_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::CompanyNotFound)?;
        if company.empreendedor_id != account.user.id {
            return Err(AppError::Forbidden);
        }

        let updated = self
            .company_repo
            .update_soft_fields(
                id,
                payload.endereco.as_ref(),
                payload.setor.as_deref(),
                payload.descricao.as_deref(),
                payload.imagens.as_deref(),
            )
            .await?;
        Ok(updated.scrub_internal())
    }

    // --- Operações administrativas ---

    pub async fn list_all(&self) -> Result<Vec<Company>, AppError> {
        self.company_repo.list_all().await
    }

    pub async fn approve(&self, id: Uuid, admin_id: Uuid) -> Result<Company, AppError> {
        let updated = self
            .transition(id, CompanyStatus::Aprovada, None)
            .await?;
        tracing::info!("Empresa {} aprovada por {}", id, admin_id);
        Ok(updated)
    }

    pub async fn reject(&self, id: Uuid, admin_id: Uuid, reason: &str) -> Result<Company, AppError> {
        let updated = self
            .transition(id, CompanyStatus::Reprovada, Some(reason))
            .await?;
        tracing::info!("Empresa {} reprovada por {}", id, admin_id);
        Ok(updated)
    }

    // Transição com guard otimista: o UPDATE só casa se o status lido
    // ainda for o vigente. A segunda de duas decisões concorrentes não
    // encontra linha e vira conflito com o status fresco.
    async fn transition(
        &self,
        id: Uuid,
        target: CompanyStatus,
        reason: Option<&str>,
    ) -> Result<Company, AppError> {
        let company = self
            .company_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::CompanyNotFound)?;
        company.status.transition_to(target)?;

        let updated = self
            .company_repo
            .admin_update(id, Some(company.status), Some(target), None, None, reason)
            .await?;

        match updated {
            Some(company) => Ok(company),
            None => {
                let fresh = self
                    .company_repo
                    .find_by_id(id)
                    .await?
                    .ok_or(AppError::CompanyNotFound)?;
                Err(AppError::InvalidStatusTransition(fresh.status.as_str(), target.as_str()))
            }
        }
    }

    // PATCH administrativo genérico (em_analise, incompleto, notas,
    // valuation). Transições continuam passando pela máquina de estados
    // e reprovar continua exigindo motivo.
    pub async fn admin_update(
        &self,
        id: Uuid,
        payload: &AdminUpdateCompanyPayload,
    ) -> Result<Company, AppError> {
        payload.ensure_rejection_reason()?;

        let company = self
            .company_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::CompanyNotFound)?;

        if let Some(target) = payload.status {
            company.status.transition_to(target)?;
        }

        let updated = self
            .company_repo
            .admin_update(
                id,
                payload.status.map(|_| company.status),
                payload.status,
                payload.observacoes_internas.as_deref(),
                payload.valuation,
                payload.motivo_reprovacao.as_deref(),
            )
            .await?;

        match (updated, payload.status) {
            (Some(company), _) => Ok(company),
            (None, Some(target)) => {
                let fresh = self
                    .company_repo
                    .find_by_id(id)
                    .await?
                    .ok_or(AppError::CompanyNotFound)?;
                Err(AppError::InvalidStatusTransition(fresh.status.as_str(), target.as_str()))
            }
            (None, None) => Err(AppError::CompanyNotFound),
        }
    }
}
