// src/services/approval_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{RegistrationStatus, Requirement, Role, RoleState},
};

// Decisões do back-office sobre cadastros de investidores e
// empreendedores: aprovação/reprovação agregada e liberação campo a campo.
#[derive(Clone)]
pub struct RegistrationApprovalService {
    user_repo: UserRepository,
}

impl RegistrationApprovalService {
    pub fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    async fn role_state(&self, user_id: Uuid, role: Role) -> Result<RoleState, AppError> {
        self.user_repo
            .find_role_state(user_id, role)
            .await?
            .ok_or(AppError::RoleNotHeld(role.as_str()))
    }

    // Decisão agregada de aprovação. Além do status, liga
    // cadastro_aprovado: aprovar o cadastro É a decisão sobre essa flag.
    pub async fn approve(
        &self,
        user_id: Uuid,
        role: Role,
        admin_id: Uuid,
    ) -> Result<RoleState, AppError> {
        self.decide(user_id, role, admin_id, RegistrationStatus::Aprovada, Some(true), None)
            .await
    }

    // Reprovação exige motivo (validado no payload); o motivo é persistido
    // e devolvido ao usuário.
    pub async fn reject(
        &self,
        user_id: Uuid,
        role: Role,
        admin_id: Uuid,
        reason: &str,
    ) -> Result<RoleState, AppError> {
        self.decide(user_id, role, admin_id, RegistrationStatus::Reprovada, None, Some(reason))
            .await
    }

    // O UPDATE só casa se o status lido ainda for o vigente; se outra
    // decisão venceu a corrida, relatamos o conflito com o status fresco.
    async fn decide(
        &self,
        user_id: Uuid,
        role: Role,
        admin_id: Uuid,
        target: RegistrationStatus,
        cadastro_aprovado: Option<bool>,
        motivo: Option<&str>,
    ) -> Result<RoleState, AppError> {
        let state = self.role_state(user_id, role).await?;
        state.status.transition_to(target)?;

        let updated = self
            .user_repo
            .set_role_status(user_id, role, state.status, target, cadastro_aprovado, motivo)
            .await?;

        let Some(updated) = updated else {
            let fresh = self.role_state(user_id, role).await?;
            return Err(AppError::InvalidStatusTransition(
                fresh.status.as_str(),
                target.as_str(),
            ));
        };

        tracing::info!(
            "Cadastro {}/{} movido para {} por {}",
            user_id,
            role.as_str(),
            target.as_str(),
            admin_id
        );
        Ok(updated)
    }

    // Liberação campo a campo, independente do status agregado: ligar
    // todas as flags nunca muda o status sozinho.
    pub async fn approve_field(
        &self,
        user_id: Uuid,
        role: Role,
        field: Requirement,
        approved: bool,
    ) -> Result<RoleState, AppError> {
        // renda_comprovada/perfil_investidor só existem para investidores
        if !Requirement::required_for(role).contains(&field) {
            let mut errs = validator::ValidationErrors::new();
            let mut err = validator::ValidationError::new("invalid_field");
            err.message = Some(format!("Campo não se aplica ao papel {}.", role.as_str()).into());
            errs.add("field", err);
            return Err(AppError::ValidationError(errs));
        }

        self.role_state(user_id, role).await?;
        self.user_repo.set_role_flag(user_id, role, field, approved).await
    }
}
