// src/services/profile_service.rs

use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProfileChangeRepository, UserRepository},
    models::{
        auth::{Role, UserAccount},
        profile::{self, ChangeStatus, PendingProfileChange},
    },
};

// Medeia edições de perfil: o dado sensível só entra no perfil vivo
// depois da revisão do back-office.
#[derive(Clone)]
pub struct ProfileChangeService {
    profile_repo: ProfileChangeRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl ProfileChangeService {
    pub fn new(
        profile_repo: ProfileChangeRepository,
        user_repo: UserRepository,
        pool: PgPool,
    ) -> Self {
        Self { profile_repo, user_repo, pool }
    }

    // Cria o registro pendente. O perfil vivo NÃO é alterado aqui.
    pub async fn submit_change(
        &self,
        account: &UserAccount,
        tipo_usuario: Role,
        changed_fields: Value,
    ) -> Result<PendingProfileChange, AppError> {
        // Admins editam direto; o fluxo de aprovação é para os demais papéis.
        if tipo_usuario == Role::Admin || account.holds(Role::Admin) {
            return Err(AppError::Forbidden);
        }
        if !account.holds(tipo_usuario) {
            return Err(AppError::RoleNotHeld(tipo_usuario.as_str()));
        }

        profile::validate_changed_fields(&changed_fields)?;

        // Uma pendência por usuário. O índice parcial no banco cobre a
        // corrida entre a checagem e o insert.
        if self.profile_repo.find_pending_by_user(account.user.id).await?.is_some() {
            return Err(AppError::ChangeAlreadyPending);
        }

        let change = self
            .profile_repo
            .insert(account.user.id, tipo_usuario, &changed_fields)
            .await?;

        tracing::info!(
            "Alteração de perfil {} submetida pelo usuário {}",
            change.id,
            account.user.id
        );
        Ok(change)
    }

    // Revisão administrativa. Aprovar copia os campos para o perfil vivo e
    // marca o registro na MESMA transação; rejeitar só marca o registro.
    // Em ambos os casos o registro fica terminal.
    pub async fn review(
        &self,
        change_id: Uuid,
        reviewer_id: Uuid,
        approve: bool,
        comment: Option<&str>,
    ) -> Result<PendingProfileChange, AppError> {
        let status = if approve { ChangeStatus::Approved } else { ChangeStatus::Rejected };

        let mut tx = self.pool.begin().await?;

        let reviewed = self
            .profile_repo
            .mark_reviewed(&mut tx, change_id, status, reviewer_id, comment, Utc::now())
            .await?;

        let Some(change) = reviewed else {
            // Nenhuma linha pendente com esse id: ou não existe, ou já foi
            // revisada (clique duplo). Distinguimos para o chamador.
            return match self.profile_repo.find_by_id(change_id).await? {
                Some(_) => Err(AppError::ChangeNotPending),
                None => Err(AppError::ProfileChangeNotFound),
            };
        };

        if approve {
            let fields = change
                .changed_fields
                .as_object()
                .ok_or_else(|| anyhow::anyhow!("changed_fields corrompido: não é objeto"))?;
            self.user_repo
                .apply_profile_fields(&mut tx, change.user_id, fields)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Alteração {} revisada por {}: {}",
            change.id,
            reviewer_id,
            if approve { "aprovada" } else { "rejeitada" }
        );
        Ok(change)
    }

    pub async fn list(
        &self,
        status: Option<ChangeStatus>,
        tipo_usuario: Option<Role>,
    ) -> Result<Vec<PendingProfileChange>, AppError> {
        self.profile_repo.list(status, tipo_usuario).await
    }
}
