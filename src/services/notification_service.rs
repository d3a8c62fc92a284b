// src/services/notification_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::NotificationRepository,
    models::{
        auth::Role,
        auth::UserAccount,
        notification::{count_unread, CreateNotificationPayload, Notification},
    },
};

#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
}

impl NotificationService {
    pub fn new(notification_repo: NotificationRepository) -> Self {
        Self { notification_repo }
    }

    // --- Administração ---

    pub async fn create(
        &self,
        admin_id: Uuid,
        payload: &CreateNotificationPayload,
    ) -> Result<Notification, AppError> {
        self.notification_repo
            .create(
                &payload.titulo,
                &payload.conteudo,
                payload.tipo_usuario,
                payload.usuario_especifico_id,
                payload.usuario_especifico_tipo,
                payload.ativa,
                admin_id,
            )
            .await
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: &CreateNotificationPayload,
    ) -> Result<Notification, AppError> {
        self.notification_repo
            .update(
                id,
                &payload.titulo,
                &payload.conteudo,
                payload.tipo_usuario,
                payload.usuario_especifico_id,
                payload.usuario_especifico_tipo,
                payload.ativa,
            )
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.notification_repo.delete(id).await
    }

    pub async fn list_all(&self) -> Result<Vec<Notification>, AppError> {
        self.notification_repo.list_all().await
    }

    // --- Lado do usuário ---

    fn roles_of(account: &UserAccount) -> Vec<Role> {
        account.roles.iter().map(|rs| rs.role).collect()
    }

    // A regra de resolução (usuário específico > público amplo) vive em
    // Notification::targets; aqui só aplicamos sobre as ativas.
    pub async fn list_for(&self, account: &UserAccount) -> Result<Vec<Notification>, AppError> {
        let roles = Self::roles_of(account);
        let notifications = self
            .notification_repo
            .list_active()
            .await?
            .into_iter()
            .filter(|n| n.targets(account.user.id, &roles))
            .collect();
        Ok(notifications)
    }

    pub async fn unread_count(&self, account: &UserAccount) -> Result<i64, AppError> {
        let targeted = self.list_for(account).await?;
        let read = self.notification_repo.list_read_ids(account.user.id).await?;
        Ok(count_unread(&targeted, &read))
    }

    // Idempotente: marcar de novo é um no-op, nunca um erro.
    pub async fn mark_read(
        &self,
        account: &UserAccount,
        notification_id: Uuid,
    ) -> Result<(), AppError> {
        let notification = self
            .notification_repo
            .find_by_id(notification_id)
            .await?
            .ok_or(AppError::NotificationNotFound)?;

        let roles = Self::roles_of(account);
        if !notification.targets(account.user.id, &roles) {
            return Err(AppError::NotificationNotFound);
        }

        self.notification_repo.mark_read(notification_id, account.user.id).await
    }
}
