// src/db/notification_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::Role,
        notification::{Audience, Notification},
    },
};

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, AppError> {
        let notification =
            sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(notification)
    }

    pub async fn create(
        &self,
        titulo: &str,
        conteudo: &str,
        tipo_usuario: Audience,
        usuario_especifico_id: Option<Uuid>,
        usuario_especifico_tipo: Option<Role>,
        ativa: bool,
        criado_por: Uuid,
    ) -> Result<Notification, AppError> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications
                (titulo, conteudo, tipo_usuario, usuario_especifico_id,
                 usuario_especifico_tipo, ativa, criado_por)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(titulo)
        .bind(conteudo)
        .bind(tipo_usuario)
        .bind(usuario_especifico_id)
        .bind(usuario_especifico_tipo)
        .bind(ativa)
        .bind(criado_por)
        .fetch_one(&self.pool)
        .await?;
        Ok(notification)
    }

    pub async fn update(
        &self,
        id: Uuid,
        titulo: &str,
        conteudo: &str,
        tipo_usuario: Audience,
        usuario_especifico_id: Option<Uuid>,
        usuario_especifico_tipo: Option<Role>,
        ativa: bool,
    ) -> Result<Notification, AppError> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications
            SET titulo = $2, conteudo = $3, tipo_usuario = $4,
                usuario_especifico_id = $5, usuario_especifico_tipo = $6, ativa = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(titulo)
        .bind(conteudo)
        .bind(tipo_usuario)
        .bind(usuario_especifico_id)
        .bind(usuario_especifico_tipo)
        .bind(ativa)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotificationNotFound)?;
        Ok(notification)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotificationNotFound);
        }
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<Notification>, AppError> {
        let notifications =
            sqlx::query_as::<_, Notification>("SELECT * FROM notifications ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(notifications)
    }

    // A resolução de destinatários acontece em Notification::targets;
    // aqui só buscamos as ativas.
    pub async fn list_active(&self) -> Result<Vec<Notification>, AppError> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE ativa ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(notifications)
    }

    pub async fn list_read_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT notification_id FROM notification_reads WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    // Recibo de leitura idempotente: marcar duas vezes é um no-op.
    pub async fn mark_read(&self, notification_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO notification_reads (notification_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (notification_id, user_id) DO NOTHING
            "#,
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
