// src/db/profile_repo.rs

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{PgConnection, PgPool, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::Role,
        profile::{ChangeStatus, PendingProfileChange},
    },
};

#[derive(Clone)]
pub struct ProfileChangeRepository {
    pool: PgPool,
}

impl ProfileChangeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PendingProfileChange>, AppError> {
        let change = sqlx::query_as::<_, PendingProfileChange>(
            "SELECT * FROM pending_profile_changes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(change)
    }

    pub async fn find_pending_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<PendingProfileChange>, AppError> {
        let change = sqlx::query_as::<_, PendingProfileChange>(
            "SELECT * FROM pending_profile_changes WHERE user_id = $1 AND status = 'PENDING'",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(change)
    }

    // A criação nunca toca no perfil vivo: só este registro nasce aqui.
    // O índice parcial garante a unicidade de pendência por usuário mesmo
    // sob corrida; o conflito vira ChangeAlreadyPending.
    pub async fn insert(
        &self,
        user_id: Uuid,
        tipo_usuario: Role,
        changed_fields: &Value,
    ) -> Result<PendingProfileChange, AppError> {
        let change = sqlx::query_as::<_, PendingProfileChange>(
            r#"
            INSERT INTO pending_profile_changes (user_id, tipo_usuario, changed_fields)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(tipo_usuario)
        .bind(changed_fields)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::ChangeAlreadyPending;
                }
            }
            e.into()
        })?;
        Ok(change)
    }

    // Marca a revisão. O guard `status = 'PENDING'` no WHERE torna a
    // operação segura contra cliques duplos: a segunda tentativa não
    // encontra linha e o serviço responde ChangeNotPending.
    pub async fn mark_reviewed(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        status: ChangeStatus,
        reviewer_id: Uuid,
        comment: Option<&str>,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Option<PendingProfileChange>, AppError> {
        let change = sqlx::query_as::<_, PendingProfileChange>(
            r#"
            UPDATE pending_profile_changes
            SET status = $2, reviewed_by = $3, review_comment = $4, reviewed_at = $5
            WHERE id = $1 AND status = 'PENDING'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(reviewer_id)
        .bind(comment)
        .bind(reviewed_at)
        .fetch_optional(conn)
        .await?;
        Ok(change)
    }

    // Listagem administrativa com filtros opcionais, mais recentes primeiro.
    pub async fn list(
        &self,
        status: Option<ChangeStatus>,
        tipo_usuario: Option<Role>,
    ) -> Result<Vec<PendingProfileChange>, AppError> {
        let mut builder =
            QueryBuilder::new("SELECT * FROM pending_profile_changes WHERE TRUE");

        if let Some(status) = status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(tipo) = tipo_usuario {
            builder.push(" AND tipo_usuario = ").push_bind(tipo);
        }
        builder.push(" ORDER BY requested_at DESC");

        let changes = builder
            .build_query_as::<PendingProfileChange>()
            .fetch_all(&self.pool)
            .await?;
        Ok(changes)
    }
}
