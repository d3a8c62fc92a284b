// src/db/message_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::Role,
        message::{ConversationSummary, Message},
    },
};

#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        conversation_id: &str,
        company_id: Uuid,
        credit_request_id: Uuid,
        remetente_id: Uuid,
        destinatario_tipo: Role,
        conteudo: &str,
    ) -> Result<Message, AppError> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages
                (conversation_id, company_id, credit_request_id,
                 remetente_id, destinatario_tipo, conteudo)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(conversation_id)
        .bind(company_id)
        .bind(credit_request_id)
        .bind(remetente_id)
        .bind(destinatario_tipo)
        .bind(conteudo)
        .fetch_one(&self.pool)
        .await?;
        Ok(message)
    }

    pub async fn list_conversation(&self, conversation_id: &str) -> Result<Vec<Message>, AppError> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE conversation_id = $1 ORDER BY created_at",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }

    // Participa quem enviou mensagem na conversa ou é dono da empresa âncora.
    pub async fn user_participates(
        &self,
        conversation_id: &str,
        user_id: Uuid,
    ) -> Result<bool, AppError> {
        let participates = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM messages m
                JOIN companies c ON c.id = m.company_id
                WHERE m.conversation_id = $1
                  AND (m.remetente_id = $2 OR c.empreendedor_id = $2)
            )
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(participates)
    }

    // Conversas do lado empreendedor: todas as empresas do usuário.
    pub async fn list_summaries_for_entrepreneur(
        &self,
        empreendedor_id: Uuid,
    ) -> Result<Vec<ConversationSummary>, AppError> {
        let summaries = sqlx::query_as::<_, ConversationSummary>(
            r#"
            SELECT m.conversation_id,
                   m.company_id,
                   m.credit_request_id,
                   (array_agg(m.conteudo ORDER BY m.created_at DESC))[1] AS ultima_mensagem,
                   MAX(m.created_at) AS ultima_mensagem_em,
                   COUNT(*) FILTER (WHERE m.destinatario_tipo = 'EMPREENDEDOR' AND NOT m.lida)
                       AS nao_lidas
            FROM messages m
            JOIN companies c ON c.id = m.company_id
            WHERE c.empreendedor_id = $1
            GROUP BY m.conversation_id, m.company_id, m.credit_request_id
            ORDER BY ultima_mensagem_em DESC
            "#,
        )
        .bind(empreendedor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(summaries)
    }

    // Conversas do lado investidor: threads onde o usuário já enviou mensagem.
    pub async fn list_summaries_for_investor(
        &self,
        investidor_id: Uuid,
    ) -> Result<Vec<ConversationSummary>, AppError> {
        let summaries = sqlx::query_as::<_, ConversationSummary>(
            r#"
            SELECT m.conversation_id,
                   m.company_id,
                   m.credit_request_id,
                   (array_agg(m.conteudo ORDER BY m.created_at DESC))[1] AS ultima_mensagem,
                   MAX(m.created_at) AS ultima_mensagem_em,
                   COUNT(*) FILTER (WHERE m.destinatario_tipo = 'INVESTIDOR' AND NOT m.lida)
                       AS nao_lidas
            FROM messages m
            WHERE m.conversation_id IN (
                SELECT conversation_id FROM messages WHERE remetente_id = $1
            )
            GROUP BY m.conversation_id, m.company_id, m.credit_request_id
            ORDER BY ultima_mensagem_em DESC
            "#,
        )
        .bind(investidor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(summaries)
    }

    // Marca como lidas as mensagens endereçadas ao lado do chamador.
    // Idempotente: repetir não muda nada.
    pub async fn mark_conversation_read(
        &self,
        conversation_id: &str,
        destinatario_tipo: Role,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET lida = TRUE
            WHERE conversation_id = $1 AND destinatario_tipo = $2 AND NOT lida
            "#,
        )
        .bind(conversation_id)
        .bind(destinatario_tipo)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
