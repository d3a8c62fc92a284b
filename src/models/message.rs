// src/models/message.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::auth::Role;

// Uma conversa é sempre ancorada a exatamente uma empresa e uma
// solicitação de crédito; a chave é cunhada na primeira mensagem.
pub fn conversation_key(company_id: Uuid, credit_request_id: Uuid, at: DateTime<Utc>) -> String {
    format!("{}:{}:{}", company_id, credit_request_id, at.timestamp_millis())
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: String,
    pub company_id: Uuid,
    pub credit_request_id: Uuid,
    pub remetente_id: Uuid,
    pub destinatario_tipo: Role,
    pub conteudo: String,
    pub lida: bool,
    pub created_at: DateTime<Utc>,
}

// Resumo de conversa para a listagem (última mensagem + não lidas).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub conversation_id: String,
    pub company_id: Uuid,
    pub credit_request_id: Uuid,
    pub ultima_mensagem: String,
    pub ultima_mensagem_em: DateTime<Utc>,
    pub nao_lidas: i64,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub company_id: Uuid,
    pub credit_request_id: Uuid,

    // Omitido = primeira mensagem; o servidor cunha a chave da conversa.
    pub conversation_id: Option<String>,

    pub destinatario_tipo: Role,

    #[validate(length(min = 1, message = "A mensagem não pode ser vazia."))]
    pub conteudo: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chave_de_conversa_carrega_a_ancora() {
        let company = Uuid::new_v4();
        let request = Uuid::new_v4();
        let agora = Utc::now();

        let chave = conversation_key(company, request, agora);
        let partes: Vec<&str> = chave.split(':').collect();
        assert_eq!(partes.len(), 3);
        assert_eq!(partes[0], company.to_string());
        assert_eq!(partes[1], request.to_string());
        assert_eq!(partes[2], agora.timestamp_millis().to_string());
    }
}
