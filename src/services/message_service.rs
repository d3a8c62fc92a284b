// src/services/message_service.rs

use chrono::Utc;

use crate::{
    common::error::AppError,
    db::{CompanyRepository, CreditRequestRepository, MessageRepository},
    models::{
        auth::{Role, UserAccount},
        message::{conversation_key, ConversationSummary, Message, SendMessagePayload},
    },
};

#[derive(Clone)]
pub struct MessageService {
    message_repo: MessageRepository,
    company_repo: CompanyRepository,
    credit_repo: CreditRequestRepository,
}

impl MessageService {
    pub fn new(
        message_repo: MessageRepository,
        company_repo: CompanyRepository,
        credit_repo: CreditRequestRepository,
    ) -> Self {
        Self { message_repo, company_repo, credit_repo }
    }

    // Mensagens são append-only. A âncora (empresa + solicitação) é
    // verificada sempre; a chave da conversa é cunhada na primeira mensagem.
    pub async fn send(
        &self,
        account: &UserAccount,
        payload: &SendMessagePayload,
    ) -> Result<Message, AppError> {
        let company = self
            .company_repo
            .find_by_id(payload.company_id)
            .await?
            .ok_or(AppError::CompanyNotFound)?;
        let request = self
            .credit_repo
            .find_by_id(payload.credit_request_id)
            .await?
            .ok_or(AppError::CreditRequestNotFound)?;

        // A conversa é ancorada a exatamente uma empresa e uma solicitação.
        if request.company_id != company.id {
            return Err(AppError::CreditRequestNotFound);
        }

        let is_owner = company.empreendedor_id == account.user.id;
        if !is_owner && !account.holds(Role::Investidor) {
            return Err(AppError::Forbidden);
        }

        let conversation_id = match &payload.conversation_id {
            Some(id) => {
                if !self.message_repo.user_participates(id, account.user.id).await? {
                    return Err(AppError::ConversationNotFound);
                }
                id.clone()
            }
            None => conversation_key(company.id, request.id, Utc::now()),
        };

        self.message_repo
            .insert(
                &conversation_id,
                company.id,
                request.id,
                account.user.id,
                payload.destinatario_tipo,
                &payload.conteudo,
            )
            .await
    }

    pub async fn list_conversations(
        &self,
        account: &UserAccount,
    ) -> Result<Vec<ConversationSummary>, AppError> {
        let mut summaries: Vec<ConversationSummary> = Vec::new();

        if account.holds(Role::Empreendedor) {
            summaries.extend(
                self.message_repo
                    .list_summaries_for_entrepreneur(account.user.id)
                    .await?,
            );
        }
        if account.holds(Role::Investidor) {
            for summary in self
                .message_repo
                .list_summaries_for_investor(account.user.id)
                .await?
            {
                // conta com os dois papéis pode ver a mesma conversa duas vezes
                if !summaries.iter().any(|s| s.conversation_id == summary.conversation_id) {
                    summaries.push(summary);
                }
            }
        }

        summaries.sort_by(|a, b| b.ultima_mensagem_em.cmp(&a.ultima_mensagem_em));
        Ok(summaries)
    }

    pub async fn list_messages(
        &self,
        account: &UserAccount,
        conversation_id: &str,
    ) -> Result<Vec<Message>, AppError> {
        if !self
            .message_repo
            .user_participates(conversation_id, account.user.id)
            .await?
        {
            return Err(AppError::ConversationNotFound);
        }
        self.message_repo.list_conversation(conversation_id).await
    }

    // Marca como lidas as mensagens endereçadas ao lado do chamador.
    pub async fn mark_read(
        &self,
        account: &UserAccount,
        conversation_id: &str,
    ) -> Result<(), AppError> {
        let messages = self.message_repo.list_conversation(conversation_id).await?;
        let Some(first) = messages.first() else {
            return Err(AppError::ConversationNotFound);
        };

        let company = self
            .company_repo
            .find_by_id(first.company_id)
            .await?
            .ok_or(AppError::ConversationNotFound)?;

        let side = if company.empreendedor_id == account.user.id {
            Role::Empreendedor
        } else if messages.iter().any(|m| m.remetente_id == account.user.id) {
            Role::Investidor
        } else {
            return Err(AppError::ConversationNotFound);
        };

        self.message_repo.mark_conversation_read(conversation_id, side).await?;
        Ok(())
    }
}
