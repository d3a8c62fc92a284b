// src/models/profile.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::{field_error, AppError};
use crate::models::auth::{Role, User};

// Campos do perfil que aceitam edição via fluxo de aprovação.
// Qualquer outra chave em changedFields é rejeitada na submissão.
pub const EDITABLE_FIELDS: &[&str] = &["nomeCompleto", "email", "telefone", "endereco"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "profile_change_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    Pending,
    Approved,
    Rejected,
}

// Uma proposta de edição de perfil. O perfil "vivo" só muda quando um
// admin aprova; até lá este registro é a única coisa criada.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingProfileChange {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tipo_usuario: Role,

    // Objeto JSON: nome do campo -> valor proposto.
    pub changed_fields: Value,

    pub status: ChangeStatus,
    pub requested_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub review_comment: Option<String>,
}

// Valida o mapeamento enviado na submissão: objeto não-vazio,
// somente chaves conhecidas.
pub fn validate_changed_fields(changed_fields: &Value) -> Result<&Map<String, Value>, AppError> {
    let obj = changed_fields
        .as_object()
        .filter(|m| !m.is_empty())
        .ok_or_else(|| field_error("changedFields", "required"))?;

    for key in obj.keys() {
        if !EDITABLE_FIELDS.contains(&key.as_str()) {
            return Err(field_error("changedFields", "unknown_field"));
        }
    }
    Ok(obj)
}

impl PendingProfileChange {
    // Transição de revisão. Só sai de `pending`; depois disso o registro
    // é terminal e novas revisões falham com ChangeNotPending.
    pub fn review(
        &mut self,
        reviewer_id: Uuid,
        approve: bool,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        if self.status != ChangeStatus::Pending {
            return Err(AppError::ChangeNotPending);
        }
        self.status = if approve { ChangeStatus::Approved } else { ChangeStatus::Rejected };
        self.reviewed_at = Some(now);
        self.reviewed_by = Some(reviewer_id);
        self.review_comment = comment;
        Ok(())
    }

    // Copia os campos propostos para o perfil vivo. Chamado somente no
    // caminho de aprovação, dentro da mesma transação que marca o registro.
    pub fn apply_to(&self, user: &mut User) {
        let Some(obj) = self.changed_fields.as_object() else {
            return;
        };
        for (key, value) in obj {
            match key.as_str() {
                "nomeCompleto" => {
                    if let Some(v) = value.as_str() {
                        user.nome_completo = v.to_string();
                    }
                }
                "email" => {
                    if let Some(v) = value.as_str() {
                        user.email = v.to_string();
                    }
                }
                "telefone" => {
                    user.telefone = value.as_str().map(|v| v.to_string());
                }
                "endereco" => {
                    user.endereco = Some(value.clone());
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            nome_completo: "João Souza".into(),
            email: "joao@antigo.com".into(),
            cpf: None,
            password_hash: "hash".into(),
            telefone: Some("11911111111".into()),
            endereco: None,
            ativo: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn change(user_id: Uuid, fields: Value) -> PendingProfileChange {
        PendingProfileChange {
            id: Uuid::new_v4(),
            user_id,
            tipo_usuario: Role::Empreendedor,
            changed_fields: fields,
            status: ChangeStatus::Pending,
            requested_at: Utc::now(),
            reviewed_at: None,
            reviewed_by: None,
            review_comment: None,
        }
    }

    #[test]
    fn aprovar_aplica_somente_os_campos_propostos() {
        let mut alvo = user();
        let mut registro = change(alvo.id, json!({ "email": "x@y.com" }));

        registro
            .review(Uuid::new_v4(), true, Some("ok".into()), Utc::now())
            .unwrap();
        registro.apply_to(&mut alvo);

        assert_eq!(registro.status, ChangeStatus::Approved);
        assert_eq!(alvo.email, "x@y.com");
        // os demais campos não mudam
        assert_eq!(alvo.nome_completo, "João Souza");
        assert_eq!(alvo.telefone.as_deref(), Some("11911111111"));
    }

    #[test]
    fn rejeitar_nao_toca_no_perfil() {
        let mut alvo = user();
        let email_antes = alvo.email.clone();
        let mut registro = change(alvo.id, json!({ "email": "x@y.com" }));

        registro
            .review(Uuid::new_v4(), false, Some("documento ilegível".into()), Utc::now())
            .unwrap();

        assert_eq!(registro.status, ChangeStatus::Rejected);
        assert_eq!(alvo.email, email_antes);
        assert_eq!(registro.review_comment.as_deref(), Some("documento ilegível"));
    }

    #[test]
    fn registro_revisado_e_terminal() {
        let revisor = Uuid::new_v4();
        let mut registro = change(Uuid::new_v4(), json!({ "telefone": "11999999999" }));
        registro.review(revisor, true, None, Utc::now()).unwrap();

        let revisado_em = registro.reviewed_at;
        let err = registro.review(Uuid::new_v4(), false, None, Utc::now());
        assert!(matches!(err, Err(AppError::ChangeNotPending)));

        // a segunda tentativa não altera a auditoria
        assert_eq!(registro.reviewed_by, Some(revisor));
        assert_eq!(registro.reviewed_at, revisado_em);
        assert_eq!(registro.status, ChangeStatus::Approved);
    }

    #[test]
    fn submissao_valida_o_mapeamento() {
        // vazio
        assert!(validate_changed_fields(&json!({})).is_err());
        // não-objeto
        assert!(validate_changed_fields(&json!("telefone")).is_err());
        // campo desconhecido (password_hash jamais é editável por aqui)
        assert!(validate_changed_fields(&json!({ "passwordHash": "x" })).is_err());
        // conjunto válido
        assert!(validate_changed_fields(&json!({ "telefone": "11999999999" })).is_ok());
    }

    #[test]
    fn fluxo_completo_de_aprovacao() {
        // submete {telefone} -> aprova com comentário -> aplicado e terminal
        let mut alvo = user();
        let mut registro = change(alvo.id, json!({ "telefone": "11999999999" }));
        assert_eq!(registro.status, ChangeStatus::Pending);

        let admin = Uuid::new_v4();
        registro.review(admin, true, Some("ok".into()), Utc::now()).unwrap();
        registro.apply_to(&mut alvo);

        assert_eq!(alvo.telefone.as_deref(), Some("11999999999"));
        assert_eq!(registro.review_comment.as_deref(), Some("ok"));
        assert!(matches!(
            registro.review(admin, true, None, Utc::now()),
            Err(AppError::ChangeNotPending)
        ));
    }
}
