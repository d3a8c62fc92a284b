// src/models/notification.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::auth::Role;

// Público-alvo amplo de uma notificação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "notification_audience", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Empreendedor,
    Investidor,
    Ambos,
}

impl Audience {
    pub fn includes(&self, role: Role) -> bool {
        match self {
            Audience::Empreendedor => role == Role::Empreendedor,
            Audience::Investidor => role == Role::Investidor,
            Audience::Ambos => matches!(role, Role::Empreendedor | Role::Investidor),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub titulo: String,
    pub conteudo: String,
    pub tipo_usuario: Audience,
    pub usuario_especifico_id: Option<Uuid>,
    pub usuario_especifico_tipo: Option<Role>,
    pub ativa: bool,
    pub criado_por: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    // Regra de resolução de destinatários, em ordem de prioridade:
    // (1) usuário específico vence qualquer tipoUsuario;
    // (2) senão, vale o público amplo. Notificações inativas não atingem ninguém.
    pub fn targets(&self, user_id: Uuid, user_roles: &[Role]) -> bool {
        if !self.ativa {
            return false;
        }
        if let Some(especifico) = self.usuario_especifico_id {
            return especifico == user_id;
        }
        user_roles.iter().any(|role| self.tipo_usuario.includes(*role))
    }
}

// Não lidas = endereçadas menos as com recibo de leitura. Os recibos
// formam um conjunto (upsert), então repetições na lista não mudam a conta.
pub fn count_unread(targeted: &[Notification], read_ids: &[Uuid]) -> i64 {
    targeted.iter().filter(|n| !read_ids.contains(&n.id)).count() as i64
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub titulo: String,

    #[validate(length(min = 1, message = "O conteúdo é obrigatório."))]
    pub conteudo: String,

    pub tipo_usuario: Audience,
    pub usuario_especifico_id: Option<Uuid>,
    pub usuario_especifico_tipo: Option<Role>,

    #[serde(default = "default_true")]
    pub ativa: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(tipo: Audience, especifico: Option<Uuid>) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            titulo: "Manutenção programada".into(),
            conteudo: "A plataforma ficará indisponível no domingo.".into(),
            tipo_usuario: tipo,
            usuario_especifico_id: especifico,
            usuario_especifico_tipo: None,
            ativa: true,
            criado_por: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn usuario_especifico_vence_o_tipo_amplo() {
        let alvo = Uuid::new_v4();
        let outro = Uuid::new_v4();

        // tipoUsuario = ambos, mas com usuário específico: só ele recebe.
        let n = notification(Audience::Ambos, Some(alvo));
        assert!(n.targets(alvo, &[Role::Investidor]));
        assert!(!n.targets(outro, &[Role::Investidor, Role::Empreendedor]));

        // mesmo sem papel algum o alvo específico recebe
        assert!(n.targets(alvo, &[]));
    }

    #[test]
    fn publico_amplo_por_papel() {
        let user = Uuid::new_v4();

        let so_investidores = notification(Audience::Investidor, None);
        assert!(so_investidores.targets(user, &[Role::Investidor]));
        assert!(!so_investidores.targets(user, &[Role::Empreendedor]));

        let ambos = notification(Audience::Ambos, None);
        assert!(ambos.targets(user, &[Role::Empreendedor]));
        assert!(ambos.targets(user, &[Role::Investidor]));
        assert!(!ambos.targets(user, &[Role::Admin]));
    }

    #[test]
    fn marcar_lida_duas_vezes_nao_muda_a_contagem() {
        let a = notification(Audience::Ambos, None);
        let b = notification(Audience::Ambos, None);
        let targeted = vec![a.clone(), b];

        assert_eq!(count_unread(&targeted, &[]), 2);

        // primeiro recibo derruba a conta
        let depois_da_primeira = count_unread(&targeted, &[a.id]);
        assert_eq!(depois_da_primeira, 1);

        // recibo repetido é um no-op: a conta não muda
        assert_eq!(count_unread(&targeted, &[a.id, a.id]), depois_da_primeira);
    }

    #[test]
    fn notificacao_inativa_nao_atinge_ninguem() {
        let alvo = Uuid::new_v4();
        let mut n = notification(Audience::Ambos, Some(alvo));
        n.ativa = false;
        assert!(!n.targets(alvo, &[Role::Investidor]));
    }
}
