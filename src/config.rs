// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        CompanyRepository, CreditRequestRepository, MessageRepository, NotificationRepository,
        ProfileChangeRepository, UserRepository,
    },
    services::{
        approval_service::RegistrationApprovalService, auth::AuthService,
        company_service::CompanyService, credit_service::CreditRequestService,
        message_service::MessageService, notification_service::NotificationService,
        profile_service::ProfileChangeService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub profile_service: ProfileChangeService,
    pub approval_service: RegistrationApprovalService,
    pub company_service: CompanyService,
    pub credit_service: CreditRequestService,
    pub notification_service: NotificationService,
    pub message_service: MessageService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let profile_repo = ProfileChangeRepository::new(db_pool.clone());
        let company_repo = CompanyRepository::new(db_pool.clone());
        let credit_repo = CreditRequestRepository::new(db_pool.clone());
        let notification_repo = NotificationRepository::new(db_pool.clone());
        let message_repo = MessageRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret, db_pool.clone());
        let profile_service =
            ProfileChangeService::new(profile_repo, user_repo.clone(), db_pool.clone());
        let approval_service = RegistrationApprovalService::new(user_repo);
        let company_service = CompanyService::new(company_repo.clone());
        let credit_service = CreditRequestService::new(credit_repo.clone(), company_repo.clone());
        let notification_service = NotificationService::new(notification_repo);
        let message_service = MessageService::new(message_repo, company_repo, credit_repo);

        Ok(Self {
            db_pool,
            auth_service,
            profile_service,
            approval_service,
            company_service,
            credit_service,
            notification_service,
            message_service,
        })
    }
}
