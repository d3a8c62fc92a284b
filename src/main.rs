//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_middleware;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de auth protegidas (conta autenticada)
    let account_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/roles", post(handlers::auth::grant_role))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    // Registro/login por papel (públicos)
    let entrepreneur_routes = Router::new()
        .route("/register", post(handlers::auth::register_entrepreneur))
        .route("/login", post(handlers::auth::login_entrepreneur));

    let investor_routes = Router::new()
        .route("/register", post(handlers::auth::register_investor))
        .route("/login", post(handlers::auth::login_investor));

    let profile_routes = Router::new()
        .route("/changes", post(handlers::profile::submit_change))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let company_routes = Router::new()
        .route("/"
               ,post(handlers::companies::create_company)
               .get(handlers::companies::list_companies)
        )
        .route("/{id}"
               ,get(handlers::companies::get_company)
               .patch(handlers::companies::update_company)
               .put(handlers::companies::update_company)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let credit_routes = Router::new()
        .route("/"
               ,post(handlers::credit::create_credit_request)
               .get(handlers::credit::list_credit_requests)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let notification_routes = Router::new()
        .route("/", get(handlers::notifications::list_notifications))
        .route("/unread/count", get(handlers::notifications::unread_count))
        .route("/{id}/read", post(handlers::notifications::mark_notification_read))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let message_routes = Router::new()
        .route("/"
               ,post(handlers::messages::send_message)
        )
        .route("/conversations", get(handlers::messages::list_conversations))
        .route("/{conversation_id}", get(handlers::messages::list_messages))
        .route("/{conversation_id}/read", patch(handlers::messages::mark_conversation_read))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    // Back-office: o RequireRole<AdminRole> de cada handler cuida do 403
    let admin_routes = Router::new()
        .route("/pending-profile-changes", get(handlers::profile::list_changes))
        .route("/pending-profile-changes/{id}/review", post(handlers::profile::review_change))
        .route("/investors/{id}/approve", post(handlers::registrations::approve_investor))
        .route("/investors/{id}/reject", post(handlers::registrations::reject_investor))
        .route("/investors/{id}/approve-field", patch(handlers::registrations::approve_investor_field))
        .route("/entrepreneurs/{id}/approve", post(handlers::registrations::approve_entrepreneur))
        .route("/entrepreneurs/{id}/reject", post(handlers::registrations::reject_entrepreneur))
        .route("/entrepreneurs/{id}/approve-field", patch(handlers::registrations::approve_entrepreneur_field))
        .route("/companies", get(handlers::companies::admin_list_companies))
        .route("/companies/{id}", patch(handlers::companies::admin_update_company))
        .route("/companies/{id}/approve", post(handlers::companies::admin_approve_company))
        .route("/companies/{id}/reject", post(handlers::companies::admin_reject_company))
        .route("/credit-requests/{id}", patch(handlers::credit::admin_update_credit_request))
        .route("/notifications"
               ,get(handlers::notifications::admin_list_notifications)
               .post(handlers::notifications::admin_create_notification)
        )
        .route("/notifications/{id}"
               ,axum::routing::put(handlers::notifications::admin_update_notification)
               .delete(handlers::notifications::admin_delete_notification)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes.merge(account_routes))
        .nest("/api/entrepreneurs", entrepreneur_routes)
        .nest("/api/investors", investor_routes)
        .nest("/api/profile", profile_routes)
        .nest("/api/companies", company_routes)
        .nest("/api/credit-requests", credit_routes)
        .nest("/api/notifications", notification_routes)
        .nest("/api/messages", message_routes)
        .nest("/api/admin", admin_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
