// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::register_entrepreneur,
        handlers::auth::register_investor,
        handlers::auth::login,
        handlers::auth::login_entrepreneur,
        handlers::auth::login_investor,
        handlers::auth::get_me,
        handlers::auth::grant_role,

        // --- Profile ---
        handlers::profile::submit_change,
        handlers::profile::list_changes,
        handlers::profile::review_change,

        // --- Companies ---
        handlers::companies::create_company,
        handlers::companies::list_companies,
        handlers::companies::get_company,
        handlers::companies::update_company,
        handlers::companies::admin_list_companies,
        handlers::companies::admin_approve_company,
        handlers::companies::admin_reject_company,
        handlers::companies::admin_update_company,

        // --- Credit ---
        handlers::credit::create_credit_request,
        handlers::credit::list_credit_requests,
        handlers::credit::admin_update_credit_request,

        // --- Registrations ---
        handlers::registrations::approve_investor,
        handlers::registrations::reject_investor,
        handlers::registrations::approve_investor_field,
        handlers::registrations::approve_entrepreneur,
        handlers::registrations::reject_entrepreneur,
        handlers::registrations::approve_entrepreneur_field,

        // --- Notifications ---
        handlers::notifications::admin_list_notifications,
        handlers::notifications::admin_create_notification,
        handlers::notifications::admin_update_notification,
        handlers::notifications::admin_delete_notification,
        handlers::notifications::list_notifications,
        handlers::notifications::unread_count,
        handlers::notifications::mark_notification_read,

        // --- Messages ---
        handlers::messages::list_conversations,
        handlers::messages::list_messages,
        handlers::messages::send_message,
        handlers::messages::mark_conversation_read,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::RegistrationStatus,
            models::auth::Requirement,
            models::auth::RoleState,
            models::auth::User,
            models::auth::UserAccount,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::RejectPayload,
            models::auth::AuthResponse,
            handlers::auth::GrantRolePayload,

            // --- Profile ---
            models::profile::ChangeStatus,
            models::profile::PendingProfileChange,
            handlers::profile::SubmitChangePayload,
            handlers::profile::ReviewChangePayload,

            // --- Companies ---
            models::company::CompanyStatus,
            models::company::Company,
            models::company::CreateCompanyPayload,
            models::company::UpdateCompanyPayload,
            models::company::AdminUpdateCompanyPayload,

            // --- Credit ---
            models::credit::CreditRequestStatus,
            models::credit::CreditRequest,
            models::credit::CreateCreditRequestPayload,
            models::credit::AdminUpdateCreditRequestPayload,

            // --- Registrations ---
            handlers::registrations::ApproveFieldPayload,

            // --- Notifications ---
            models::notification::Audience,
            models::notification::Notification,
            models::notification::CreateNotificationPayload,
            models::notification::UnreadCountResponse,

            // --- Messages ---
            models::message::Message,
            models::message::ConversationSummary,
            models::message::SendMessagePayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação, registro e papéis"),
        (name = "Profile", description = "Alterações de perfil com aprovação"),
        (name = "Companies", description = "Empresas dos empreendedores"),
        (name = "Credit", description = "Solicitações de crédito"),
        (name = "Notifications", description = "Notificações endereçadas"),
        (name = "Messages", description = "Conversas entre investidores e empreendedores"),
        (name = "Admin", description = "Back-office administrativo")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
