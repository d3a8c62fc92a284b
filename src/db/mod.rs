pub mod user_repo;
pub use user_repo::UserRepository;
pub mod profile_repo;
pub use profile_repo::ProfileChangeRepository;
pub mod company_repo;
pub use company_repo::CompanyRepository;
pub mod credit_repo;
pub use credit_repo::CreditRequestRepository;
pub mod notification_repo;
pub use notification_repo::NotificationRepository;
pub mod message_repo;
pub use message_repo::MessageRepository;
