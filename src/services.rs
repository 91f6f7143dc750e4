// src/services.rs

pub mod activity_service;
pub mod agency_service;
pub mod auth;
pub mod bank_service;
pub mod client_service;
pub mod company_service;
pub mod content_service;
pub mod gateway_service;
pub mod order_service;
pub mod postal_service;

pub use activity_service::ActivityService;
pub use agency_service::AgencyService;
pub use auth::AuthService;
pub use bank_service::BankService;
pub use client_service::ClientService;
pub use company_service::CompanyService;
pub use content_service::ContentService;
pub use gateway_service::GatewayService;
pub use order_service::OrderService;
pub use postal_service::PostalService;
