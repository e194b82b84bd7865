pub mod session;
pub use session::SessionService;
pub mod auth;
pub use auth::AuthService;
pub mod list_store;
pub use list_store::{ListState, RemoteListStore};
pub mod catalog_service;
pub use catalog_service::CatalogService;
pub mod production_service;
pub use production_service::ProductionService;
pub mod crm_service;
pub use crm_service::CrmService;
pub mod tenancy_service;
pub use tenancy_service::TenancyService;
pub mod sales_service;
pub use sales_service::SalesService;
