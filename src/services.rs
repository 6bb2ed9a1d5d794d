pub mod checkout;
pub mod dashboard_service;
pub mod filtering;
pub mod inventory_service;
pub mod sales_service;
pub mod supplier_service;

pub use checkout::{CheckoutService, CheckoutSessions};
pub use dashboard_service::DashboardService;
pub use inventory_service::InventoryService;
pub use sales_service::SalesService;
pub use supplier_service::SupplierService;
