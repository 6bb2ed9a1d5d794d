pub mod dashboard;
pub mod inventory;
pub mod sales;
pub mod sell;
pub mod suppliers;
