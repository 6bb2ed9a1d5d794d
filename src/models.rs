pub mod dashboard;
pub mod filters;
pub mod inventory;
pub mod sales;
pub mod supplier;
