pub mod document_store;
pub use document_store::{Document, DocumentStore, MemoryDocumentStore, StoreError};
pub mod pg_store;
pub use pg_store::PgDocumentStore;
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod supplier_repo;
pub use supplier_repo::SupplierRepository;
pub mod sales_repo;
pub use sales_repo::SalesRepository;
