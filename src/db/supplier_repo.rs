// src/db/supplier_repo.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::{
    common::{
        db_utils::{decode_all, decode_record, not_found_as},
        error::AppError,
    },
    db::document_store::{fields_of, DocumentStore, SUPPLIERS},
    models::supplier::{Supplier, SupplierInput},
};

#[derive(Clone)]
pub struct SupplierRepository {
    store: Arc<dyn DocumentStore>,
}

impl SupplierRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>, AppError> {
        let docs = self.store.list_all(SUPPLIERS).await?;
        Ok(decode_all(SUPPLIERS, docs))
    }

    pub async fn get_supplier(&self, id: &str) -> Result<Supplier, AppError> {
        let doc = self
            .store
            .get_one(SUPPLIERS, id)
            .await
            .map_err(|e| not_found_as(e, AppError::SupplierNotFound))?;
        decode_record(SUPPLIERS, doc)
    }

    pub async fn create_supplier(
        &self,
        input: &SupplierInput,
        now: DateTime<Utc>,
    ) -> Result<Supplier, AppError> {
        let mut supplier = Supplier {
            id: String::new(),
            name: input.name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            address: input.address.clone(),
            category: input.category,
            notes: input.notes.clone(),
            created_at: Some(now),
            updated_at: Some(now),
        };

        supplier.id = self.store.create(SUPPLIERS, fields_of(&supplier)?).await?;
        Ok(supplier)
    }

    /// Atualiza os campos do formulário; `createdAt` é preservado.
    pub async fn update_supplier(
        &self,
        id: &str,
        input: &SupplierInput,
        now: DateTime<Utc>,
    ) -> Result<Supplier, AppError> {
        let mut patch = fields_of(input)?;
        patch["updatedAt"] = json!(now);

        self.store
            .update(SUPPLIERS, id, patch)
            .await
            .map_err(|e| not_found_as(e, AppError::SupplierNotFound))?;

        self.get_supplier(id).await
    }

    pub async fn delete_supplier(&self, id: &str) -> Result<(), AppError> {
        self.store
            .delete(SUPPLIERS, id)
            .await
            .map_err(|e| not_found_as(e, AppError::SupplierNotFound))
    }
}
