// src/db/inventory_repo.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::{
    common::{
        db_utils::{decode_all, decode_record, not_found_as},
        error::AppError,
    },
    db::document_store::{fields_of, DocumentStore, ITEMS},
    models::inventory::{Item, ItemInput},
};

// Repositório da coleção 'items'
#[derive(Clone)]
pub struct InventoryRepository {
    store: Arc<dyn DocumentStore>,
}

impl InventoryRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    // ---
    // Leitura
    // ---

    pub async fn get_all_items(&self) -> Result<Vec<Item>, AppError> {
        let docs = self.store.list_all(ITEMS).await?;
        Ok(decode_all(ITEMS, docs))
    }

    /// Leitura "fresca" direto do store (não usa snapshot de tela).
    pub async fn get_item(&self, id: &str) -> Result<Item, AppError> {
        let doc = self
            .store
            .get_one(ITEMS, id)
            .await
            .map_err(|e| not_found_as(e, AppError::ItemNotFound))?;
        decode_record(ITEMS, doc)
    }

    // ---
    // Escrita
    // ---

    pub async fn create_item(&self, input: &ItemInput, now: DateTime<Utc>) -> Result<Item, AppError> {
        let mut item = Item {
            id: String::new(),
            name: input.name.clone(),
            quantity: input.quantity,
            unit: input.unit,
            price: input.price,
            category: input.category,
            sku: input.sku.clone(),
            image: input.image.clone(),
            created_at: Some(now),
            updated_at: Some(now),
        };

        item.id = self.store.create(ITEMS, fields_of(&item)?).await?;
        Ok(item)
    }

    /// Sobrescreve todos os campos editáveis e atualiza `updatedAt`.
    pub async fn update_item(
        &self,
        id: &str,
        input: &ItemInput,
        now: DateTime<Utc>,
    ) -> Result<Item, AppError> {
        let mut patch = fields_of(input)?;
        patch["updatedAt"] = json!(now);

        self.store
            .update(ITEMS, id, patch)
            .await
            .map_err(|e| not_found_as(e, AppError::ItemNotFound))?;

        self.get_item(id).await
    }

    /// Grava o novo saldo de um item.
    pub async fn set_quantity(&self, id: &str, quantity: u32, now: DateTime<Utc>) -> Result<(), AppError> {
        self.store
            .update(ITEMS, id, json!({ "quantity": quantity, "updatedAt": now }))
            .await
            .map_err(|e| not_found_as(e, AppError::ItemNotFound))
    }

    /// Exclusão permanente.
    pub async fn delete_item(&self, id: &str) -> Result<(), AppError> {
        self.store
            .delete(ITEMS, id)
            .await
            .map_err(|e| not_found_as(e, AppError::ItemNotFound))
    }
}
