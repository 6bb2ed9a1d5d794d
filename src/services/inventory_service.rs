// src/services/inventory_service.rs

use chrono::Utc;

use crate::{
    common::error::AppError,
    db::InventoryRepository,
    models::{
        filters::{ItemFilter, StockFilter},
        inventory::{Item, ItemInput},
    },
    services::filtering::filter_items,
};

#[derive(Clone)]
pub struct InventoryService {
    inventory_repo: InventoryRepository,
}

impl InventoryService {
    pub fn new(inventory_repo: InventoryRepository) -> Self {
        Self { inventory_repo }
    }

    // --- LISTAGEM (coleção inteira + filtro em memória, sem paginação) ---
    pub async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<Item>, AppError> {
        let items = self.inventory_repo.get_all_items().await?;
        Ok(filter_items(&items, filter))
    }

    /// Só itens com saldo, por nome (a lista da tela de venda).
    pub async fn available_items(&self) -> Result<Vec<Item>, AppError> {
        let filter = ItemFilter {
            stock: Some(StockFilter::InStock),
            ..Default::default()
        };
        self.list_items(&filter).await
    }

    pub async fn get_item(&self, id: &str) -> Result<Item, AppError> {
        self.inventory_repo.get_item(id).await
    }

    // --- CREATE ITEM ---
    pub async fn create_item(&self, input: ItemInput) -> Result<Item, AppError> {
        let item = self.inventory_repo.create_item(&input, Utc::now()).await?;
        tracing::info!("📦 Item '{}' criado ({})", item.name, item.id);
        Ok(item)
    }

    // --- UPDATE ITEM (sobrescreve os campos editáveis) ---
    pub async fn update_item(&self, id: &str, input: ItemInput) -> Result<Item, AppError> {
        let item = self.inventory_repo.update_item(id, &input, Utc::now()).await?;
        tracing::info!("📦 Item '{}' atualizado ({})", item.name, item.id);
        Ok(item)
    }

    // --- DELETE ITEM (permanente) ---
    pub async fn delete_item(&self, id: &str) -> Result<(), AppError> {
        self.inventory_repo.delete_item(id).await?;
        tracing::info!("🗑️ Item {} excluído", id);
        Ok(())
    }
}
