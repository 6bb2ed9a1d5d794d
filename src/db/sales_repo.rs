// src/db/sales_repo.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;

use crate::{
    common::{
        db_utils::{decode_all, decode_record, not_found_as},
        error::AppError,
    },
    db::document_store::{fields_of, DocumentStore, SALES},
    models::sales::{CustomerInfo, Sale, SaleLine, SaleStatus},
};

// Coleção 'sales': só cresce. Depois de criada, a venda só muda de status
// e de log de compensação.
#[derive(Clone)]
pub struct SalesRepository {
    store: Arc<dyn DocumentStore>,
}

impl SalesRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Grava a venda como `Pending`, com o log de baixas vazio.
    pub async fn create_pending_sale(
        &self,
        customer_info: &CustomerInfo,
        items: Vec<SaleLine>,
        total_amount: Decimal,
        sale_date: DateTime<Utc>,
    ) -> Result<Sale, AppError> {
        let mut sale = Sale {
            id: String::new(),
            customer_info: customer_info.clone(),
            items,
            total_amount,
            sale_date,
            status: SaleStatus::Pending,
            applied_item_ids: Vec::new(),
        };

        sale.id = self.store.create(SALES, fields_of(&sale)?).await?;
        Ok(sale)
    }

    pub async fn get_sale(&self, id: &str) -> Result<Sale, AppError> {
        let doc = self
            .store
            .get_one(SALES, id)
            .await
            .map_err(|e| not_found_as(e, AppError::SaleNotFound))?;
        decode_record(SALES, doc)
    }

    /// Todas as vendas, mais recentes primeiro.
    pub async fn list_sales(&self) -> Result<Vec<Sale>, AppError> {
        let docs = self.store.list_all(SALES).await?;
        let mut sales: Vec<Sale> = decode_all(SALES, docs);
        sales.sort_by(|a, b| b.sale_date.cmp(&a.sale_date));
        Ok(sales)
    }

    /// Regrava o log de baixas aplicadas (lista completa).
    pub async fn record_applied(&self, id: &str, applied_item_ids: &[String]) -> Result<(), AppError> {
        self.store
            .update(SALES, id, json!({ "appliedItemIds": applied_item_ids }))
            .await
            .map_err(|e| not_found_as(e, AppError::SaleNotFound))
    }

    pub async fn set_status(&self, id: &str, status: SaleStatus) -> Result<(), AppError> {
        self.store
            .update(SALES, id, json!({ "status": status }))
            .await
            .map_err(|e| not_found_as(e, AppError::SaleNotFound))
    }
}
