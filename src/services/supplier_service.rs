// src/services/supplier_service.rs

use std::collections::BTreeMap;

use chrono::Utc;

use crate::{
    common::error::AppError,
    db::SupplierRepository,
    models::supplier::{Supplier, SupplierCategoryCount, SupplierInput, SupplierSummary},
    services::filtering::filter_suppliers,
};

const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Clone)]
pub struct SupplierService {
    repo: SupplierRepository,
}

impl SupplierService {
    pub fn new(repo: SupplierRepository) -> Self {
        Self { repo }
    }

    pub async fn list_suppliers(&self, search: Option<&str>) -> Result<Vec<Supplier>, AppError> {
        let suppliers = self.repo.list_suppliers().await?;
        Ok(filter_suppliers(&suppliers, search))
    }

    pub async fn summary(&self) -> Result<SupplierSummary, AppError> {
        let suppliers = self.repo.list_suppliers().await?;
        Ok(summarize(&suppliers))
    }

    pub async fn get_supplier(&self, id: &str) -> Result<Supplier, AppError> {
        self.repo.get_supplier(id).await
    }

    pub async fn create_supplier(&self, input: SupplierInput) -> Result<Supplier, AppError> {
        let supplier = self.repo.create_supplier(&input, Utc::now()).await?;
        tracing::info!("🏢 Fornecedor '{}' criado ({})", supplier.name, supplier.id);
        Ok(supplier)
    }

    pub async fn update_supplier(&self, id: &str, input: SupplierInput) -> Result<Supplier, AppError> {
        self.repo.update_supplier(id, &input, Utc::now()).await
    }

    pub async fn delete_supplier(&self, id: &str) -> Result<(), AppError> {
        self.repo.delete_supplier(id).await?;
        tracing::info!("🗑️ Fornecedor {} excluído", id);
        Ok(())
    }
}

/// Total de fornecedores e contagem por categoria (sem categoria = "Uncategorized").
pub fn summarize(suppliers: &[Supplier]) -> SupplierSummary {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for supplier in suppliers {
        let key = supplier.category.map(|c| c.as_str()).unwrap_or(UNCATEGORIZED);
        *counts.entry(key).or_default() += 1;
    }

    SupplierSummary {
        total_suppliers: suppliers.len(),
        by_category: counts
            .into_iter()
            .map(|(category, count)| SupplierCategoryCount {
                category: category.to_string(),
                count,
            })
            .collect(),
    }
}
