// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::inventory::Item;

// 1. Resumo (os cards do topo + tabelas)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_items: usize,
    pub total_quantity: u64,
    pub total_value: Decimal,
    pub in_stock_count: usize,
    pub low_stock_items: Vec<Item>,
    pub out_of_stock_items: Vec<Item>,
    pub category_breakdown: Vec<CategoryStats>,
    pub recent_items: Vec<Item>,
    pub top_value_items: Vec<ItemValue>,
}

// 2. Distribuição por categoria
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category: String,
    pub count: usize,
    pub value: Decimal,
    /// Participação na contagem total de itens, em %, 1 casa decimal.
    pub percentage: Decimal,
}

// 3. Itens de maior valor em estoque
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemValue {
    #[serde(flatten)]
    pub item: Item,
    pub total_value: Decimal,
}
