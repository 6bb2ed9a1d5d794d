// src/models/filters.rs

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::models::inventory::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StockFilter {
    /// quantidade > 0 (inclui estoque baixo)
    InStock,
    /// 0 < quantidade < 10
    LowStock,
    OutOfStock,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ItemSort {
    #[default]
    Name,
    Quantity,
    Price,
    Value,
    Newest,
}

/// Filtro da listagem de itens (query string do GET /api/items).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ItemFilter {
    pub search: Option<String>,
    pub category: Option<Category>,
    pub stock: Option<StockFilter>,
    #[serde(default)]
    pub sort: ItemSort,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SupplierFilter {
    pub search: Option<String>,
}
