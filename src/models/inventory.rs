// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::{error::AppError, lenient};

/// Abaixo deste valor (e acima de zero) o item está com estoque baixo.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

// --- 1. Unidades de Medida ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Unit {
    Kg,
    Litre,
    Meter,
    Piece,
    Pack,
    Box,
}

// --- 2. Categorias (lista fixa, compartilhada com fornecedores) ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum Category {
    Electronics,
    Groceries,
    Clothing,
    Books,
    Tools,
    Medical,
    Sports,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Electronics,
        Category::Groceries,
        Category::Clothing,
        Category::Books,
        Category::Tools,
        Category::Medical,
        Category::Sports,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Groceries => "Groceries",
            Category::Clothing => "Clothing",
            Category::Books => "Books",
            Category::Tools => "Tools",
            Category::Medical => "Medical",
            Category::Sports => "Sports",
            Category::Other => "Other",
        }
    }
}

// --- 3. Itens ---
// `quantity` é o saldo oficial. Leitura tolerante para registros antigos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "lenient::quantity")]
    pub quantity: u32,
    pub unit: Unit,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Valor em estoque (preço x quantidade). `None` se estourar `Decimal`.
    pub fn checked_stock_value(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }

    pub fn stock_value(&self) -> Result<Decimal, AppError> {
        self.checked_stock_value()
            .ok_or_else(|| AppError::AmountOverflow(self.name.clone()))
    }

    pub fn stock_status(&self) -> StockStatus {
        StockStatus::of(self.quantity)
    }
}

/// Campos editáveis de um item (o que o formulário de estoque envia).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInput {
    pub name: String,
    pub quantity: u32,
    pub unit: Unit,
    pub price: Decimal,
    pub category: Option<Category>,
    pub sku: String,
    pub image: Option<String>,
}

// --- 4. Situação do estoque ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    InStock,
}

impl StockStatus {
    pub fn of(quantity: u32) -> Self {
        match quantity {
            0 => StockStatus::OutOfStock,
            q if q < LOW_STOCK_THRESHOLD => StockStatus::LowStock,
            _ => StockStatus::InStock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn stock_status_thresholds() {
        assert_eq!(StockStatus::of(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::of(1), StockStatus::LowStock);
        assert_eq!(StockStatus::of(9), StockStatus::LowStock);
        assert_eq!(StockStatus::of(10), StockStatus::InStock);
    }

    #[test]
    fn legacy_record_without_category_or_timestamps_decodes() {
        let item: Item = serde_json::from_value(json!({
            "id": "a1",
            "name": "Rice",
            "quantity": "12",
            "unit": "Kg",
            "price": "4.5"
        }))
        .unwrap();

        assert_eq!(item.quantity, 12);
        assert_eq!(item.price, dec!(4.5));
        assert_eq!(item.category, None);
        assert_eq!(item.sku, "");
        assert_eq!(item.stock_value().unwrap(), dec!(54.0));
    }

    #[test]
    fn stock_value_overflow_is_an_error() {
        let item: Item = serde_json::from_value(json!({
            "id": "a1",
            "name": "Gold",
            "quantity": 100,
            "unit": "Kg",
            "price": "70000000000000000000000000000"
        }))
        .unwrap();

        assert_eq!(item.checked_stock_value(), None);
        assert!(matches!(item.stock_value(), Err(AppError::AmountOverflow(name)) if name == "Gold"));
    }

    #[test]
    fn quantity_and_price_serialize_as_numbers() {
        let item = Item {
            id: "a1".into(),
            name: "Rice".into(),
            quantity: 3,
            unit: Unit::Kg,
            price: dec!(2.5),
            category: Some(Category::Groceries),
            sku: "R-1".into(),
            image: None,
            created_at: None,
            updated_at: None,
        };
        let value = serde_json::to_value(&item).unwrap();
        assert!(value["quantity"].is_u64());
        assert!(value["price"].is_f64());
        assert_eq!(value["category"], "Groceries");
    }
}
