// src/models/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    models::inventory::{Item, Unit},
};

// --- Carrinho (só existe dentro da sessão, nunca é gravado) ---
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub item: Item,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Result<Decimal, AppError> {
        self.item
            .price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(|| AppError::AmountOverflow(self.item.name.clone()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

// --- Estados do fluxo de venda ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutState {
    Browsing,
    CheckoutPending,
    Submitting,
    Completed,
    Failed,
}

// --- Venda gravada ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    /// Gravada, baixas de estoque em andamento (ou rollback pendente).
    Pending,
    Completed,
    /// Baixas desfeitas após uma falha.
    RolledBack,
}

/// Foto da linha do carrinho no momento da venda.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub item_id: String,
    pub name: String,
    #[serde(default)]
    pub sku: String,
    pub unit: Unit,
    pub price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

impl TryFrom<&CartLine> for SaleLine {
    type Error = AppError;

    fn try_from(line: &CartLine) -> Result<Self, Self::Error> {
        Ok(Self {
            item_id: line.item.id.clone(),
            name: line.item.name.clone(),
            sku: line.item.sku.clone(),
            unit: line.item.unit,
            price: line.item.price,
            quantity: line.quantity,
            line_total: line.line_total()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub customer_info: CustomerInfo,
    pub items: Vec<SaleLine>,
    pub total_amount: Decimal,
    pub sale_date: DateTime<Utc>,
    pub status: SaleStatus,
    // Log de compensação: itens cuja baixa já foi aplicada
    #[serde(default)]
    pub applied_item_ids: Vec<String>,
}
