// src/services/dashboard_service.rs

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::InventoryRepository,
    models::{
        dashboard::{CategoryStats, DashboardSummary, ItemValue},
        inventory::{Item, StockStatus},
    },
};

const TOP_N: usize = 5;
const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Clone)]
pub struct DashboardService {
    repo: InventoryRepository,
}

impl DashboardService {
    pub fn new(repo: InventoryRepository) -> Self {
        Self { repo }
    }

    /// Carrega os itens uma vez e deriva todas as métricas. Não grava nada.
    pub async fn get_summary(&self) -> Result<DashboardSummary, AppError> {
        let items = self.repo.get_all_items().await?;
        summarize(&items)
    }
}

/// Soma valores em estoque; um estouro vira `AmountOverflow` do item culpado.
fn checked_sum<'a>(items: impl IntoIterator<Item = &'a Item>) -> Result<Decimal, AppError> {
    items.into_iter().try_fold(Decimal::ZERO, |acc, item| {
        acc.checked_add(item.stock_value()?)
            .ok_or_else(|| AppError::AmountOverflow(item.name.clone()))
    })
}

pub fn summarize(items: &[Item]) -> Result<DashboardSummary, AppError> {
    let total_items = items.len();
    let total_quantity = items.iter().map(|i| u64::from(i.quantity)).sum();
    let total_value = checked_sum(items)?;

    let with_status = |status: StockStatus| -> Vec<Item> {
        items.iter().filter(|i| i.stock_status() == status).cloned().collect()
    };
    let low_stock_items = with_status(StockStatus::LowStock);
    let out_of_stock_items = with_status(StockStatus::OutOfStock);
    let in_stock_count = items.iter().filter(|i| i.quantity > 0).count();

    Ok(DashboardSummary {
        total_items,
        total_quantity,
        total_value,
        in_stock_count,
        low_stock_items,
        out_of_stock_items,
        category_breakdown: category_breakdown(items)?,
        recent_items: recent_items(items),
        top_value_items: top_value_items(items)?,
    })
}

fn category_breakdown(items: &[Item]) -> Result<Vec<CategoryStats>, AppError> {
    // BTreeMap: ordem estável entre chamadas
    let mut groups: BTreeMap<&str, Vec<&Item>> = BTreeMap::new();
    for item in items {
        let key = item.category.map(|c| c.as_str()).unwrap_or(UNCATEGORIZED);
        groups.entry(key).or_default().push(item);
    }

    let total = Decimal::from(items.len());
    groups
        .into_iter()
        .map(|(category, members)| -> Result<CategoryStats, AppError> {
            let count = members.len();
            Ok(CategoryStats {
                category: category.to_string(),
                count,
                value: checked_sum(members)?,
                percentage: (Decimal::from(count) * Decimal::ONE_HUNDRED / total).round_dp(1),
            })
        })
        .collect()
}

fn recent_items(items: &[Item]) -> Vec<Item> {
    let mut dated: Vec<&Item> = items.iter().filter(|i| i.created_at.is_some()).collect();
    dated.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    dated.into_iter().take(TOP_N).cloned().collect()
}

fn top_value_items(items: &[Item]) -> Result<Vec<ItemValue>, AppError> {
    let mut valued = items
        .iter()
        .map(|item| -> Result<ItemValue, AppError> {
            Ok(ItemValue {
                total_value: item.stock_value()?,
                item: item.clone(),
            })
        })
        .collect::<Result<Vec<ItemValue>, AppError>>()?;
    valued.sort_by(|a, b| b.total_value.cmp(&a.total_value));
    valued.truncate(TOP_N);
    Ok(valued)
}
