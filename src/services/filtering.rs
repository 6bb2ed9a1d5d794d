// src/services/filtering.rs
//
// Busca e filtros sobre a coleção inteira já carregada em memória.
// Funções puras: mesma entrada, mesma saída.

use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::models::{
    filters::{ItemFilter, ItemSort, StockFilter},
    inventory::{Item, LOW_STOCK_THRESHOLD},
    supplier::Supplier,
};

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn normalized_term(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

impl StockFilter {
    pub fn matches(&self, quantity: u32) -> bool {
        match self {
            StockFilter::InStock => quantity > 0,
            StockFilter::LowStock => quantity > 0 && quantity < LOW_STOCK_THRESHOLD,
            StockFilter::OutOfStock => quantity == 0,
        }
    }
}

pub fn item_matches(item: &Item, filter: &ItemFilter, term: Option<&str>) -> bool {
    if let Some(term) = term {
        let category = item.category.map(|c| c.as_str()).unwrap_or_default();
        let hit = contains_ci(&item.name, term)
            || contains_ci(&item.sku, term)
            || contains_ci(category, term);
        if !hit {
            return false;
        }
    }

    if let Some(category) = filter.category {
        if item.category != Some(category) {
            return false;
        }
    }

    filter.stock.is_none_or(|stock| stock.matches(item.quantity))
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

// Valor que estoura `Decimal` conta como o maior possível
fn value_key(item: &Item) -> Decimal {
    item.checked_stock_value().unwrap_or(Decimal::MAX)
}

pub fn sort_items(items: &mut [Item], sort: ItemSort) {
    match sort {
        ItemSort::Name => items.sort_by(|a, b| compare_names(&a.name, &b.name)),
        ItemSort::Quantity => items.sort_by(|a, b| {
            b.quantity.cmp(&a.quantity).then_with(|| compare_names(&a.name, &b.name))
        }),
        ItemSort::Price => items.sort_by(|a, b| {
            b.price.cmp(&a.price).then_with(|| compare_names(&a.name, &b.name))
        }),
        ItemSort::Value => items.sort_by(|a, b| {
            value_key(b)
                .cmp(&value_key(a))
                .then_with(|| compare_names(&a.name, &b.name))
        }),
        // Sem data de criação vai para o fim
        ItemSort::Newest => items.sort_by(|a, b| {
            b.created_at.cmp(&a.created_at).then_with(|| compare_names(&a.name, &b.name))
        }),
    }
}

/// Aplica busca, categoria, faixa de estoque e ordenação.
pub fn filter_items(items: &[Item], filter: &ItemFilter) -> Vec<Item> {
    let term = normalized_term(filter.search.as_deref());
    let mut result: Vec<Item> = items
        .iter()
        .filter(|item| item_matches(item, filter, term.as_deref()))
        .cloned()
        .collect();
    sort_items(&mut result, filter.sort);
    result
}

/// Busca de fornecedores por nome, e-mail ou categoria; ordenados por nome.
pub fn filter_suppliers(suppliers: &[Supplier], search: Option<&str>) -> Vec<Supplier> {
    let term = normalized_term(search);
    let mut result: Vec<Supplier> = suppliers
        .iter()
        .filter(|s| match term.as_deref() {
            None => true,
            Some(term) => {
                contains_ci(&s.name, term)
                    || contains_ci(&s.email, term)
                    || s.category.is_some_and(|c| contains_ci(c.as_str(), term))
            }
        })
        .cloned()
        .collect();
    result.sort_by(|a, b| compare_names(&a.name, &b.name));
    result
}
