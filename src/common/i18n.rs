// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "en";

const EN: &[(&str, &str)] = &[
    ("validation", "One or more fields are invalid."),
    ("item_not_found", "Item '{id}' was not found."),
    ("supplier_not_found", "Supplier '{id}' was not found."),
    ("sale_not_found", "Sale '{id}' was not found."),
    ("session_not_found", "Sale session '{id}' was not found."),
    ("record_not_found", "Record '{id}' was not found."),
    (
        "insufficient_stock",
        "Cannot sell {requested} of '{item}': only {available} in stock.",
    ),
    ("invalid_quantity", "Quantity must be at least 1."),
    ("empty_cart", "The cart is empty."),
    ("amount_overflow", "The value of '{item}' is too large to compute."),
    ("customer_name_required", "Customer name is required."),
    ("invalid_checkout_state", "This action is not allowed at the current checkout step."),
    ("internal", "An unexpected error occurred."),
];

const PT: &[(&str, &str)] = &[
    ("validation", "Um ou mais campos são inválidos."),
    ("item_not_found", "Item '{id}' não encontrado."),
    ("supplier_not_found", "Fornecedor '{id}' não encontrado."),
    ("sale_not_found", "Venda '{id}' não encontrada."),
    ("session_not_found", "Sessão de venda '{id}' não encontrada."),
    ("record_not_found", "Registro '{id}' não encontrado."),
    (
        "insufficient_stock",
        "Não é possível vender {requested} de '{item}': apenas {available} em estoque.",
    ),
    ("invalid_quantity", "A quantidade deve ser pelo menos 1."),
    ("empty_cart", "O carrinho está vazio."),
    ("amount_overflow", "O valor de '{item}' é grande demais para ser calculado."),
    ("customer_name_required", "O nome do cliente é obrigatório."),
    ("invalid_checkout_state", "Esta ação não é permitida nesta etapa da venda."),
    ("internal", "Ocorreu um erro inesperado."),
];

/// Catálogo de mensagens por idioma, com fallback para inglês.
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nStore {
    pub fn new() -> Self {
        let mut catalogs = HashMap::new();
        catalogs.insert("en", EN.iter().copied().collect());
        catalogs.insert("pt", PT.iter().copied().collect());
        Self { catalogs }
    }

    pub fn message(&self, lang: &str, key: &str, args: &[(&str, String)]) -> String {
        let template = self
            .catalogs
            .get(lang)
            .and_then(|c| c.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|c| c.get(key)))
            .copied()
            .unwrap_or(key);

        args.iter().fold(template.to_string(), |msg, (name, value)| {
            msg.replace(&format!("{{{name}}}"), value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_english_for_unknown_language() {
        let store = I18nStore::new();
        assert_eq!(store.message("de", "empty_cart", &[]), "The cart is empty.");
    }

    #[test]
    fn fills_placeholders() {
        let store = I18nStore::new();
        let msg = store.message(
            "pt",
            "insufficient_stock",
            &[
                ("item", "Arroz".into()),
                ("requested", "12".into()),
                ("available", "10".into()),
            ],
        );
        assert_eq!(
            msg,
            "Não é possível vender 12 de 'Arroz': apenas 10 em estoque."
        );
    }

    #[test]
    fn unknown_key_returns_the_key() {
        assert_eq!(I18nStore::new().message("en", "nope", &[]), "nope");
    }
}
