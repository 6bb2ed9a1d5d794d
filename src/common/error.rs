use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    common::i18n::I18nStore,
    db::document_store::StoreError,
    middleware::i18n::Locale,
    models::sales::CheckoutState,
};

// Nosso tipo de erro de domínio. Os handlers convertem para `ApiError`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Item '{0}' não encontrado")]
    ItemNotFound(String),

    #[error("Fornecedor '{0}' não encontrado")]
    SupplierNotFound(String),

    #[error("Venda '{0}' não encontrada")]
    SaleNotFound(String),

    #[error("Sessão de venda '{0}' não encontrada")]
    SessionNotFound(Uuid),

    #[error("Estoque insuficiente para '{item}': pedido {requested}, disponível {available}")]
    InsufficientStock {
        item: String,
        requested: u64,
        available: u32,
    },

    #[error("Quantidade inválida: {0}")]
    InvalidQuantity(i64),

    #[error("O carrinho está vazio")]
    EmptyCart,

    #[error("Valor de '{0}' fora do intervalo suportado")]
    AmountOverflow(String),

    #[error("O nome do cliente é obrigatório")]
    CustomerNameRequired,

    #[error("Operação inválida no estado {actual:?} (esperado {expected:?})")]
    InvalidCheckoutState {
        expected: CheckoutState,
        actual: CheckoutState,
    },

    #[error("Registro malformado '{id}' em '{collection}': {reason}")]
    MalformedRecord {
        collection: String,
        id: String,
        reason: String,
    },

    #[error("Erro no armazenamento: {0}")]
    StoreError(#[from] StoreError),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

/// Erro pronto para a resposta HTTP (já traduzido).
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    /// Chave da mensagem no catálogo de traduções.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation",
            AppError::ItemNotFound(_) => "item_not_found",
            AppError::SupplierNotFound(_) => "supplier_not_found",
            AppError::SaleNotFound(_) => "sale_not_found",
            AppError::SessionNotFound(_) => "session_not_found",
            AppError::InsufficientStock { .. } => "insufficient_stock",
            AppError::InvalidQuantity(_) => "invalid_quantity",
            AppError::EmptyCart => "empty_cart",
            AppError::AmountOverflow(_) => "amount_overflow",
            AppError::CustomerNameRequired => "customer_name_required",
            AppError::InvalidCheckoutState { .. } => "invalid_checkout_state",
            AppError::MalformedRecord { .. }
            | AppError::StoreError(_)
            | AppError::InternalServerError(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidQuantity(_)
            | AppError::CustomerNameRequired => StatusCode::BAD_REQUEST,
            AppError::ItemNotFound(_)
            | AppError::SupplierNotFound(_)
            | AppError::SaleNotFound(_)
            | AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::StoreError(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::InvalidCheckoutState { .. } => StatusCode::CONFLICT,
            AppError::InsufficientStock { .. }
            | AppError::EmptyCart
            | AppError::AmountOverflow(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::MalformedRecord { .. }
            | AppError::StoreError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let mut args: Vec<(&str, String)> = Vec::new();
        let details = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(json!(details))
            }
            AppError::InsufficientStock { item, requested, available } => {
                args.push(("item", item.clone()));
                args.push(("requested", requested.to_string()));
                args.push(("available", available.to_string()));
                Some(json!({ "item": item, "requested": requested, "available": available }))
            }
            AppError::InvalidCheckoutState { expected, actual } => {
                Some(json!({ "expected": expected, "actual": actual }))
            }
            AppError::ItemNotFound(id)
            | AppError::SupplierNotFound(id)
            | AppError::SaleNotFound(id) => {
                args.push(("id", id.clone()));
                None
            }
            AppError::AmountOverflow(item) => {
                args.push(("item", item.clone()));
                None
            }
            AppError::SessionNotFound(id) => {
                args.push(("id", id.to_string()));
                None
            }
            AppError::StoreError(StoreError::NotFound { id, .. }) => {
                args.push(("id", id.clone()));
                None
            }
            _ => None,
        };

        let code = match self {
            AppError::StoreError(StoreError::NotFound { .. }) => "record_not_found",
            other => other.code(),
        };

        ApiError {
            status,
            error: i18n.message(&locale.0, code, &args),
            details,
        }
    }
}
