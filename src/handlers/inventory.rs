// src/handlers/inventory.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::{
        filters::ItemFilter,
        inventory::{Category, Item, ItemInput, Unit},
    },
};

// ---
// Validações customizadas (compartilhadas com fornecedores)
// ---
pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("Value cannot be negative.".into());
        return Err(err);
    }
    Ok(())
}

/// Teto do preço unitário: preço x quantidade (u32) sempre cabe em `Decimal`.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

fn validate_price(val: &Decimal) -> Result<(), ValidationError> {
    validate_not_negative(val)?;
    if *val > MAX_PRICE {
        let mut err = ValidationError::new("range");
        err.add_param("max".into(), &1_000_000_000u64);
        err.message = Some("Price cannot exceed 1000000000.".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("This field is required.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: Item (criação e edição usam o mesmo formulário)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    // i64 para que um valor negativo chegue até a validação (e vire 400)
    #[validate(range(min = 0, message = "Quantity must be a whole number of at least 0."))]
    pub quantity: i64,

    pub unit: Unit,

    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,

    #[serde(default)]
    pub category: Option<Category>,

    #[serde(default)]
    pub sku: String,

    #[validate(url(message = "Image must be a valid URL."))]
    #[serde(default)]
    pub image: Option<String>,
}

impl ItemPayload {
    fn into_input(self) -> Result<ItemInput, AppError> {
        let quantity = u32::try_from(self.quantity).map_err(|_| AppError::InvalidQuantity(self.quantity))?;
        Ok(ItemInput {
            name: self.name.trim().to_string(),
            quantity,
            unit: self.unit,
            price: self.price,
            category: self.category,
            sku: self.sku.trim().to_string(),
            image: self.image.filter(|url| !url.trim().is_empty()),
        })
    }
}

// ---
// Handler: list_items (GET /api/items?search=&category=&stock=&sort=)
// ---
#[utoipa::path(
    get,
    path = "/api/items",
    tag = "Inventory",
    params(ItemFilter),
    responses(
        (status = 200, description = "Itens filtrados e ordenados", body = Vec<Item>)
    )
)]
pub async fn list_items(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<ItemFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state
        .inventory_service
        .list_items(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(items)))
}

// ---
// Handler: get_item
// ---
#[utoipa::path(
    get,
    path = "/api/items/{id}",
    tag = "Inventory",
    params(("id" = String, Path, description = "ID do item")),
    responses(
        (status = 200, description = "Item", body = Item),
        (status = 404, description = "Item não encontrado")
    )
)]
pub async fn get_item(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .inventory_service
        .get_item(&id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(item)))
}

// ---
// Handler: create_item
// ---
#[utoipa::path(
    post,
    path = "/api/items",
    tag = "Inventory",
    request_body = ItemPayload,
    responses(
        (status = 201, description = "Item criado", body = Item),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_item(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let input = payload
        .into_input()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let item = app_state
        .inventory_service
        .create_item(input)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(item)))
}

// ---
// Handler: update_item
// ---
#[utoipa::path(
    put,
    path = "/api/items/{id}",
    tag = "Inventory",
    request_body = ItemPayload,
    params(("id" = String, Path, description = "ID do item")),
    responses(
        (status = 200, description = "Item atualizado", body = Item),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Item não encontrado")
    )
)]
pub async fn update_item(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
    Json(payload): Json<ItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let input = payload
        .into_input()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let item = app_state
        .inventory_service
        .update_item(&id, input)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(item)))
}

// ---
// Handler: delete_item
// ---
#[utoipa::path(
    delete,
    path = "/api/items/{id}",
    tag = "Inventory",
    params(("id" = String, Path, description = "ID do item")),
    responses(
        (status = 204, description = "Item excluído"),
        (status = 404, description = "Item não encontrado")
    )
)]
pub async fn delete_item(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inventory_service
        .delete_item(&id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn payload() -> ItemPayload {
        ItemPayload {
            name: "Rice".into(),
            quantity: 5,
            unit: Unit::Kg,
            price: dec!(3.5),
            category: Some(Category::Groceries),
            sku: " SKU-1 ".into(),
            image: None,
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(payload().validate().is_ok());
        let input = payload().into_input().unwrap();
        assert_eq!(input.quantity, 5);
        assert_eq!(input.sku, "SKU-1");
    }

    #[test]
    fn negative_quantity_and_price_are_rejected() {
        let mut p = payload();
        p.quantity = -1;
        p.price = dec!(-0.01);
        let errors = p.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("quantity"));
        assert!(fields.contains_key("price"));
    }

    #[test]
    fn price_above_ceiling_is_rejected() {
        let mut p = payload();
        p.price = MAX_PRICE;
        assert!(p.validate().is_ok());

        p.price = dec!(10000000000000000000000000000);
        assert!(p.validate().unwrap_err().field_errors().contains_key("price"));
    }

    #[test]
    fn quantity_beyond_u32_is_rejected_on_conversion() {
        let mut p = payload();
        p.quantity = i64::from(u32::MAX) + 1;
        assert!(p.validate().is_ok());
        assert!(matches!(p.into_input(), Err(AppError::InvalidQuantity(_))));
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut p = payload();
        p.name = "   ".into();
        assert!(p.validate().unwrap_err().field_errors().contains_key("name"));
    }

    #[test]
    fn bad_image_url_is_rejected() {
        let mut p = payload();
        p.image = Some("not a url".into());
        assert!(p.validate().is_err());
    }
}
