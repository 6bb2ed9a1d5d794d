// src/handlers/sell.rs
//
// Tela de venda: cada sessão é um carrinho com seu próprio estado de checkout.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::{
        inventory::Item,
        sales::{CustomerInfo, Sale},
    },
    services::checkout::SessionView,
};

// ---
// Payloads
// ---
fn one() -> u32 {
    1
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartPayload {
    #[validate(length(min = 1, message = "itemId is required."))]
    pub item_id: String,

    #[validate(range(min = 1, message = "Quantity must be at least 1."))]
    #[serde(default = "one")]
    pub quantity: u32,
}

/// Nova quantidade da linha. Zero ou negativo remove a linha.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityPayload {
    pub quantity: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    #[serde(default)]
    pub name: String,

    #[validate(email(message = "Email must be a valid address."))]
    pub email: Option<String>,

    pub phone: Option<String>,
}

impl From<CustomerPayload> for CustomerInfo {
    fn from(p: CustomerPayload) -> Self {
        let non_blank = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        CustomerInfo {
            name: p.name.trim().to_string(),
            email: non_blank(p.email),
            phone: non_blank(p.phone),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitResponse {
    pub sale: Sale,
    pub session: SessionView,
}

// ---
// Handler: list_available_items (GET /api/sell/items)
// ---
#[utoipa::path(
    get,
    path = "/api/sell/items",
    tag = "Sell",
    responses(
        (status = 200, description = "Itens com saldo, por nome", body = Vec<Item>)
    )
)]
pub async fn list_available_items(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state
        .inventory_service
        .available_items()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(items)))
}

// ---
// Sessões
// ---
#[utoipa::path(
    post,
    path = "/api/sell/sessions",
    tag = "Sell",
    responses(
        (status = 201, description = "Sessão aberta", body = SessionView)
    )
)]
pub async fn open_session(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state
        .checkout_service
        .open_session()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    get,
    path = "/api/sell/sessions/{id}",
    tag = "Sell",
    params(
        ("id" = Uuid, Path, description = "ID da sessão de venda")
    ),
    responses(
        (status = 200, description = "Estado da sessão", body = SessionView),
        (status = 404, description = "Sessão não encontrada")
    )
)]
pub async fn get_session(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state
        .checkout_service
        .get_session(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}

#[utoipa::path(
    delete,
    path = "/api/sell/sessions/{id}",
    tag = "Sell",
    params(
        ("id" = Uuid, Path, description = "ID da sessão de venda")
    ),
    responses(
        (status = 204, description = "Sessão encerrada"),
        (status = 404, description = "Sessão não encontrada")
    )
)]
pub async fn close_session(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .checkout_service
        .close_session(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/sell/sessions/{id}/refresh",
    tag = "Sell",
    params(
        ("id" = Uuid, Path, description = "ID da sessão de venda")
    ),
    responses(
        (status = 200, description = "Foto de estoque recarregada", body = SessionView),
        (status = 404, description = "Sessão não encontrada")
    )
)]
pub async fn refresh_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state
        .checkout_service
        .refresh_stock(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}

// ---
// Carrinho
// ---
#[utoipa::path(
    post,
    path = "/api/sell/sessions/{id}/cart",
    tag = "Sell",
    request_body = AddToCartPayload,
    params(
        ("id" = Uuid, Path, description = "ID da sessão de venda")
    ),
    responses(
        (status = 200, description = "Item adicionado", body = SessionView),
        (status = 404, description = "Sessão não encontrada"),
        (status = 409, description = "Ação fora da etapa atual"),
        (status = 422, description = "Estoque insuficiente")
    )
)]
pub async fn add_to_cart(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddToCartPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let view = app_state
        .checkout_service
        .add_to_cart(id, &payload.item_id, payload.quantity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}

#[utoipa::path(
    put,
    path = "/api/sell/sessions/{id}/cart/{item_id}",
    tag = "Sell",
    request_body = UpdateQuantityPayload,
    params(
        ("id" = Uuid, Path, description = "ID da sessão de venda"),
        ("item_id" = String, Path, description = "ID do item")
    ),
    responses(
        (status = 200, description = "Quantidade alterada", body = SessionView),
        (status = 404, description = "Sessão não encontrada"),
        (status = 409, description = "Ação fora da etapa atual"),
        (status = 422, description = "Estoque insuficiente")
    )
)]
pub async fn update_cart_quantity(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((id, item_id)): Path<(Uuid, String)>,
    Json(payload): Json<UpdateQuantityPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state
        .checkout_service
        .update_cart_quantity(id, &item_id, payload.quantity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}

#[utoipa::path(
    delete,
    path = "/api/sell/sessions/{id}/cart/{item_id}",
    tag = "Sell",
    params(
        ("id" = Uuid, Path, description = "ID da sessão de venda"),
        ("item_id" = String, Path, description = "ID do item")
    ),
    responses(
        (status = 200, description = "Linha removida", body = SessionView),
        (status = 404, description = "Sessão não encontrada"),
        (status = 409, description = "Ação fora da etapa atual")
    )
)]
pub async fn remove_from_cart(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((id, item_id)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state
        .checkout_service
        .remove_from_cart(id, &item_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}

// ---
// Checkout
// ---
#[utoipa::path(
    post,
    path = "/api/sell/sessions/{id}/checkout",
    tag = "Sell",
    params(
        ("id" = Uuid, Path, description = "ID da sessão de venda")
    ),
    responses(
        (status = 200, description = "Checkout iniciado", body = SessionView),
        (status = 404, description = "Sessão não encontrada"),
        (status = 409, description = "Ação fora da etapa atual"),
        (status = 422, description = "Carrinho vazio")
    )
)]
pub async fn proceed_to_checkout(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state
        .checkout_service
        .proceed_to_checkout(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}

#[utoipa::path(
    delete,
    path = "/api/sell/sessions/{id}/checkout",
    tag = "Sell",
    params(
        ("id" = Uuid, Path, description = "ID da sessão de venda")
    ),
    responses(
        (status = 200, description = "De volta ao carrinho", body = SessionView),
        (status = 404, description = "Sessão não encontrada"),
        (status = 409, description = "Ação fora da etapa atual")
    )
)]
pub async fn cancel_checkout(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state
        .checkout_service
        .cancel_checkout(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}

#[utoipa::path(
    put,
    path = "/api/sell/sessions/{id}/customer",
    tag = "Sell",
    request_body = CustomerPayload,
    params(
        ("id" = Uuid, Path, description = "ID da sessão de venda")
    ),
    responses(
        (status = 200, description = "Cliente informado", body = SessionView),
        (status = 404, description = "Sessão não encontrada"),
        (status = 409, description = "Ação fora da etapa atual")
    )
)]
pub async fn set_customer_info(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<CustomerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let view = app_state
        .checkout_service
        .set_customer_info(id, payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}

// ---
// Handler: submit_sale (grava a venda e baixa o estoque)
// ---
#[utoipa::path(
    post,
    path = "/api/sell/sessions/{id}/submit",
    tag = "Sell",
    params(
        ("id" = Uuid, Path, description = "ID da sessão de venda")
    ),
    responses(
        (status = 201, description = "Venda gravada e estoque baixado", body = SubmitResponse),
        (status = 400, description = "Nome do cliente ausente"),
        (status = 404, description = "Sessão não encontrada"),
        (status = 409, description = "Ação fora da etapa atual"),
        (status = 422, description = "Estoque insuficiente")
    )
)]
pub async fn submit_sale(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (sale, session) = app_state
        .checkout_service
        .submit_sale(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(SubmitResponse { sale, session })))
}
