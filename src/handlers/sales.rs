// src/handlers/sales.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Duration;

use crate::{
    common::error::ApiError, config::AppState, middleware::i18n::Locale, models::sales::Sale,
};

// Vendas Pending mais novas que isso podem ser um commit ainda em andamento.
const RECOVERY_GRACE_MINUTES: i64 = 5;

// GET /api/sales
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Sales",
    responses(
        (status = 200, description = "Vendas, mais recentes primeiro", body = Vec<Sale>)
    )
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let sales = app_state
        .sales_service
        .list_sales()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(sales)))
}

// GET /api/sales/{id}
#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = String, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda", body = Sale),
        (status = 404, description = "Venda não encontrada")
    )
)]
pub async fn get_sale(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let sale = app_state
        .sales_service
        .get_sale(&id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(sale)))
}

// POST /api/sales/recover
#[utoipa::path(
    post,
    path = "/api/sales/recover",
    tag = "Sales",
    responses(
        (status = 200, description = "Vendas pendentes desfeitas", body = Vec<Sale>)
    )
)]
pub async fn recover_pending_sales(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let recovered = app_state
        .sales_service
        .recover_pending_sales(Duration::minutes(RECOVERY_GRACE_MINUTES))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(recovered)))
}
