// src/handlers/suppliers.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::inventory::validate_not_blank,
    middleware::i18n::Locale,
    models::{
        filters::SupplierFilter,
        inventory::Category,
        supplier::{Supplier, SupplierInput, SupplierSummary},
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(email(message = "Email must be a valid address."))]
    pub email: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub phone: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub category: Option<Category>,

    #[serde(default)]
    pub notes: String,
}

impl From<SupplierPayload> for SupplierInput {
    fn from(p: SupplierPayload) -> Self {
        SupplierInput {
            name: p.name.trim().to_string(),
            email: p.email.trim().to_string(),
            phone: p.phone.trim().to_string(),
            address: p.address,
            category: p.category,
            notes: p.notes,
        }
    }
}

// GET /api/suppliers?search=
#[utoipa::path(
    get,
    path = "/api/suppliers",
    tag = "Suppliers",
    params(SupplierFilter),
    responses(
        (status = 200, description = "Fornecedores por nome", body = Vec<Supplier>)
    )
)]
pub async fn list_suppliers(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<SupplierFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let suppliers = app_state
        .supplier_service
        .list_suppliers(filter.search.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(suppliers)))
}

// GET /api/suppliers/summary
#[utoipa::path(
    get,
    path = "/api/suppliers/summary",
    tag = "Suppliers",
    responses(
        (status = 200, description = "Total e contagem por categoria", body = SupplierSummary)
    )
)]
pub async fn get_supplier_summary(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .supplier_service
        .summary()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}

#[utoipa::path(
    get,
    path = "/api/suppliers/{id}",
    tag = "Suppliers",
    params(("id" = String, Path, description = "ID do fornecedor")),
    responses(
        (status = 200, description = "Fornecedor", body = Supplier),
        (status = 404, description = "Fornecedor não encontrado")
    )
)]
pub async fn get_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = app_state
        .supplier_service
        .get_supplier(&id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(supplier)))
}

#[utoipa::path(
    post,
    path = "/api/suppliers",
    tag = "Suppliers",
    request_body = SupplierPayload,
    responses(
        (status = 201, description = "Fornecedor criado", body = Supplier),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<SupplierPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let supplier = app_state
        .supplier_service
        .create_supplier(payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(supplier)))
}

#[utoipa::path(
    put,
    path = "/api/suppliers/{id}",
    tag = "Suppliers",
    request_body = SupplierPayload,
    params(("id" = String, Path, description = "ID do fornecedor")),
    responses(
        (status = 200, description = "Fornecedor atualizado", body = Supplier),
        (status = 404, description = "Fornecedor não encontrado")
    )
)]
pub async fn update_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
    Json(payload): Json<SupplierPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let supplier = app_state
        .supplier_service
        .update_supplier(&id, payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(supplier)))
}

#[utoipa::path(
    delete,
    path = "/api/suppliers/{id}",
    tag = "Suppliers",
    params(("id" = String, Path, description = "ID do fornecedor")),
    responses(
        (status = 204, description = "Fornecedor excluído"),
        (status = 404, description = "Fornecedor não encontrado")
    )
)]
pub async fn delete_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .supplier_service
        .delete_supplier(&id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
