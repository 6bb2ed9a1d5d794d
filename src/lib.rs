// src/lib.rs

use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::{config::AppState, docs::ApiDoc};

/// Monta o router completo. `cors_allow_origin` vazio = CORS permissivo.
pub fn app(app_state: AppState, cors_allow_origin: Option<&str>) -> Router {
    let item_routes = Router::new()
        .route("/"
               ,get(handlers::inventory::list_items)
               .post(handlers::inventory::create_item)
        )
        .route("/{id}"
               ,get(handlers::inventory::get_item)
               .put(handlers::inventory::update_item)
               .delete(handlers::inventory::delete_item)
        );

    let supplier_routes = Router::new()
        .route("/"
               ,get(handlers::suppliers::list_suppliers)
               .post(handlers::suppliers::create_supplier)
        )
        .route("/summary", get(handlers::suppliers::get_supplier_summary))
        .route("/{id}"
               ,get(handlers::suppliers::get_supplier)
               .put(handlers::suppliers::update_supplier)
               .delete(handlers::suppliers::delete_supplier)
        );

    let sell_routes = Router::new()
        .route("/items", get(handlers::sell::list_available_items))
        .route("/sessions", post(handlers::sell::open_session))
        .route("/sessions/{id}"
               ,get(handlers::sell::get_session)
               .delete(handlers::sell::close_session)
        )
        .route("/sessions/{id}/refresh", post(handlers::sell::refresh_stock))
        .route("/sessions/{id}/cart", post(handlers::sell::add_to_cart))
        .route("/sessions/{id}/cart/{item_id}"
               ,put(handlers::sell::update_cart_quantity)
               .delete(handlers::sell::remove_from_cart)
        )
        .route("/sessions/{id}/checkout"
               ,post(handlers::sell::proceed_to_checkout)
               .delete(handlers::sell::cancel_checkout)
        )
        .route("/sessions/{id}/customer", put(handlers::sell::set_customer_info))
        .route("/sessions/{id}/submit", post(handlers::sell::submit_sale));

    let sales_routes = Router::new()
        .route("/", get(handlers::sales::list_sales))
        .route("/recover", post(handlers::sales::recover_pending_sales))
        .route("/{id}", get(handlers::sales::get_sale));

    let cors_layer = match cors_allow_origin.and_then(|o| HeaderValue::from_str(o.trim()).ok()) {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    };

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/api/dashboard", get(handlers::dashboard::get_summary))
        .nest("/api/items", item_routes)
        .nest("/api/suppliers", supplier_routes)
        .nest("/api/sell", sell_routes)
        .nest("/api/sales", sales_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state)
}
