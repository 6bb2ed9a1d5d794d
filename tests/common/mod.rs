#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use rust_decimal::Decimal;
use serde_json::Value;
use stockroom::{
    config::AppState,
    db::{DocumentStore, MemoryDocumentStore},
    models::inventory::{Category, Item, ItemInput, Unit},
};
use tower::ServiceExt;

/// Router + estado sobre um store em memória novo.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryDocumentStore::new()))
    }

    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        let state = AppState::with_store(store);
        let router = stockroom::app(state.clone(), None);
        Self { router, state }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.request_with_headers(method, uri, body, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn seed_item(
        &self,
        name: &str,
        quantity: u32,
        price: Decimal,
        category: Option<Category>,
    ) -> Item {
        self.state
            .inventory_service
            .create_item(ItemInput {
                name: name.to_string(),
                quantity,
                unit: Unit::Piece,
                price,
                category,
                sku: format!("SKU-{}", name.to_uppercase()),
                image: None,
            })
            .await
            .expect("failed to seed item")
    }

    pub async fn quantity_of(&self, id: &str) -> u32 {
        self.state
            .inventory_service
            .get_item(id)
            .await
            .expect("item should exist")
            .quantity
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
