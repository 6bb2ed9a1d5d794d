mod common;

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use chrono::Duration;
use common::{response_json, TestApp};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use stockroom::{
    db::{
        document_store::{ITEMS, SALES},
        Document, DocumentStore, MemoryDocumentStore, StoreError,
    },
    models::sales::SaleStatus,
};

#[derive(Default)]
struct Faults {
    /// Itens cujas gravações sempre falham.
    failing_items: HashSet<String>,
    /// Quantas gravações em `items` ainda passam (None = sem limite).
    item_write_budget: Option<usize>,
}

/// Store em memória que falha gravações de itens sob demanda.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryDocumentStore,
    faults: Mutex<Faults>,
}

impl FlakyStore {
    fn fail_item(&self, id: &str) {
        self.faults.lock().unwrap().failing_items.insert(id.to_string());
    }

    fn limit_item_writes(&self, budget: usize) {
        self.faults.lock().unwrap().item_write_budget = Some(budget);
    }

    fn heal(&self) {
        *self.faults.lock().unwrap() = Faults::default();
    }

    fn check(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        if collection != ITEMS {
            return Ok(());
        }
        let mut faults = self.faults.lock().unwrap();
        if faults.failing_items.contains(id) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        match faults.item_write_budget {
            Some(0) => Err(StoreError::Database(sqlx::Error::PoolTimedOut)),
            Some(n) => {
                faults.item_write_budget = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        // devolve o controle ao runtime, como um banco de verdade faria
        tokio::task::yield_now().await;
        self.inner.list_all(collection).await
    }

    async fn get_one(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        self.inner.get_one(collection, id).await
    }

    async fn create(&self, collection: &str, fields: Value) -> Result<String, StoreError> {
        self.inner.create(collection, fields).await
    }

    async fn update(&self, collection: &str, id: &str, partial: Value) -> Result<(), StoreError> {
        self.check(collection, id)?;
        self.inner.update(collection, id, partial).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.inner.delete(collection, id).await
    }
}

/// Monta uma sessão pronta para enviar, com duas linhas (A depois B).
async fn ready_to_submit(app: &TestApp, a: &str, b: &str) -> String {
    let response = app.request(Method::POST, "/api/sell/sessions", None).await;
    let session = response_json(response).await["id"].as_str().unwrap().to_string();

    for item_id in [a, b] {
        let response = app
            .request(
                Method::POST,
                &format!("/api/sell/sessions/{session}/cart"),
                Some(json!({ "itemId": item_id, "quantity": 2 })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    app.request(Method::POST, &format!("/api/sell/sessions/{session}/checkout"), None)
        .await;
    app.request(
        Method::PUT,
        &format!("/api/sell/sessions/{session}/customer"),
        Some(json!({ "name": "Bruno" })),
    )
    .await;
    session
}

#[tokio::test]
async fn failed_decrement_restores_earlier_lines() {
    let store = Arc::new(FlakyStore::default());
    let app = TestApp::with_store(store.clone());
    let a = app.seed_item("Alpha", 5, dec!(1), None).await;
    let b = app.seed_item("Beta", 5, dec!(1), None).await;
    let session = ready_to_submit(&app, &a.id, &b.id).await;

    store.fail_item(&b.id);
    let response = app
        .request(Method::POST, &format!("/api/sell/sessions/{session}/submit"), None)
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // tudo ou nada: a baixa de A foi desfeita
    store.heal();
    assert_eq!(app.quantity_of(&a.id).await, 5);
    assert_eq!(app.quantity_of(&b.id).await, 5);

    let sales = app.state.sales_service.list_sales().await.unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].status, SaleStatus::RolledBack);
    assert!(sales[0].applied_item_ids.is_empty());

    // carrinho preservado para nova tentativa
    let view = response_json(
        app.request(Method::GET, &format!("/api/sell/sessions/{session}"), None).await,
    )
    .await;
    assert_eq!(view["state"], "CHECKOUT_PENDING");
    assert_eq!(view["cart"].as_array().unwrap().len(), 2);

    let response = app
        .request(Method::POST, &format!("/api/sell/sessions/{session}/submit"), None)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(app.quantity_of(&a.id).await, 3);
    assert_eq!(app.quantity_of(&b.id).await, 3);
}

#[tokio::test]
async fn sale_left_pending_is_recovered_later() {
    let store = Arc::new(FlakyStore::default());
    let app = TestApp::with_store(store.clone());
    let a = app.seed_item("Alpha", 5, dec!(1), None).await;
    let b = app.seed_item("Beta", 5, dec!(1), None).await;
    let session = ready_to_submit(&app, &a.id, &b.id).await;

    // só a baixa de A passa; a baixa de B e a devolução de A falham
    store.limit_item_writes(1);
    let response = app
        .request(Method::POST, &format!("/api/sell/sessions/{session}/submit"), None)
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    store.heal();

    assert_eq!(app.quantity_of(&a.id).await, 3);
    let sales = app.state.sales_service.list_sales().await.unwrap();
    assert_eq!(sales[0].status, SaleStatus::Pending);
    assert_eq!(sales[0].applied_item_ids, vec![a.id.clone()]);

    // pelo HTTP há uma carência: a venda recém-criada ainda não é tocada
    let response = app.request(Method::POST, "/api/sales/recover", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response_json(response).await.as_array().unwrap().is_empty());

    let recovered = app
        .state
        .sales_service
        .recover_pending_sales(Duration::zero())
        .await
        .unwrap();
    assert_eq!(recovered.len(), 1);
    assert_eq!(recovered[0].status, SaleStatus::RolledBack);
    assert_eq!(app.quantity_of(&a.id).await, 5);
    assert_eq!(app.quantity_of(&b.id).await, 5);

    let stored = app.state.sales_service.get_sale(&sales[0].id).await.unwrap();
    assert_eq!(stored.status, SaleStatus::RolledBack);
    assert!(stored.applied_item_ids.is_empty());

    // nada mais pendente
    let again = app
        .state
        .sales_service
        .recover_pending_sales(Duration::zero())
        .await
        .unwrap();
    assert!(again.is_empty());

    let raw = app.state.store.get_one(SALES, &stored.id).await.unwrap();
    assert_eq!(raw.data["status"], "ROLLED_BACK");
}

#[tokio::test]
async fn concurrent_recoveries_restore_stock_once() {
    let store = Arc::new(FlakyStore::default());
    let app = TestApp::with_store(store.clone());
    let a = app.seed_item("Alpha", 5, dec!(1), None).await;
    let b = app.seed_item("Beta", 5, dec!(1), None).await;
    let session = ready_to_submit(&app, &a.id, &b.id).await;

    store.limit_item_writes(1);
    app.request(Method::POST, &format!("/api/sell/sessions/{session}/submit"), None)
        .await;
    store.heal();
    assert_eq!(app.quantity_of(&a.id).await, 3);

    let sales = &app.state.sales_service;
    let (first, second) = tokio::join!(
        sales.recover_pending_sales(Duration::zero()),
        sales.recover_pending_sales(Duration::zero()),
    );
    let recovered = first.unwrap().len() + second.unwrap().len();

    assert_eq!(recovered, 1);
    assert_eq!(app.quantity_of(&a.id).await, 5);
    assert_eq!(app.quantity_of(&b.id).await, 5);
}
