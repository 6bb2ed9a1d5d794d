mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use serde_json::{json, Value};

async fn create(app: &TestApp, name: &str, email: &str, category: Option<&str>) -> Value {
    let response = app
        .request(
            Method::POST,
            "/api/suppliers",
            Some(json!({
                "name": name,
                "email": email,
                "phone": "+1 555 0100",
                "category": category,
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response_json(response).await
}

fn names(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn suppliers_are_listed_by_name_and_searchable() {
    let app = TestApp::new();
    create(&app, "Tool Depot", "sales@tooldepot.test", Some("Tools")).await;
    create(&app, "acme", "hello@acme.test", None).await;
    create(&app, "Book Barn", "orders@barn.test", Some("Books")).await;

    let all = response_json(app.request(Method::GET, "/api/suppliers", None).await).await;
    assert_eq!(names(&all), vec!["acme", "Book Barn", "Tool Depot"]);

    // e-mail
    let hits = response_json(app.request(Method::GET, "/api/suppliers?search=ACME.TEST", None).await).await;
    assert_eq!(names(&hits), vec!["acme"]);

    // categoria
    let hits = response_json(app.request(Method::GET, "/api/suppliers?search=tools", None).await).await;
    assert_eq!(names(&hits), vec!["Tool Depot"]);
}

#[tokio::test]
async fn required_fields_and_email_are_validated() {
    let app = TestApp::new();
    let response = app
        .request(
            Method::POST,
            "/api/suppliers",
            Some(json!({ "name": "", "email": "not-an-email", "phone": "  " })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    for field in ["name", "email", "phone"] {
        assert!(body["details"][field].is_array(), "missing error for {field}");
    }
}

#[tokio::test]
async fn update_keeps_created_at_and_delete_removes() {
    let app = TestApp::new();
    let created = create(&app, "Medi Supply", "info@medi.test", Some("Medical")).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/suppliers/{id}"),
            Some(json!({
                "name": "Medi Supply Co",
                "email": "info@medi.test",
                "phone": "555-0101",
                "address": "1 Main St",
                "notes": "ships on Mondays"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = response_json(response).await;
    assert_eq!(updated["name"], "Medi Supply Co");
    assert_eq!(updated["address"], "1 Main St");
    assert!(updated["category"].is_null());
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let response = app.request(Method::DELETE, &format!("/api/suppliers/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.request(Method::GET, &format!("/api/suppliers/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn summary_counts_suppliers_per_category() {
    let app = TestApp::new();

    let empty = response_json(app.request(Method::GET, "/api/suppliers/summary", None).await).await;
    assert_eq!(empty["totalSuppliers"], 0);
    assert!(empty["byCategory"].as_array().unwrap().is_empty());

    create(&app, "Tool Depot", "sales@tooldepot.test", Some("Tools")).await;
    create(&app, "Hardware Hub", "hub@hardware.test", Some("Tools")).await;
    create(&app, "acme", "hello@acme.test", None).await;

    let response = app.request(Method::GET, "/api/suppliers/summary", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let summary = response_json(response).await;
    assert_eq!(summary["totalSuppliers"], 3);
    assert_eq!(
        summary["byCategory"],
        json!([
            { "category": "Tools", "count": 2 },
            { "category": "Uncategorized", "count": 1 }
        ])
    );
}
