use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use schema_crud::config::{parse_document, SchemaRegistry};
use schema_crud::service::TokenIssuer;
use schema_crud::store::StoreCall;
use schema_crud::{app_router, AppState, JwtTokenIssuer, MemoryRecordStore, Principal};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const SCHEMA: &str = r#"{ "tables": [
    { "name": "users", "tenant": true,
      "crud_get_enabled": true, "crud_post_enabled": true, "crud_put_enabled": true, "crud_delete_enabled": true,
      "external_fields": { "id": { "primary": true }, "email": {}, "password": {} } },
    { "name": "customers", "crud_delete_enabled": true,
      "external_fields": { "id": { "primary": true }, "name": {} } },
    { "name": "orders", "crud_delete_enabled": true,
      "external_fields": {
          "id": { "primary": true },
          "customer_id": { "reference": { "table": "customers", "column": "id" } } } },
    { "name": "accounts", "crud_soft_delete_enabled": true,
      "external_fields": {
          "id": { "primary": true },
          "deleted_at": { "soft_delete": { "configured": true, "value": "ARCHIVED" } } } },
    { "name": "keyless", "crud_delete_enabled": true, "external_fields": { "name": {} } },
    { "name": "reports", "crud_get_enabled": true, "external_fields": { "id": { "primary": true } } }
] }"#;

struct Harness {
    app: Router,
    store: Arc<MemoryRecordStore>,
}

fn harness() -> Harness {
    let registry = SchemaRegistry::from_document(parse_document(SCHEMA).unwrap()).unwrap();
    let hash = bcrypt::hash("s3cret", 4).unwrap();
    let store = Arc::new(
        MemoryRecordStore::new()
            .with_rows(
                "users",
                [
                    json!({ "id": 11, "email": "ada@example.com", "password": hash }),
                    json!({ "id": -1, "email": "eve@example.com", "password": hash }),
                ],
            )
            .with_rows("customers", [json!({ "id": 7, "name": "Acme" })])
            .with_rows("orders", [json!({ "id": 1, "customer_id": 7 })])
            .with_rows("accounts", [json!({ "id": 3, "deleted_at": null })]),
    );
    let state = AppState::new(
        Arc::new(registry),
        store.clone(),
        Arc::new(JwtTokenIssuer::new(b"http-test", 3600)),
    );
    Harness {
        app: app_router(state, 64 * 1024),
        store,
    }
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    let req = match body {
        Some(b) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(app, Method::POST, "/login", None, Some(json!({ "email": email, "password": password }))).await
}

fn users_table(body: &Value) -> &Value {
    body["tables"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == "users")
        .unwrap()
}

#[tokio::test]
async fn referenced_delete_conflicts_then_succeeds() {
    let h = harness();
    let (status, body) = send(&h.app, Method::DELETE, "/crud/customers/7", None, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "This table is linked to others, so deleting from it isn't allowed directly"
    );
    assert_eq!(h.store.delete_calls(), 0);

    let (status, body) = send(&h.app, Method::DELETE, "/crud/orders/1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Deleted successfully" }));

    let (status, _) = send(&h.app, Method::DELETE, "/crud/customers/7", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(h.store.rows("customers").is_empty());
    assert_eq!(h.store.delete_calls(), 2);
}

#[tokio::test]
async fn soft_delete_archives_and_keeps_row() {
    let h = harness();
    let (_, login_body) = login(&h.app, "ada@example.com", "s3cret").await;
    let token = login_body["token"].as_str().unwrap().to_string();

    let (status, body) = send(&h.app, Method::DELETE, "/crud/accounts/3", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Archived successfully");

    let rows = h.store.rows("accounts");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["deleted_at"], "ARCHIVED");
    assert_eq!(rows[0]["updated_by"], "11");
    assert_eq!(h.store.delete_calls(), 0);
    let update = h.store.calls().into_iter().find_map(|c| match c {
        StoreCall::Update { table, update, .. } => Some((table, update)),
        _ => None,
    });
    let (table, update) = update.unwrap();
    assert_eq!(table, "accounts");
    assert!(update.contains_key("updated_at"));
}

#[tokio::test]
async fn delete_error_statuses() {
    let h = harness();
    let (status, body) = send(&h.app, Method::DELETE, "/crud/customers/999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Record not found");

    let (status, body) = send(&h.app, Method::DELETE, "/crud/keyless/1", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Primary key not configured");

    let (status, body) = send(&h.app, Method::DELETE, "/crud/reports/1", None, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");

    assert_eq!(h.store.delete_calls(), 0);
    assert_eq!(h.store.update_calls(), 0);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let h = harness();
    let cases = [
        ("rootuser@user.com", "wrong"),
        ("ghost@example.com", "s3cret"),
        ("ada@example.com", "wrong"),
    ];
    let mut bodies = Vec::new();
    for (email, password) in cases {
        let (status, body) = login(&h.app, email, password).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Incorrect username or password");
        bodies.push(body);
    }
    assert!(bodies.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn login_validation_is_a_request_error() {
    let h = harness();
    let (status, _) = login(&h.app, "not-an-email", "pw").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = login(&h.app, "ada@example.com", "").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn schema_visibility_depends_on_caller() {
    let h = harness();

    let (status, anon) = send(&h.app, Method::GET, "/schema", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let users = users_table(&anon);
    assert_eq!(users["crud_post_enabled"], false);
    assert_eq!(users["crud_delete_enabled"], false);
    assert_eq!(users["crud_soft_delete_enabled"], false);
    assert_eq!(users["crud_get_enabled"], true);
    assert_eq!(users["crud_put_enabled"], true);

    let (_, tenant_login) = login(&h.app, "ada@example.com", "s3cret").await;
    assert_eq!(tenant_login["user"]["is_admin"], false);
    assert!(tenant_login["user"].get("password").is_none());
    let (_, as_tenant) = send(&h.app, Method::GET, "/schema", tenant_login["token"].as_str(), None).await;
    assert_eq!(users_table(&as_tenant)["crud_post_enabled"], false);

    let (status, root_login) = login(&h.app, "rootuser@user.com", "root").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(root_login["message"], "Login successful");
    assert_eq!(root_login["user"]["is_admin"], true);
    let (_, as_root) = send(&h.app, Method::GET, "/schema", root_login["token"].as_str(), None).await;
    let users = users_table(&as_root);
    assert_eq!(users["crud_post_enabled"], true);
    assert_eq!(users["crud_delete_enabled"], true);
    assert_eq!(users["crud_soft_delete_enabled"], false);
}

#[tokio::test]
async fn invalid_token_is_treated_as_anonymous() {
    let h = harness();
    let (status, body) = send(&h.app, Method::GET, "/schema", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users_table(&body)["crud_delete_enabled"], false);
}

#[tokio::test]
async fn tenant_with_root_id_cannot_see_root_schema() {
    let h = harness();
    let (status, body) = login(&h.app, "eve@example.com", "s3cret").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Incorrect username or password");

    // a validly signed token for id -1 without the admin claim stays non-root
    let tenant = Principal {
        id: "-1".into(),
        is_admin: false,
        user: json!({}),
    };
    let bundle = JwtTokenIssuer::new(b"http-test", 3600).issue_token(&tenant).unwrap();
    let (status, body) = send(&h.app, Method::GET, "/schema", Some(&bundle.token), None).await;
    assert_eq!(status, StatusCode::OK);
    let users = users_table(&body);
    assert_eq!(users["crud_post_enabled"], false);
    assert_eq!(users["crud_delete_enabled"], false);
}

#[tokio::test]
async fn health_and_ready() {
    let h = harness();
    let (status, body) = send(&h.app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let (status, body) = send(&h.app, Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tables"], 6);
}
