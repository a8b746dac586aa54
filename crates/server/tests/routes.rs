use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use engine::Engine;
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use serde_json::{Value, json};
use server::{ServerState, router};
use tower::ServiceExt;

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let engine = Engine::builder().database(db).build().await.unwrap();
    engine.create_user("alice", Some("Alice")).await.unwrap();
    engine.create_user("bob", None).await.unwrap();

    router(ServerState {
        engine: Arc::new(engine),
    })
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        request = request.header("x-user-id", user);
    }
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn create_project(app: &Router, user: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/projects",
        Some(user),
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_str().unwrap().to_string()
}

async fn currency_id(app: &Router, code: &str) -> String {
    let (_, body) = send(app, Method::GET, "/currencies", Some("alice"), None).await;
    body.as_array()
        .unwrap()
        .iter()
        .find(|currency| currency["code"] == code)
        .and_then(|currency| currency["id"].as_str())
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn requests_without_a_known_caller_are_unauthorized() {
    let app = app().await;

    let (status, body) = send(&app, Method::POST, "/projects", None, Some(json!({ "name": "x" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({ "status": 401, "message": "missing x-user-id header" })
    );

    let (status, body) = send(&app, Method::GET, "/projects", Some("mallory"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({ "status": 401, "message": "unknown user mallory" })
    );
}

#[tokio::test]
async fn bad_request_bodies_get_an_error_object() {
    let app = app().await;

    let (status, body) = send(&app, Method::POST, "/projects", Some("alice"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], 422);
    assert!(body["message"].as_str().unwrap().contains("missing field `name`"));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/projects")
        .header("x-user-id", "alice")
        .header("content-type", "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], 400);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn caller_sees_its_project_set() {
    let app = app().await;
    let id = create_project(&app, "alice", "Household").await;

    let (_, body) = send(&app, Method::GET, &format!("/projects/{id}"), Some("alice"), None).await;

    assert_eq!(body["createdBy"]["projects"], json!([id]));
}

#[tokio::test]
async fn upper_case_project_id_resolves() {
    let app = app().await;
    let id = create_project(&app, "alice", "Household").await;

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/projects/{}", id.to_uppercase()),
        Some("alice"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
}

#[tokio::test]
async fn created_project_is_expanded_and_visible_to_members_only() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/projects",
        Some("alice"),
        Some(json!({ "name": "Household" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Household");
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(
        body["owners"],
        json!([{ "username": "alice", "displayName": "Alice", "projects": [id] }])
    );
    assert_eq!(body["users"], body["owners"]);
    assert_eq!(body["createdBy"]["username"], "alice");
    assert_eq!(body["mainCurrency"], Value::Null);

    let (status, body) = send(&app, Method::GET, &format!("/projects/{id}"), Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());

    let (status, body) = send(&app, Method::GET, &format!("/projects/{id}"), Some("bob"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);

    let (status, body) = send(&app, Method::GET, "/projects", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = send(&app, Method::GET, "/projects", Some("bob"), None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn malformed_project_id_is_forbidden() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/projects/not-an-id", Some("alice"), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body,
        json!({ "status": 403, "message": "document id is invalid: not-an-id" })
    );
}

#[tokio::test]
async fn empty_project_name_is_rejected() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/projects",
        Some("alice"),
        Some(json!({ "name": "   " })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], 422);
}

#[tokio::test]
async fn rename_returns_the_new_name() {
    let app = app().await;
    let id = create_project(&app, "alice", "Household").await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/projects/{id}/rename"),
        Some("alice"),
        Some(json!({ "name": "Home" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Home"));

    let (_, body) = send(&app, Method::GET, &format!("/projects/{id}"), Some("alice"), None).await;
    assert_eq!(body["name"], "Home");

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/projects/{id}/rename"),
        Some("bob"),
        Some(json!({ "name": "Mine" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn currencies_can_be_selected_and_one_made_main() {
    let app = app().await;
    let id = create_project(&app, "alice", "Household").await;
    let eur = currency_id(&app, "EUR").await;
    let usd = currency_id(&app, "USD").await;
    let gbp = currency_id(&app, "GBP").await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/projects/{id}/update-currencies"),
        Some("alice"),
        Some(json!({ "currencies": [eur, usd, eur] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let codes: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|currency| currency["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["EUR", "USD"]);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/projects/{id}/update-main-currency"),
        Some("alice"),
        Some(json!({ "mainCurrency": usd })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "USD");

    let (_, body) = send(&app, Method::GET, &format!("/projects/{id}"), Some("alice"), None).await;
    assert_eq!(body["mainCurrency"]["code"], "USD");

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/projects/{id}/update-main-currency"),
        Some("alice"),
        Some(json!({ "mainCurrency": gbp })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/projects/{id}/update-currencies"),
        Some("alice"),
        Some(json!({ "currencies": ["euro"] })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn category_lifecycle() {
    let app = app().await;
    let id = create_project(&app, "alice", "Household").await;
    let uri = format!("/projects/{id}/categories");

    let (status, food) = send(
        &app,
        Method::POST,
        &uri,
        Some("alice"),
        Some(json!({ "name": "Food", "categoryType": "expense" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(food["projectId"], id.as_str());
    let food_id = food["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::POST,
        &uri,
        Some("alice"),
        Some(json!({ "name": "food", "categoryType": "expense" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, groceries) = send(
        &app,
        Method::POST,
        &uri,
        Some("alice"),
        Some(json!({ "name": "Groceries", "categoryType": "expense", "parent": food_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(groceries["parent"], food_id.as_str());

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("{uri}/{food_id}"),
        Some("alice"),
        Some(json!({ "name": "Food & drinks", "categoryType": "expense" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Food & drinks");

    let (_, body) = send(&app, Method::GET, &uri, Some("alice"), None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = send(&app, Method::GET, &uri, Some("bob"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("{uri}/{food_id}"),
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, &uri, Some("alice"), None).await;
    assert_eq!(body, json!([]));
}
