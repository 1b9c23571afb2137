use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use menutree_core::{MenuTree, NodeStore};
use menutree_server::{create_router, AppState, ServerConfig};
use menutree_test_support::{assert_dense_orders, assert_tree_consistent};

fn seeded() -> (AppState, Router) {
    let config = ServerConfig::default();
    let state = AppState::from_config(&config).unwrap();
    let app = create_router(state.clone(), &config);
    (state, app)
}

fn empty() -> Router {
    let config = ServerConfig {
        seed: false,
        ..ServerConfig::default()
    };
    create_router(AppState::new(MenuTree::in_memory(), "ping"), &config)
}

async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let text = body.map(|b| b.to_string());
    send_raw(app, method, uri, text.as_deref()).await
}

async fn create(app: &Router, name: &str, parent: Option<&str>) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/menus",
        Some(json!({"name": name, "label": name.to_uppercase(), "parentId": parent})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

#[tokio::test]
async fn ping_returns_configured_message() {
    let (_, app) = seeded();
    let (status, body) = send(&app, Method::GET, "/api/ping", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "ping"}));

    let custom = create_router(
        AppState::new(MenuTree::in_memory(), "pong"),
        &ServerConfig::default(),
    );
    let (_, body) = send(&custom, Method::GET, "/api/ping", None).await;
    assert_eq!(body["message"], "pong");
}

#[tokio::test]
async fn lists_seeded_hierarchy_as_nested_tree() {
    let (_, app) = seeded();
    let (status, body) = send(&app, Method::GET, "/api/menus", None).await;
    assert_eq!(status, StatusCode::OK);

    let roots = body["data"].as_array().unwrap();
    assert_eq!(roots.len(), 1);
    let mut node = &roots[0];
    for (id, depth) in [("1", 1), ("1-1", 2), ("1-1-1", 3), ("1-1-1-1", 4), ("1-1-1-1-1", 5)] {
        assert_eq!(node["id"], id);
        assert_eq!(node["depth"], depth);
        if id != "1-1-1-1-1" {
            node = &node["children"][0];
        }
    }
    assert_eq!(node["label"], "Code Registration");
    assert_eq!(node["children"], json!([]));
}

#[tokio::test]
async fn empty_store_lists_nothing() {
    let app = empty();
    let (status, body) = send(&app, Method::GET, "/api/menus", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": []}));
}

#[tokio::test]
async fn get_by_id_includes_subtree_or_404() {
    let (_, app) = seeded();
    let (status, body) = send(&app, Method::GET, "/api/menus/1-1-1-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["parentId"], "1-1-1");
    assert_eq!(body["data"]["children"][0]["id"], "1-1-1-1-1");

    let (status, body) = send(&app, Method::GET, "/api/menus/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn create_assigns_depth_and_appends_order() {
    let (state, app) = seeded();
    let first = create(&app, "first", Some("1-1")).await;
    let second = create(&app, "second", Some("1-1")).await;

    assert_eq!(first["depth"], 3);
    assert_eq!(first["order"], 1);
    assert_eq!(second["order"], 2);
    assert_eq!(first["createdAt"], first["updatedAt"]);
    assert_eq!(first["id"].as_str().unwrap().len(), 36);

    let root = create(&app, "root", None).await;
    assert_eq!(root["depth"], 1);
    assert_eq!(root["parentId"], Value::Null);

    let tree = state.tree.lock().await;
    assert_tree_consistent(&*tree);
}

#[tokio::test]
async fn create_rejects_bad_input() {
    let (_, app) = seeded();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/menus",
        Some(json!({"name": "x", "label": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "VALIDATION_ERROR", "message": "Label is required"}));

    let (status, body) = send(&app, Method::POST, "/api/menus", Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, body) = send_raw(&app, Method::POST, "/api/menus", Some("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/menus",
        Some(json!({"name": "x", "label": "X", "parentId": "ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "PARENT_NOT_FOUND");
}

#[tokio::test]
async fn update_renames_and_reparents() {
    let (state, app) = seeded();
    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/menus/1-1-1",
        Some(json!({"label": "All Systems"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["label"], "All Systems");
    assert_eq!(body["data"]["name"], "systems");
    assert_eq!(body["data"]["parentId"], "1-1");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/menus/1-1-1",
        Some(json!({"parentId": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["depth"], 1);

    let (_, leaf) = send(&app, Method::GET, "/api/menus/1-1-1-1-1", None).await;
    assert_eq!(leaf["data"]["depth"], 3);

    let tree = state.tree.lock().await;
    assert_tree_consistent(&*tree);
}

#[tokio::test]
async fn update_errors_map_to_statuses() {
    let (_, app) = seeded();

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/menus/1",
        Some(json!({"parentId": "1-1-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_OPERATION");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/menus/1",
        Some(json!({"parentId": "ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "PARENT_NOT_FOUND");

    let (status, body) = send(&app, Method::PUT, "/api/menus/ghost", Some(json!({"name": "n"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, body) = send(&app, Method::PUT, "/api/menus/1", Some(json!({"name": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn delete_cascades_then_404s() {
    let (state, app) = seeded();
    let (status, body) = send(&app, Method::DELETE, "/api/menus/1-1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    for id in ["1-1", "1-1-1", "1-1-1-1", "1-1-1-1-1"] {
        let (status, _) = send(&app, Method::GET, &format!("/api/menus/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
    assert_eq!(state.tree.lock().await.len(), 1);

    let (status, body) = send(&app, Method::DELETE, "/api/menus/1-1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn move_endpoint_reparents_and_guards_cycles() {
    let (_, app) = seeded();
    let other = create(&app, "other", None).await;
    let other_id = other["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/menus/{other_id}/move"),
        Some(json!({"parentId": "1-1-1-1-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["depth"], 6);

    let (status, body) = send(&app, Method::PATCH, "/api/menus/1-1/move", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["parentId"], Value::Null);

    let (_, moved) = send(&app, Method::GET, &format!("/api/menus/{other_id}"), None).await;
    assert_eq!(moved["data"]["depth"], 5);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/menus/1-1/move",
        Some(json!({"parentId": other_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_OPERATION");
}

#[tokio::test]
async fn reorder_endpoint_clamps_and_validates() {
    let app = empty();
    let parent = create(&app, "p", None).await;
    let parent_id = parent["id"].as_str().unwrap();
    let mut kids = Vec::new();
    for name in ["a", "b", "c"] {
        kids.push(create(&app, name, Some(parent_id)).await["id"].as_str().unwrap().to_string());
    }

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/menus/{}/reorder", kids[2]),
        Some(json!({"order": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order"], 0);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/menus/{}/reorder", kids[2]),
        Some(json!({"order": 50})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order"], 2);

    let (_, view) = send(&app, Method::GET, &format!("/api/menus/{parent_id}"), None).await;
    let names: Vec<&str> = view["data"]["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/menus/{}/reorder", kids[0]),
        Some(json!({"order": -1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/menus/ghost/reorder",
        Some(json!({"order": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mutations_keep_sibling_orders_dense() {
    let (state, app) = seeded();
    let mut ids = Vec::new();
    for name in ["a", "b", "c", "d"] {
        ids.push(create(&app, name, Some("1")).await["id"].as_str().unwrap().to_string());
    }
    send(&app, Method::DELETE, &format!("/api/menus/{}", ids[1]), None).await;
    send(
        &app,
        Method::PATCH,
        &format!("/api/menus/{}/reorder", ids[3]),
        Some(json!({"order": 0})),
    )
    .await;

    let tree = state.tree.lock().await;
    assert_dense_orders(&tree.store().all().unwrap());
    assert_tree_consistent(&*tree);
}

#[tokio::test]
async fn cors_allows_configured_origin() {
    let config = ServerConfig {
        cors_allow_origin: Some("http://localhost:5173".parse().unwrap()),
        ..ServerConfig::default()
    };
    let app = create_router(AppState::from_config(&config).unwrap(), &config);

    let request = Request::builder()
        .uri("/api/ping")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn cors_defaults_to_any_origin() {
    let (_, app) = seeded();
    let request = Request::builder()
        .uri("/api/menus")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
