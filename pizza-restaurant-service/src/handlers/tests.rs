use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use super::{app, AppState};
use crate::store::testing::*;
use crate::store::{SqliteStore, Store};

struct TestApp {
    _dir: TempDir,
    store: SqliteStore,
    router: Router,
}

impl TestApp {
    async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    async fn json(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = self.request(method, uri, body).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

// Dough (1) serves Cheese (1) for 10; Crust (2) has no pizzas yet.
fn setup_app() -> TestApp {
    let (dir, store) = setup_store();
    insert_restaurant(&store, 1, "Dough", "1 Main St");
    insert_restaurant(&store, 2, "Crust", "2 Side St");
    insert_pizza(&store, 1, "Cheese", "Dough, Tomato, Cheese");
    insert_pizza(&store, 2, "Pepperoni", "Dough, Tomato, Cheese, Pepperoni");
    insert_restaurant_pizza(&store, 1, 10.0, 1, 1);

    TestApp {
        _dir: dir,
        router: app(AppState::new(store.clone())),
        store,
    }
}

#[tokio::test]
async fn test_index_banner() {
    let app = setup_app();

    let (status, body) = app.request(Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), "<h1>Code challenge</h1>");
}

#[tokio::test]
async fn test_list_restaurants() {
    let app = setup_app();

    let (status, body) = app.json(Method::GET, "/restaurants", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "id": 1, "name": "Dough", "address": "1 Main St" },
            { "id": 2, "name": "Crust", "address": "2 Side St" },
        ])
    );
}

#[tokio::test]
async fn test_get_restaurant() {
    let app = setup_app();

    let (status, body) = app.json(Method::GET, "/restaurants/1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": 1,
            "name": "Dough",
            "address": "1 Main St",
            "restaurant_pizzas": [{
                "id": 1,
                "price": 10,
                "pizza_id": 1,
                "restaurant_id": 1,
                "pizza": { "id": 1, "name": "Cheese", "ingredients": "Dough, Tomato, Cheese" },
            }],
        })
    );
    assert!(body["restaurant_pizzas"][0].get("restaurant").is_none());
}

#[tokio::test]
async fn test_get_restaurant_not_found() {
    let app = setup_app();

    for uri in ["/restaurants/42", "/restaurants/abc"] {
        let (status, body) = app.json(Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Restaurant not found" }));
    }
}

#[tokio::test]
async fn test_delete_restaurant() {
    let app = setup_app();

    let (status, body) = app.request(Method::DELETE, "/restaurants/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, _) = app.json(Method::GET, "/restaurants/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.find_restaurant_pizza(1).unwrap(), None);
    assert_eq!(count_restaurant_pizzas(&app.store), 0);
}

#[tokio::test]
async fn test_delete_restaurant_not_found() {
    let app = setup_app();

    let (status, body) = app.json(Method::DELETE, "/restaurants/42", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Restaurant not found" }));
    assert_eq!(app.store.list_restaurants().unwrap().len(), 2);
    assert_eq!(count_restaurant_pizzas(&app.store), 1);
}

#[tokio::test]
async fn test_list_pizzas() {
    let app = setup_app();

    let (status, body) = app.json(Method::GET, "/pizzas", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "id": 1, "name": "Cheese", "ingredients": "Dough, Tomato, Cheese" },
            { "id": 2, "name": "Pepperoni", "ingredients": "Dough, Tomato, Cheese, Pepperoni" },
        ])
    );
}

#[tokio::test]
async fn test_create_restaurant_pizza() {
    let app = setup_app();

    let (status, body) = app
        .json(
            Method::POST,
            "/restaurant_pizzas",
            Some(json!({ "restaurant_id": 1, "pizza_id": 1, "price": 10 })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["price"], 10);
    assert_eq!(body["pizza_id"], 1);
    assert_eq!(body["restaurant_id"], 1);
    assert_eq!(
        body["pizza"],
        json!({ "id": 1, "name": "Cheese", "ingredients": "Dough, Tomato, Cheese" })
    );
    assert_eq!(
        body["restaurant"],
        json!({ "id": 1, "name": "Dough", "address": "1 Main St" })
    );
    assert_eq!(count_restaurant_pizzas(&app.store), 2);
}

#[tokio::test]
async fn test_create_restaurant_pizza_price_bounds() {
    let app = setup_app();

    for price in [1, 30] {
        let (status, body) = app
            .json(
                Method::POST,
                "/restaurant_pizzas",
                Some(json!({ "restaurant_id": 2, "pizza_id": 2, "price": price })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["price"], price);
    }

    for price in [0, 31] {
        let (status, body) = app
            .json(
                Method::POST,
                "/restaurant_pizzas",
                Some(json!({ "restaurant_id": 2, "pizza_id": 2, "price": price })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "errors": ["validation errors"] }));
    }

    assert_eq!(count_restaurant_pizzas(&app.store), 3);
}

#[tokio::test]
async fn test_create_restaurant_pizza_fractional_price() {
    let app = setup_app();

    let (status, body) = app
        .json(
            Method::POST,
            "/restaurant_pizzas",
            Some(json!({ "restaurant_id": 2, "pizza_id": 1, "price": 10.5 })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["price"], 10.5);

    let (status, body) = app.json(Method::GET, "/restaurants/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["restaurant_pizzas"][0]["price"], 10.5);
    assert_eq!(count_restaurant_pizzas(&app.store), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_create_restaurant_pizza_concurrently() {
    let app = setup_app();

    let handles: Vec<_> = (0..64)
        .map(|i| {
            let router = app.router.clone();
            tokio::spawn(async move {
                let body = json!({ "restaurant_id": 1 + i % 2, "pizza_id": 1, "price": 5 });
                let request = Request::builder()
                    .method(Method::POST)
                    .uri("/restaurant_pizzas")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap();
                router.oneshot(request).await.unwrap().status()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::CREATED);
    }
    assert_eq!(count_restaurant_pizzas(&app.store), 65);
}

#[tokio::test]
async fn test_create_restaurant_pizza_missing_key() {
    let app = setup_app();

    let (status, body) = app
        .json(
            Method::POST,
            "/restaurant_pizzas",
            Some(json!({ "restaurant_id": 1, "price": 10 })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "errors": ["Missing key: pizza_id"] }));
    assert_eq!(count_restaurant_pizzas(&app.store), 1);
}

#[tokio::test]
async fn test_create_restaurant_pizza_unknown_restaurant() {
    let app = setup_app();

    let (status, body) = app
        .json(
            Method::POST,
            "/restaurant_pizzas",
            Some(json!({ "restaurant_id": 42, "pizza_id": 1, "price": 10 })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
    assert!(body["errors"][0]
        .as_str()
        .unwrap()
        .contains("FOREIGN KEY constraint failed"));
    assert_eq!(count_restaurant_pizzas(&app.store), 1);
}

#[tokio::test]
async fn test_create_restaurant_pizza_unknown_pizza() {
    let app = setup_app();

    let (status, body) = app
        .json(
            Method::POST,
            "/restaurant_pizzas",
            Some(json!({ "restaurant_id": 1, "pizza_id": 42, "price": 10 })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
    assert!(body["errors"][0]
        .as_str()
        .unwrap()
        .contains("FOREIGN KEY constraint failed"));
    assert_eq!(count_restaurant_pizzas(&app.store), 1);
    assert_eq!(
        app.store.find_restaurant(1).unwrap().unwrap().restaurant_pizzas.len(),
        1
    );
}

#[tokio::test]
async fn test_create_restaurant_pizza_malformed_body() {
    let app = setup_app();

    let (status, body) = app
        .json(Method::POST, "/restaurant_pizzas", Some(json!("not an object")))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "errors": ["Request body must be a JSON object"] }));
}

#[tokio::test]
async fn test_openapi_document() {
    let app = setup_app();

    let (status, body) = app.json(Method::GET, "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/restaurant_pizzas").is_some());
    assert!(body["paths"].get("/restaurants/{id}").is_some());
}
