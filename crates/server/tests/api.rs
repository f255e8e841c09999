//! API tests against a server on an ephemeral port

use shop_agent_config::Settings;
use shop_agent_server::{create_router, AppState};

/// Spawn the app on 127.0.0.1:0 and return its base URL
async fn spawn_server() -> String {
    let state = AppState::from_settings(Settings::default()).expect("default settings wire up");
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}

async fn chat(
    client: &reqwest::Client,
    base: &str,
    body: serde_json::Value,
) -> (reqwest::StatusCode, serde_json::Value) {
    let response = client
        .post(format!("{base}/api/chat"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn health_endpoint() {
    let base = spawn_server().await;
    let response = reqwest::get(format!("{base}/health")).await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn chat_product_search() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let (status, json) = chat(
        &client,
        &base,
        serde_json::json!({ "sessionId": "t1", "message": "iphone 15 até 3000" }),
    )
    .await;

    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["sessionId"], "t1");
    assert_eq!(json["responseType"], "results");
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
    assert_eq!(json["items"][0]["id"], "sku-001");
    assert_eq!(json["debug"]["intent"], "product_search");
}

#[tokio::test]
async fn chat_greeting() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let (status, json) = chat(
        &client,
        &base,
        serde_json::json!({ "sessionId": "t1", "message": "oi", "lang": "pt" }),
    )
    .await;

    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(json["debug"]["intent"], "small_talk");
    assert!(json["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn chat_followup_inherits_focus() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let (_, first) = chat(
        &client,
        &base,
        serde_json::json!({ "sessionId": "f1", "message": "quero um perfume" }),
    )
    .await;
    assert_eq!(first["responseType"], "results");

    let (_, second) = chat(
        &client,
        &base,
        serde_json::json!({ "sessionId": "f1", "message": "tem mais barato?" }),
    )
    .await;
    assert_eq!(second["debug"]["query"]["product"], "perfume");
    assert_eq!(second["debug"]["query"]["sort"], "price_ascending");
}

#[tokio::test]
async fn chat_empty_message_is_bad_request() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let (status, json) = chat(
        &client,
        &base,
        serde_json::json!({ "sessionId": "t1", "message": "  " }),
    )
    .await;

    assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(json["ok"], false);
}

#[tokio::test]
async fn chat_without_session_id_derives_one() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let (_, json) = chat(
        &client,
        &base,
        serde_json::json!({ "message": "quero um perfume" }),
    )
    .await;
    assert!(json["sessionId"].as_str().unwrap().starts_with("anon-"));
}

#[tokio::test]
async fn sessions_list_and_delete() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    chat(
        &client,
        &base,
        serde_json::json!({ "sessionId": "s1", "message": "oi" }),
    )
    .await;

    let json: serde_json::Value = client
        .get(format!("{base}/api/sessions"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["count"], 1);

    let response = client
        .delete(format!("{base}/api/sessions/s1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);

    let json: serde_json::Value = client
        .get(format!("{base}/api/sessions"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["count"], 0);
}

#[tokio::test]
async fn canon_roundtrip() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let json: serde_json::Value = client
        .get(format!("{base}/api/admin/canon"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(json["products"].as_object().unwrap().len() > 10);

    // Replace with a one-product dictionary and query through it
    let response = client
        .put(format!("{base}/api/admin/canon"))
        .json(&serde_json::json!({
            "products": { "mochila": "mochila", "mochilas": "mochila" },
            "categories": { "moda": "moda" },
            "productCategories": { "mochila": "moda" },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["products"], 2);

    // The old dictionary no longer resolves
    let (_, json) = chat(
        &client,
        &base,
        serde_json::json!({ "sessionId": "c1", "message": "quero um celular" }),
    )
    .await;
    assert_eq!(json["debug"]["intent"], "unknown");
}

#[tokio::test]
async fn canon_rejects_empty_dictionary() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .put(format!("{base}/api/admin/canon"))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}
