use axum::Router;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use moment_platform::api::ApiClient;
use moment_platform::config::Config;
use moment_platform::{controllers, AppState};

const OWNER: &str = "0x0000000000000001";

async fn spawn_gateway(backend: &MockServer, access_node: &MockServer) -> String {
    let mut config = Config::from_env();
    config.flow.access_node_url = access_node.uri();
    config.transactions.poll_interval_ms = 10;
    config.cache.retry_count = 0;

    let api = ApiClient::with_client(&backend.uri(), reqwest::Client::new());
    let state = AppState::with_api(config, api).unwrap();
    let app = Router::new().nest("/api", controllers::routes()).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{}", addr)
}

#[tokio::test]
async fn missing_event_is_404_with_error_body() {
    let backend = MockServer::start().await;
    let node = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events/404"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&backend)
        .await;

    let base = spawn_gateway(&backend, &node).await;
    let response = reqwest::get(format!("{}/api/pages/events/404", base)).await.unwrap();
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Event not found"));
}

#[tokio::test]
async fn upstream_failure_is_502() {
    let backend = MockServer::start().await;
    let node = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"error": "maintenance"})))
        .expect(1)
        .mount(&backend)
        .await;

    let base = spawn_gateway(&backend, &node).await;
    let response = reqwest::get(format!("{}/api/pages/home", base)).await.unwrap();
    assert_eq!(response.status(), 502);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("HTTP 503: maintenance"));
}

#[tokio::test]
async fn malformed_request_is_400() {
    let backend = MockServer::start().await;
    let node = MockServer::start().await;
    let base = spawn_gateway(&backend, &node).await;

    // Кривой page - ошибка разбора запроса, до backend'а дело не доходит
    let response = reqwest::get(format!("{}/api/pages/marketplace?page=abc", base)).await.unwrap();
    assert_eq!(response.status(), 400);

    let response = reqwest::get(format!("{}/api/pages/tickets?address=not-hex", base)).await.unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn non_numeric_event_id_is_400() {
    let backend = MockServer::start().await;
    let node = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 1, "name": "from another endpoint"}})))
        .expect(0)
        .mount(&backend)
        .await;

    let base = spawn_gateway(&backend, &node).await;
    for id in ["..%2Fusers%2F0x0000000000000001", "7%3Fviewer%3D0x01", "abc"] {
        let response = reqwest::get(format!("{}/api/pages/events/{}", base, id)).await.unwrap();
        assert_eq!(response.status(), 400, "id {}", id);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], json!(false));
    }
}

#[tokio::test]
async fn profile_page_composes_highlights() {
    let backend = MockServer::start().await;
    let node = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/users/{}", OWNER)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {
            "id": 1,
            "address": OWNER,
            "nickname": "alice",
            "highlighted_moment_id": 12,
            "highlighted_eventPass_ids": [3]
        }})))
        .mount(&backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/moments"))
        .and(query_param("owner_address", OWNER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 1, "nft_id": 12, "name": "Sunset"}],
            "pagination": {"totalItems": 1, "totalPages": 1, "currentPage": 1, "pageSize": 9}
        })))
        .mount(&backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/moments"))
        .and(query_param("nft_id", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": 1, "nft_id": 12, "name": "Sunset"}]})))
        .mount(&backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/accessories"))
        .and(query_param("owner_address", OWNER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/event-passes"))
        .and(query_param("pass_id", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": 30, "pass_id": 3}]})))
        .mount(&backend)
        .await;

    let base = spawn_gateway(&backend, &node).await;
    let response = reqwest::get(format!("{}/api/pages/users/0x1", base)).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["address"], json!(OWNER));
    assert_eq!(body["profile"]["nickname"], json!("alice"));
    assert_eq!(body["moments"]["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["highlightedMoment"]["nft_id"], json!(12));
    assert_eq!(body["highlightedPasses"][0]["pass_id"], json!(3));
}

#[tokio::test]
async fn check_in_without_wallet_is_unauthorized() {
    let backend = MockServer::start().await;
    let node = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/event/check-in"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend)
        .await;

    let base = spawn_gateway(&backend, &node).await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/events/7/check-in", base))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn tracked_transaction_reaches_sealed() {
    let backend = MockServer::start().await;
    let node = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/transaction_results/tx-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Sealed", "error_message": ""})))
        .mount(&node)
        .await;

    let base = spawn_gateway(&backend, &node).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/transactions", base))
        .json(&json!({"kind": "equip-accessory", "txId": "tx-1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 202);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["isPending"], json!(true));
    assert_eq!(body["txId"], json!("tx-1"));

    let mut sealed = false;
    for _ in 0..100 {
        let body: Value = client
            .get(format!("{}/api/transactions/tx-1", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        if body["isSealed"] == json!(true) {
            assert_eq!(body["isPending"], json!(false));
            assert_eq!(body["status"], json!("sealed"));
            sealed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(sealed);

    let response = client.get(format!("{}/api/transactions/unknown", base)).send().await.unwrap();
    assert_eq!(response.status(), 404);
}
