use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use moment_platform::api::{ApiClient, FreeMintForm, ImageFile, MintMomentForm};
use moment_platform::cache::{keys, QueryCache, QueryKey};
use moment_platform::error::ApiError;
use moment_platform::models::FlowAddress;
use moment_platform::mutations::Mutations;

fn client(server: &MockServer) -> ApiClient {
    ApiClient::with_client(&server.uri(), reqwest::Client::new())
}

fn pass(pass_id: u64) -> serde_json::Value {
    json!({
        "id": pass_id as i64 * 10,
        "pass_id": pass_id,
        "is_redeemed": false,
        "edges": {"event": {"name": "Flow Meetup"}}
    })
}

#[tokio::test]
async fn event_detail_404_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events/77"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "event not found"})))
        .mount(&server)
        .await;

    let event = client(&server).event_detail(77, None).await.unwrap();
    assert!(event.is_none());
}

#[tokio::test]
async fn event_detail_passes_viewer_and_unwraps_envelope() {
    let server = MockServer::start().await;
    let viewer = FlowAddress::parse("0x01").unwrap();
    Mock::given(method("GET"))
        .and(path("/events/5"))
        .and(query_param("viewer", "0x0000000000000001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 5, "event_id": 42, "name": "Demo Day", "quota": 2, "counter": 2, "status": 1, "is_registered": true}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let event = client(&server).event_detail(5, Some(&viewer)).await.unwrap().unwrap();
    assert_eq!(event.event_id, 42);
    assert!(event.is_registered);
    assert!(event.is_full());
    assert_eq!(event.status.label(), "Open");
}

#[tokio::test]
async fn server_error_carries_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/listings"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "database is down"})))
        .mount(&server)
        .await;

    let err = client(&server).listings(1, 12).await.unwrap_err();
    assert_eq!(err, ApiError::Http { status: 500, message: "database is down".into() });
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let api = ApiClient::with_client("http://127.0.0.1:9", reqwest::Client::new());
    let err = api.list_events(1, 20).await.unwrap_err();
    assert!(matches!(err, ApiError::Network { .. }));
    assert!(err.to_string().starts_with("Network error. Please check your connection."));
}

#[tokio::test]
async fn pass_batch_drops_missing_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/event-passes"))
        .and(query_param("pass_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [pass(1)]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/event-passes"))
        .and(query_param("pass_id", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let passes = client(&server).event_passes_by_ids(&[1, 2]).await.unwrap();
    assert_eq!(passes.len(), 1);
    assert_eq!(passes[0].pass_id, 1);
}

#[tokio::test]
async fn pass_batch_fails_as_a_whole() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/event-passes"))
        .and(query_param("pass_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [pass(1)]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/event-passes"))
        .and(query_param("pass_id", "2"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client(&server).event_passes_by_ids(&[1, 2]).await.unwrap_err();
    assert_eq!(err.status(), Some(502));
}

#[tokio::test]
async fn empty_pass_batch_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(0)
        .mount(&server)
        .await;

    let passes = client(&server).event_passes_by_ids(&[]).await.unwrap();
    assert!(passes.is_empty());
}

#[tokio::test]
async fn user_search_picks_endpoint_by_term() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("pageSize", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"address": "0x01"}, {"address": "0x02"}]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/search"))
        .and(query_param("q", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"address": "0x0a", "nickname": "alice"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    assert_eq!(api.search_users("   ").await.unwrap().len(), 2);

    let found = api.search_users(" alice ").await.unwrap();
    assert_eq!(found[0].nickname.as_deref(), Some("alice"));
}

#[tokio::test]
async fn missing_profile_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/0x00000000000000ab"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let address = FlowAddress::parse("AB").unwrap();
    assert!(client(&server).user_profile(&address).await.unwrap().is_none());
}

/// Кеш, в котором лежит по ключу на каждый ресурс.
fn seeded_cache(owner: &FlowAddress) -> (QueryCache, Vec<QueryKey>) {
    let cache = QueryCache::default();
    let seeded = vec![
        keys::events_list(1),
        keys::moments_by_owner(Some(owner), 1),
        keys::moments_feed(None, 1),
        keys::accessories(Some(owner), 1, 12),
        keys::event_passes(owner, 1),
        keys::listings(1, 12),
        keys::user_profile(owner),
        keys::comments(9),
    ];
    for key in &seeded {
        cache.set_data(key, &json!({"data": []})).unwrap();
    }
    (cache, seeded)
}

fn invalidated_roots(cache: &QueryCache, seeded: &[QueryKey]) -> Vec<String> {
    let mut roots: Vec<String> = seeded
        .iter()
        .filter(|key| cache.is_invalidated(key))
        .map(|key| key.root().to_string())
        .collect();
    roots.sort();
    roots.dedup();
    roots
}

fn thumbnail() -> ImageFile {
    ImageFile::png("moment.png", b"fake-png-bytes".to_vec())
}

#[tokio::test]
async fn mint_with_pass_sends_form_and_invalidates_its_resources() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/moment/with-event-pass"))
        .and(body_string_contains("name=\"recipient\"\r\n\r\n0x0000000000000001"))
        .and(body_string_contains("name=\"eventPassID\"\r\n\r\n30"))
        .and(body_string_contains("name=\"tier\"\r\n\r\ngold"))
        .and(body_string_contains("name=\"thumbnail\"; filename=\"moment.png\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let owner = FlowAddress::parse("0x01").unwrap();
    let (cache, seeded) = seeded_cache(&owner);
    let mutations = Mutations::new(client(&server), cache.clone(), None);

    let form = MintMomentForm {
        recipient: owner.clone(),
        event_pass_id: 30,
        name: "Sunset".into(),
        description: "Golden hour".into(),
        thumbnail: thumbnail(),
        tier: Some("gold".into()),
    };
    mutations.mint_moment(form).await.unwrap();

    assert_eq!(
        invalidated_roots(&cache, &seeded),
        vec!["event-passes", "moments", "moments-feed", "user-profile"]
    );
    assert!(!cache.is_invalidated(&keys::events_list(1)));
}

#[tokio::test]
async fn free_mint_omits_missing_fields_and_spares_passes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/moment/free"))
        .and(body_string_contains("name=\"recipient\"\r\n\r\n0x0000000000000001"))
        .and(body_string_contains("name=\"thumbnail\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 2})))
        .expect(1)
        .mount(&server)
        .await;

    let owner = FlowAddress::parse("0x01").unwrap();
    let (cache, seeded) = seeded_cache(&owner);
    let mutations = Mutations::new(client(&server), cache.clone(), None);

    let form = FreeMintForm { recipient: owner.clone(), name: "First".into(), description: None, thumbnail: thumbnail() };
    mutations.free_mint_moment(form).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(!body.contains("name=\"description\""));
    assert!(!body.contains("name=\"eventPassID\""));

    assert_eq!(invalidated_roots(&cache, &seeded), vec!["moments", "moments-feed", "user-profile"]);
}

#[tokio::test]
async fn like_and_comment_invalidate_only_their_rows() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/moments/9/like"))
        .and(query_param("user", "0x0000000000000001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"liked": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/moments/9/comments"))
        .and(body_partial_json(json!({"userAddress": "0x0000000000000001", "content": "nice"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5})))
        .expect(1)
        .mount(&server)
        .await;

    let owner = FlowAddress::parse("0x01").unwrap();

    let (cache, seeded) = seeded_cache(&owner);
    let mutations = Mutations::new(client(&server), cache.clone(), None);
    mutations.toggle_like(9, &owner).await.unwrap();
    assert_eq!(invalidated_roots(&cache, &seeded), vec!["moments", "moments-feed"]);

    let (cache, seeded) = seeded_cache(&owner);
    let mutations = Mutations::new(client(&server), cache.clone(), None);
    mutations.add_comment(9, &owner, "  nice ").await.unwrap();
    assert_eq!(invalidated_roots(&cache, &seeded), vec!["comments", "moments", "moments-feed"]);
}

#[tokio::test]
async fn failed_mutation_invalidates_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/moments/9/like"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "db down"})))
        .mount(&server)
        .await;

    let owner = FlowAddress::parse("0x01").unwrap();
    let (cache, seeded) = seeded_cache(&owner);
    let mutations = Mutations::new(client(&server), cache.clone(), None);

    let err = mutations.toggle_like(9, &owner).await.unwrap_err();
    assert_eq!(err, ApiError::Http { status: 500, message: "db down".into() });
    assert!(invalidated_roots(&cache, &seeded).is_empty());
}
