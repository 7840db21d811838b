//! Tests for [`HttpClient`] against a mock REST service.
//!
//! The client is blocking, so every call runs on a blocking task while the
//! mock server lives on the async runtime.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gmkit::api::{ApiClient, HttpClient};
use gmkit::config::{ClientConfig, SplitConfig};
use gmkit::core::{PageCursor, send_message};
use gmkit::message::{Conversation, ConversationKind};
use gmkit::{GmkitError, Result};

const TOKEN: &str = "secret";

/// Runs `f` with a client pointed at `server`, off the async runtime.
async fn with_client<T, F>(server: &MockServer, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce(&HttpClient) -> T + Send + 'static,
{
    let config = ClientConfig::new()
        .with_token(TOKEN)
        .with_base_url(server.uri())
        .with_page_size(2);
    tokio::task::spawn_blocking(move || {
        let client = HttpClient::new(config).expect("client");
        f(&client)
    })
    .await
    .expect("blocking task")
}

fn message(id: &str, sender: &str, text: &str) -> serde_json::Value {
    json!({
        "id": id, "group_id": "42", "sender_id": sender, "name": sender,
        "created_at": 1_622_505_600, "text": text, "favorited_by": [], "attachments": []
    })
}

#[tokio::test]
async fn test_groups_are_listed_across_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/groups"))
        .and(query_param("token", TOKEN))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": [{"id": "42", "name": "Football Chat",
                          "members": [{"user_id": "u1", "name": "Amy", "nickname": "Ames"}]}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/groups"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": []})))
        .mount(&server)
        .await;

    let id = with_client(&server, |c| c.resolve_group_id("Football Chat"))
        .await
        .unwrap();
    assert_eq!(id, "42");
}

#[tokio::test]
async fn test_pagination_follows_before_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/groups/42/messages"))
        .and(query_param("limit", "2"))
        .and(query_param_is_missing("before_id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"count": 3, "messages": [message("3", "u1", "c"), message("2", "u1", "b")]}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/groups/42/messages"))
        .and(query_param("before_id", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"count": 3, "messages": [message("1", "u2", "a")]}
        })))
        .expect(1)
        .mount(&server)
        .await;
    // End of history is signalled with 304 Not Modified.
    Mock::given(method("GET"))
        .and(path("/groups/42/messages"))
        .and(query_param("before_id", "1"))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&server)
        .await;

    let ids = with_client(&server, |c| -> Result<Vec<String>> {
        let all = PageCursor::new(c, Conversation::group("42")).collect_all()?;
        Ok(all.iter().map(|m| m.id().to_string()).collect())
    })
    .await
    .unwrap();
    assert_eq!(ids, ["3", "2", "1"]);
}

#[tokio::test]
async fn test_direct_messages_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/direct_messages"))
        .and(query_param("other_user_id", "77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"count": 1, "direct_messages": [
                {"id": "d1", "sender_id": "77", "name": "Rob", "created_at": 1, "text": "yo"}
            ]}
        })))
        .mount(&server)
        .await;

    let page = with_client(&server, |c| c.fetch_page(&Conversation::direct("77"), None))
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].text(), Some("yo"));
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/groups"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = with_client(&server, |c| c.groups()).await.unwrap_err();
    assert!(err.is_auth(), "unexpected error {err:?}");
}

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/groups/42/messages"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = with_client(&server, |c| c.fetch_page(&Conversation::group("42"), None))
        .await
        .unwrap_err();
    assert!(matches!(err, GmkitError::Status { status: 503, .. }));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_send_posts_each_chunk() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/groups/42/messages"))
        .and(query_param("token", TOKEN))
        .and(body_partial_json(json!({"message": {}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "response": {"message": message("100", "me", "ok")}
        })))
        .expect(3)
        .mount(&server)
        .await;

    let receipts = with_client(&server, |c| {
        let text = "word ".repeat(500);
        send_message(c, &Conversation::group("42"), &text, &SplitConfig::default())
    })
    .await
    .unwrap();
    assert_eq!(receipts.len(), 3);
    assert!(receipts.iter().all(|r| r.message_id == "100"));
}

#[tokio::test]
async fn test_rejected_post_maps_to_message_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/direct_messages"))
        .and(body_partial_json(json!({"direct_message": {"recipient_id": "77"}})))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let err = with_client(&server, |c| {
        send_message(c, &Conversation::direct("77"), "hello", &SplitConfig::default())
    })
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        GmkitError::MessageRejected {
            status: 400,
            chunk: 0
        }
    ));
}

#[tokio::test]
async fn test_unknown_chat_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": []})))
        .mount(&server)
        .await;

    let err = with_client(&server, |c| c.resolve(ConversationKind::Direct, "Nobody"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
