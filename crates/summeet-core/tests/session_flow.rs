//! End-to-end session handling against a mock backend with on-disk credentials.

use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::json;
use summeet_core::{ApiClient, AuthEvent, Config, FileStore, SummarizeOptions};

fn client_with_store(base_url: String, dir: &std::path::Path) -> ApiClient {
    let store = Arc::new(FileStore::new(dir.to_path_buf()));
    ApiClient::new(&Config::for_base_url(base_url), store).unwrap()
}

#[tokio::test]
async fn test_login_survives_restart_until_server_expires_it() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/login");
            then.status(200)
                .json_body(json!({"access_token": "T1", "user_email": "a@b.com"}));
        })
        .await;
    let expired = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/transcription/1")
                .header("authorization", "Bearer T1");
            then.status(401)
                .json_body(json!({"detail": "Token expired"}));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();

    let first = client_with_store(server.base_url(), dir.path());
    first.auth().login("a@b.com", "pw").await.unwrap();
    drop(first);

    // A fresh client over the same directory picks the session up
    let second = client_with_store(server.base_url(), dir.path());
    assert!(second.auth().is_authenticated());
    assert_eq!(second.auth().current_user().as_deref(), Some("a@b.com"));

    let mut events = second.subscribe();
    second.transcriptions().get(1).await.unwrap_err();
    expired.assert_async().await;
    assert_eq!(events.recv().await.unwrap(), AuthEvent::Expired);

    // And the expiry reached the disk as well
    let third = client_with_store(server.base_url(), dir.path());
    assert!(!third.auth().is_authenticated());
    assert_eq!(third.auth().current_user(), None);
}

#[tokio::test]
async fn test_concurrent_401s_each_notify_and_leave_session_cleared() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path_includes("/summarize/");
            then.status(401);
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = client_with_store(server.base_url(), dir.path());
    client.tokens().set_token("T1");
    client.tokens().set_user_email("a@b.com");
    let mut events = client.subscribe();

    let options = SummarizeOptions::default();
    let api = client.transcriptions();
    let (a, b) = tokio::join!(api.summarize(1, &options), api.summarize(2, &options));
    assert!(a.unwrap_err().is_unauthorized());
    assert!(b.unwrap_err().is_unauthorized());
    mock.assert_hits_async(2).await;

    assert!(!client.auth().is_authenticated());
    assert_eq!(events.recv().await.unwrap(), AuthEvent::Expired);
    assert_eq!(events.recv().await.unwrap(), AuthEvent::Expired);
}

#[tokio::test]
async fn test_logout_sends_nothing() {
    let server = MockServer::start_async().await;
    let any = server
        .mock_async(|_when, then| {
            then.status(500);
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = client_with_store(server.base_url(), dir.path());
    client.tokens().set_token("T1");

    client.auth().logout();
    assert!(!client.auth().is_authenticated());
    any.assert_hits_async(0).await;
}
