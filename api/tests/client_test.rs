//! Integration tests for the REST client against a mock backend
//!
//! Covers credential attachment, the global 401 teardown and redirect, and
//! error passthrough.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use cadence_api::{
    ApiClient, ApiConfig, ApiError, MemoryTokenStorage, MusicQuery, Redirect, TaskDraft,
    TokenStorage, UnauthorizedHook, Upload,
};
use futures::future::BoxFuture;
use futures::StreamExt;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

// ============================================================================
// Test Fixtures
// ============================================================================

fn client_for(server: &MockServer, storage: Arc<MemoryTokenStorage>) -> ApiClient {
    ApiClient::new(ApiConfig::new(server.uri()), storage).unwrap()
}

fn no_authorization_header(request: &Request) -> bool {
    !request.headers.contains_key("authorization")
}

/// Hook that tears down by clearing storage and counts its invocations.
struct CountingHook {
    storage: Arc<MemoryTokenStorage>,
    calls: AtomicUsize,
}

impl UnauthorizedHook for CountingHook {
    fn on_unauthorized(&self) -> BoxFuture<'_, bool> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.storage.clear().unwrap_or(false)
        })
    }
}

// ============================================================================
// Credential attachment
// ============================================================================

#[tokio::test]
async fn test_stored_token_is_attached_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/7"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task": {"id": 7, "title": "X"}})))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryTokenStorage::with_tokens("access-1", Some("refresh-1")));
    let client = client_for(&server, storage);

    let task = client.tasks().get(7).await.unwrap();
    assert_eq!(task.id, 7);
    assert_eq!(task.title, "X");
}

#[tokio::test]
async fn test_header_omitted_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/priorities"))
        .and(no_authorization_header)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "priorities": [{"value": "low", "label": "Baixa", "color": "#4caf50"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStorage::new()));
    let priorities = client.tasks().priorities().await.unwrap();
    assert_eq!(priorities.len(), 1);
}

#[tokio::test]
async fn test_token_is_read_at_call_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {"id": 1, "username": "ada"}})))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryTokenStorage::with_tokens("stale", None));
    let client = client_for(&server, storage.clone());
    storage.save("fresh", None).unwrap();

    let profile = client.auth().me().await.unwrap();
    assert_eq!(profile.username, "ada");
}

#[tokio::test]
async fn test_refresh_sends_refresh_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(header("authorization", "Bearer refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-2",
            "user": {"id": 1, "username": "ada"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryTokenStorage::with_tokens("access-1", Some("refresh-1")));
    let client = client_for(&server, storage);

    let grant = client.auth().refresh("refresh-1").await.unwrap();
    assert_eq!(grant.access_token, "access-2");
    assert_eq!(grant.refresh_token, None);
}

#[tokio::test]
async fn test_query_parameters_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/music"))
        .and(query_param("search", "queen"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "music": [{"id": 3, "title": "Bohemian Rhapsody", "artist": "Queen"}],
            "total": 21, "pages": 2, "current_page": 2, "per_page": 20,
            "has_next": false, "has_prev": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStorage::new()));
    let page = client
        .music()
        .list(&MusicQuery {
            page: Some(2),
            search: Some("queen".into()),
            ..MusicQuery::default()
        })
        .await
        .unwrap();

    assert_eq!(page.items[0].artist, "Queen");
    assert_eq!(page.total, 21);
    assert!(page.has_prev);
}

// ============================================================================
// 401 handling
// ============================================================================

#[tokio::test]
async fn test_unauthorized_clears_tokens_and_redirects_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/music"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "Token has expired"})))
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryTokenStorage::with_tokens("stale", Some("refresh-1")));
    let client = client_for(&server, storage.clone());
    let hook = Arc::new(CountingHook {
        storage: storage.clone(),
        calls: AtomicUsize::new(0),
    });
    assert!(client.install_unauthorized_hook(hook.clone()));
    let mut redirects = client.subscribe_redirects();

    let query = MusicQuery::default();
    let (music_a, music_b) = (client.music(), client.music());
    let (first, second) = tokio::join!(music_a.list(&query), music_b.list(&query));

    assert_eq!(
        first.unwrap_err(),
        ApiError::Unauthorized {
            message: Some("Token has expired".into())
        }
    );
    assert!(second.unwrap_err().is_unauthorized());
    assert_eq!(storage.access_token(), None);
    assert_eq!(storage.refresh_token(), None);
    assert_eq!(hook.calls.load(Ordering::SeqCst), 2);

    assert_eq!(
        redirects.recv().await.unwrap(),
        Redirect {
            to: "/login".into()
        }
    );
    let extra = tokio::time::timeout(Duration::from_millis(100), redirects.recv()).await;
    assert!(extra.is_err(), "second 401 must not redirect again");
}

#[tokio::test]
async fn test_unauthorized_without_hook_clears_storage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryTokenStorage::with_tokens("stale", None));
    let client = client_for(&server, storage.clone());
    let mut redirects = client.subscribe_redirects();

    let result = client.tasks().list(&Default::default()).await;

    assert!(result.unwrap_err().is_unauthorized());
    assert_eq!(storage.access_token(), None);
    assert_eq!(redirects.recv().await.unwrap().to, "/login");
}

#[tokio::test]
async fn test_unauthorized_without_session_does_not_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Credenciais inválidas"})))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStorage::new()));
    let mut redirects = client.subscribe_redirects();

    let error = client
        .auth()
        .login(&cadence_api::Credentials::new("ada", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(error.server_message(), Some("Credenciais inválidas"));
    assert!(matches!(
        redirects.try_recv(),
        Err(tokio::sync::broadcast::error::TryRecvError::Empty)
    ));
}

// ============================================================================
// Error passthrough
// ============================================================================

#[tokio::test]
async fn test_error_envelope_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_json(json!({"title": "X"})))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Lista de tarefas é obrigatória"})),
        )
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryTokenStorage::with_tokens("access-1", None));
    let client = client_for(&server, storage.clone());

    let error = client
        .tasks()
        .create(&TaskDraft::titled("X"))
        .await
        .unwrap_err();

    assert_eq!(
        error,
        ApiError::Rejected {
            status: 400,
            message: Some("Lista de tarefas é obrigatória".into())
        }
    );
    assert_eq!(storage.access_token().as_deref(), Some("access-1"));
}

#[tokio::test]
async fn test_server_error_and_bad_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/dashboard"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "Erro interno do servidor"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/task-lists/1/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStorage::new()));

    let error = client.tasks().dashboard().await.unwrap_err();
    assert!(matches!(error, ApiError::Server { status: 500, .. }));

    let error = client.task_lists().stats(1).await.unwrap_err();
    assert!(matches!(error, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_timeout_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"tasks": [], "total": 0}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(
        ApiConfig::new(server.uri()).with_timeout(Duration::from_millis(50)),
        Arc::new(MemoryTokenStorage::new()),
    )
    .unwrap();

    let error = client.tasks().list(&Default::default()).await.unwrap_err();
    assert_eq!(error, ApiError::Timeout);
}

// ============================================================================
// Binary transfers
// ============================================================================

#[tokio::test]
async fn test_upload_is_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/music/upload"))
        .and(header_exists("content-type"))
        .and(|request: &Request| {
            let body = String::from_utf8_lossy(&request.body);
            body.contains("name=\"file\"") && body.contains("name=\"title\"") && body.contains("Demo")
        })
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Música enviada com sucesso",
            "music": {"id": 11, "title": "Demo", "artist": "Me", "is_local": true}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStorage::with_tokens("access-1", None)));
    let mut upload = Upload::new("demo.mp3", b"ID3fake".to_vec());
    upload.title = Some("Demo".into());

    let track = client.music().upload(upload).await.unwrap();
    assert_eq!(track.id, 11);
    assert!(track.is_local);
}

#[tokio::test]
async fn test_stream_yields_audio_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/music/4/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1_u8, 2, 3, 4]))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStorage::new()));
    let mut stream = client.music().stream(4).await.unwrap();

    let mut received = Vec::new();
    while let Some(chunk) = stream.next().await {
        received.extend(chunk.unwrap());
    }
    assert_eq!(received, vec![1, 2, 3, 4]);
}
