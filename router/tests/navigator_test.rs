//! Navigation against a real session and a mock backend

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use cadence_api::{ApiClient, ApiConfig, Credentials, MemoryTokenStorage, MusicQuery, TokenStorage};
use cadence_router::{GuardConfig, Location, Navigation, Navigator};
use cadence_session::{SessionConfig, SessionStore};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Test Fixtures
// ============================================================================

fn session_for(server: &MockServer, storage: Arc<MemoryTokenStorage>) -> SessionStore {
    let api = ApiClient::new(ApiConfig::new(server.uri()), storage).unwrap();
    SessionStore::new(api, SessionConfig::default())
}

fn navigator_for(session: &SessionStore) -> Navigator<SessionStore> {
    Navigator::new(session.clone(), GuardConfig::default())
}

fn user(is_admin: bool) -> serde_json::Value {
    json!({
        "id": 1,
        "username": "ada",
        "email": "ada@example.com",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "is_admin": is_admin,
        "is_active": true
    })
}

async fn mount_login(server: &MockServer, is_admin: bool) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Login realizado com sucesso",
            "user": user(is_admin),
            "access_token": "access-1",
            "refresh_token": "refresh-1"
        })))
        .mount(server)
        .await;
}

async fn signed_in(server: &MockServer, is_admin: bool) -> SessionStore {
    mount_login(server, is_admin).await;
    let session = session_for(server, Arc::new(MemoryTokenStorage::new()));
    session.login(Credentials::new("ada", "secret")).await.unwrap();
    session
}

fn committed(navigation: Navigation) -> Location {
    match navigation {
        Navigation::Committed(location) => location,
        Navigation::Superseded => panic!("navigation was superseded"),
    }
}

// ============================================================================
// Guard rules
// ============================================================================

#[tokio::test]
async fn test_anonymous_dashboard_goes_to_login_and_back() {
    let server = MockServer::start().await;
    mount_login(&server, false).await;
    let session = session_for(&server, Arc::new(MemoryTokenStorage::new()));
    let navigator = navigator_for(&session);

    let location = committed(navigator.navigate("/dashboard").await.unwrap());
    assert_eq!(location.full_path(), "/login?redirect=/dashboard");

    session.login(Credentials::new("ada", "secret")).await.unwrap();
    let target = navigator.redirect_target();
    let location = committed(navigator.navigate(&target).await.unwrap());

    assert_eq!(location.route, "Dashboard");
}

#[tokio::test]
async fn test_signed_in_session_skips_login() {
    let server = MockServer::start().await;
    let session = signed_in(&server, false).await;
    let navigator = navigator_for(&session);

    let location = committed(navigator.navigate("/login").await.unwrap());

    assert_eq!(location.path, "/");
    assert_eq!(location.route, "Home");
}

#[tokio::test]
async fn test_users_page_is_for_admins() {
    let server = MockServer::start().await;
    let session = signed_in(&server, false).await;
    let navigator = navigator_for(&session);

    assert_eq!(committed(navigator.navigate("/users").await.unwrap()).path, "/");

    let server = MockServer::start().await;
    let admin = signed_in(&server, true).await;
    let navigator = navigator_for(&admin);

    assert_eq!(committed(navigator.navigate("/users").await.unwrap()).route, "Users");
}

#[tokio::test]
async fn test_stored_token_fetches_profile_before_deciding() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer stored"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": user(false)})))
        .expect(1)
        .mount(&server)
        .await;
    let session = session_for(
        &server,
        Arc::new(MemoryTokenStorage::with_tokens("stored", None)),
    );
    let navigator = navigator_for(&session);

    let location = committed(navigator.navigate("/playlists/3").await.unwrap());

    assert_eq!(location.route, "PlaylistDetail");
    assert_eq!(location.param("id"), Some("3"));
    assert!(session.is_authenticated().await);
}

#[tokio::test]
async fn test_rejected_stored_token_continues_as_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "Token has expired"})))
        .mount(&server)
        .await;
    let storage = Arc::new(MemoryTokenStorage::with_tokens("stale", Some("refresh-1")));
    let session = session_for(&server, Arc::clone(&storage));
    let navigator = navigator_for(&session);

    let location = committed(navigator.navigate("/tasks").await.unwrap());

    assert_eq!(location.full_path(), "/login?redirect=/tasks");
    assert!(!session.is_authenticated().await);
    assert!(storage.access_token().is_none());
}

// ============================================================================
// Client redirects
// ============================================================================

#[tokio::test]
async fn test_unauthorized_response_navigates_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/music"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "Token has expired"})))
        .mount(&server)
        .await;
    let session = signed_in(&server, false).await;
    let navigator = navigator_for(&session);
    let listener = navigator.follow_redirects(session.api().subscribe_redirects());
    let mut locations = navigator.subscribe();

    committed(navigator.navigate("/music").await.unwrap());
    let _ = locations.borrow_and_update();

    assert!(session.api().music().list(&MusicQuery::default()).await.is_err());

    tokio::time::timeout(Duration::from_secs(1), locations.changed())
        .await
        .expect("no navigation after 401")
        .unwrap();
    assert_eq!(navigator.current().unwrap().route, "Login");
    assert!(!session.is_authenticated().await);

    listener.abort();
}
