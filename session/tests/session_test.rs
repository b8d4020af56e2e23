//! Integration tests for the session store against a mock backend

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use cadence_api::{
    ApiClient, ApiConfig, Credentials, MemoryTokenStorage, MusicQuery, ProfileUpdate, Redirect,
    Registration, TokenStorage,
};
use cadence_session::{Notice, Phase, SessionConfig, SessionError, SessionStore};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Test Fixtures
// ============================================================================

fn session_for(server: &MockServer, storage: Arc<MemoryTokenStorage>) -> SessionStore {
    let api = ApiClient::new(ApiConfig::new(server.uri()), storage).unwrap();
    SessionStore::new(api, SessionConfig::default())
}

fn stored(access: &str, refresh: Option<&str>) -> Arc<MemoryTokenStorage> {
    let storage = Arc::new(MemoryTokenStorage::new());
    storage.save(access, refresh).unwrap();
    storage
}

fn ada() -> serde_json::Value {
    json!({
        "id": 1,
        "username": "ada",
        "email": "ada@example.com",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "is_admin": false,
        "is_active": true
    })
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"login": "ada", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Login realizado com sucesso",
            "user": ada(),
            "access_token": "access-1",
            "refresh_token": "refresh-1"
        })))
        .mount(server)
        .await;
}

// ============================================================================
// Login / registration
// ============================================================================

#[tokio::test]
async fn test_login_persists_tokens() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let storage = Arc::new(MemoryTokenStorage::new());
    let session = session_for(&server, Arc::clone(&storage));

    let user = session.login(Credentials::new("ada", "secret")).await.unwrap();

    assert_eq!(user.username, "ada");
    assert!(session.is_authenticated().await);
    assert_eq!(session.phase().await, Phase::Authenticated);
    assert_eq!(session.full_name().await, "Ada Lovelace");
    assert_eq!(session.notice().await, Some(Notice::Welcome { name: "Ada".into() }));
    assert!(!session.is_loading().await);
    assert_eq!(storage.access_token().as_deref(), Some("access-1"));
    assert_eq!(storage.refresh_token().as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn test_login_without_refresh_token_forgets_the_previous_one() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": ada(),
            "access_token": "access-2"
        })))
        .mount(&server)
        .await;
    let storage = stored("access-1", Some("refresh-1"));
    let session = session_for(&server, Arc::clone(&storage));

    session.login(Credentials::new("ada", "secret")).await.unwrap();

    assert_eq!(storage.access_token().as_deref(), Some("access-2"));
    assert_eq!(storage.refresh_token(), None);
    assert_eq!(
        session.refresh_access_token().await.unwrap_err(),
        SessionError::MissingRefreshToken
    );
}

#[tokio::test]
async fn test_login_failure_leaves_session_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Credenciais inválidas"})),
        )
        .mount(&server)
        .await;
    let storage = Arc::new(MemoryTokenStorage::new());
    let session = session_for(&server, Arc::clone(&storage));
    let mut redirects = session.api().subscribe_redirects();

    let error = session
        .login(Credentials::new("ada", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(error, SessionError::Api(_)));
    assert_eq!(session.phase().await, Phase::Anonymous);
    assert!(!session.is_authenticated().await);
    assert_eq!(session.last_error().await.as_deref(), Some("Credenciais inválidas"));
    assert!(!session.is_loading().await);
    assert!(storage.access_token().is_none());
    // Nothing was live, so nothing to redirect away from
    assert!(redirects.try_recv().is_err());
}

#[tokio::test]
async fn test_register_surfaces_account_created() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Usuário criado com sucesso",
            "user": ada(),
            "access_token": "access-1",
            "refresh_token": "refresh-1"
        })))
        .mount(&server)
        .await;
    let session = session_for(&server, Arc::new(MemoryTokenStorage::new()));

    session
        .register(Registration {
            username: "ada".into(),
            email: "ada@example.com".into(),
            password: "secret".into(),
            ..Registration::default()
        })
        .await
        .unwrap();

    assert!(session.is_authenticated().await);
    assert_eq!(
        session.notice().await,
        Some(Notice::AccountCreated { name: "Ada".into() })
    );

    session.dismiss_notice().await.unwrap();
    assert_eq!(session.notice().await, None);
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_clears_everything() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Logout"})))
        .expect(1)
        .mount(&server)
        .await;
    let storage = Arc::new(MemoryTokenStorage::new());
    let session = session_for(&server, Arc::clone(&storage));
    session.login(Credentials::new("ada", "secret")).await.unwrap();

    session.logout().await.unwrap();

    assert_eq!(session.phase().await, Phase::Anonymous);
    assert!(!session.is_authenticated().await);
    assert_eq!(session.notice().await, Some(Notice::LoggedOut));
    assert!(storage.access_token().is_none());
    assert!(storage.refresh_token().is_none());
}

#[tokio::test]
async fn test_logout_succeeds_when_remote_fails() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "down"})))
        .mount(&server)
        .await;
    let storage = Arc::new(MemoryTokenStorage::new());
    let session = session_for(&server, Arc::clone(&storage));
    session.login(Credentials::new("ada", "secret")).await.unwrap();

    session.logout().await.unwrap();

    assert_eq!(session.phase().await, Phase::Anonymous);
    assert!(session.last_error().await.is_none());
    assert!(storage.access_token().is_none());
    assert!(storage.refresh_token().is_none());
}

#[tokio::test]
async fn test_anonymous_logout_skips_remote_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let session = session_for(&server, Arc::new(MemoryTokenStorage::new()));

    session.logout().await.unwrap();

    assert_eq!(session.phase().await, Phase::Anonymous);
}

// ============================================================================
// Global 401 teardown
// ============================================================================

#[tokio::test]
async fn test_unauthorized_elsewhere_tears_session_down() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/music"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "Token has expired"})))
        .mount(&server)
        .await;
    let storage = Arc::new(MemoryTokenStorage::new());
    let session = session_for(&server, Arc::clone(&storage));
    let mut redirects = session.api().subscribe_redirects();
    session.login(Credentials::new("ada", "secret")).await.unwrap();

    let api = session.api().clone();
    let query = MusicQuery::default();
    let (music_a, music_b) = (api.music(), api.music());
    let (first, second) = tokio::join!(music_a.list(&query), music_b.list(&query));

    assert!(first.is_err());
    assert!(second.is_err());
    assert!(storage.access_token().is_none());
    assert!(!session.is_authenticated().await);
    assert_eq!(session.phase().await, Phase::Anonymous);
    assert_eq!(
        redirects.recv().await.unwrap(),
        Redirect {
            to: "/login".into()
        }
    );
    assert!(
        tokio::time::timeout(Duration::from_millis(100), redirects.recv())
            .await
            .is_err()
    );
}

// ============================================================================
// Profile and refresh
// ============================================================================

#[tokio::test]
async fn test_initialize_verifies_stored_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer stored"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": ada()})))
        .expect(1)
        .mount(&server)
        .await;
    let session = session_for(&server, stored("stored", Some("refresh-1")));

    assert!(session.needs_profile().await);
    session.initialize().await.unwrap();

    assert!(session.is_authenticated().await);
    assert_eq!(session.user().await.unwrap().username, "ada");
}

#[tokio::test]
async fn test_initialize_falls_back_to_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Usuário não encontrado"})))
        .mount(&server)
        .await;
    let storage = stored("stored", Some("refresh-1"));
    let session = session_for(&server, Arc::clone(&storage));

    session.initialize().await.unwrap();

    assert_eq!(session.phase().await, Phase::Anonymous);
    assert!(storage.access_token().is_none());
}

#[tokio::test]
async fn test_concurrent_profile_checks_fetch_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"user": ada()}))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let session = session_for(&server, stored("stored", None));

    let (a, b, c) = tokio::join!(
        session.ensure_profile(),
        session.ensure_profile(),
        session.ensure_profile(),
    );

    for profile in [a, b, c] {
        assert_eq!(profile.unwrap().unwrap().username, "ada");
    }
}

#[tokio::test]
async fn test_get_current_user_without_token() {
    let server = MockServer::start().await;
    let session = session_for(&server, Arc::new(MemoryTokenStorage::new()));

    let error = session.get_current_user().await.unwrap_err();

    assert_eq!(error, SessionError::MissingToken);
    assert!(!session.is_loading().await);
}

#[tokio::test]
async fn test_refresh_replaces_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(header("authorization", "Bearer refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-2",
            "user": ada()
        })))
        .mount(&server)
        .await;
    let storage = stored("access-1", Some("refresh-1"));
    let session = session_for(&server, Arc::clone(&storage));

    session.refresh_access_token().await.unwrap();

    assert!(session.is_authenticated().await);
    assert_eq!(storage.access_token().as_deref(), Some("access-2"));
    assert_eq!(storage.refresh_token().as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn test_refresh_failure_lands_in_refresh_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"msg": "Signature verification failed"})))
        .mount(&server)
        .await;
    let storage = stored("access-1", Some("refresh-1"));
    let session = session_for(&server, Arc::clone(&storage));

    let error = session.refresh_access_token().await.unwrap_err();

    assert!(matches!(error, SessionError::Api(_)));
    assert_eq!(session.phase().await, Phase::RefreshFailed);
    assert!(!session.is_authenticated().await);
    assert!(storage.access_token().is_none());
    assert!(storage.refresh_token().is_none());
}

#[tokio::test]
async fn test_refresh_without_refresh_token() {
    let server = MockServer::start().await;
    let storage = stored("access-1", None);
    let session = session_for(&server, Arc::clone(&storage));

    let error = session.refresh_access_token().await.unwrap_err();

    assert_eq!(error, SessionError::MissingRefreshToken);
    assert_eq!(session.phase().await, Phase::RefreshFailed);
    assert!(storage.access_token().is_none());
}

// ============================================================================
// Password and profile changes
// ============================================================================

#[tokio::test]
async fn test_wrong_current_password_keeps_session() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/auth/change-password"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Senha atual incorreta"})),
        )
        .mount(&server)
        .await;
    let session = session_for(&server, Arc::new(MemoryTokenStorage::new()));
    session.login(Credentials::new("ada", "secret")).await.unwrap();

    let error = session.change_password("nope", "new-secret").await.unwrap_err();

    assert!(matches!(error, SessionError::Api(_)));
    assert!(session.is_authenticated().await);
    assert_eq!(session.last_error().await.as_deref(), Some("Senha atual incorreta"));

    session.clear_error().await.unwrap();
    assert!(session.last_error().await.is_none());
}

#[tokio::test]
async fn test_update_profile_replaces_user() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let mut updated = ada();
    updated["first_name"] = json!("Augusta");
    Mock::given(method("PUT"))
        .and(path("/users/1"))
        .and(body_json(json!({"first_name": "Augusta"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": updated})))
        .mount(&server)
        .await;
    let session = session_for(&server, Arc::new(MemoryTokenStorage::new()));
    session.login(Credentials::new("ada", "secret")).await.unwrap();

    let user = session
        .update_profile(ProfileUpdate {
            first_name: Some("Augusta".into()),
            ..ProfileUpdate::default()
        })
        .await
        .unwrap();

    assert_eq!(user.first_name, "Augusta");
    assert_eq!(session.full_name().await, "Augusta Lovelace");
    assert_eq!(session.notice().await, Some(Notice::ProfileUpdated));
}

#[tokio::test]
async fn test_update_profile_requires_profile() {
    let server = MockServer::start().await;
    let session = session_for(&server, Arc::new(MemoryTokenStorage::new()));

    let error = session
        .update_profile(ProfileUpdate::default())
        .await
        .unwrap_err();

    assert_eq!(error, SessionError::MissingProfile);
}
