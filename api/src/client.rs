//! Authenticated REST client

use crate::{
    config::ApiConfig,
    error::ApiError,
    storage::TokenStorage,
    Result,
};
use futures::future::BoxFuture;
use reqwest::{Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::sync::{Arc, OnceLock};
use tokio::sync::broadcast;

/// Reacts to a 401 response before the client returns it.
///
/// The session layer installs one: it tears the session down (storage and
/// in-memory state) and reports whether there was anything to tear down.
/// The client publishes a login redirect only when it returns `true`, so
/// concurrent 401s of one stale session redirect exactly once.
pub trait UnauthorizedHook: Send + Sync {
    /// Invalidate the current session. Returns whether one was live.
    fn on_unauthorized(&self) -> BoxFuture<'_, bool>;
}

/// Navigation requested by the client outside the result channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Target route
    pub to: String,
}

/// Request body.
pub enum Body {
    /// No body
    Empty,
    /// JSON document
    Json(serde_json::Value),
    /// `multipart/form-data` (file uploads)
    Multipart(reqwest::multipart::Form),
}

impl Body {
    /// Serialize `value` as a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if `value` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Body::Empty"),
            Self::Json(_) => write!(f, "Body::Json(..)"),
            Self::Multipart(_) => write!(f, "Body::Multipart(..)"),
        }
    }
}

/// Which credential a request carries.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credential {
    /// The bearer token in token storage, read at call time. No header if
    /// storage holds none.
    #[default]
    Stored,
    /// An explicit bearer token (the refresh call sends the refresh token).
    Bearer(String),
    /// Never send an `Authorization` header.
    Anonymous,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stored => write!(f, "Stored"),
            Self::Bearer(_) => write!(f, "Bearer(<redacted>)"),
            Self::Anonymous => write!(f, "Anonymous"),
        }
    }
}

/// Per-request options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query string parameters, in order
    pub query: Vec<(String, String)>,
    /// Credential to attach
    pub credential: Credential,
}

impl RequestOptions {
    /// Default options: stored credential, no query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a query parameter when `value` is present.
    #[must_use]
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Send `token` instead of the stored credential.
    #[must_use]
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.credential = Credential::Bearer(token.into());
        self
    }
}

/// Client of the Cadence REST backend.
///
/// Cheap to clone; clones share the HTTP connection pool, token storage,
/// unauthorized hook and redirect channel.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: Arc<ApiConfig>,
    storage: Arc<dyn TokenStorage>,
    unauthorized_hook: Arc<OnceLock<Arc<dyn UnauthorizedHook>>>,
    redirects: broadcast::Sender<Redirect>,
}

impl ApiClient {
    /// Create a client for `config` reading credentials from `storage`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built
    /// (e.g. no TLS backend).
    pub fn new(config: ApiConfig, storage: Arc<dyn TokenStorage>) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let (redirects, _) = broadcast::channel(8);

        Ok(Self {
            http,
            config: Arc::new(config),
            storage,
            unauthorized_hook: Arc::new(OnceLock::new()),
            redirects,
        })
    }

    /// Create a client configured from the environment (see [`ApiConfig::from_env`]).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn from_env(storage: Arc<dyn TokenStorage>) -> Result<Self> {
        Self::new(ApiConfig::from_env(), storage)
    }

    /// The client configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// The token storage requests read their credential from.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn TokenStorage> {
        &self.storage
    }

    /// Install the 401 hook. Only the first installation wins.
    ///
    /// Returns `false` if a hook was already installed.
    pub fn install_unauthorized_hook(&self, hook: Arc<dyn UnauthorizedHook>) -> bool {
        self.unauthorized_hook.set(hook).is_ok()
    }

    /// Subscribe to redirects published after a 401 tore the session down.
    #[must_use]
    pub fn subscribe_redirects(&self) -> broadcast::Receiver<Redirect> {
        self.redirects.subscribe()
    }

    /// Send a request and return the raw successful response.
    ///
    /// The bearer credential is resolved at call time (see [`Credential`]).
    /// A 401 first runs the session teardown and may publish a redirect;
    /// every non-success status is then returned as an [`ApiError`].
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] / [`ApiError::Timeout`] if no response arrived
    /// - [`ApiError::Unauthorized`], [`ApiError::Rejected`], [`ApiError::Server`]
    ///   for non-success statuses, carrying the envelope's `error` message
    #[tracing::instrument(skip(self, body, options), fields(method = %method, path = %path))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Body,
        options: RequestOptions,
    ) -> Result<Response> {
        let mut builder = self.http.request(method, self.config.url(path));

        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }

        let token = match options.credential {
            Credential::Stored => self.storage.access_token(),
            Credential::Bearer(token) => Some(token),
            Credential::Anonymous => None,
        };
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        builder = match body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Multipart(form) => builder.multipart(form),
        };

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Request failed before a response arrived");
            ApiError::from(e)
        })?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Response received");

        if status.is_success() {
            return Ok(response);
        }

        let message = error_message(response).await;

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized().await;
        }

        Err(ApiError::from_status(status.as_u16(), message))
    }

    /// Send a request and decode the JSON response envelope.
    ///
    /// # Errors
    ///
    /// Everything [`ApiClient::request`] returns, plus [`ApiError::Decode`]
    /// if the body does not match `T`.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Body,
        options: RequestOptions,
    ) -> Result<T> {
        let response = self.request(method, path, body, options).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// `GET` a JSON envelope.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send_json`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<T> {
        self.send_json(Method::GET, path, Body::Empty, options).await
    }

    /// `POST` a JSON body and decode the envelope.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send_json`].
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, Body::json(body)?, RequestOptions::new())
            .await
    }

    /// `PUT` a JSON body and decode the envelope.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send_json`].
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PUT, path, Body::json(body)?, RequestOptions::new())
            .await
    }

    /// `PATCH` without a body and decode the envelope.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send_json`].
    pub async fn patch<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send_json(Method::PATCH, path, Body::Empty, RequestOptions::new())
            .await
    }

    /// `DELETE` and decode the envelope.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send_json`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send_json(Method::DELETE, path, Body::Empty, RequestOptions::new())
            .await
    }

    async fn handle_unauthorized(&self) {
        let torn_down = if let Some(hook) = self.unauthorized_hook.get() {
            hook.on_unauthorized().await
        } else {
            // No session layer attached: drop the stale tokens directly.
            self.storage.clear().unwrap_or_else(|error| {
                tracing::error!(%error, "Failed to clear token storage after 401");
                false
            })
        };

        if torn_down {
            tracing::warn!(to = %self.config.login_path, "Session rejected by server, redirecting");
            let _ = self.redirects.send(Redirect {
                to: self.config.login_path.clone(),
            });
        }
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .field("has_unauthorized_hook", &self.unauthorized_hook.get().is_some())
            .finish_non_exhaustive()
    }
}

/// Extract the human-readable message of an error response.
///
/// Looks at the envelope's `error` field first, then `message` and `msg`
/// (the JWT layer's key). A non-JSON body is used verbatim.
async fn error_message(response: Response) -> Option<String> {
    let bytes = response.bytes().await.ok()?;

    if let Ok(envelope) = serde_json::from_slice::<serde_json::Value>(&bytes) {
        return ["error", "message", "msg"]
            .iter()
            .find_map(|key| envelope.get(key).and_then(serde_json::Value::as_str))
            .map(str::to_string);
    }

    let text = String::from_utf8_lossy(&bytes).trim().to_string();
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryTokenStorage;

    #[test]
    fn test_client_creation() {
        let client = ApiClient::new(
            ApiConfig::new("http://example.test/api"),
            Arc::new(MemoryTokenStorage::new()),
        )
        .unwrap();
        assert_eq!(client.config().base_url, "http://example.test/api");
    }

    #[test]
    fn test_hook_installs_once() {
        struct Noop;
        impl UnauthorizedHook for Noop {
            fn on_unauthorized(&self) -> BoxFuture<'_, bool> {
                Box::pin(async { false })
            }
        }

        let client =
            ApiClient::new(ApiConfig::default(), Arc::new(MemoryTokenStorage::new())).unwrap();
        assert!(client.install_unauthorized_hook(Arc::new(Noop)));
        assert!(!client.install_unauthorized_hook(Arc::new(Noop)));
    }

    #[test]
    fn test_request_options_builders() {
        let options = RequestOptions::new()
            .query("page", 2)
            .query_opt("search", Some("rock"))
            .query_opt::<&str>("genre", None)
            .bearer("refresh-1");

        assert_eq!(
            options.query,
            vec![
                ("page".to_string(), "2".to_string()),
                ("search".to_string(), "rock".to_string()),
            ]
        );
        assert_eq!(options.credential, Credential::Bearer("refresh-1".into()));
        assert!(!format!("{options:?}").contains("refresh-1"));
    }
}
