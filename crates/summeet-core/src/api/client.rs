//! HTTP client for the summeet REST API.
//!
//! `ApiClient` owns the shared `reqwest::Client`, the token manager and the
//! auth event channel. Every request is built through [`ApiClient::request`],
//! which attaches the bearer token, and every response goes through
//! [`ApiClient::check_response`], which handles expired sessions.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::auth::{AuthEvent, TokenManager, TokenStore};
use crate::config::Config;

use super::{ApiError, AppApi, AuthApi, TranscriptionApi};

/// Capacity of the auth event channel. Only the fact that a session
/// expired matters, so lagging receivers lose nothing important.
const AUTH_EVENT_CAPACITY: usize = 16;

/// API client for the summeet backend.
/// Clone is cheap - the connection pool, token manager and event channel are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<TokenManager>,
    events: broadcast::Sender<AuthEvent>,
}

impl ApiClient {
    /// Create a client from configuration, persisting credentials in `store`.
    pub fn new(config: &Config, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let base_url = config.resolved_base_url()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let (events, _) = broadcast::channel(AUTH_EVENT_CAPACITY);

        debug!(base_url = %base_url, "API client created");
        Ok(Self {
            client,
            base_url,
            tokens: Arc::new(TokenManager::new(store)),
            events,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Stored credentials shared by every clone of this client
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Subscribe to auth notifications such as [`AuthEvent::Expired`].
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    pub fn transcriptions(&self) -> TranscriptionApi<'_> {
        TranscriptionApi::new(self)
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn app(&self) -> AppApi<'_> {
        AppApi::new(self)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request to `path` under the base URL, with auth attached.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "Sending request");
        self.authorize(self.client.request(method, self.url(path)))
    }

    /// Attach `Authorization: Bearer <token>` when a token is stored.
    /// A missing token is not an error; the request goes out anonymously.
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.tokens.token() {
            Some(token) if !token.is_empty() => builder.bearer_auth(token),
            _ => builder,
        }
    }

    /// Pass successful responses through; turn everything else into an
    /// error. A 401 first clears stored credentials and notifies subscribers.
    pub(crate) async fn check_response(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            self.expire_session();
        } else {
            debug!(status = %status, "Request failed");
        }
        Err(ApiError::from_status(status, &body))
    }

    fn expire_session(&self) {
        warn!("Server rejected the access token, clearing stored credentials");
        self.tokens.clear_auth();
        // Err only means nobody is subscribed
        let _ = self.events.send(AuthEvent::Expired);
    }

    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        self.check_response(response).await
    }

    /// Send and decode the JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        let url = response.url().path().to_string();
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", url, e))
        })
    }
}
