//! Stateless HTTP request builder and response parser for the Darshana API.
//!
//! # Design
//! `ApiClient` holds an immutable `ClientConfig` and an optional bearer
//! token. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`. The
//! caller executes the round-trip, keeping this crate free of I/O.
//!
//! Every path goes through `resolve`, so callers may write `/api/auth/login`
//! or `api/auth/login` and get the same URL.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::resolve::resolve;
use crate::types::{
    AdminStats, ChatReply, ChatRequest, ContentStatusUpdate, Envelope, LoginRequest, Monument,
    RegisterRequest, Session, Story, StoryQuery, StoryType, StoryUpdate, User, encode_query,
    encode_segment,
};

/// Synchronous, stateless client for the Darshana backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ClientConfig,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config, token: None }
    }

    /// A copy of this client that sends `authorization: Bearer <token>`.
    pub fn with_token(&self, token: &str) -> Self {
        Self {
            config: self.config.clone(),
            token: Some(token.to_string()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The URL a request for `path` would be sent to.
    pub fn resolve(&self, path: &str) -> String {
        resolve(self.config.base_url(), path)
    }

    /// Build a request for an arbitrary route with an optional JSON body.
    pub fn build_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> Result<HttpRequest, ApiError> {
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.request(method, path, body))
    }

    fn request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        let url = self.resolve(path);
        debug!(%method, path, %url, "resolved request url");

        let mut headers: Vec<(String, String)> = self
            .config
            .default_headers()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(token) = &self.token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }

        HttpRequest {
            method,
            url,
            headers,
            body,
            timeout: self.config.timeout(),
        }
    }

    fn get(&self, path: &str) -> HttpRequest {
        self.request(HttpMethod::Get, path, None)
    }

    // --- auth ---

    pub fn build_login(&self, email: &str, password: &str) -> Result<HttpRequest, ApiError> {
        let input = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.build_request(HttpMethod::Post, "/api/auth/login", Some(&input))
    }

    pub fn build_register(&self, input: &RegisterRequest) -> Result<HttpRequest, ApiError> {
        self.build_request(HttpMethod::Post, "/api/auth/register", Some(input))
    }

    pub fn build_me(&self) -> HttpRequest {
        self.get("/api/auth/me")
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<Session, ApiError> {
        parse_session(response)
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<Session, ApiError> {
        parse_session(response)
    }

    pub fn parse_me(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_envelope(response)
    }

    // --- stories ---

    pub fn build_list_stories(&self, query: &StoryQuery) -> HttpRequest {
        self.get(&format!("/api/stories{}", query.to_query_string()))
    }

    /// Full-text search; the backend answers at most 20 stories.
    pub fn build_search_stories(&self, q: &str, story_type: Option<StoryType>) -> HttpRequest {
        let mut pairs: Vec<(&str, String)> = vec![("q", q.to_string())];
        if let Some(story_type) = story_type {
            pairs.push(("type", story_type.as_str().to_string()));
        }
        self.get(&format!("/api/stories/search{}", encode_query(&pairs)))
    }

    pub fn build_get_story(&self, id: &str) -> HttpRequest {
        self.get(&format!("/api/stories/{}", encode_segment(id)))
    }

    pub fn build_update_story(&self, id: &str, input: &StoryUpdate) -> Result<HttpRequest, ApiError> {
        let path = format!("/api/stories/{}", encode_segment(id));
        self.build_request(HttpMethod::Put, &path, Some(input))
    }

    pub fn build_delete_story(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/api/stories/{}", encode_segment(id)), None)
    }

    pub fn parse_list_stories(&self, response: HttpResponse) -> Result<Vec<Story>, ApiError> {
        parse_envelope(response)
    }

    pub fn parse_search_stories(&self, response: HttpResponse) -> Result<Vec<Story>, ApiError> {
        parse_envelope(response)
    }

    pub fn parse_get_story(&self, response: HttpResponse) -> Result<Story, ApiError> {
        parse_envelope(response)
    }

    pub fn parse_update_story(&self, response: HttpResponse) -> Result<Story, ApiError> {
        parse_envelope(response)
    }

    pub fn parse_delete_story(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_ack(response)
    }

    // --- monuments ---

    pub fn build_list_monuments(&self, limit: Option<u32>) -> HttpRequest {
        let pairs: Vec<(&str, String)> = limit.map(|l| ("limit", l.to_string())).into_iter().collect();
        self.get(&format!("/api/monuments{}", encode_query(&pairs)))
    }

    pub fn build_get_monument(&self, id: &str) -> HttpRequest {
        self.get(&format!("/api/monuments/{}", encode_segment(id)))
    }

    pub fn parse_list_monuments(&self, response: HttpResponse) -> Result<Vec<Monument>, ApiError> {
        parse_envelope(response)
    }

    pub fn parse_get_monument(&self, response: HttpResponse) -> Result<Monument, ApiError> {
        parse_envelope(response)
    }

    // --- admin ---

    pub fn build_admin_stats(&self) -> HttpRequest {
        self.get("/api/admin/stats")
    }

    pub fn build_update_content_status(
        &self,
        id: &str,
        input: &ContentStatusUpdate,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Put,
            &format!("/api/admin/content/{}/status", encode_segment(id)),
            Some(input),
        )
    }

    pub fn parse_admin_stats(&self, response: HttpResponse) -> Result<AdminStats, ApiError> {
        parse_envelope(response)
    }

    pub fn parse_update_content_status(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_ack(response)
    }

    // --- AI chat ---

    pub fn build_chat(&self, input: &ChatRequest) -> Result<HttpRequest, ApiError> {
        self.build_request(HttpMethod::Post, "/api/ai/chat", Some(input))
    }

    pub fn parse_chat(&self, response: HttpResponse) -> Result<ChatReply, ApiError> {
        check_status(&response)?;
        Ok(serde_json::from_str(&response.body)?)
    }
}

/// Map a non-2xx response to `ApiError::RequestFailed`.
///
/// The reason prefers the envelope's `message` when the body carries one.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = serde_json::from_str::<Envelope<serde_json::Value>>(&response.body)
        .ok()
        .and_then(|e| e.message);
    let reason = match message {
        Some(message) => format!("HTTP {}: {message}", response.status),
        None => format!("HTTP {}", response.status),
    };
    Err(ApiError::RequestFailed {
        status: Some(response.status),
        body: Some(response.body.clone()),
        reason,
    })
}

fn read_envelope<T: DeserializeOwned>(response: &HttpResponse) -> Result<Envelope<T>, ApiError> {
    check_status(response)?;
    let envelope: Envelope<T> = serde_json::from_str(&response.body)?;
    if !envelope.success {
        return Err(ApiError::Rejected {
            message: envelope.message.unwrap_or_default(),
        });
    }
    Ok(envelope)
}

/// Unwrap `data` from a successful `{ success, data, message }` envelope.
pub fn parse_envelope<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    read_envelope::<T>(&response)?
        .data
        .ok_or_else(|| ApiError::Deserialization("envelope has no data".to_string()))
}

/// Check the status and return the body as untyped JSON.
///
/// For routes without a typed wrapper; the envelope is not inspected.
pub fn parse_json(response: HttpResponse) -> Result<serde_json::Value, ApiError> {
    check_status(&response)?;
    Ok(serde_json::from_str(&response.body)?)
}

/// Accept any successful envelope, ignoring its payload.
fn parse_ack(response: HttpResponse) -> Result<(), ApiError> {
    read_envelope::<serde_json::Value>(&response).map(|_| ())
}

fn parse_session(response: HttpResponse) -> Result<Session, ApiError> {
    let envelope = read_envelope::<User>(&response)?;
    match (envelope.data, envelope.token) {
        (Some(user), Some(token)) => Ok(Session { user, token }),
        _ => Err(ApiError::Deserialization(
            "session response is missing user or token".to_string(),
        )),
    }
}
