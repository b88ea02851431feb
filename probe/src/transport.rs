//! Executes core `HttpRequest` values over the network with ureq.
//!
//! Status codes are never turned into transport errors here
//! (`http_status_as_error(false)`); interpreting them is the core parser's
//! job. Only failures that prevent a response, such as a refused connection
//! or a timeout, become `ApiError::RequestFailed` without a status.

use darshana_core::{ApiError, HttpMethod, HttpRequest, HttpResponse};
use tracing::{debug, warn};
use ureq::{Agent, RequestBuilder};

/// Blocking HTTP transport shared by every request of a process.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Send `req` and return the response as plain data.
    pub fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %req.method, url = %req.url, "sending request");

        let result = match (req.method, req.body.as_deref()) {
            (HttpMethod::Get, _) => prepare(self.agent.get(&req.url), req).call(),
            (HttpMethod::Delete, _) => prepare(self.agent.delete(&req.url), req).call(),
            (HttpMethod::Post, Some(body)) => prepare(self.agent.post(&req.url), req).send(body.as_bytes()),
            (HttpMethod::Post, None) => prepare(self.agent.post(&req.url), req).send_empty(),
            (HttpMethod::Put, Some(body)) => prepare(self.agent.put(&req.url), req).send(body.as_bytes()),
            (HttpMethod::Put, None) => prepare(self.agent.put(&req.url), req).send_empty(),
        };

        let mut response = result.map_err(|e| {
            warn!(url = %req.url, error = %e, "request never reached the server");
            ApiError::transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::RequestFailed {
                status: Some(status),
                body: None,
                reason: format!("failed to read response body: {e}"),
            })?;

        debug!(url = %req.url, status, "response received");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    /// Execute `req` and hand the response to one of `ApiClient`'s parsers.
    pub fn round_trip<T, F>(&self, req: &HttpRequest, parse: F) -> Result<T, ApiError>
    where
        F: FnOnce(HttpResponse) -> Result<T, ApiError>,
    {
        parse(self.execute(req)?)
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply the request's headers and timeout to a ureq builder.
fn prepare<B>(mut builder: RequestBuilder<B>, req: &HttpRequest) -> RequestBuilder<B> {
    for (name, value) in &req.headers {
        builder = builder.header(name, value);
    }
    builder.config().timeout_global(Some(req.timeout)).build()
}
