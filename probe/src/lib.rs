//! Host side of the Darshana API client.
//!
//! # Overview
//! `darshana-core` only builds and parses requests. This crate executes them
//! with ureq and wraps the common debugging flows (resolve a path, log in,
//! hit an arbitrary route) behind `Probe`, which the `darshana-probe` binary
//! drives from the command line.

pub mod transport;

use darshana_core::types::LoginRequest;
use darshana_core::{parse_json, ApiClient, ApiError, HttpMethod, Session};
use serde_json::Value;
use tracing::info;

pub use transport::UreqTransport;

/// Default route used by `Probe::login`.
pub const LOGIN_PATH: &str = "/api/auth/login";

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// An `ApiClient` paired with a live transport.
#[derive(Clone)]
pub struct Probe {
    client: ApiClient,
    transport: UreqTransport,
}

impl Probe {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            transport: UreqTransport::new(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn transport(&self) -> &UreqTransport {
        &self.transport
    }

    /// Post credentials to `path` (normally `LOGIN_PATH`).
    pub fn login(&self, path: &str, email: &str, password: &str) -> Result<Session, ProbeError> {
        let input = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let req = self
            .client
            .build_request(HttpMethod::Post, path, Some(&input))?;
        info!(url = %req.url, "posting login");
        let session = self
            .transport
            .round_trip(&req, |resp| self.client.parse_login(resp))?;
        Ok(session)
    }

    /// Send an arbitrary request and return the JSON reply.
    ///
    /// `body` must be a JSON document when present.
    pub fn raw(&self, method: HttpMethod, path: &str, body: Option<&str>) -> Result<Value, ProbeError> {
        let body = body.map(serde_json::from_str::<Value>).transpose()?;
        let req = self.client.build_request(method, path, body.as_ref())?;
        info!(%method, url = %req.url, "sending");
        Ok(self.transport.round_trip(&req, parse_json)?)
    }
}
