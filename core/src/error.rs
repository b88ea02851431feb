//! Error types for the Darshana API client.
//!
//! # Design
//! Every failed exchange with the backend lands in `RequestFailed`, whether
//! the request never reached the server (status and body are `None`) or the
//! server answered with a non-2xx status. Callers use `has_response` to tell
//! the two apart. A 2xx reply whose envelope says `success: false` is
//! reported separately as `Rejected`.

/// Errors returned by `ApiClient` parse methods and by transports.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request did not complete with a 2xx status.
    #[error("request failed: {reason}")]
    RequestFailed {
        status: Option<u16>,
        body: Option<String>,
        reason: String,
    },

    /// The server replied 2xx but flagged the operation as unsuccessful.
    #[error("request rejected: {message}")]
    Rejected { message: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// A failure that happened before any response arrived.
    pub fn transport(reason: impl Into<String>) -> Self {
        ApiError::RequestFailed {
            status: None,
            body: None,
            reason: reason.into(),
        }
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Raw body of the failed response, if one was received.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            ApiError::RequestFailed { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// True when the server answered, false when the request never got there.
    pub fn has_response(&self) -> bool {
        match self {
            ApiError::RequestFailed { status, .. } => status.is_some(),
            ApiError::Rejected { .. } | ApiError::Deserialization(_) => true,
            ApiError::Serialization(_) => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Deserialization(e.to_string())
    }
}
