//! Synchronous API client core for the Darshana heritage backend.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `ClientConfig` is created once (usually from `DARSHANA_API_URL`) and is
//!   immutable afterwards; `ApiClient` is cheap to clone and share.
//! - `resolve` is the single place where a base URL and a request path are
//!   joined. A leading `/` on the path is stripped so the join always has
//!   exactly one separator.
//! - Non-2xx replies and transport failures share one error variant,
//!   `ApiError::RequestFailed`.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod resolve;
pub mod types;

pub use client::{parse_envelope, parse_json, ApiClient};
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use resolve::resolve;
pub use types::{
    AdminStats, ChatReply, ChatRequest, ContentKind, ContentStatus, ContentStatusUpdate,
    LoginRequest, Monument, MonumentRef, MonumentSummary, RegisterRequest, Role, Session, Story,
    StoryQuery, StoryStatistics, StoryType, StoryUpdate, User,
};
