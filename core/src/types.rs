//! Domain DTOs for the Darshana backend.
//!
//! # Design
//! Field names follow the backend's JSON (camelCase, Mongo-style `_id`).
//! The mock backend defines its own copies; integration tests catch drift.
//! Unknown fields are ignored so richer production payloads still parse.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Characters left as-is in query values and path segments (RFC 3986 unreserved).
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// The `{ success, data?, message? }` wrapper used by most backend routes.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    /// Only present on login and register responses.
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

/// Credentials posted to `/api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// An authenticated user plus the bearer token issued for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoryType {
    History,
    Mythology,
    Folklore,
    Horror,
    Belief,
    Legend,
    Mystery,
    Romance,
    Adventure,
    Spiritual,
}

impl StoryType {
    pub fn as_str(self) -> &'static str {
        match self {
            StoryType::History => "history",
            StoryType::Mythology => "mythology",
            StoryType::Folklore => "folklore",
            StoryType::Horror => "horror",
            StoryType::Belief => "belief",
            StoryType::Legend => "legend",
            StoryType::Mystery => "mystery",
            StoryType::Romance => "romance",
            StoryType::Adventure => "adventure",
            StoryType::Spiritual => "spiritual",
        }
    }
}

/// The monument a story belongs to: a bare id, or the populated summary
/// the list and detail routes return.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum MonumentRef {
    Id(String),
    Summary(MonumentSummary),
}

impl MonumentRef {
    pub fn id(&self) -> &str {
        match self {
            MonumentRef::Id(id) => id,
            MonumentRef::Summary(summary) => &summary.id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonumentSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoryStatistics {
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
}

/// A story. List and search routes omit `content`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub story_type: StoryType,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub monument: Option<MonumentRef>,
    /// One of `draft`, `review`, `published`, `archived`.
    #[serde(default)]
    pub publish_status: Option<String>,
    #[serde(default)]
    pub statistics: StoryStatistics,
}

/// Partial story edit. Omitted fields are left unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub story_type: Option<StoryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_status: Option<String>,
}

/// Filters for the story listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub story_type: Option<StoryType>,
    /// Only stories of this monument id.
    pub monument: Option<String>,
}

impl StoryQuery {
    /// Render as `?k=v&...`, or an empty string when no filter is set.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(story_type) = self.story_type {
            pairs.push(("type", story_type.as_str().to_string()));
        }
        if let Some(monument) = &self.monument {
            pairs.push(("monument", monument.clone()));
        }
        encode_query(&pairs)
    }
}

/// Percent-encode a single path segment, so ids can't escape their route.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, UNRESERVED).to_string()
}

/// Percent-encode `pairs` into a query string with a leading `?`.
pub fn encode_query(pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return String::new();
    }
    let joined = pairs
        .iter()
        .map(|(k, v)| format!("{k}={}", utf8_percent_encode(v, UNRESERVED)))
        .collect::<Vec<_>>()
        .join("&");
    format!("?{joined}")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub city: String,
    pub state: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "India".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Monument {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub short_description: Option<String>,
    pub location: Location,
}

/// Dashboard counters served by `/api/admin/stats`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: u64,
    pub total_stories: u64,
    pub total_monuments: u64,
    pub pending_reviews: u64,
    #[serde(default)]
    pub active_users: u64,
    #[serde(default)]
    pub monthly_growth: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Story,
    Monument,
}

/// Moderation decision posted to `/api/admin/content/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentStatusUpdate {
    pub status: ContentStatus,
    #[serde(rename = "type")]
    pub kind: ContentKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMetadata {
    pub session_id: String,
}

/// Reply from the AI chat route. Not wrapped in the usual envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    pub metadata: ChatMetadata,
}
