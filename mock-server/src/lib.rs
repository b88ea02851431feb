//! In-memory stand-in for the Darshana backend.
//!
//! Serves the routes the API client targets (auth, stories, monuments, admin
//! and AI chat) with the backend's `{ success, data, message }` envelopes.
//! State lives behind an `Arc<RwLock<_>>` and resets on every `app()` call.

pub mod seed;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

pub use seed::{Backend, Monument, Story, UserRecord};

pub type Db = Arc<RwLock<Backend>>;

type Reply = (StatusCode, Json<Value>);

const STORY_TYPES: &[&str] = &[
    "history", "mythology", "folklore", "horror", "belief", "legend", "mystery", "romance",
    "adventure", "spiritual",
];

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Backend::seeded()));
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/me", get(me))
        .route("/api/stories", get(list_stories))
        .route("/api/stories/search", get(search_stories))
        .route("/api/stories/{id}", get(get_story).put(update_story).delete(delete_story))
        .route("/api/monuments", get(list_monuments))
        .route("/api/monuments/{id}", get(get_monument))
        .route("/api/admin/stats", get(admin_stats))
        .route("/api/admin/content/{id}/status", put(update_content_status))
        .route("/api/ai/chat", post(chat))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn ok(status: StatusCode, body: Value) -> Reply {
    (status, Json(body))
}

fn fail(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({ "success": false, "message": message })))
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolve the caller from the bearer token, or reply 401.
fn authenticate(backend: &Backend, headers: &HeaderMap) -> Result<UserRecord, Reply> {
    let token = bearer(headers).ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Not authorized, no token"))?;
    backend
        .user_by_token(token)
        .cloned()
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Not authorized, token failed"))
}

fn require_admin(backend: &Backend, headers: &HeaderMap) -> Result<UserRecord, Reply> {
    let user = authenticate(backend, headers)?;
    if !user.is_admin() {
        return Err(fail(StatusCode::FORBIDDEN, "User role user is not authorized to access this route"));
    }
    Ok(user)
}

fn issue_token(backend: &mut Backend, user_id: &str) -> String {
    let token = Uuid::new_v4().to_string();
    backend.tokens.insert(token.clone(), user_id.to_string());
    token
}

async fn not_found() -> Reply {
    fail(StatusCode::NOT_FOUND, "Route not found")
}

// --- auth ---

#[derive(Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

async fn login(State(db): State<Db>, Json(input): Json<LoginInput>) -> Result<Reply, Reply> {
    if !input.email.contains('@') || input.password.is_empty() {
        return Err(fail(StatusCode::BAD_REQUEST, "Validation errors"));
    }
    let email = input.email.trim().to_lowercase();
    let mut backend = db.write().await;
    let user = match backend.user_by_email(&email) {
        Some(user) if user.password == input.password => user.clone(),
        _ => {
            warn!(%email, "login rejected");
            return Err(fail(StatusCode::UNAUTHORIZED, "Invalid email or password"));
        }
    };
    let token = issue_token(&mut backend, &user.id);
    info!(%email, "login succeeded");
    Ok(ok(
        StatusCode::OK,
        json!({ "success": true, "message": "Login successful", "data": user.public(), "token": token }),
    ))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

async fn register(State(db): State<Db>, Json(input): Json<RegisterInput>) -> Result<Reply, Reply> {
    let name_ok = |n: &str| (2..=50).contains(&n.trim().chars().count());
    if !name_ok(&input.first_name)
        || !name_ok(&input.last_name)
        || !input.email.contains('@')
        || input.password.len() < 8
    {
        return Err(fail(StatusCode::BAD_REQUEST, "Validation errors"));
    }
    let email = input.email.trim().to_lowercase();
    let mut backend = db.write().await;
    if backend.user_by_email(&email).is_some() {
        return Err(fail(StatusCode::BAD_REQUEST, "User with this email already exists"));
    }
    let user = UserRecord {
        id: Uuid::new_v4().to_string(),
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
        email,
        password: input.password,
        role: "user".to_string(),
    };
    backend.users.push(user.clone());
    let token = issue_token(&mut backend, &user.id);
    Ok(ok(
        StatusCode::CREATED,
        json!({ "success": true, "message": "User registered successfully", "data": user.public(), "token": token }),
    ))
}

async fn me(State(db): State<Db>, headers: HeaderMap) -> Result<Reply, Reply> {
    let backend = db.read().await;
    let user = authenticate(&backend, &headers)?;
    Ok(ok(StatusCode::OK, json!({ "success": true, "data": user.public() })))
}

// --- stories ---

/// Page size the backend uses when `limit` is absent.
const DEFAULT_STORY_LIMIT: usize = 12;

/// Most results the search route returns.
const SEARCH_LIMIT: usize = 20;

/// A story as the public routes return it: monument populated with its
/// name and location, and `content` only on the detail route.
fn story_view(backend: &Backend, story: &Story, with_content: bool) -> Value {
    let mut view = json!(story);
    if let Some(monument) = story.monument.as_ref().and_then(|id| backend.monuments.get(id)) {
        view["monument"] = json!({
            "_id": monument.id,
            "name": monument.name,
            "location": monument.location,
        });
    }
    if !with_content {
        if let Some(fields) = view.as_object_mut() {
            fields.remove("content");
        }
    }
    view
}

#[derive(Deserialize, Default)]
pub struct StoryFilter {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    #[serde(rename = "type")]
    pub story_type: Option<String>,
    pub monument: Option<String>,
}

async fn list_stories(State(db): State<Db>, Query(filter): Query<StoryFilter>) -> Reply {
    let backend = db.read().await;
    let matching: Vec<&Story> = backend
        .stories
        .values()
        .filter(|s| s.is_published())
        .filter(|s| filter.story_type.as_deref().is_none_or(|t| s.story_type == t))
        .filter(|s| {
            filter
                .monument
                .as_deref()
                .is_none_or(|m| s.monument.as_deref() == Some(m))
        })
        .collect();

    let limit = filter.limit.unwrap_or(DEFAULT_STORY_LIMIT).max(1);
    let page = filter.page.unwrap_or(1).max(1);
    let skip = (page - 1).saturating_mul(limit);
    let data: Vec<Value> = matching
        .iter()
        .skip(skip)
        .take(limit)
        .map(|s| story_view(&backend, s, false))
        .collect();
    ok(
        StatusCode::OK,
        json!({
            "success": true,
            "data": data,
            "pagination": {
                "page": page,
                "limit": limit,
                "total": matching.len(),
                "pages": matching.len().div_ceil(limit),
            },
        }),
    )
}

#[derive(Deserialize, Default)]
pub struct SearchInput {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub story_type: Option<String>,
}

async fn search_stories(State(db): State<Db>, Query(input): Query<SearchInput>) -> Result<Reply, Reply> {
    let q = input
        .q
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| fail(StatusCode::BAD_REQUEST, "Search query is required"))?;
    let backend = db.read().await;
    let data: Vec<Value> = backend
        .stories
        .values()
        .filter(|s| s.is_published())
        .filter(|s| input.story_type.as_deref().is_none_or(|t| s.story_type == t))
        .filter(|s| {
            s.title.to_lowercase().contains(&q)
                || s.summary.as_deref().is_some_and(|sum| sum.to_lowercase().contains(&q))
                || s.content.to_lowercase().contains(&q)
        })
        .take(SEARCH_LIMIT)
        .map(|s| story_view(&backend, s, false))
        .collect();
    Ok(ok(StatusCode::OK, json!({ "success": true, "data": data })))
}

async fn get_story(State(db): State<Db>, Path(id): Path<String>) -> Result<Reply, Reply> {
    let mut backend = db.write().await;
    let story = backend
        .stories
        .get_mut(&id)
        .filter(|s| s.is_published())
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Story not found"))?;
    story.statistics.views += 1;
    let story = story.clone();
    Ok(ok(StatusCode::OK, json!({ "success": true, "data": story_view(&backend, &story, true) })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    #[serde(rename = "type")]
    pub story_type: Option<String>,
    pub publish_status: Option<String>,
}

async fn update_story(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<StoryPatch>,
) -> Result<Reply, Reply> {
    let mut backend = db.write().await;
    authenticate(&backend, &headers)?;
    if let Some(t) = &input.story_type {
        if !STORY_TYPES.contains(&t.as_str()) {
            return Err(fail(StatusCode::BAD_REQUEST, "Invalid story type"));
        }
    }
    let story = backend
        .stories
        .get_mut(&id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Story not found"))?;
    if let Some(title) = input.title {
        story.title = title;
    }
    if let Some(content) = input.content {
        story.content = content;
    }
    if let Some(summary) = input.summary {
        story.summary = Some(summary);
    }
    if let Some(story_type) = input.story_type {
        story.story_type = story_type;
    }
    if let Some(publish_status) = input.publish_status {
        story.publish_status = publish_status;
    }
    Ok(ok(
        StatusCode::OK,
        json!({ "success": true, "message": "Story updated successfully", "data": story }),
    ))
}

async fn delete_story(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Reply, Reply> {
    let mut backend = db.write().await;
    authenticate(&backend, &headers)?;
    backend
        .stories
        .remove(&id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Story not found"))?;
    Ok(ok(StatusCode::OK, json!({ "success": true, "message": "Story deleted successfully" })))
}

// --- monuments ---

#[derive(Deserialize, Default)]
pub struct Limit {
    pub limit: Option<usize>,
}

async fn list_monuments(State(db): State<Db>, Query(q): Query<Limit>) -> Reply {
    let backend = db.read().await;
    let data: Vec<&Monument> = backend
        .monuments
        .values()
        .take(q.limit.unwrap_or(usize::MAX))
        .collect();
    ok(StatusCode::OK, json!({ "success": true, "count": data.len(), "data": data }))
}

async fn get_monument(State(db): State<Db>, Path(id): Path<String>) -> Result<Reply, Reply> {
    let backend = db.read().await;
    let monument = backend
        .monuments
        .get(&id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Monument not found"))?;
    Ok(ok(StatusCode::OK, json!({ "success": true, "data": monument })))
}

// --- admin ---

async fn admin_stats(State(db): State<Db>, headers: HeaderMap) -> Result<Reply, Reply> {
    let backend = db.read().await;
    require_admin(&backend, &headers)?;
    let pending = backend.stories.values().filter(|s| s.publish_status == "review").count();
    Ok(ok(
        StatusCode::OK,
        json!({
            "success": true,
            "data": {
                "totalUsers": backend.users.len(),
                "totalStories": backend.stories.len(),
                "totalMonuments": backend.monuments.len(),
                "pendingReviews": pending,
                "activeUsers": backend.tokens.len(),
                "monthlyGrowth": 0.0,
            }
        }),
    ))
}

#[derive(Deserialize)]
pub struct StatusInput {
    #[serde(default)]
    pub status: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

async fn update_content_status(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<StatusInput>,
) -> Result<Reply, Reply> {
    let mut backend = db.write().await;
    require_admin(&backend, &headers)?;
    if !matches!(input.status.as_str(), "approved" | "rejected") {
        return Err(fail(StatusCode::BAD_REQUEST, "Status must be approved or rejected"));
    }
    match input.kind.as_str() {
        "story" => {
            let story = backend
                .stories
                .get_mut(&id)
                .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Content not found"))?;
            let publish_status = if input.status == "approved" { "published" } else { "archived" };
            story.publish_status = publish_status.to_string();
        }
        "monument" => {
            if !backend.monuments.contains_key(&id) {
                return Err(fail(StatusCode::NOT_FOUND, "Content not found"));
            }
        }
        _ => return Err(fail(StatusCode::BAD_REQUEST, "Type must be story or monument")),
    }
    info!(%id, status = %input.status, kind = %input.kind, "content moderated");
    Ok(ok(
        StatusCode::OK,
        json!({ "success": true, "message": format!("Content {} successfully", input.status) }),
    ))
}

// --- AI chat ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatInput {
    #[serde(default)]
    pub message: String,
    pub session_id: Option<String>,
}

async fn chat(Json(input): Json<ChatInput>) -> Result<Reply, Reply> {
    if input.message.trim().is_empty() {
        return Err(fail(StatusCode::BAD_REQUEST, "Message is required"));
    }
    let session_id = input
        .session_id
        .unwrap_or_else(|| format!("session_{}", Uuid::new_v4().simple()));
    Ok(ok(
        StatusCode::OK,
        json!({
            "status": "success",
            "response": format!("Namaste! I'm Narad AI. You asked: {}", input.message.trim()),
            "suggestions": ["Tell me about the Golden Temple", "Any legends about Bhangarh?"],
            "metadata": { "sessionId": session_id },
        }),
    ))
}
