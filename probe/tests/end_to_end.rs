//! Full client flows against the live mock backend.
//!
//! # Design
//! Starts the mock backend on a random port, then drives every core client
//! operation over real HTTP through `UreqTransport`. Validates that URL
//! resolution, request building and response parsing agree with the server.

use std::net::SocketAddr;

use darshana_core::{
    ApiClient, ApiError, ChatRequest, ClientConfig, ContentKind, ContentStatus,
    ContentStatusUpdate, HttpMethod, RegisterRequest, Role, StoryQuery, StoryType, StoryUpdate,
};
use darshana_probe::{Probe, UreqTransport, LOGIN_PATH};

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_backend::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn client(addr: SocketAddr) -> ApiClient {
    ApiClient::new(ClientConfig::new(&format!("http://{addr}")))
}

#[test]
fn login_with_leading_slash_reaches_login_route() {
    let addr = start_server();
    let probe = Probe::new(client(addr));

    let session = probe
        .login(LOGIN_PATH, "explorer@example.com", "explorer123")
        .unwrap();
    assert_eq!(session.user.email, "explorer@example.com");
    assert_eq!(session.user.role, Role::User);
    assert!(!session.token.is_empty());

    // Same route without the leading slash.
    let session = probe
        .login("api/auth/login", "explorer@example.com", "explorer123")
        .unwrap();
    assert_eq!(session.user.id, "2");
}

#[test]
fn base_url_with_trailing_slash_still_resolves() {
    let addr = start_server();
    let probe = Probe::new(ApiClient::new(ClientConfig::new(&format!("http://{addr}/"))));
    assert!(probe
        .login("/api/auth/login", "explorer@example.com", "explorer123")
        .is_ok());
}

#[test]
fn wrong_password_surfaces_status_and_body() {
    let addr = start_server();
    let c = client(addr);
    let transport = UreqTransport::new();

    let req = c.build_login("explorer@example.com", "wrong").unwrap();
    let err = transport.round_trip(&req, |r| c.parse_login(r)).unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.has_response());
    assert!(err.response_body().unwrap().contains("Invalid email or password"));
}

#[test]
fn unreachable_server_has_no_response() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let c = client(addr);
    let req = c.build_login("explorer@example.com", "explorer123").unwrap();
    let err = UreqTransport::new()
        .round_trip(&req, |r| c.parse_login(r))
        .unwrap_err();
    assert!(matches!(err, ApiError::RequestFailed { status: None, .. }));
}

#[test]
fn story_admin_lifecycle() {
    let addr = start_server();
    let transport = UreqTransport::new();
    let anon = client(addr);

    // Step 1: log in as admin.
    let req = anon.build_login("admin@darshana.com", "Admin123").unwrap();
    let session = transport.round_trip(&req, |r| anon.parse_login(r)).unwrap();
    assert_eq!(session.user.role, Role::Admin);
    let admin = anon.with_token(&session.token);

    // Step 2: list stories filtered by type.
    let query = StoryQuery {
        story_type: Some(StoryType::Horror),
        ..Default::default()
    };
    let req = anon.build_list_stories(&query);
    let stories = transport.round_trip(&req, |r| anon.parse_list_stories(r)).unwrap();
    assert_eq!(stories.len(), 1);
    assert_eq!(stories[0].content, None);
    assert_eq!(stories[0].monument.as_ref().map(|m| m.id()), Some("m2"));
    let id = stories[0].id.clone();

    // Step 3: editing without a token fails with 401.
    let update = StoryUpdate {
        title: Some("Bhangarh after dark".to_string()),
        ..Default::default()
    };
    let req = anon.build_update_story(&id, &update).unwrap();
    let err = transport.round_trip(&req, |r| anon.parse_update_story(r)).unwrap_err();
    assert_eq!(err.status(), Some(401));

    // Step 4: edit as admin.
    let req = admin.build_update_story(&id, &update).unwrap();
    let story = transport.round_trip(&req, |r| admin.parse_update_story(r)).unwrap();
    assert_eq!(story.title, "Bhangarh after dark");
    assert_eq!(story.story_type, StoryType::Horror);

    // Step 5: fetch it back.
    let req = anon.build_get_story(&id);
    let fetched = transport.round_trip(&req, |r| anon.parse_get_story(r)).unwrap();
    assert_eq!(fetched.title, "Bhangarh after dark");
    assert!(fetched.content.is_some());
    assert_eq!(fetched.statistics.views, 1);

    // Step 6: delete, then the story is gone.
    let req = admin.build_delete_story(&id);
    transport.round_trip(&req, |r| admin.parse_delete_story(r)).unwrap();
    let req = anon.build_get_story(&id);
    let err = transport.round_trip(&req, |r| anon.parse_get_story(r)).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn search_and_hostile_ids() {
    let addr = start_server();
    let transport = UreqTransport::new();
    let anon = client(addr);

    let req = anon.build_search_stories("bhangarh", None);
    let found = transport.round_trip(&req, |r| anon.parse_search_stories(r)).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].story_type, StoryType::Horror);

    let req = anon.build_search_stories("bhangarh", Some(StoryType::History));
    let found = transport.round_trip(&req, |r| anon.parse_search_stories(r)).unwrap();
    assert!(found.is_empty());

    // An id that looks like a path must not reach the search route.
    let req = anon.build_get_story("../search?q=bhangarh");
    let err = transport.round_trip(&req, |r| anon.parse_get_story(r)).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn moderation_and_stats() {
    let addr = start_server();
    let transport = UreqTransport::new();
    let anon = client(addr);

    let req = anon.build_login("admin@darshana.com", "Admin123").unwrap();
    let admin = anon.with_token(&transport.round_trip(&req, |r| anon.parse_login(r)).unwrap().token);

    let req = admin.build_admin_stats();
    let stats = transport.round_trip(&req, |r| admin.parse_admin_stats(r)).unwrap();
    assert_eq!(stats.total_stories, 3);
    assert_eq!(stats.pending_reviews, 1);

    let decision = ContentStatusUpdate {
        status: ContentStatus::Approved,
        kind: ContentKind::Story,
    };
    let req = admin.build_update_content_status("s3", &decision).unwrap();
    transport
        .round_trip(&req, |r| admin.parse_update_content_status(r))
        .unwrap();

    let req = admin.build_admin_stats();
    let stats = transport.round_trip(&req, |r| admin.parse_admin_stats(r)).unwrap();
    assert_eq!(stats.pending_reviews, 0);

    let req = anon.build_get_story("s3");
    let story = transport.round_trip(&req, |r| anon.parse_get_story(r)).unwrap();
    assert_eq!(story.publish_status.as_deref(), Some("published"));

    // A regular user may not read the dashboard.
    let req = anon.build_login("explorer@example.com", "explorer123").unwrap();
    let user = anon.with_token(&transport.round_trip(&req, |r| anon.parse_login(r)).unwrap().token);
    let req = user.build_admin_stats();
    let err = transport.round_trip(&req, |r| user.parse_admin_stats(r)).unwrap_err();
    assert_eq!(err.status(), Some(403));
}

#[test]
fn register_me_monuments_and_chat() {
    let addr = start_server();
    let transport = UreqTransport::new();
    let anon = client(addr);

    let input = RegisterRequest {
        first_name: "Meera".to_string(),
        last_name: "Rao".to_string(),
        email: "meera@example.com".to_string(),
        password: "Heritage9".to_string(),
    };
    let req = anon.build_register(&input).unwrap();
    let session = transport.round_trip(&req, |r| anon.parse_register(r)).unwrap();
    assert_eq!(session.user.name, "Meera Rao");

    let me = anon.with_token(&session.token);
    let req = me.build_me();
    let user = transport.round_trip(&req, |r| me.parse_me(r)).unwrap();
    assert_eq!(user, session.user);

    let req = anon.build_list_monuments(Some(100));
    let monuments = transport.round_trip(&req, |r| anon.parse_list_monuments(r)).unwrap();
    assert_eq!(monuments.len(), 2);

    let req = anon.build_get_monument(&monuments[0].id);
    let monument = transport.round_trip(&req, |r| anon.parse_get_monument(r)).unwrap();
    assert_eq!(monument, monuments[0]);

    let chat = ChatRequest {
        message: "Tell me about Bhangarh".to_string(),
        session_id: None,
    };
    let req = anon.build_chat(&chat).unwrap();
    let reply = transport.round_trip(&req, |r| anon.parse_chat(r)).unwrap();
    assert!(reply.response.contains("Bhangarh"));
    assert!(reply.metadata.session_id.starts_with("session_"));
}

#[test]
fn raw_requests_return_json() {
    let addr = start_server();
    let probe = Probe::new(client(addr));

    let value = probe.raw(HttpMethod::Get, "/api/monuments/m1", None).unwrap();
    assert_eq!(value["data"]["name"], "Golden Temple");

    let value = probe
        .raw(HttpMethod::Post, "api/ai/chat", Some(r#"{"message":"Namaste"}"#))
        .unwrap();
    assert_eq!(value["status"], "success");
}
