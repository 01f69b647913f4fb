use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use po_identity_core::InMemoryUserStore;
use po_sso_server::{AppState, router};
use po_sso_session::{
    InMemorySessionManager, ProviderConfig, SessionManager, SsoClientConfig, SsoSessionProvider,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SESSION_COOKIE: &str = "_AuthProductOpenerSession";

struct TestApp {
    mock_server: MockServer,
    app: Router,
    sessions: Arc<InMemorySessionManager>,
}

async fn test_app() -> TestApp {
    let mock_server = MockServer::start().await;

    let config = ProviderConfig::new(50, "unused").with_sso(
        SsoClientConfig::new(mock_server.address().to_string())
            .with_scheme("http")
            .with_http_timeout(2),
    );

    let sessions = Arc::new(InMemorySessionManager::default());
    let provider = SsoSessionProvider::from_config(
        config,
        Arc::new(InMemoryUserStore::new()),
        sessions.clone(),
    )
    .unwrap();

    TestApp {
        mock_server,
        app: router(AppState::new(provider, sessions.clone())),
        sessions,
    }
}

async fn mount_profile(server: &MockServer, profile: Value, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/cgi/sso.pl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn send(app: &Router, method: &str, uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .map(|value| value.to_str().unwrap().to_string())
}

#[tokio::test]
async fn test_health() {
    let t = test_app().await;

    let response = send(&t.app, "GET", "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_sso_cookie_establishes_session() {
    let t = test_app().await;
    mount_profile(
        &t.mock_server,
        json!({ "user_id": "alice", "name": "Alice A", "email": "a@x.com" }),
        1,
    )
    .await;

    let response = send(
        &t.app,
        "GET",
        "/session",
        Some("session=user_id%26alice%26user_session%26abc123"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie(&response).expect("session cookie should be set");
    assert!(cookie.starts_with(&format!("{}=", SESSION_COOKIE)));
    assert!(cookie.contains("HttpOnly"));

    let body = body_json(response).await;
    assert_eq!(body["status"], "active");
    assert_eq!(body["session"]["priority"], 100);
    assert_eq!(body["session"]["persisted"], false);
    assert_eq!(body["session"]["user"], json!({ "name": "alice" }));

    let id = body["session"]["id"].as_str().unwrap();
    assert!(cookie.contains(id));
    assert!(t.sessions.get_session(id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_resumed_session_sets_no_cookie() {
    let t = test_app().await;
    mount_profile(&t.mock_server, json!({ "user_id": "alice" }), 1).await;

    let first = send(&t.app, "GET", "/session", Some("session=user_id%26alice")).await;
    let first = body_json(first).await;
    let id = first["session"]["id"].as_str().unwrap().to_string();

    let cookie = format!("{}={}; session=user_id%26alice", SESSION_COOKIE, id);
    let response = send(&t.app, "GET", "/session", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).is_none());

    let body = body_json(response).await;
    assert_eq!(body["session"]["id"], id.as_str());
    assert_eq!(body["session"]["persisted"], true);
    assert_eq!(body["session"]["priority"], 50);
}

#[tokio::test]
async fn test_request_without_sso_cookie_is_anonymous() {
    let t = test_app().await;
    mount_profile(&t.mock_server, json!({ "user_id": "alice" }), 0).await;

    for cookie in [None, Some("session=deleted"), Some("theme=dark")] {
        let response = send(&t.app, "GET", "/session", cookie).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie(&response).is_none());
        assert_eq!(body_json(response).await, json!({ "status": "anonymous" }));
    }
}

#[tokio::test]
async fn test_rejected_sso_cookie_is_anonymous() {
    let t = test_app().await;
    Mock::given(method("POST"))
        .and(path("/cgi/sso.pl"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&t.mock_server)
        .await;

    let response = send(&t.app, "GET", "/session", Some("session=user_id%26alice")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "anonymous" }));
    assert!(t.sessions.is_empty().await);
}

#[tokio::test]
async fn test_unusable_user_name_is_bad_request() {
    let t = test_app().await;
    mount_profile(&t.mock_server, json!({ "user_id": "a|b" }), 1).await;

    let response = send(&t.app, "GET", "/session", Some("session=user_id%26alice")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Invalid user name" })
    );
    assert!(t.sessions.is_empty().await);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let t = test_app().await;
    mount_profile(&t.mock_server, json!({ "user_id": "alice" }), 1).await;

    let established = send(&t.app, "GET", "/session", Some("session=user_id%26alice")).await;
    let established = body_json(established).await;
    let id = established["session"]["id"].as_str().unwrap().to_string();
    let cookie = format!("{}={}", SESSION_COOKIE, id);

    let response = send(&t.app, "POST", "/logout", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cleared = set_cookie(&response).expect("removal cookie should be set");
    assert!(cleared.starts_with(&format!("{}=;", SESSION_COOKIE)));
    assert!(cleared.contains("Max-Age=0"));
    assert!(t.sessions.get_session(&id).await.unwrap().is_none());

    // The stale id alone no longer resolves to a session
    let response = send(&t.app, "GET", "/session", Some(&cookie)).await;
    assert_eq!(body_json(response).await, json!({ "status": "anonymous" }));
}

#[tokio::test]
async fn test_cookies_across_several_headers_are_read() {
    let t = test_app().await;
    mount_profile(&t.mock_server, json!({ "user_id": "alice" }), 1).await;

    let request = Request::builder()
        .method("GET")
        .uri("/session")
        .header(header::COOKIE, "theme=dark")
        .header(header::COOKIE, "session=user_id%26alice%26user_session%26abc123")
        .body(Body::empty())
        .unwrap();
    let response = t.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).is_some());
    let body = body_json(response).await;
    assert_eq!(body["status"], "active");
    assert_eq!(body["session"]["user"]["name"], "alice");
}
