//! `HttpTodoClient` against a wiremock backend.

use serde_json::json;
use tdx_core::config::Config;
use tdx_core::session::{Session, User};
use tdx_core::todos::{FetchErrorKind, Filter, HttpTodoClient, TodoApi, TodoSync};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn session() -> Session {
    Session {
        token: "t1".to_string(),
        user: User {
            name: "A".to_string(),
            email: "a@b.com".to_string(),
        },
    }
}

fn client(server: &MockServer) -> HttpTodoClient {
    HttpTodoClient::new(
        reqwest::Client::new(),
        &server.uri(),
        &Config::default(),
        &session(),
    )
}

#[tokio::test]
async fn test_list_sends_bearer_token_and_parses_todos() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .and(header("authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a", "text": "write report", "done": false},
            {"id": "b", "text": "buy milk", "done": true}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let todos = client(&server).list().await.unwrap();
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[1].text, "buy milk");
    assert!(todos[1].done);
}

#[tokio::test]
async fn test_list_server_error_is_fetch_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server).list().await.unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::Fetch);
    assert_eq!(err.to_string(), "fetch failed");
    assert_eq!(err.details.as_deref(), Some("HTTP 500: boom"));
}

#[tokio::test]
async fn test_list_malformed_body_is_fetch_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client(&server).list().await.unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::Fetch);
}

#[tokio::test]
async fn test_create_posts_candidate_and_keeps_server_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/todos"))
        .respond_with(|req: &Request| {
            let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
            let candidate_id = body["id"].as_str().unwrap_or_default();
            let valid = !candidate_id.is_empty() && body["done"] == json!(false);
            if valid {
                ResponseTemplate::new(201).set_body_json(json!({
                    "id": "server-42",
                    "text": body["text"],
                    "done": false
                }))
            } else {
                ResponseTemplate::new(400)
            }
        })
        .expect(1)
        .mount(&server)
        .await;

    let todo = client(&server).create("buy milk").await.unwrap();
    assert_eq!(todo.id, "server-42");
    assert_eq!(todo.text, "buy milk");
    assert!(!todo.done);
}

#[tokio::test]
async fn test_create_rejected_is_create_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(422))
        .mount(&server)
        .await;

    let err = client(&server).create("x").await.unwrap_err();
    assert_eq!(err.to_string(), "create failed");
}

#[tokio::test]
async fn test_set_status_patches_only_done() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/todos/abc"))
        .and(body_json(json!({"done": true})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).set_status("abc", true).await.unwrap();
}

#[tokio::test]
async fn test_set_status_percent_encodes_id() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/todos/a%23b"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/todos/x%2Fy"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client.set_status("a#b", true).await.unwrap();
    client.set_status("x/y", false).await.unwrap();
}

#[tokio::test]
async fn test_set_status_not_found_is_update_failed() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/todos/abc"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server).set_status("abc", false).await.unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::Update);
}

#[tokio::test]
async fn test_unreachable_backend_is_fetch_failed() {
    // Bind then release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = HttpTodoClient::new(reqwest::Client::new(), &uri, &Config::default(), &session());
    let err = client.list().await.unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::Fetch);
    assert!(err.details.is_some());
}

#[tokio::test]
async fn test_sync_core_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a", "text": "write report", "done": false}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/todos"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"id": "b", "text": "buy milk", "done": false})),
        )
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/todos/a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "a", "text": "write report", "done": true})),
        )
        .mount(&server)
        .await;

    let api = client(&server);
    let mut sync = TodoSync::new();
    sync.load(&api).await;
    sync.add(&api, "buy milk").await;
    sync.mark_done(&api, "a").await;

    let done: Vec<&str> = sync
        .filtered_view(Filter::Done)
        .into_iter()
        .map(|t| t.id.as_str())
        .collect();
    let pending: Vec<&str> = sync
        .filtered_view(Filter::Pending)
        .into_iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(done, vec!["a"]);
    assert_eq!(pending, vec!["b"]);
    assert_eq!(sync.error(), None);
}
