use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, ApiResponse, HealthResponse, Todo};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_todos_empty() {
    let resp = app().oneshot(empty_request("GET", "/api/todos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: ApiResponse<Vec<Todo>> = body_json(resp).await;
    assert!(envelope.success);
    assert_eq!(envelope.count, Some(0));
    assert!(envelope.data.unwrap().is_empty());
}

// --- create ---

#[tokio::test]
async fn create_todo_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/api/todos", r#"{"text":"Buy milk"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let envelope: ApiResponse<Todo> = body_json(resp).await;
    assert!(envelope.success);
    let todo = envelope.data.unwrap();
    assert_eq!(todo.id, 1);
    assert_eq!(todo.text, "Buy milk");
    assert!(!todo.completed);
}

#[tokio::test]
async fn create_todo_trims_text() {
    let resp = app()
        .oneshot(json_request("POST", "/api/todos", r#"{"text":"  padded  "}"#))
        .await
        .unwrap();

    let envelope: ApiResponse<Todo> = body_json(resp).await;
    assert_eq!(envelope.data.unwrap().text, "padded");
}

#[tokio::test]
async fn create_todo_blank_text_is_rejected() {
    let resp = app()
        .oneshot(json_request("POST", "/api/todos", r#"{"text":"   "}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let envelope: ApiResponse<Todo> = body_json(resp).await;
    assert!(!envelope.success);
    assert!(envelope.data.is_none());
    assert_eq!(envelope.message.as_deref(), Some("Text is required"));
}

#[tokio::test]
async fn create_todo_malformed_json_returns_client_error() {
    let resp = app()
        .oneshot(json_request("POST", "/api/todos", r#"{"text":1}"#))
        .await
        .unwrap();

    assert!(resp.status().is_client_error());
}

// --- update ---

#[tokio::test]
async fn update_todo_not_found() {
    let resp = app()
        .oneshot(json_request("PUT", "/api/todos/42", r#"{"completed":true}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let envelope: ApiResponse<Todo> = body_json(resp).await;
    assert!(!envelope.success);
    assert_eq!(envelope.message.as_deref(), Some("Todo not found"));
}

#[tokio::test]
async fn update_todo_bad_id_returns_400() {
    let resp = app()
        .oneshot(json_request("PUT", "/api/todos/not-a-number", r#"{"completed":true}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- delete ---

#[tokio::test]
async fn delete_unknown_todo_succeeds() {
    let resp = app().oneshot(empty_request("DELETE", "/api/todos/42")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: ApiResponse<Todo> = body_json(resp).await;
    assert!(envelope.success);
    assert!(envelope.data.is_none());
}

// --- health ---

#[tokio::test]
async fn health_reports_ok() {
    let resp = app().oneshot(empty_request("GET", "/api/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let health: HealthResponse = body_json(resp).await;
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    assert!(health.uptime >= 0.0);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create two
    for text in ["Walk dog", "Feed cat"] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request("POST", "/api/todos", &format!(r#"{{"text":"{text}"}}"#)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    // list — creation order
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/todos"))
        .await
        .unwrap();
    let envelope: ApiResponse<Vec<Todo>> = body_json(resp).await;
    let todos = envelope.data.unwrap();
    assert_eq!(envelope.count, Some(2));
    assert_eq!(todos[0].text, "Walk dog");
    assert_eq!(todos[1].text, "Feed cat");
    let id = todos[0].id;

    // update completed
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", &format!("/api/todos/{id}"), r#"{"completed":true}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: ApiResponse<Todo> = body_json(resp).await;
    let updated = envelope.data.unwrap();
    assert_eq!(updated.text, "Walk dog"); // unchanged
    assert!(updated.completed);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/api/todos/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: ApiResponse<Todo> = body_json(resp).await;
    assert_eq!(envelope.data.unwrap().id, id);

    // update after delete — 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", &format!("/api/todos/{id}"), r#"{"completed":false}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(!body_bytes(resp).await.is_empty());

    // list after delete — one left
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/todos"))
        .await
        .unwrap();
    let envelope: ApiResponse<Vec<Todo>> = body_json(resp).await;
    let todos = envelope.data.unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].text, "Feed cat");
}
