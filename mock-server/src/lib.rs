//! In-memory stand-in for the remote todo API.
//!
//! Ids come from a counter and listing returns todos in creation order.
//! Every response uses the `{ success, data?, count?, message? }` envelope;
//! failures carry a human-readable `message`.

use std::{env, sync::Arc, time::Instant};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, error, info};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub text: String,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub text: String,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T, message: &str) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
            message: Some(message.to_string()),
        }
    }

    fn failure(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            count: None,
            message: Some(message.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub environment: String,
    pub version: String,
    pub uptime: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Default)]
pub struct TodoTable {
    next_id: i64,
    todos: Vec<Todo>,
}

impl TodoTable {
    fn insert(&mut self, text: String) -> Todo {
        self.next_id += 1;
        let todo = Todo {
            id: self.next_id,
            text,
            completed: false,
        };
        self.todos.push(todo.clone());
        todo
    }
}

pub type Db = Arc<RwLock<TodoTable>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    started: Instant,
}

type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

pub fn app() -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(TodoTable::default())),
        started: Instant::now(),
    };
    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/{id}", put(update_todo).delete(delete_todo))
        .route("/api/health", get(health))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_todos(State(state): State<AppState>) -> Reply<Vec<Todo>> {
    let table = state.db.read().await;
    let todos = table.todos.clone();
    let response = ApiResponse {
        success: true,
        count: Some(todos.len()),
        data: Some(todos),
        message: None,
    };
    (StatusCode::OK, Json(response))
}

async fn create_todo(State(state): State<AppState>, Json(input): Json<CreateTodo>) -> Reply<Todo> {
    let text = input.text.trim();
    if text.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(ApiResponse::failure("Text is required")));
    }
    let todo = state.db.write().await.insert(text.to_string());
    debug!(id = todo.id, "created todo");
    (StatusCode::CREATED, Json(ApiResponse::ok(todo, "Todo created")))
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTodo>,
) -> Reply<Todo> {
    let mut table = state.db.write().await;
    let Some(todo) = table.todos.iter_mut().find(|todo| todo.id == id) else {
        return (StatusCode::NOT_FOUND, Json(ApiResponse::failure("Todo not found")));
    };
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    debug!(id, completed = todo.completed, "updated todo");
    (StatusCode::OK, Json(ApiResponse::ok(todo.clone(), "Todo updated")))
}

/// Deleting an id that is already gone succeeds without data.
async fn delete_todo(State(state): State<AppState>, Path(id): Path<i64>) -> Reply<Todo> {
    let mut table = state.db.write().await;
    let Some(index) = table.todos.iter().position(|todo| todo.id == id) else {
        return (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: None,
                count: None,
                message: Some("Todo already deleted".to_string()),
            }),
        );
    };
    let removed = table.todos.remove(index);
    debug!(id, "deleted todo");
    (StatusCode::OK, Json(ApiResponse::ok(removed, "Todo deleted")))
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let uptime = state.started.elapsed().as_secs_f64();
    match health_report(uptime) {
        Ok(report) => (StatusCode::OK, Json(report)),
        Err(err) => {
            error!(error = %err, "health check failed");
            let report = HealthResponse {
                status: "error".to_string(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                environment: "unknown".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                uptime,
                domain: None,
                url: None,
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(report))
        }
    }
}

fn health_report(uptime: f64) -> Result<HealthResponse, env::VarError> {
    Ok(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        environment: optional_var("APP_ENV")?.unwrap_or_else(|| "development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime,
        domain: optional_var("PUBLIC_DOMAIN")?,
        url: optional_var("PUBLIC_URL")?,
    })
}

/// Unset is `None`; a value that is not valid unicode is an error.
fn optional_var(key: &str) -> Result<Option<String>, env::VarError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Bind and serve; logs the address once the listener is up.
pub async fn serve(addr: &str) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);
    run(listener).await
}
