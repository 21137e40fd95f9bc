//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.
//!
//! Every endpoint answers with the same `ApiResponse` envelope. Structural
//! success is the envelope's `success` flag, not the HTTP status.

use serde::{Deserialize, Serialize};

/// Server-assigned todo identifier. Immutable once assigned.
pub type TodoId = i64;

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub text: String,
}

/// Request payload for flipping the completion flag of an existing todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTodo {
    pub completed: bool,
}

/// Response envelope shared by every todo endpoint.
///
/// `data` is absent on most failures and on some successes (update/delete
/// may omit it). `count` is only reported by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
