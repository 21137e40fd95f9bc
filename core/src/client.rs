//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//!
//! Parsing never looks at the HTTP status: the server reports structural
//! success through the envelope's `success` flag, and a 4xx/5xx with a
//! well-formed envelope carries the message the user should see.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ApiResponse, CreateTodo, Todo, TodoId, UpdateTodo};

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/api/todos", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/api/todos", self.base_url),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_update_todo(&self, id: TodoId, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: format!("{}/api/todos/{id}", self.base_url),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_delete_todo(&self, id: TodoId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/api/todos/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Succeeds only if the envelope reports success and `data` is a sequence.
    pub fn parse_list_todos(&self, response: &HttpResponse) -> Result<Vec<Todo>, ApiError> {
        let envelope = accepted_envelope(response)?;
        payload(envelope, "list payload is not a sequence of todos")
    }

    /// Succeeds only if the envelope reports success and `data` is one item.
    pub fn parse_create_todo(&self, response: &HttpResponse) -> Result<Todo, ApiError> {
        let envelope = accepted_envelope(response)?;
        payload(envelope, "create payload is not a single todo")
    }

    pub fn parse_update_todo(&self, response: &HttpResponse) -> Result<(), ApiError> {
        accepted_envelope(response).map(|_| ())
    }

    pub fn parse_delete_todo(&self, response: &HttpResponse) -> Result<(), ApiError> {
        accepted_envelope(response).map(|_| ())
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

/// Decode the envelope and reject it unless `success` is true.
fn accepted_envelope(response: &HttpResponse) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    let envelope: ApiResponse<serde_json::Value> =
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))?;
    if !envelope.success {
        return Err(ApiError::Rejected {
            message: envelope.message,
        });
    }
    Ok(envelope)
}

fn payload<T: DeserializeOwned>(envelope: ApiResponse<serde_json::Value>, shape: &str) -> Result<T, ApiError> {
    let ApiResponse { data, message, .. } = envelope;
    let unexpected = |message| ApiError::UnexpectedPayload {
        reason: shape.to_string(),
        message,
    };
    match data {
        Some(value) => serde_json::from_value(value).map_err(|_| unexpected(message)),
        None => Err(unexpected(message)),
    }
}
