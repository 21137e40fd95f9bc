//! Todo list synchronization core.
//!
//! # Overview
//! Keeps an in-memory todo list consistent with a remote REST store across
//! list, create, toggle and delete, and derives renderable view data from it.
//! The core never touches the network itself: it builds `HttpRequest` values
//! and reconciles `HttpResponse` values, and a host supplies the I/O either
//! directly or through the `Transport` trait.
//!
//! # Design
//! - `TodoClient` is stateless: it only knows `base_url` and the envelope.
//! - `ListState` is an owned value, never a global. All of its mutation goes
//!   through `TodoController`, which applies changes only after the server
//!   confirms them.
//! - Responses are reconciled in arrival order; the last one wins.
//! - `TodoView` fetches once per activation and turns user intents into
//!   controller calls.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod store;
pub mod types;
pub mod view;

pub use client::TodoClient;
pub use config::ClientConfig;
pub use controller::{Operation, Pending, SyncOutcome, TodoController};
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use store::ListState;
pub use types::{ApiResponse, CreateTodo, Todo, TodoId, UpdateTodo};
pub use view::{Intent, ItemView, TodoView, ViewModel};
