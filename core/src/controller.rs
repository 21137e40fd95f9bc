//! Sync Operations: keeps a `ListState` consistent with the remote store.
//!
//! # Design
//! Every operation follows one protocol: issue a request, and when the
//! response arrives either apply the confirmed mutation and clear the error,
//! or record a single error message and leave `items` as they were. Nothing
//! is applied before the server confirms it.
//!
//! Operations are split in two phases. `begin_*` validates input, updates
//! in-flight bookkeeping and returns a `Pending` holding the request;
//! `complete` reconciles the outcome of that request. Several `Pending`
//! values may be outstanding at once and are reconciled in whatever order
//! their responses arrive, so the last response to land wins. The async
//! drivers (`fetch_all`, `create`, ...) chain both phases over a `Transport`.
//!
//! Only list fetches are visible while in flight (through `loading`);
//! create, toggle and remove have no in-flight state.

use tracing::{debug, warn};

use crate::client::TodoClient;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::store::ListState;
use crate::types::{CreateTodo, TodoId, UpdateTodo};

/// The operation a `Pending` request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchAll,
    Create,
    /// `completed` is the value requested from the server.
    Toggle { id: TodoId, completed: bool },
    Remove { id: TodoId },
}

impl Operation {
    /// Message shown when the server gives no message of its own.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::FetchAll => "load failed",
            Operation::Create => "create failed",
            Operation::Toggle { .. } => "update failed",
            Operation::Remove { .. } => "delete failed",
        }
    }
}

/// A request that has been issued but not yet reconciled. Consumed by
/// `TodoController::complete`, so each request is reconciled once.
#[derive(Debug)]
pub struct Pending {
    operation: Operation,
    request: HttpRequest,
}

impl Pending {
    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }
}

/// How a round trip was reconciled into the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Applied,
    Failed,
}

/// Owns the list state of one view and the client used to reach the API.
#[derive(Debug, Clone)]
pub struct TodoController {
    client: TodoClient,
    state: ListState,
    fetches_in_flight: usize,
}

impl TodoController {
    pub fn new(client: TodoClient) -> Self {
        Self {
            client,
            state: ListState::new(),
            fetches_in_flight: 0,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    /// Form state only; no request is issued.
    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.state.set_pending_input(text);
    }

    pub fn begin_fetch_all(&mut self) -> Pending {
        self.fetches_in_flight += 1;
        self.state.set_loading(true);
        let request = self.client.build_list_todos();
        issue(Operation::FetchAll, request)
    }

    /// Returns `None` without issuing anything when `text` is blank.
    pub fn begin_create(&mut self, text: &str) -> Option<Pending> {
        let text = text.trim();
        if text.is_empty() {
            self.fail(Operation::Create, &ApiError::EmptyText);
            return None;
        }
        let input = CreateTodo {
            text: text.to_string(),
        };
        match self.client.build_create_todo(&input) {
            Ok(request) => Some(issue(Operation::Create, request)),
            Err(err) => {
                self.fail(Operation::Create, &err);
                None
            }
        }
    }

    /// Create from the pending input.
    pub fn begin_submit(&mut self) -> Option<Pending> {
        let text = self.state.pending_input().to_string();
        self.begin_create(&text)
    }

    /// Request `completed = !current_completed` for `id`.
    pub fn begin_toggle(&mut self, id: TodoId, current_completed: bool) -> Option<Pending> {
        let operation = Operation::Toggle {
            id,
            completed: !current_completed,
        };
        let input = UpdateTodo {
            completed: !current_completed,
        };
        match self.client.build_update_todo(id, &input) {
            Ok(request) => Some(issue(operation, request)),
            Err(err) => {
                self.fail(operation, &err);
                None
            }
        }
    }

    pub fn begin_remove(&mut self, id: TodoId) -> Pending {
        let request = self.client.build_delete_todo(id);
        issue(Operation::Remove { id }, request)
    }

    /// Reconcile the outcome of a previously issued request.
    pub fn complete(
        &mut self,
        pending: Pending,
        response: Result<HttpResponse, TransportError>,
    ) -> SyncOutcome {
        let operation = pending.operation;
        let result = match response {
            Ok(response) => self.apply(operation, &response),
            Err(err) => Err(ApiError::from(err)),
        };

        if operation == Operation::FetchAll {
            self.fetches_in_flight = self.fetches_in_flight.saturating_sub(1);
            self.state.set_loading(self.fetches_in_flight > 0);
        }

        match result {
            Ok(()) => {
                self.state.set_error(None);
                SyncOutcome::Applied
            }
            Err(err) => {
                self.fail(operation, &err);
                SyncOutcome::Failed
            }
        }
    }

    pub async fn fetch_all<T: Transport>(&mut self, transport: &T) -> SyncOutcome {
        let pending = self.begin_fetch_all();
        self.round_trip(transport, pending).await
    }

    pub async fn create<T: Transport>(&mut self, transport: &T, text: &str) -> SyncOutcome {
        match self.begin_create(text) {
            Some(pending) => self.round_trip(transport, pending).await,
            None => SyncOutcome::Failed,
        }
    }

    pub async fn submit<T: Transport>(&mut self, transport: &T) -> SyncOutcome {
        match self.begin_submit() {
            Some(pending) => self.round_trip(transport, pending).await,
            None => SyncOutcome::Failed,
        }
    }

    pub async fn toggle<T: Transport>(
        &mut self,
        transport: &T,
        id: TodoId,
        current_completed: bool,
    ) -> SyncOutcome {
        match self.begin_toggle(id, current_completed) {
            Some(pending) => self.round_trip(transport, pending).await,
            None => SyncOutcome::Failed,
        }
    }

    pub async fn remove<T: Transport>(&mut self, transport: &T, id: TodoId) -> SyncOutcome {
        let pending = self.begin_remove(id);
        self.round_trip(transport, pending).await
    }

    async fn round_trip<T: Transport>(&mut self, transport: &T, pending: Pending) -> SyncOutcome {
        let response = transport.execute(pending.request()).await;
        self.complete(pending, response)
    }

    /// Parse first, mutate only once the whole response is known to be good.
    fn apply(&mut self, operation: Operation, response: &HttpResponse) -> Result<(), ApiError> {
        match operation {
            Operation::FetchAll => {
                let items = self.client.parse_list_todos(response)?;
                debug!(count = items.len(), "replacing todo list");
                self.state.set_items(items);
            }
            Operation::Create => {
                let item = self.client.parse_create_todo(response)?;
                debug!(id = item.id, "appending created todo");
                self.state.append_item(item);
                self.state.clear_pending_input();
            }
            Operation::Toggle { id, completed } => {
                self.client.parse_update_todo(response)?;
                debug!(id, completed, "patching todo completion");
                self.state.patch_completion(id, completed);
            }
            Operation::Remove { id } => {
                self.client.parse_delete_todo(response)?;
                debug!(id, "removing todo");
                self.state.remove_item(id);
            }
        }
        Ok(())
    }

    fn fail(&mut self, operation: Operation, err: &ApiError) {
        warn!(?operation, error = %err, "todo sync failed");
        let message = match err {
            ApiError::EmptyText => err.to_string(),
            _ => err
                .server_message()
                .unwrap_or(operation.failure_message())
                .to_string(),
        };
        self.state.set_error(Some(message));
    }
}

fn issue(operation: Operation, request: HttpRequest) -> Pending {
    debug!(?operation, method = request.method.as_str(), path = %request.path, "issuing request");
    Pending { operation, request }
}
