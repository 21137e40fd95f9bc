//! Presentation Binding: derived view data and user intents.
//!
//! # Design
//! `TodoView` fetches the list once per activation; later mutations never
//! trigger a refetch. User intents are routed to the controller either in
//! one awaited step (`dispatch`) or in two phases (`begin` / `complete`) so a
//! host can keep several intents in flight and reconcile them as their
//! responses land. The create control is enabled only while the trimmed
//! pending input is non-empty and no list fetch is outstanding.

use tracing::debug;

use crate::controller::{Pending, SyncOutcome, TodoController};
use crate::error::TransportError;
use crate::http::{HttpResponse, Transport};
use crate::types::TodoId;

/// Something the user asked the view to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Replace the not-yet-submitted text.
    EditInput(String),
    /// Create a todo from the pending input.
    Submit,
    /// `completed` is the item's current flag, as displayed.
    Toggle { id: TodoId, completed: bool },
    Remove { id: TodoId },
}

/// One renderable row with the intents its controls emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
    pub on_toggle: Intent,
    pub on_remove: Intent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub items: Vec<ItemView>,
    pub total: usize,
    pub completed: usize,
    pub loading: bool,
    pub error: Option<String>,
    pub pending_input: String,
    pub input_enabled: bool,
    pub can_submit: bool,
}

/// A view hosting one controller. Fetches the list once per activation.
#[derive(Debug, Clone)]
pub struct TodoView {
    controller: TodoController,
    activated: bool,
}

impl TodoView {
    pub fn new(controller: TodoController) -> Self {
        Self {
            controller,
            activated: false,
        }
    }

    pub fn controller(&self) -> &TodoController {
        &self.controller
    }

    /// Loads the list on first activation. Later calls do nothing and
    /// return `None`.
    pub async fn activate<T: Transport>(&mut self, transport: &T) -> Option<SyncOutcome> {
        let pending = self.begin_activate()?;
        let response = transport.execute(pending.request()).await;
        Some(self.complete(pending, response))
    }

    /// First phase of `activate`: the list fetch to issue, or `None` if the
    /// view was already activated.
    pub fn begin_activate(&mut self) -> Option<Pending> {
        if self.activated {
            return None;
        }
        self.activated = true;
        debug!("activating todo view");
        Some(self.controller.begin_fetch_all())
    }

    /// Route an intent to its sync operation and wait for the round trip.
    /// Editing the input, or submitting blank input, issues no request and
    /// returns `None`.
    pub async fn dispatch<T: Transport>(&mut self, transport: &T, intent: Intent) -> Option<SyncOutcome> {
        let pending = self.begin(intent)?;
        let response = transport.execute(pending.request()).await;
        Some(self.complete(pending, response))
    }

    /// First phase of `dispatch`. Returns the request to issue, or `None`
    /// when the intent needs no round trip (input edits, blank submits).
    pub fn begin(&mut self, intent: Intent) -> Option<Pending> {
        match intent {
            Intent::EditInput(text) => {
                self.controller.set_pending_input(text);
                None
            }
            Intent::Submit => self.controller.begin_submit(),
            Intent::Toggle { id, completed } => self.controller.begin_toggle(id, completed),
            Intent::Remove { id } => Some(self.controller.begin_remove(id)),
        }
    }

    pub fn complete(
        &mut self,
        pending: Pending,
        response: Result<HttpResponse, TransportError>,
    ) -> SyncOutcome {
        self.controller.complete(pending, response)
    }

    pub fn view_model(&self) -> ViewModel {
        let state = self.controller.state();
        let items: Vec<ItemView> = state
            .items()
            .iter()
            .map(|item| ItemView {
                id: item.id,
                text: item.text.clone(),
                completed: item.completed,
                on_toggle: Intent::Toggle {
                    id: item.id,
                    completed: item.completed,
                },
                on_remove: Intent::Remove { id: item.id },
            })
            .collect();
        let completed = items.iter().filter(|item| item.completed).count();

        ViewModel {
            total: items.len(),
            completed,
            loading: state.loading(),
            error: state.error().map(str::to_string),
            pending_input: state.pending_input().to_string(),
            input_enabled: !state.loading(),
            can_submit: !state.loading() && !state.pending_input().trim().is_empty(),
            items,
        }
    }
}
