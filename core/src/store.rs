//! State Store: the single owned snapshot of the list view.
//!
//! # Design
//! `ListState` is owned by whoever hosts the view (through
//! `TodoController`); there is no process-wide instance, so several views can
//! live side by side. Each field has exactly one mutator and none of them can
//! fail: operations on an id the store does not hold are silent no-ops.

use tracing::warn;

use crate::types::{Todo, TodoId};

/// Items, loading flag, last error and the not-yet-submitted input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    items: Vec<Todo>,
    loading: bool,
    error: Option<String>,
    pending_input: String,
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items in server-returned order.
    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    pub fn item(&self, id: TodoId) -> Option<&Todo> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    /// Replace the list wholesale, keeping the first occurrence of any
    /// repeated id.
    pub fn set_items(&mut self, items: Vec<Todo>) {
        let mut unique: Vec<Todo> = Vec::with_capacity(items.len());
        for item in items {
            if unique.iter().any(|kept| kept.id == item.id) {
                warn!(id = item.id, "dropping duplicate todo id from list payload");
                continue;
            }
            unique.push(item);
        }
        self.items = unique;
    }

    /// Append one item unless an item with the same id is already present.
    pub fn append_item(&mut self, item: Todo) {
        if self.item(item.id).is_some() {
            return;
        }
        self.items.push(item);
    }

    pub fn patch_completion(&mut self, id: TodoId, completed: bool) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.completed = completed;
        }
    }

    pub fn remove_item(&mut self, id: TodoId) {
        self.items.retain(|item| item.id != id);
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Replaces, never appends: only the most recent failure is kept.
    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    pub fn clear_pending_input(&mut self) {
        self.pending_input.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: TodoId, text: &str, completed: bool) -> Todo {
        Todo {
            id,
            text: text.to_string(),
            completed,
        }
    }

    #[test]
    fn new_state_is_idle_and_empty() {
        let state = ListState::new();
        assert!(state.items().is_empty());
        assert!(!state.loading());
        assert_eq!(state.error(), None);
        assert_eq!(state.pending_input(), "");
    }

    #[test]
    fn set_items_preserves_server_order() {
        let mut state = ListState::new();
        state.set_items(vec![todo(3, "c", false), todo(1, "a", true), todo(2, "b", false)]);
        let ids: Vec<TodoId> = state.items().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn set_items_replaces_previous_list() {
        let mut state = ListState::new();
        state.set_items(vec![todo(1, "a", false), todo(2, "b", false)]);
        state.set_items(vec![todo(9, "z", true)]);
        assert_eq!(state.items(), &[todo(9, "z", true)]);
    }

    #[test]
    fn set_items_drops_repeated_ids() {
        let mut state = ListState::new();
        state.set_items(vec![todo(1, "first", false), todo(1, "second", true), todo(2, "b", false)]);
        assert_eq!(state.items(), &[todo(1, "first", false), todo(2, "b", false)]);
    }

    #[test]
    fn append_item_ignores_known_id() {
        let mut state = ListState::new();
        state.append_item(todo(1, "a", false));
        state.append_item(todo(1, "a again", true));
        assert_eq!(state.items(), &[todo(1, "a", false)]);
    }

    #[test]
    fn patch_completion_touches_only_matching_item() {
        let mut state = ListState::new();
        state.set_items(vec![todo(1, "a", false), todo(2, "b", false)]);
        state.patch_completion(2, true);
        assert_eq!(state.items(), &[todo(1, "a", false), todo(2, "b", true)]);
    }

    #[test]
    fn patch_and_remove_of_absent_id_are_noops() {
        let mut state = ListState::new();
        state.set_items(vec![todo(1, "a", false)]);
        let before = state.clone();
        state.patch_completion(42, true);
        state.remove_item(42);
        assert_eq!(state, before);
    }

    #[test]
    fn remove_item_drops_exactly_one() {
        let mut state = ListState::new();
        state.set_items(vec![todo(1, "a", false), todo(2, "b", false)]);
        state.remove_item(1);
        assert_eq!(state.items(), &[todo(2, "b", false)]);
    }

    #[test]
    fn set_error_replaces_previous_message() {
        let mut state = ListState::new();
        state.set_error(Some("first".to_string()));
        state.set_error(Some("second".to_string()));
        assert_eq!(state.error(), Some("second"));
        state.set_error(None);
        assert_eq!(state.error(), None);
    }
}
