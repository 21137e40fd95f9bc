use std::fmt::Write;

use todo_sync::ViewModel;

/// Plain-text rendering of the view model.
pub fn render(model: &ViewModel) -> String {
    let mut out = String::new();
    if let Some(error) = &model.error {
        let _ = writeln!(out, "error: {error}");
    }
    if model.loading {
        out.push_str("Loading todos...\n");
    } else if model.items.is_empty() {
        out.push_str("No todos yet\n");
    } else {
        for item in &model.items {
            let mark = if item.completed { 'x' } else { ' ' };
            let _ = writeln!(out, "[{mark}] {:>3} {}", item.id, item.text);
        }
    }
    if !model.pending_input.is_empty() {
        let _ = writeln!(out, "input: {}", model.pending_input);
    }
    let _ = writeln!(out, "Total: {} | Completed: {}", model.total, model.completed);
    out
}
