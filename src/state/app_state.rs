//! UI-level application state

use super::forms::{FormManager, Submission};

/// Position in the focus ring: each registry field, then the add-field
/// panel, then the submit button. Tab order wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// A registry field, by position
    Field(usize),
    DraftLabel,
    DraftKind,
    DraftRequired,
    AddButton,
    SubmitButton,
}

/// Everything the UI needs besides the form manager itself
#[derive(Debug)]
pub struct AppState {
    pub form: FormManager,
    pub focus: Focus,
    /// Structural errors queued for modal display (FIFO)
    error_queue: Vec<String>,
    pub last_submission: Option<Submission>,
}

impl AppState {
    pub fn new(form: FormManager) -> Self {
        let focus = if form.is_empty() {
            Focus::DraftLabel
        } else {
            Focus::Field(0)
        };
        Self {
            form,
            focus,
            error_queue: Vec::new(),
            last_submission: None,
        }
    }

    /// Ring positions: fields 0..n, then the four panel slots, then submit
    fn ring_len(&self) -> usize {
        self.form.len() + 5
    }

    fn focus_index(&self) -> usize {
        let n = self.form.len();
        match self.focus {
            Focus::Field(i) => i.min(n.saturating_sub(1)),
            Focus::DraftLabel => n,
            Focus::DraftKind => n + 1,
            Focus::DraftRequired => n + 2,
            Focus::AddButton => n + 3,
            Focus::SubmitButton => n + 4,
        }
    }

    fn focus_at(&self, index: usize) -> Focus {
        let n = self.form.len();
        if index < n {
            return Focus::Field(index);
        }
        match index - n {
            0 => Focus::DraftLabel,
            1 => Focus::DraftKind,
            2 => Focus::DraftRequired,
            3 => Focus::AddButton,
            _ => Focus::SubmitButton,
        }
    }

    pub fn next_focus(&mut self) {
        self.focus = self.focus_at((self.focus_index() + 1) % self.ring_len());
    }

    pub fn prev_focus(&mut self) {
        let index = self.focus_index();
        let wrapped = if index == 0 { self.ring_len() - 1 } else { index - 1 };
        self.focus = self.focus_at(wrapped);
    }

    /// Re-anchor focus after the registry shrank underneath it
    pub fn clamp_focus(&mut self) {
        if let Focus::Field(i) = self.focus {
            let n = self.form.len();
            if n == 0 {
                self.focus = Focus::DraftLabel;
            } else if i >= n {
                self.focus = Focus::Field(n - 1);
            }
        }
    }

    /// Identifier of the focused registry field, if any
    pub fn focused_identifier(&self) -> Option<&str> {
        match self.focus {
            Focus::Field(i) => self.form.fields().get(i).map(|f| f.identifier.as_str()),
            _ => None,
        }
    }

    pub fn push_error(&mut self, message: String) {
        self.error_queue.push(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.error_queue.is_empty()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.error_queue.first().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        if !self.error_queue.is_empty() {
            self.error_queue.remove(0);
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(FormManager::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::{FieldDescriptor, FieldKind};

    fn state_with_fields(count: usize) -> AppState {
        let mut form = FormManager::new();
        for i in 0..count {
            form.insert_field(&format!("Field {i}"), FieldKind::Text, false);
        }
        AppState::new(form)
    }

    #[test]
    fn test_initial_focus_on_first_field() {
        let state = state_with_fields(2);
        assert_eq!(state.focus, Focus::Field(0));
    }

    #[test]
    fn test_initial_focus_on_draft_when_registry_empty() {
        let state = state_with_fields(0);
        assert_eq!(state.focus, Focus::DraftLabel);
    }

    #[test]
    fn test_next_focus_walks_fields_then_panel_then_submit() {
        let mut state = state_with_fields(2);
        let expected = [
            Focus::Field(1),
            Focus::DraftLabel,
            Focus::DraftKind,
            Focus::DraftRequired,
            Focus::AddButton,
            Focus::SubmitButton,
            Focus::Field(0), // wrapped
        ];
        for want in expected {
            state.next_focus();
            assert_eq!(state.focus, want);
        }
    }

    #[test]
    fn test_prev_focus_wraps_to_submit() {
        let mut state = state_with_fields(1);
        state.prev_focus();
        assert_eq!(state.focus, Focus::SubmitButton);
    }

    #[test]
    fn test_focus_ring_without_fields() {
        let mut state = state_with_fields(0);
        state.next_focus();
        assert_eq!(state.focus, Focus::DraftKind);
        state.prev_focus();
        state.prev_focus();
        assert_eq!(state.focus, Focus::SubmitButton);
    }

    #[test]
    fn test_clamp_focus_after_last_field_removed() {
        let mut state = state_with_fields(2);
        state.focus = Focus::Field(1);
        let id = state.form.fields()[1].identifier.clone();
        state.form.remove_field(&id).unwrap();
        state.clamp_focus();
        assert_eq!(state.focus, Focus::Field(0));
    }

    #[test]
    fn test_clamp_focus_when_registry_emptied() {
        let mut state = state_with_fields(1);
        let id = state.form.fields()[0].identifier.clone();
        state.form.remove_field(&id).unwrap();
        state.clamp_focus();
        assert_eq!(state.focus, Focus::DraftLabel);
    }

    #[test]
    fn test_focused_identifier() {
        let state = state_with_fields(1);
        assert_eq!(
            state.focused_identifier(),
            Some(state.form.fields()[0].identifier.as_str())
        );
        let empty = state_with_fields(0);
        assert_eq!(empty.focused_identifier(), None);
    }

    #[test]
    fn test_error_queue_is_fifo() {
        let mut state = AppState::default();
        assert!(!state.has_errors());
        state.push_error("first".to_string());
        state.push_error("second".to_string());
        assert_eq!(state.current_error(), Some("first"));
        state.dismiss_error();
        assert_eq!(state.current_error(), Some("second"));
        state.dismiss_error();
        assert!(!state.has_errors());
    }

    #[test]
    fn test_initial_registry_from_descriptors() {
        let form = FormManager::with_fields(vec![FieldDescriptor::email("f1", "Email", true)])
            .unwrap();
        let state = AppState::new(form);
        assert_eq!(state.focus, Focus::Field(0));
        assert!(state.last_submission.is_none());
    }
}
