//! Application state and core logic

use crate::config::TuiConfig;
use crate::platform;
use crate::state::{AppState, FieldDescriptor, Focus, FormManager};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// User configuration
    pub config: TuiConfig,
    /// Transient feedback line for the status bar
    pub status_message: Option<String>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance with a caller-supplied initial registry
    pub fn new(config: TuiConfig, initial_fields: Vec<FieldDescriptor>) -> Result<Self> {
        let form = FormManager::with_fields(initial_fields)?;
        Ok(Self {
            state: AppState::new(form),
            config,
            status_message: None,
            quit: false,
        })
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Clear any status message on key press
        self.status_message = None;

        // Copy the last submission (works from anywhere)
        if key.code == KeyCode::Char('y') && key.modifiers.contains(platform::COPY_MODIFIER) {
            self.copy_last_submission();
            return Ok(());
        }

        match key.code {
            KeyCode::Tab => self.state.next_focus(),
            KeyCode::BackTab => self.state.prev_focus(),
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.remove_focused_field();
            }
            KeyCode::Delete => self.remove_focused_field(),
            KeyCode::Esc => self.quit = true,
            _ => match self.state.focus {
                Focus::Field(_) => self.handle_field_key(key),
                Focus::DraftLabel => self.handle_draft_label_key(key),
                Focus::DraftKind => self.handle_draft_kind_key(key),
                Focus::DraftRequired => self.handle_draft_required_key(key),
                Focus::AddButton => {
                    if key.code == KeyCode::Enter {
                        self.add_field();
                    }
                }
                Focus::SubmitButton => {
                    if key.code == KeyCode::Enter {
                        self.submit();
                    }
                }
            },
        }
        Ok(())
    }

    /// Route every keystroke in a field through the manager so the value
    /// is re-validated on each edit
    fn handle_field_key(&mut self, key: KeyEvent) {
        let Some(id) = self.state.focused_identifier().map(str::to_string) else {
            return;
        };
        let current = self.state.form.value(&id).unwrap_or("").to_string();
        let edited = match key.code {
            KeyCode::Char(c) => {
                let mut value = current;
                value.push(c);
                Some(value)
            }
            KeyCode::Backspace => {
                let mut value = current;
                value.pop();
                Some(value)
            }
            KeyCode::Enter => {
                self.state.next_focus();
                None
            }
            _ => None,
        };
        if let Some(value) = edited {
            if let Err(err) = self.state.form.set_value(&id, &value) {
                self.state.push_error(err.to_string());
            }
        }
    }

    fn handle_draft_label_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => self.state.form.draft_mut().label.push(c),
            KeyCode::Backspace => {
                self.state.form.draft_mut().label.pop();
            }
            KeyCode::Enter => self.state.next_focus(),
            _ => {}
        }
    }

    fn handle_draft_kind_key(&mut self, key: KeyEvent) {
        let draft = self.state.form.draft_mut();
        match key.code {
            KeyCode::Right | KeyCode::Down | KeyCode::Char(' ') => draft.kind = draft.kind.next(),
            KeyCode::Left | KeyCode::Up => draft.kind = draft.kind.prev(),
            KeyCode::Enter => self.state.next_focus(),
            _ => {}
        }
    }

    fn handle_draft_required_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down | KeyCode::Char(' ') => {
                self.state.form.draft_mut().toggle_required();
            }
            KeyCode::Enter => self.state.next_focus(),
            _ => {}
        }
    }

    fn add_field(&mut self) {
        match self.state.form.add_field() {
            Some(id) => {
                self.status_message = Some(format!("Added field {id}"));
            }
            // Button is rendered disabled; a hint beats silence if Enter
            // arrives anyway
            None => {
                self.status_message = Some("Enter a label to add a field".to_string());
            }
        }
    }

    fn remove_focused_field(&mut self) {
        let Some(id) = self.state.focused_identifier().map(str::to_string) else {
            return;
        };
        match self.state.form.remove_field(&id) {
            Ok(field) => {
                self.state.clamp_focus();
                self.status_message = Some(format!("Removed field \"{}\"", field.label));
            }
            Err(err) => self.state.push_error(err.to_string()),
        }
    }

    fn submit(&mut self) {
        let Some(submission) = self.state.form.submit() else {
            self.status_message =
                Some("Cannot submit: fix validation errors and required fields".to_string());
            return;
        };
        let count = submission.values.len();
        self.state.last_submission = Some(submission);
        self.status_message = Some(format!("Submitted {count} field values"));
        if self.config.copy_on_submit.unwrap_or(false) {
            self.copy_last_submission();
        }
    }

    /// Copy the last submission's values to the system clipboard as JSON
    fn copy_last_submission(&mut self) {
        use arboard::Clipboard;

        let Some(submission) = &self.state.last_submission else {
            self.status_message = Some("Nothing submitted yet".to_string());
            return;
        };
        let result = serde_json::to_string_pretty(&submission.values)
            .map_err(anyhow::Error::from)
            .and_then(|json| {
                let mut clipboard = Clipboard::new()?;
                clipboard.set_text(json)?;
                Ok(())
            });
        match result {
            Ok(()) => self.status_message = Some("Submission copied to clipboard".to_string()),
            Err(err) => {
                tracing::warn!("clipboard copy failed: {err}");
                self.state.push_error(format!("Clipboard copy failed: {err}"));
            }
        }
    }
}
