//! Form state machine: registry, value store, and error store in lockstep

use super::field::{validate, FieldDescriptor, FieldDraft, FieldKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Structural misuse by the caller, reported as a value rather than a panic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("no field with identifier `{0}`")]
    UnknownField(String),
    #[error("duplicate field identifier `{0}`")]
    DuplicateField(String),
}

/// Aggregate form phase, derived from the stores on demand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    /// Nothing entered since construction or the last submit
    Idle,
    Valid,
    Invalid,
}

impl FormPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }
}

/// Immutable snapshot of the entered values, returned by a successful submit
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub values: BTreeMap<String, String>,
    pub submitted_at: DateTime<Utc>,
}

/// Owns the field registry and keeps the value and error stores keyed
/// exactly by the registry's identifiers through every operation.
#[derive(Debug, Clone, Default)]
pub struct FormManager {
    fields: Vec<FieldDescriptor>,
    values: HashMap<String, String>,
    errors: HashMap<String, String>,
    draft: FieldDraft,
    next_id: u64,
}

impl FormManager {
    /// Create a manager with an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager from a caller-supplied registry.
    ///
    /// Rejects duplicate identifiers; the uniqueness invariant holds from
    /// the first observable state. The identifier counter is seeded past
    /// any `field-{n}` identifiers so later adds cannot collide.
    pub fn with_fields(fields: Vec<FieldDescriptor>) -> Result<Self, FormError> {
        let mut manager = Self::new();
        for field in fields {
            let id = field.identifier.clone();
            if manager.values.contains_key(&id) {
                return Err(FormError::DuplicateField(id));
            }
            if let Some(n) = id.strip_prefix("field-").and_then(|s| s.parse::<u64>().ok()) {
                manager.next_id = manager.next_id.max(n + 1);
            }
            manager.values.insert(id.clone(), String::new());
            manager.errors.insert(id, String::new());
            manager.fields.push(field);
        }
        Ok(manager)
    }

    /// Ordered read-only view of the registry
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    #[allow(dead_code)]
    pub fn field(&self, identifier: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.identifier == identifier)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Current raw value for a field
    pub fn value(&self, identifier: &str) -> Option<&str> {
        self.values.get(identifier).map(String::as_str)
    }

    /// Current validation message for a field (empty = valid)
    pub fn error(&self, identifier: &str) -> Option<&str> {
        self.errors.get(identifier).map(String::as_str)
    }

    pub fn draft(&self) -> &FieldDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut FieldDraft {
        &mut self.draft
    }

    /// The Add action is available once the draft label is non-blank
    pub fn can_add_field(&self) -> bool {
        self.draft.is_ready()
    }

    /// Commit the draft as a new field at the end of the registry.
    ///
    /// Returns the fresh identifier, or `None` (no effect) while the draft
    /// is not ready; the UI renders the action disabled in that case.
    pub fn add_field(&mut self) -> Option<String> {
        if !self.draft.is_ready() {
            return None;
        }
        let draft = std::mem::take(&mut self.draft);
        Some(self.insert_field(&draft.label, draft.kind, draft.required))
    }

    /// Append a field directly, bypassing the draft
    pub fn insert_field(&mut self, label: &str, kind: FieldKind, required: bool) -> String {
        let identifier = self.alloc_identifier();
        self.fields
            .push(FieldDescriptor::new(&identifier, label, kind, required));
        self.values.insert(identifier.clone(), String::new());
        self.errors.insert(identifier.clone(), String::new());
        tracing::debug!("added field {identifier} ({label})");
        identifier
    }

    /// Remove a field and its value/error entries, preserving the order of
    /// the remaining fields. All three collections are untouched on error.
    pub fn remove_field(&mut self, identifier: &str) -> Result<FieldDescriptor, FormError> {
        let Some(index) = self.fields.iter().position(|f| f.identifier == identifier) else {
            tracing::warn!("remove_field: no field with identifier {identifier}");
            return Err(FormError::UnknownField(identifier.to_string()));
        };
        let field = self.fields.remove(index);
        self.values.remove(identifier);
        self.errors.remove(identifier);
        tracing::debug!("removed field {identifier}");
        Ok(field)
    }

    /// Store a raw value and immediately re-validate that field only
    pub fn set_value(&mut self, identifier: &str, raw: &str) -> Result<(), FormError> {
        let Some(field) = self.fields.iter().find(|f| f.identifier == identifier) else {
            tracing::warn!("set_value: no field with identifier {identifier}");
            return Err(FormError::UnknownField(identifier.to_string()));
        };
        let message = validate(field, raw).map(|e| e.to_string()).unwrap_or_default();
        self.values.insert(identifier.to_string(), raw.to_string());
        self.errors.insert(identifier.to_string(), message);
        Ok(())
    }

    /// The submission gate: a non-empty registry, no recorded errors, and
    /// every required field filled.
    ///
    /// Required-but-empty is re-derived here rather than trusted to the
    /// error store, which only learns about a field once it is edited.
    pub fn can_submit(&self) -> bool {
        if self.fields.is_empty() {
            return false;
        }
        self.fields.iter().all(|field| {
            let id = field.identifier.as_str();
            let no_error = self.errors.get(id).map_or(true, |e| e.is_empty());
            let filled = !field.required
                || self.values.get(id).is_some_and(|v| !v.trim().is_empty());
            no_error && filled
        })
    }

    /// Snapshot the entered values and reset the stores for the next cycle.
    ///
    /// Returns `None` (no effect) while the gate is closed. The registry is
    /// retained; only values and errors reset to empty-per-field.
    pub fn submit(&mut self) -> Option<Submission> {
        if !self.can_submit() {
            return None;
        }
        let values: BTreeMap<String, String> =
            self.values.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        for value in self.values.values_mut() {
            value.clear();
        }
        for error in self.errors.values_mut() {
            error.clear();
        }
        tracing::info!("submitted {} field values", values.len());
        Some(Submission {
            values,
            submitted_at: Utc::now(),
        })
    }

    pub fn phase(&self) -> FormPhase {
        let untouched = self.values.values().all(|v| v.is_empty())
            && self.errors.values().all(|e| e.is_empty());
        if untouched {
            FormPhase::Idle
        } else if self.can_submit() {
            FormPhase::Valid
        } else {
            FormPhase::Invalid
        }
    }

    /// Next identifier from the monotonic counter. Never reuses a slot,
    /// even after removals; skips anything the caller already supplied.
    fn alloc_identifier(&mut self) -> String {
        loop {
            let candidate = format!("field-{}", self.next_id);
            self.next_id += 1;
            if !self.values.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::field::ValidationError;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    /// The key sets of both stores must always equal the registry's ids
    fn assert_stores_in_sync(manager: &FormManager) {
        let registry: HashSet<&str> = manager
            .fields
            .iter()
            .map(|f| f.identifier.as_str())
            .collect();
        let values: HashSet<&str> = manager.values.keys().map(String::as_str).collect();
        let errors: HashSet<&str> = manager.errors.keys().map(String::as_str).collect();
        assert_eq!(registry.len(), manager.fields.len(), "registry ids not unique");
        assert_eq!(values, registry);
        assert_eq!(errors, registry);
    }

    mod construction {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_new_is_empty_and_idle() {
            let manager = FormManager::new();
            assert!(manager.is_empty());
            assert_eq!(manager.phase(), FormPhase::Idle);
            assert_stores_in_sync(&manager);
        }

        #[test]
        fn test_with_fields_creates_empty_store_entries() {
            let manager = FormManager::with_fields(vec![
                FieldDescriptor::text("name", "Name", true),
                FieldDescriptor::email("email", "Email", false),
            ])
            .unwrap();
            assert_eq!(manager.len(), 2);
            assert_eq!(manager.value("name"), Some(""));
            assert_eq!(manager.error("name"), Some(""));
            assert_stores_in_sync(&manager);
        }

        #[test]
        fn test_with_fields_rejects_duplicate_identifiers() {
            let result = FormManager::with_fields(vec![
                FieldDescriptor::text("f1", "First", false),
                FieldDescriptor::text("f1", "Second", false),
            ]);
            assert_eq!(result.unwrap_err(), FormError::DuplicateField("f1".to_string()));
        }

        #[test]
        fn test_counter_seeded_past_supplied_identifiers() {
            let mut manager =
                FormManager::with_fields(vec![FieldDescriptor::text("field-7", "Seventh", false)])
                    .unwrap();
            let id = manager.insert_field("Next", FieldKind::Text, false);
            assert_eq!(id, "field-8");
        }
    }

    mod registry_ops {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_add_on_empty_registry_creates_one_entry_per_store() {
            let mut manager = FormManager::new();
            manager.draft_mut().label = "Age".to_string();
            manager.draft_mut().kind = FieldKind::Number;

            let id = manager.add_field().unwrap();

            assert_eq!(manager.len(), 1);
            assert_eq!(manager.field(&id).unwrap().label, "Age");
            assert_eq!(manager.field(&id).unwrap().kind, FieldKind::Number);
            assert!(!manager.field(&id).unwrap().required);
            assert_eq!(manager.value(&id), Some(""));
            assert_eq!(manager.error(&id), Some(""));
            assert_stores_in_sync(&manager);
        }

        #[test]
        fn test_add_resets_draft() {
            let mut manager = FormManager::new();
            *manager.draft_mut() = FieldDraft {
                label: "Age".to_string(),
                kind: FieldKind::Number,
                required: true,
            };
            manager.add_field().unwrap();
            assert_eq!(*manager.draft(), FieldDraft::default());
            assert!(!manager.can_add_field());
        }

        #[test]
        fn test_add_refused_on_blank_label() {
            let mut manager = FormManager::new();
            manager.draft_mut().label = "   ".to_string();
            assert!(!manager.can_add_field());
            assert_eq!(manager.add_field(), None);
            assert!(manager.is_empty());
            assert_stores_in_sync(&manager);
        }

        #[test]
        fn test_identifiers_unique_across_interleaved_removals() {
            let mut manager = FormManager::new();
            let mut seen = HashSet::new();
            for round in 0..5 {
                let a = manager.insert_field("A", FieldKind::Text, false);
                let b = manager.insert_field("B", FieldKind::Text, false);
                assert!(seen.insert(a), "identifier reused");
                assert!(seen.insert(b.clone()), "identifier reused");
                // Removing the newest field must not make its id reusable
                manager.remove_field(&b).unwrap();
                assert_stores_in_sync(&manager);
                assert_eq!(manager.len(), round + 1);
            }
        }

        #[test]
        fn test_remove_preserves_order_of_remaining_fields() {
            let mut manager = FormManager::new();
            let a = manager.insert_field("A", FieldKind::Text, false);
            let b = manager.insert_field("B", FieldKind::Text, false);
            let c = manager.insert_field("C", FieldKind::Text, false);

            manager.remove_field(&b).unwrap();

            let order: Vec<&str> = manager.fields().iter().map(|f| f.identifier.as_str()).collect();
            assert_eq!(order, vec![a.as_str(), c.as_str()]);
            assert_stores_in_sync(&manager);
        }

        #[test]
        fn test_remove_unknown_reports_and_changes_nothing() {
            let mut manager =
                FormManager::with_fields(vec![FieldDescriptor::text("f1", "Name", false)]).unwrap();
            manager.set_value("f1", "hello").unwrap();

            let err = manager.remove_field("ghost").unwrap_err();

            assert_eq!(err, FormError::UnknownField("ghost".to_string()));
            assert_eq!(manager.len(), 1);
            assert_eq!(manager.value("f1"), Some("hello"));
            assert_stores_in_sync(&manager);
        }

        #[test]
        fn test_remove_returns_descriptor() {
            let mut manager = FormManager::new();
            let id = manager.insert_field("Age", FieldKind::Number, true);
            let field = manager.remove_field(&id).unwrap();
            assert_eq!(field.label, "Age");
            assert!(field.required);
        }
    }

    mod value_sync {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_set_value_round_trips_exactly() {
            let mut manager =
                FormManager::with_fields(vec![FieldDescriptor::text("f1", "Name", false)]).unwrap();
            manager.set_value("f1", "  spaced  value ").unwrap();
            assert_eq!(manager.value("f1"), Some("  spaced  value "));
        }

        #[test]
        fn test_set_value_validates_that_field_only() {
            let mut manager = FormManager::with_fields(vec![
                FieldDescriptor::email("mail", "Email", false),
                FieldDescriptor::number("age", "Age", true),
            ])
            .unwrap();

            manager.set_value("mail", "bad").unwrap();

            assert_eq!(manager.error("mail"), Some("Invalid email format"));
            // The untouched required field keeps its empty error entry
            assert_eq!(manager.error("age"), Some(""));
        }

        #[test]
        fn test_correcting_the_value_clears_the_error() {
            let mut manager =
                FormManager::with_fields(vec![FieldDescriptor::email("mail", "Email", true)])
                    .unwrap();
            manager.set_value("mail", "bad").unwrap();
            assert_eq!(manager.error("mail"), Some("Invalid email format"));

            manager.set_value("mail", "a@b.com").unwrap();
            assert_eq!(manager.error("mail"), Some(""));
        }

        #[test]
        fn test_set_value_unknown_field() {
            let mut manager = FormManager::new();
            assert_eq!(
                manager.set_value("ghost", "x").unwrap_err(),
                FormError::UnknownField("ghost".to_string())
            );
            assert_stores_in_sync(&manager);
        }

        #[test]
        fn test_error_messages_come_from_validation() {
            let mut manager =
                FormManager::with_fields(vec![FieldDescriptor::number("age", "Age", false)])
                    .unwrap();
            manager.set_value("age", "forty").unwrap();
            assert_eq!(
                manager.error("age"),
                Some(ValidationError::InvalidNumberFormat.to_string().as_str())
            );
        }
    }

    mod submission {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_cannot_submit_empty_registry() {
            let manager = FormManager::new();
            assert!(!manager.can_submit());
        }

        #[test]
        fn test_submit_on_empty_registry_is_refused() {
            let mut manager = FormManager::new();
            assert!(manager.submit().is_none());
        }

        #[test]
        fn test_invalid_email_closes_the_gate() {
            // Scenario: one required email field with a malformed value
            let mut manager =
                FormManager::with_fields(vec![FieldDescriptor::email("f1", "Email", true)])
                    .unwrap();
            manager.set_value("f1", "bad").unwrap();

            assert_eq!(manager.error("f1"), Some("Invalid email format"));
            assert!(!manager.can_submit());
            assert_eq!(manager.phase(), FormPhase::Invalid);
        }

        #[test]
        fn test_valid_submit_snapshots_and_resets_values() {
            let mut manager =
                FormManager::with_fields(vec![FieldDescriptor::email("f1", "Email", true)])
                    .unwrap();
            manager.set_value("f1", "a@b.com").unwrap();

            assert_eq!(manager.error("f1"), Some(""));
            assert!(manager.can_submit());
            assert_eq!(manager.phase(), FormPhase::Valid);

            let submission = manager.submit().unwrap();
            assert_eq!(submission.values.get("f1").map(String::as_str), Some("a@b.com"));

            // Registry retained, stores reset to empty-per-field
            assert_eq!(manager.len(), 1);
            assert_eq!(manager.value("f1"), Some(""));
            assert_eq!(manager.error("f1"), Some(""));
            assert_eq!(manager.phase(), FormPhase::Idle);
            assert_stores_in_sync(&manager);
        }

        #[test]
        fn test_untouched_required_field_closes_the_gate() {
            // The error store knows nothing about a field that was never
            // edited; the gate must re-derive required-but-empty itself.
            let mut manager = FormManager::with_fields(vec![
                FieldDescriptor::text("name", "Name", true),
                FieldDescriptor::text("notes", "Notes", false),
            ])
            .unwrap();
            manager.set_value("notes", "hi").unwrap();

            assert_eq!(manager.error("name"), Some(""));
            assert!(!manager.can_submit());
        }

        #[test]
        fn test_whitespace_only_required_value_closes_the_gate() {
            let mut manager =
                FormManager::with_fields(vec![FieldDescriptor::text("name", "Name", true)])
                    .unwrap();
            manager.set_value("name", "   ").unwrap();
            assert!(!manager.can_submit());
        }

        #[test]
        fn test_optional_fields_may_stay_empty() {
            let mut manager = FormManager::with_fields(vec![
                FieldDescriptor::text("name", "Name", true),
                FieldDescriptor::number("age", "Age", false),
            ])
            .unwrap();
            manager.set_value("name", "Ada").unwrap();
            assert!(manager.can_submit());
        }

        #[test]
        fn test_submission_snapshot_is_immutable_against_later_edits() {
            let mut manager =
                FormManager::with_fields(vec![FieldDescriptor::text("f1", "Name", true)]).unwrap();
            manager.set_value("f1", "first").unwrap();
            let submission = manager.submit().unwrap();

            manager.set_value("f1", "second").unwrap();
            assert_eq!(submission.values.get("f1").map(String::as_str), Some("first"));
        }

        #[test]
        fn test_registry_usable_across_submission_cycles() {
            let mut manager =
                FormManager::with_fields(vec![FieldDescriptor::text("f1", "Name", true)]).unwrap();
            manager.set_value("f1", "one").unwrap();
            manager.submit().unwrap();

            assert!(!manager.can_submit());
            manager.set_value("f1", "two").unwrap();
            let second = manager.submit().unwrap();
            assert_eq!(second.values.get("f1").map(String::as_str), Some("two"));
        }

        #[test]
        fn test_submission_serializes_to_json() {
            let mut manager =
                FormManager::with_fields(vec![FieldDescriptor::text("f1", "Name", true)]).unwrap();
            manager.set_value("f1", "Ada").unwrap();
            let submission = manager.submit().unwrap();
            let json = serde_json::to_string(&submission).unwrap();
            assert!(json.contains("\"f1\":\"Ada\""));
            assert!(json.contains("submitted_at"));
        }
    }

    mod phase {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_idle_until_first_edit() {
            let manager =
                FormManager::with_fields(vec![FieldDescriptor::text("f1", "Name", true)]).unwrap();
            assert_eq!(manager.phase(), FormPhase::Idle);
        }

        #[test]
        fn test_edit_moves_to_valid_or_invalid() {
            let mut manager = FormManager::with_fields(vec![
                FieldDescriptor::text("f1", "Name", true),
                FieldDescriptor::email("f2", "Email", false),
            ])
            .unwrap();

            manager.set_value("f2", "nope").unwrap();
            assert_eq!(manager.phase(), FormPhase::Invalid);

            manager.set_value("f2", "a@b.com").unwrap();
            manager.set_value("f1", "Ada").unwrap();
            assert_eq!(manager.phase(), FormPhase::Valid);
        }

        #[test]
        fn test_registry_ops_allowed_in_any_phase() {
            let mut manager = FormManager::new();
            let id = manager.insert_field("Email", FieldKind::Email, true);
            manager.set_value(&id, "bad").unwrap();
            assert_eq!(manager.phase(), FormPhase::Invalid);

            // Removing the offending field recomputes aggregate validity
            manager.remove_field(&id).unwrap();
            assert_eq!(manager.phase(), FormPhase::Idle);
            assert!(!manager.can_submit());
            assert_stores_in_sync(&manager);
        }
    }
}
