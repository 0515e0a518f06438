//! Field descriptors, drafts, and per-field validation

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported input kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Number,
}

impl FieldKind {
    pub fn next(&self) -> Self {
        match self {
            Self::Text => Self::Email,
            Self::Email => Self::Number,
            Self::Number => Self::Text,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Self::Text => Self::Number,
            Self::Email => Self::Text,
            Self::Number => Self::Email,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Email => "Email",
            Self::Number => "Number",
        }
    }
}

/// Static definition of one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub identifier: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
}

impl FieldDescriptor {
    pub fn new(identifier: &str, label: &str, kind: FieldKind, required: bool) -> Self {
        Self {
            identifier: identifier.to_string(),
            label: label.to_string(),
            kind,
            required,
        }
    }

    /// Create a text field
    #[allow(dead_code)]
    pub fn text(identifier: &str, label: &str, required: bool) -> Self {
        Self::new(identifier, label, FieldKind::Text, required)
    }

    /// Create an email field
    #[allow(dead_code)]
    pub fn email(identifier: &str, label: &str, required: bool) -> Self {
        Self::new(identifier, label, FieldKind::Email, required)
    }

    /// Create a number field
    #[allow(dead_code)]
    pub fn number(identifier: &str, label: &str, required: bool) -> Self {
        Self::new(identifier, label, FieldKind::Number, required)
    }
}

/// In-progress choices for the next field to be added.
///
/// Not part of the committed form model; reset after every successful add.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDraft {
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldDraft {
    /// A draft can be committed once its label is non-blank
    pub fn is_ready(&self) -> bool {
        !self.label.trim().is_empty()
    }

    pub fn toggle_required(&mut self) {
        self.required = !self.required;
    }
}

/// Advisory validation outcomes; expected user behavior, never faults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("This field is required")]
    RequiredFieldEmpty,
    #[error("Invalid email format")]
    InvalidEmailFormat,
    #[error("Please enter a valid number")]
    InvalidNumberFormat,
}

/// Validate a raw value against its descriptor.
///
/// Pure function of the descriptor and the value; never inspects other
/// fields. Rule order: required-but-blank wins, then kind-specific shape.
pub fn validate(field: &FieldDescriptor, value: &str) -> Option<ValidationError> {
    if field.required && value.trim().is_empty() {
        return Some(ValidationError::RequiredFieldEmpty);
    }
    match field.kind {
        FieldKind::Email if !is_email_shaped(value) => Some(ValidationError::InvalidEmailFormat),
        FieldKind::Number if !value.is_empty() && value.trim().parse::<f64>().is_err() => {
            Some(ValidationError::InvalidNumberFormat)
        }
        _ => None,
    }
}

/// local-part "@" domain "." tld, no whitespace anywhere.
///
/// The whole value must match; a well-shaped substring is not enough.
fn is_email_shaped(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !local.is_empty() && !host.is_empty() && !tld.is_empty()
}
