//! Todo entity and field validation rules
//!
//! The entity is plain data owned by the `Database` capability; operations
//! receive copies and never hold long-lived mutable state. Validation returns
//! [`Validation`] so violations accumulate across fields.

use std::fmt;
use std::time::SystemTime;

use crate::error::FieldError;
use crate::Validation;

/// Maximum title length, in characters
pub const TITLE_MAX_LEN: usize = 200;

/// Maximum description length, in characters
pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// Store-assigned entity identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TodoId(pub i64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A todo item
///
/// Invariant: `completed_at` is `Some` if and only if `is_completed` is true.
/// The id is assigned by the store on insert; the value passed in is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Todo {
    /// Store-assigned identity
    pub id: TodoId,
    /// Non-empty, at most [`TITLE_MAX_LEN`] characters
    pub title: String,
    /// Optional, at most [`DESCRIPTION_MAX_LEN`] characters
    pub description: Option<String>,
    /// Completion flag
    pub is_completed: bool,
    /// Assigned from `Clock::now()` at creation
    pub created_at: SystemTime,
    /// Set when `is_completed` flips to true, cleared when it flips back
    pub completed_at: Option<SystemTime>,
}

/// Validate a title against the non-empty and length rules
pub fn validate_title(title: &str) -> Validation<String, Vec<FieldError>> {
    let mut errors = Vec::new();
    if title.trim().is_empty() {
        errors.push(FieldError::new("title", "must not be empty"));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        errors.push(FieldError::new(
            "title",
            format!("must be at most {} characters", TITLE_MAX_LEN),
        ));
    }
    if errors.is_empty() {
        Validation::success(title.to_string())
    } else {
        Validation::failure(errors)
    }
}

/// Validate an optional description against the length rule
pub fn validate_description(
    description: Option<&str>,
) -> Validation<Option<String>, Vec<FieldError>> {
    match description {
        Some(text) if text.chars().count() > DESCRIPTION_MAX_LEN => {
            Validation::failure(vec![FieldError::new(
                "description",
                format!("must be at most {} characters", DESCRIPTION_MAX_LEN),
            )])
        }
        Some(text) => Validation::success(Some(text.to_string())),
        None => Validation::success(None),
    }
}

/// Validate a full draft, accumulating violations across both fields
pub fn validate_draft(
    title: &str,
    description: Option<&str>,
) -> Validation<(String, Option<String>), Vec<FieldError>> {
    validate_title(title).and(validate_description(description))
}
