//! Typed failure kinds for domain operations
//!
//! Every operation resolves to `Result<T, TodoError>`. The kinds are stable
//! and carry machine-readable codes so an adapter (HTTP or otherwise) can map
//! them to its own status scheme without inspecting messages.

use std::error::Error as StdError;
use std::fmt;

use crate::todo::TodoId;

/// A single field-level validation violation
///
/// Validation accumulates these rather than stopping at the first one, so a
/// failed create/update reports every bad field at once.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldError {
    /// The field the rule applies to
    pub field: &'static str,
    /// Human-readable description of the violation
    pub message: String,
}

impl FieldError {
    /// Create a new field error
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        FieldError {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Failure raised by the `Database` capability
///
/// Converted to [`TodoError`] at the effect boundary; domain code never
/// handles it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The execution's cancellation token fired before or during the call
    Cancelled,
    /// The store itself failed; the message is for logs, not users
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Cancelled => write!(f, "store call cancelled"),
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {}", msg),
        }
    }
}

impl StdError for StoreError {}

/// Failure kinds a domain operation can resolve to
///
/// Operations construct only `NotFound` and `Validation`; `Cancelled`,
/// `Fault` and `DeadlineExceeded` originate in capabilities or decorators and
/// propagate untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TodoError {
    /// The requested entity does not exist; carries the identity looked up
    NotFound {
        /// Identity that was looked up
        id: TodoId,
    },
    /// One or more field-level rule violations, accumulated
    Validation(Vec<FieldError>),
    /// The execution was cancelled via the cancellation capability
    Cancelled,
    /// A timeout decorator's deadline elapsed before the inner effect finished
    DeadlineExceeded,
    /// Unexpected capability failure; detail is for logging, the `Display`
    /// form does not leak it
    Fault {
        /// Underlying cause, for logs only
        message: String,
    },
}

impl TodoError {
    /// Create a fault from an underlying cause
    pub fn fault(message: impl Into<String>) -> Self {
        TodoError::Fault {
            message: message.into(),
        }
    }

    /// Stable machine-readable code for adapter mapping
    ///
    /// An HTTP adapter maps these deterministically: `not_found` to 404,
    /// `validation_failed` to 400, the rest to 5xx-class responses.
    pub fn code(&self) -> &'static str {
        match self {
            TodoError::NotFound { .. } => "not_found",
            TodoError::Validation(_) => "validation_failed",
            TodoError::Cancelled => "cancelled",
            TodoError::DeadlineExceeded => "deadline_exceeded",
            TodoError::Fault { .. } => "internal",
        }
    }
}

impl fmt::Display for TodoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoError::NotFound { id } => write!(f, "todo {} not found", id),
            TodoError::Validation(errors) => {
                write!(f, "validation failed ({} error(s))", errors.len())
            }
            TodoError::Cancelled => write!(f, "operation cancelled"),
            TodoError::DeadlineExceeded => write!(f, "deadline exceeded"),
            // Internal detail stays out of the user-facing message
            TodoError::Fault { .. } => write!(f, "internal error"),
        }
    }
}

impl StdError for TodoError {}

impl From<StoreError> for TodoError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Cancelled => TodoError::Cancelled,
            StoreError::Unavailable(message) => TodoError::Fault { message },
        }
    }
}

impl From<Vec<FieldError>> for TodoError {
    fn from(errors: Vec<FieldError>) -> Self {
        TodoError::Validation(errors)
    }
}
