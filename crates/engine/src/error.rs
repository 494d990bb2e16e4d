//! The module contains the errors the engine can return.
//!
//! Absence of a record is not an error: lookups return `Option` and deletes
//! return `bool`. The errors below describe rejected input:
//!
//! - [`ExistingKey`] when a category name is already taken.
//! - [`Validation`] when one or more fields of a request are malformed.
//!
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`Validation`]: EngineError::Validation
use std::fmt;

use thiserror::Error;

/// A single rejected field, reported back to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid type: {0}")]
    InvalidKind(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid confidence: {0}")]
    InvalidConfidence(String),
    #[error("Invalid data: {}", join_fields(.0))]
    Validation(Vec<FieldError>),
}

impl EngineError {
    /// Field-level details, empty for errors that are not about input fields.
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self {
            Self::Validation(fields) => fields.clone(),
            Self::InvalidAmount(msg) => vec![FieldError::new("amount", msg.clone())],
            Self::InvalidKind(msg) => vec![FieldError::new("type", msg.clone())],
            Self::InvalidDate(msg) => vec![FieldError::new("date", msg.clone())],
            Self::InvalidConfidence(msg) => vec![FieldError::new("confidence", msg.clone())],
            Self::ExistingKey(_) => Vec::new(),
        }
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
