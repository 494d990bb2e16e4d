use ai_parser::ParseError;
use api_types::error::{ErrorBody, FieldError};
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod analytics;
mod categories;
mod import;
mod extract;
mod server;
mod transactions;

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    /// The AI parser could not produce proposals.
    Import(ParseError),
    NotFound(String),
    Generic(String),
    Validation(String, Vec<FieldError>),
}

fn map_field_error(err: engine::FieldError) -> FieldError {
    FieldError {
        field: err.field,
        message: err.message,
    }
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidKind(_)
        | EngineError::InvalidDate(_)
        | EngineError::InvalidConfidence(_)
        | EngineError::Validation(_) => StatusCode::BAD_REQUEST,
    }
}

/// Engine errors as `(message, details)` for a response body.
pub(crate) fn describe_engine_error(err: &EngineError) -> (String, Vec<FieldError>) {
    match err {
        EngineError::Validation(_) => (
            "Invalid data".to_string(),
            err.field_errors().into_iter().map(map_field_error).collect(),
        ),
        other => (
            other.to_string(),
            other.field_errors().into_iter().map(map_field_error).collect(),
        ),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error, details) = match self {
            ServerError::Engine(err) => {
                let (error, details) = describe_engine_error(&err);
                (status_for_engine_error(&err), error, details)
            }
            ServerError::Import(err) => {
                tracing::warn!("AI import failed: {err}");
                (
                    StatusCode::BAD_REQUEST,
                    format!("Failed to import transactions: {err}"),
                    Vec::new(),
                )
            }
            ServerError::NotFound(err) => (StatusCode::NOT_FOUND, err, Vec::new()),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err, Vec::new()),
            ServerError::Validation(err, details) => (StatusCode::BAD_REQUEST, err, details),
        };

        (status, Json(ErrorBody { error, details })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<ParseError> for ServerError {
    fn from(value: ParseError) -> Self {
        Self::Import(value)
    }
}
