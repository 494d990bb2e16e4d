//! AI import endpoints: text or image in, committed transactions out.

use api_types::{
    error::FieldError,
    import::{ImportFailureView, ImportResponse, ImportedTransactionView, TextImport},
};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
};
use engine::{ImportOutcome, ImportReport};

use crate::{
    ServerError, describe_engine_error, extract::ApiJson, server::ServerState,
    transactions::map_transaction,
};

const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
const IMAGE_FIELD: &str = "image";

fn map_report(report: ImportReport) -> ImportResponse {
    let count = report.count();
    let transactions = report
        .imported
        .into_iter()
        .map(|imported| ImportedTransactionView {
            transaction: map_transaction(imported.transaction),
            confidence: imported.confidence,
        })
        .collect();
    let failures = report
        .failures
        .into_iter()
        .map(|failure| {
            let (error, details) = describe_engine_error(&failure.error);
            ImportFailureView {
                index: failure.index,
                error,
                details,
            }
        })
        .collect();

    ImportResponse {
        success: true,
        message: format!("Imported {count} transaction(s)"),
        transactions,
        count,
        failures,
    }
}

/// Nothing found and nothing committed are both client-visible failures.
fn respond(outcome: ImportOutcome) -> Result<Json<ImportResponse>, ServerError> {
    let report = match outcome {
        ImportOutcome::NothingFound => {
            return Err(ServerError::Generic("No transactions found".to_string()));
        }
        ImportOutcome::Imported(report) => report,
    };

    if report.imported.is_empty() {
        let details = report
            .failures
            .iter()
            .flat_map(|failure| {
                describe_engine_error(&failure.error)
                    .1
                    .into_iter()
                    .map(move |detail| FieldError {
                        field: format!("transactions[{}].{}", failure.index, detail.field),
                        message: detail.message,
                    })
            })
            .collect();
        return Err(ServerError::Validation(
            "Failed to import transactions".to_string(),
            details,
        ));
    }

    Ok(Json(map_report(report)))
}

pub async fn text(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<TextImport>,
) -> Result<Json<ImportResponse>, ServerError> {
    let text = payload.text.trim();
    if text.is_empty() {
        return Err(ServerError::Validation(
            "Invalid import request".to_string(),
            vec![FieldError {
                field: "text".to_string(),
                message: "must not be empty".to_string(),
            }],
        ));
    }

    let proposals = state.parser.parse_text(text).await?;
    respond(state.engine.import_proposals(proposals).await)
}

pub async fn image(
    State(state): State<ServerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ImportResponse>, ServerError> {
    let mut multipart =
        multipart.map_err(|rejection| ServerError::Generic(rejection.body_text()))?;

    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ServerError::Generic(err.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let mime = field.content_type().unwrap_or_default().to_string();
        if !mime.starts_with("image/") {
            return Err(ServerError::Generic(
                "Only image files are allowed".to_string(),
            ));
        }
        let bytes = field.bytes().await.map_err(|err| {
            if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ServerError::Generic("Image must be at most 10MB".to_string())
            } else {
                ServerError::Generic(err.body_text())
            }
        })?;
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ServerError::Generic(
                "Image must be at most 10MB".to_string(),
            ));
        }
        image = Some((bytes, mime));
        break;
    }

    let Some((bytes, mime)) = image else {
        return Err(ServerError::Generic("No image file provided".to_string()));
    };
    if bytes.is_empty() {
        return Err(ServerError::Generic("No image file provided".to_string()));
    }

    tracing::debug!(size = bytes.len(), %mime, "image received for import");
    let proposals = state.parser.parse_image(&bytes, &mime).await?;
    respond(state.engine.import_proposals(proposals).await)
}
