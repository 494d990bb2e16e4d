//! Transactions API endpoints.

use api_types::{
    error::FieldError,
    transaction::{TransactionFields, TransactionKind, TransactionQuery, TransactionView},
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::{DateTime, TimeDelta, Utc};
use engine::{EngineError, TransactionInput};

use crate::{
    ServerError,
    extract::{ApiJson, ApiPath},
    server::ServerState,
};

const NOT_FOUND: &str = "Transaction not found";

fn map_kind(kind: engine::TransactionKind) -> TransactionKind {
    match kind {
        engine::TransactionKind::Income => TransactionKind::Income,
        engine::TransactionKind::Expense => TransactionKind::Expense,
    }
}

pub(crate) fn map_transaction(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        amount: tx.amount.to_string(),
        description: tx.description,
        category: tx.category,
        kind: map_kind(tx.kind),
        date: tx.date,
        created_at: tx.created_at,
    }
}

fn map_input(fields: TransactionFields) -> TransactionInput {
    TransactionInput {
        amount: fields.amount,
        description: fields.description,
        category: fields.category,
        kind: fields.kind,
        date: fields.date,
    }
}

/// A `to` bound given as a plain date covers that whole day.
fn parse_bound(
    value: Option<&str>,
    field: &str,
    end_of_day: bool,
    errors: &mut Vec<FieldError>,
) -> Option<DateTime<Utc>> {
    let value = value?.trim();
    match engine::parse_date(value) {
        Ok(date) if end_of_day && value.len() == 10 => {
            Some(date + TimeDelta::days(1) - TimeDelta::nanoseconds(1))
        }
        Ok(date) => Some(date),
        Err(err) => {
            let message = match err {
                EngineError::InvalidDate(msg) => msg,
                other => other.to_string(),
            };
            errors.push(FieldError {
                field: field.to_string(),
                message,
            });
            None
        }
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let mut errors = Vec::new();
    let from = parse_bound(query.from.as_deref(), "from", false, &mut errors);
    let to = parse_bound(query.to.as_deref(), "to", true, &mut errors);
    if !errors.is_empty() {
        return Err(ServerError::Validation("Invalid filter".to_string(), errors));
    }
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        return Err(ServerError::Generic(
            "Invalid filter: from is after to".to_string(),
        ));
    }

    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let transactions = match (from, to, category) {
        (None, None, Some(category)) => state.engine.transactions_by_category(category).await,
        (None, None, None) => state.engine.transactions().await,
        (from, to, category) => state
            .engine
            .transactions_in_range(
                from.unwrap_or(DateTime::<Utc>::MIN_UTC),
                to.unwrap_or(DateTime::<Utc>::MAX_UTC),
            )
            .await
            .into_iter()
            .filter(|tx| category.is_none_or(|c| tx.category == c))
            .collect(),
    };

    Ok(Json(
        transactions.into_iter().map(map_transaction).collect(),
    ))
}

pub async fn get(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<TransactionView>, ServerError> {
    state
        .engine
        .transaction(id)
        .await
        .map(|tx| Json(map_transaction(tx)))
        .ok_or_else(|| ServerError::NotFound(NOT_FOUND.to_string()))
}

pub async fn create(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<TransactionFields>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let data = map_input(payload).into_new()?;
    let tx = state.engine.create_transaction(data).await?;
    Ok((StatusCode::CREATED, Json(map_transaction(tx))))
}

pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<u64>,
    ApiJson(payload): ApiJson<TransactionFields>,
) -> Result<Json<TransactionView>, ServerError> {
    let patch = map_input(payload).into_patch()?;
    state
        .engine
        .update_transaction(id, patch)
        .await?
        .map(|tx| Json(map_transaction(tx)))
        .ok_or_else(|| ServerError::NotFound(NOT_FOUND.to_string()))
}

pub async fn delete(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<StatusCode, ServerError> {
    if state.engine.delete_transaction(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::NotFound(NOT_FOUND.to_string()))
    }
}
