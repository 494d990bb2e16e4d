//! Decoding of the model's answer into proposals.

use engine::ProposedTransaction;
use serde_json::{Map, Value};

use crate::ParseError;

/// Decode the message content returned by the model.
///
/// Two shapes are accepted: a bare JSON array of transactions, or an object
/// with a `transactions` array. Anything else is [`ParseError::Malformed`].
/// An empty list is a valid answer and yields `Ok(vec![])`.
///
/// Items are converted leniently (numbers become decimal text, missing
/// fields become empty) so that each one can be accepted or rejected on its
/// own later.
pub fn proposals_from_content(content: &str) -> Result<Vec<ProposedTransaction>, ParseError> {
    let value: Value = serde_json::from_str(content.trim())
        .map_err(|err| ParseError::Malformed(format!("response is not JSON: {err}")))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("transactions") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(ParseError::Malformed(
                    "\"transactions\" is not an array".to_string(),
                ));
            }
            None => {
                return Err(ParseError::Malformed(
                    "response has no \"transactions\" list".to_string(),
                ));
            }
        },
        _ => {
            return Err(ParseError::Malformed(
                "response is neither a list nor an object".to_string(),
            ));
        }
    };

    Ok(items.iter().map(proposal_from_value).collect())
}

fn proposal_from_value(value: &Value) -> ProposedTransaction {
    let empty = Map::new();
    let object = value.as_object().unwrap_or(&empty);

    ProposedTransaction {
        amount: text(object, "amount"),
        description: text(object, "description"),
        category: text(object, "category"),
        kind: text(object, "type"),
        date: Some(text(object, "date")).filter(|date| !date.is_empty()),
        confidence: object.get("confidence").and_then(confidence),
    }
}

/// Numbers and numeric strings are accepted. Anything else that is present
/// becomes NaN so the proposal is rejected instead of losing its confidence.
fn confidence(value: &Value) -> Option<f64> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) => Some(s.trim().parse().unwrap_or(f64::NAN)),
        _ => Some(f64::NAN),
    }
}

fn text(object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
