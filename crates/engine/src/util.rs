//! Internal helpers for input validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every write path enforces the same invariants.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, FieldError, ResultEngine};

/// Trim a required text field and enforce a maximum length in characters.
pub(crate) fn required_text(value: &str, field: &str, max_chars: usize) -> Result<String, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(field, format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > max_chars {
        return Err(FieldError::new(
            field,
            format!("{field} must be at most {max_chars} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Key used to compare category names: NFKC, lowercase, single spaces.
pub(crate) fn normalize_category_key(value: &str) -> String {
    value
        .nfkc()
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse an ISO-8601 date.
///
/// Accepts a full RFC3339 timestamp (any offset, stored as UTC) or a plain
/// `YYYY-MM-DD` date, which is taken as midnight UTC.
pub fn parse_date(value: &str) -> ResultEngine<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(EngineError::InvalidDate(format!(
        "\"{trimmed}\" is not an ISO-8601 date"
    )))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn category_key_ignores_case_and_spacing() {
        assert_eq!(normalize_category_key("  Food   &  DINING "), "food & dining");
        assert_eq!(normalize_category_key("Ｓhopping"), "shopping");
    }

    #[test]
    fn required_text_trims_and_limits() {
        assert_eq!(required_text("  Lunch ", "description", 10).unwrap(), "Lunch");
        assert!(required_text("   ", "description", 10).is_err());
        let err = required_text("abcdefghijk", "category", 10).unwrap_err();
        assert_eq!(err.field, "category");
    }

    #[test]
    fn parse_date_accepts_rfc3339_and_plain_dates() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
        assert_eq!(parse_date("2024-03-05T12:00:00+02:00").unwrap(), expected);
        assert_eq!(
            parse_date("2024-03-05").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap()
        );
        assert!(matches!(
            parse_date("yesterday"),
            Err(EngineError::InvalidDate(_))
        ));
    }
}
