use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod error {
    use super::*;

    /// One rejected request field.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FieldError {
        pub field: String,
        pub message: String,
    }

    /// Body of every non-2xx response.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorBody {
        pub error: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub details: Vec<FieldError>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    /// Request body for creating or updating a transaction.
    ///
    /// Every field is optional at the wire level so the server can report all
    /// missing and malformed fields in one response. On create, `amount`,
    /// `description`, `category` and `type` are required.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionFields {
        /// Decimal text, e.g. `"12.50"`.
        pub amount: Option<String>,
        pub description: Option<String>,
        pub category: Option<String>,
        /// `income` or `expense`.
        #[serde(rename = "type")]
        pub kind: Option<String>,
        /// RFC3339 timestamp or `YYYY-MM-DD`. Defaults to now on create.
        pub date: Option<String>,
    }

    /// Optional filters for listing transactions.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionQuery {
        pub from: Option<String>,
        pub to: Option<String>,
        pub category: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub id: u64,
        /// Decimal text with two fractional digits.
        pub amount: String,
        pub description: String,
        pub category: String,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub date: DateTime<Utc>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: u64,
        pub name: String,
        pub icon: String,
        pub color: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct CategoryNew {
        pub name: String,
        pub icon: String,
        pub color: String,
    }
}

pub mod import {
    use super::*;
    use crate::{error::FieldError, transaction::TransactionView};

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct TextImport {
        pub text: String,
    }

    /// A committed transaction together with the parser's confidence.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ImportedTransactionView {
        #[serde(flatten)]
        pub transaction: TransactionView,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub confidence: Option<f64>,
    }

    /// A proposal that could not be committed.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ImportFailureView {
        pub index: usize,
        pub error: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub details: Vec<FieldError>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ImportResponse {
        pub success: bool,
        pub message: String,
        pub transactions: Vec<ImportedTransactionView>,
        pub count: usize,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub failures: Vec<ImportFailureView>,
    }
}

pub mod analytics {
    use std::collections::BTreeMap;

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotal {
        pub category: String,
        pub amount: String,
        pub count: usize,
    }

    /// Amounts are decimal text. `totalBalance` may be negative.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AnalyticsSummary {
        pub total_balance: String,
        pub monthly_income: String,
        pub monthly_expenses: String,
        pub category_breakdown: BTreeMap<String, String>,
        pub top_categories: Vec<CategoryTotal>,
    }
}
