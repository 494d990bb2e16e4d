//! Transaction primitives.
//!
//! A `Transaction` is a single recorded money movement. Its amount is always
//! non-negative; `kind` says whether it adds to or subtracts from the balance.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};

use crate::{
    EngineError, FieldError, Money, ResultEngine,
    util::{parse_date, required_text},
};

pub(crate) const MAX_CATEGORY_CHARS: usize = 50;
const MAX_DESCRIPTION_CHARS: usize = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Amount with the sign this kind contributes to a balance.
    pub fn signed(self, amount: Money) -> Money {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidKind(format!(
                "\"{other}\" is not one of income, expense"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: u64,
    pub amount: Money,
    pub description: String,
    pub category: String,
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Amount with sign applied (income positive, expense negative).
    pub fn signed_amount(&self) -> Money {
        self.kind.signed(self.amount)
    }
}

/// Data for a new transaction. `date` defaults to the commit time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTransaction {
    pub amount: Money,
    pub description: String,
    pub category: String,
    pub kind: TransactionKind,
    pub date: Option<DateTime<Utc>>,
}

impl NewTransaction {
    /// Trims text fields and checks every invariant of a stored transaction.
    pub(crate) fn validated(self) -> ResultEngine<Self> {
        let mut errors = Vec::new();
        let amount = check_amount(self.amount).map_err(|e| errors.push(e)).ok();
        let description = required_text(&self.description, "description", MAX_DESCRIPTION_CHARS)
            .map_err(|e| errors.push(e))
            .ok();
        let category = required_text(&self.category, "category", MAX_CATEGORY_CHARS)
            .map_err(|e| errors.push(e))
            .ok();

        match (amount, description, category) {
            (Some(amount), Some(description), Some(category)) => Ok(Self {
                amount,
                description,
                category,
                kind: self.kind,
                date: self.date,
            }),
            _ => Err(EngineError::Validation(errors)),
        }
    }
}

/// Partial update. Fields left `None` keep their stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    pub amount: Option<Money>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub kind: Option<TransactionKind>,
    pub date: Option<DateTime<Utc>>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.kind.is_none()
            && self.date.is_none()
    }

    pub(crate) fn validated(self) -> ResultEngine<Self> {
        let mut errors = Vec::new();
        let amount = self
            .amount
            .and_then(|a| check_amount(a).map_err(|e| errors.push(e)).ok());
        let description = self.description.and_then(|d| {
            required_text(&d, "description", MAX_DESCRIPTION_CHARS)
                .map_err(|e| errors.push(e))
                .ok()
        });
        let category = self.category.and_then(|c| {
            required_text(&c, "category", MAX_CATEGORY_CHARS)
                .map_err(|e| errors.push(e))
                .ok()
        });

        if !errors.is_empty() {
            return Err(EngineError::Validation(errors));
        }
        Ok(Self {
            amount,
            description,
            category,
            kind: self.kind,
            date: self.date,
        })
    }

    pub(crate) fn apply(self, tx: &mut Transaction) {
        if let Some(amount) = self.amount {
            tx.amount = amount;
        }
        if let Some(description) = self.description {
            tx.description = description;
        }
        if let Some(category) = self.category {
            tx.category = category;
        }
        if let Some(kind) = self.kind {
            tx.kind = kind;
        }
        if let Some(date) = self.date {
            tx.date = date;
        }
    }
}

/// Loosely typed transaction fields, as they arrive from HTTP clients or
/// from the AI parser. Conversion collects every bad field at once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionInput {
    pub amount: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub kind: Option<String>,
    pub date: Option<String>,
}

impl TransactionInput {
    /// Build a [`NewTransaction`]; amount, description, category and type are
    /// required.
    pub fn into_new(self) -> ResultEngine<NewTransaction> {
        let mut errors = Vec::new();
        let parsed = self.parse(&mut errors);

        let amount = require(parsed.amount, self.amount.is_none(), "amount", &mut errors);
        let description = require(
            parsed.description,
            self.description.is_none(),
            "description",
            &mut errors,
        );
        let category = require(
            parsed.category,
            self.category.is_none(),
            "category",
            &mut errors,
        );
        let kind = require(parsed.kind, self.kind.is_none(), "type", &mut errors);

        match (amount, description, category, kind) {
            (Some(amount), Some(description), Some(category), Some(kind)) if errors.is_empty() => {
                Ok(NewTransaction {
                    amount,
                    description,
                    category,
                    kind,
                    date: parsed.date,
                })
            }
            _ => Err(EngineError::Validation(errors)),
        }
    }

    /// Build a [`TransactionPatch`] from whichever fields are present.
    pub fn into_patch(self) -> ResultEngine<TransactionPatch> {
        let mut errors = Vec::new();
        let patch = self.parse(&mut errors);
        if errors.is_empty() {
            Ok(patch)
        } else {
            Err(EngineError::Validation(errors))
        }
    }

    fn parse(&self, errors: &mut Vec<FieldError>) -> TransactionPatch {
        let amount = self.amount.as_deref().and_then(|raw| {
            raw.parse::<Money>()
                .and_then(Money::as_transaction_amount)
                .map_err(|e| errors.extend(e.field_errors()))
                .ok()
        });
        let description = self.description.as_deref().and_then(|raw| {
            required_text(raw, "description", MAX_DESCRIPTION_CHARS)
                .map_err(|e| errors.push(e))
                .ok()
        });
        let category = self.category.as_deref().and_then(|raw| {
            required_text(raw, "category", MAX_CATEGORY_CHARS)
                .map_err(|e| errors.push(e))
                .ok()
        });
        let kind = self.kind.as_deref().and_then(|raw| {
            raw.parse::<TransactionKind>()
                .map_err(|e| errors.extend(e.field_errors()))
                .ok()
        });
        let date = self.date.as_deref().and_then(|raw| {
            parse_date(raw)
                .map_err(|e| errors.extend(e.field_errors()))
                .ok()
        });

        TransactionPatch {
            amount,
            description,
            category,
            kind,
            date,
        }
    }
}

fn require<T>(value: Option<T>, missing: bool, field: &str, errors: &mut Vec<FieldError>) -> Option<T> {
    if missing {
        errors.push(FieldError::new(field, format!("{field} is required")));
    }
    value
}

fn check_amount(amount: Money) -> Result<Money, FieldError> {
    amount.as_transaction_amount().map_err(|err| match err {
        EngineError::InvalidAmount(message) => FieldError::new("amount", message),
        other => FieldError::new("amount", other.to_string()),
    })
}
