//! Commits transactions proposed by an external parser.
//!
//! Each proposal is validated and committed on its own, in order. A rejected
//! proposal is reported with its index; proposals committed before it stay
//! committed.

use crate::{EngineError, NewTransaction, ResultEngine, Transaction, TransactionInput};

/// A transaction extracted from free text or an image, not yet persisted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProposedTransaction {
    pub amount: String,
    pub description: String,
    pub category: String,
    pub kind: String,
    pub date: Option<String>,
    /// How sure the parser is, in `[0, 1]`. Never stored.
    pub confidence: Option<f64>,
}

impl ProposedTransaction {
    pub(crate) fn into_new(self) -> ResultEngine<(NewTransaction, Option<f64>)> {
        let confidence = match self.confidence {
            Some(c) if !(0.0..=1.0).contains(&c) => {
                return Err(EngineError::InvalidConfidence(format!(
                    "{c} is outside [0, 1]"
                )));
            }
            other => other,
        };

        let new = TransactionInput {
            amount: Some(self.amount),
            description: Some(self.description),
            category: Some(self.category),
            kind: Some(self.kind),
            date: self.date,
        }
        .into_new()?;

        Ok((new, confidence))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportedTransaction {
    pub transaction: Transaction,
    pub confidence: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportFailure {
    /// Position of the proposal in the parser output.
    pub index: usize,
    pub error: EngineError,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportReport {
    pub imported: Vec<ImportedTransaction>,
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn count(&self) -> usize {
        self.imported.len()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ImportOutcome {
    /// The parser found no transactions at all.
    NothingFound,
    Imported(ImportReport),
}
