//! Turns free text or a receipt image into proposed transactions using an
//! external chat-completions model.
//!
//! The model is a black box: whatever it answers is either a list of
//! [`ProposedTransaction`]s (possibly empty) or a [`ParseError`]. Validating
//! each proposal is left to the engine's import path.

use async_trait::async_trait;
use engine::ProposedTransaction;
use reqwest::StatusCode;

pub use openrouter::{OpenRouterConfig, OpenRouterParser};
pub use response::proposals_from_content;

mod openrouter;
mod prompt;
mod response;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("AI import is not configured: missing API key")]
    NotConfigured,
    #[error("request to AI service failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("AI service returned {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("could not parse AI response: {0}")]
    Malformed(String),
}

/// Source of transaction proposals.
#[async_trait]
pub trait TransactionParser: Send + Sync {
    /// Extract transactions from free-form text.
    async fn parse_text(&self, text: &str) -> Result<Vec<ProposedTransaction>, ParseError>;

    /// Extract transactions from an image, e.g. a photographed receipt.
    /// `mime` is the image content type (`image/png`, `image/jpeg`, ...).
    async fn parse_image(
        &self,
        image: &[u8],
        mime: &str,
    ) -> Result<Vec<ProposedTransaction>, ParseError>;
}
