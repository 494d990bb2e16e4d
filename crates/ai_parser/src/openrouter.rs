use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use engine::ProposedTransaction;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{ParseError, TransactionParser, prompt, response::proposals_from_content};

#[derive(Clone, Debug)]
pub struct OpenRouterConfig {
    pub base_url: String,
    /// Without a key every parse fails with [`ParseError::NotConfigured`].
    pub api_key: Option<String>,
    pub model: String,
    /// Sent as `HTTP-Referer`.
    pub site_url: String,
    /// Sent as `X-Title`.
    pub title: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key: None,
            model: "openai/gpt-4o".to_string(),
            site_url: "http://localhost:5000".to_string(),
            title: "Money Tracker App".to_string(),
        }
    }
}

/// [`TransactionParser`] backed by the OpenRouter chat-completions API.
#[derive(Clone, Debug)]
pub struct OpenRouterParser {
    client: Client,
    config: OpenRouterConfig,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: Content<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Content<'a> {
    Text(&'a str),
    Parts(Vec<Part<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Part<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl OpenRouterParser {
    pub fn new(config: OpenRouterConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: OpenRouterConfig) -> Self {
        Self { client, config }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn complete(
        &self,
        messages: Vec<Message<'_>>,
    ) -> Result<Vec<ProposedTransaction>, ParseError> {
        let api_key = self.api_key().ok_or(ParseError::NotConfigured)?;
        let body = ChatRequest {
            model: &self.config.model,
            messages,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let resp = self
            .client
            .post(self.url("/chat/completions"))
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.config.site_url)
            .header("X-Title", &self.config.title)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = match resp.json::<ApiErrorBody>().await {
                Ok(err) => err.error.message,
                Err(_) => "AI service error".to_string(),
            };
            tracing::warn!(%status, "chat completion failed: {message}");
            return Err(ParseError::Api { status, message });
        }

        let chat = resp.json::<ChatResponse>().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ParseError::Malformed("response has no message content".to_string()))?;

        let proposals = proposals_from_content(&content)?;
        tracing::debug!(count = proposals.len(), model = %self.config.model, "parsed AI response");
        Ok(proposals)
    }
}

#[async_trait]
impl TransactionParser for OpenRouterParser {
    async fn parse_text(&self, text: &str) -> Result<Vec<ProposedTransaction>, ParseError> {
        let system = prompt::text_system_prompt();
        self.complete(vec![
            Message {
                role: "system",
                content: Content::Text(&system),
            },
            Message {
                role: "user",
                content: Content::Text(text),
            },
        ])
        .await
    }

    async fn parse_image(
        &self,
        image: &[u8],
        mime: &str,
    ) -> Result<Vec<ProposedTransaction>, ParseError> {
        let system = prompt::image_system_prompt();
        let url = format!("data:{mime};base64,{}", STANDARD.encode(image));
        self.complete(vec![
            Message {
                role: "system",
                content: Content::Text(&system),
            },
            Message {
                role: "user",
                content: Content::Parts(vec![
                    Part::Text {
                        text: prompt::IMAGE_USER_PROMPT,
                    },
                    Part::ImageUrl {
                        image_url: ImageUrl { url },
                    },
                ]),
            },
        ])
        .await
    }
}
