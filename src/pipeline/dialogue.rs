//! Reply-generation stage (OpenAI chat completions)

use async_trait::async_trait;

use crate::error::Stage;
use crate::history::ConversationHistory;
use crate::pipeline::DialogueModel;
use crate::{Error, Result};

/// Default OpenAI API root
const OPENAI_API_BASE: &str = "https://api.openai.com";

/// Chat model used for reply generation
const DIALOGUE_MODEL: &str = "gpt-4";

/// Upper bound on generated reply tokens; keeps spoken answers short
const MAX_REPLY_TOKENS: u32 = 150;

/// Sampling temperature; natural but controlled variation
const TEMPERATURE: f32 = 0.7;

/// Persona directive prepended to every request
const SYSTEM_PERSONA: &str = "Você é Liz, uma assistente virtual brasileira amigável e \
    prestativa. Responda de forma natural, calorosa e em português brasileiro. Mantenha as \
    respostas concisas e conversacionais, como se fosse uma conversa face a face. Seja \
    expressiva e use um tom acolhedor.";

/// Response from the chat completions endpoint
#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(serde::Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Generates the assistant's reply via OpenAI chat completions
pub struct DialogueClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl DialogueClient {
    /// Create a dialogue client
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] if the API key is empty
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, OPENAI_API_BASE.to_string())
    }

    /// Create a client against a custom API root
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] if the API key is empty
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::MissingCredential("dialogue"));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
        })
    }
}

#[async_trait]
impl DialogueModel for DialogueClient {
    async fn reply(&self, user_text: &str, history: &ConversationHistory) -> Result<String> {
        #[derive(serde::Serialize)]
        struct ChatMessage<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(serde::Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage<'a>>,
            max_tokens: u32,
            temperature: f32,
        }

        // Persona first, then prior turns in order, then the new message
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage {
            role: "system",
            content: SYSTEM_PERSONA,
        });
        for turn in history.turns() {
            messages.push(ChatMessage {
                role: turn.role.as_str(),
                content: &turn.content,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: user_text,
        });

        let request = ChatRequest {
            model: DIALOGUE_MODEL,
            messages,
            max_tokens: MAX_REPLY_TOKENS,
            temperature: TEMPERATURE,
        };

        tracing::debug!(history_turns = history.len(), "requesting reply");

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "dialogue API error");
            return Err(Error::Upstream {
                stage: Stage::Dialogue,
                status: status.as_u16(),
                detail: body,
            });
        }

        let result: ChatResponse = response.json().await?;
        let reply = result
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::InvalidResponse {
                stage: Stage::Dialogue,
                detail: "completion contained no choices".to_string(),
            })?;

        tracing::debug!(reply = %reply, "reply generated");
        Ok(reply)
    }
}
