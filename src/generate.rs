use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::GenerationConfig;
use crate::models::ConversationTurn;
use crate::prompts;

/// Seam to the external text-generation service: one prompt in, one raw
/// response out. The service is opaque; no retry policy lives behind it.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String>;
}

/// Production generator: posts to an OpenAI-compatible chat-completions
/// endpoint with a bounded timeout.
pub struct HttpGenerator {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

impl HttpGenerator {
    pub fn new(cfg: &GenerationConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(HttpGenerator {
            client,
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            timeout: Duration::from_secs(cfg.timeout_secs),
        })
    }
}

#[async_trait]
impl TextGenerator for HttpGenerator {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let start = std::time::Instant::now();
        let url = format!("{}/chat/completions", self.api_base);

        debug!("Generation call starting - prompt_length={} chars", prompt.len());

        let request = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": [{ "role": "user", "content": prompt }],
            }))
            .send();

        let resp = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| {
                anyhow!(
                    "generation service timed out after {}s",
                    self.timeout.as_secs()
                )
            })?
            .with_context(|| format!("request failed for {}", url))?
            .error_for_status()
            .with_context(|| format!("HTTP error for {}", url))?;

        let completion: ChatCompletion = tokio::time::timeout(self.timeout, resp.json())
            .await
            .map_err(|_| {
                anyhow!(
                    "generation service timed out after {}s",
                    self.timeout.as_secs()
                )
            })?
            .with_context(|| format!("decoding JSON for {}", url))?;

        let answer = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow!("generation service returned no choices"))?;

        info!(
            "Generation call completed - duration={:.2}s, response_length={} chars",
            start.elapsed().as_secs_f32(),
            answer.len()
        );
        Ok(answer)
    }
}

/// Builds the persona prompt and forwards it to whichever generator is
/// plugged in. Responses come back verbatim.
pub struct CommentaryBridge {
    generator: Box<dyn TextGenerator>,
}

impl CommentaryBridge {
    pub fn new(generator: Box<dyn TextGenerator>) -> Self {
        CommentaryBridge { generator }
    }

    pub async fn generate(&self, text: &str, instruction: &str) -> Result<String> {
        let prompt = prompts::commentary(text, instruction);
        self.generator.generate_text(&prompt).await
    }
}

/// Per-session chat transcript. History grows with each exchange and is
/// capped: once `max_turns` is exceeded the oldest turns are evicted.
/// Discarded when the session ends.
pub struct ChatSession {
    history: Vec<ConversationTurn>,
    max_turns: usize,
}

pub const DEFAULT_MAX_TURNS: usize = 64;

impl ChatSession {
    pub fn new(max_turns: usize) -> Self {
        ChatSession {
            history: Vec::new(),
            max_turns: max_turns.max(2),
        }
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub async fn chat(&mut self, bridge: &CommentaryBridge, user_text: &str) -> Result<String> {
        self.push(ConversationTurn {
            is_user: true,
            text: user_text.to_string(),
        });
        let reply = bridge.generate(user_text, prompts::CHAT_INSTRUCTION).await?;
        self.push(ConversationTurn {
            is_user: false,
            text: reply.clone(),
        });
        Ok(reply)
    }

    fn push(&mut self, turn: ConversationTurn) {
        self.history.push(turn);
        if self.history.len() > self.max_turns {
            let excess = self.history.len() - self.max_turns;
            self.history.drain(..excess);
            debug!("Chat history capped - evicted={}, retained={}", excess, self.history.len());
        }
    }
}
