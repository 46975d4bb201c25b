use std::collections::VecDeque;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::Config;

const MODEL: &str = "gemini-1.5-flash";
const MAX_HISTORY: usize = 10;

/// Remote question-answering and code-generation backend.
#[async_trait]
pub trait LanguageModelClient: Send + Sync {
    /// Free-form answer to an open question.
    async fn ask(&self, question: &str) -> Result<String>;

    /// Generate code for `prompt` in `language` and persist it to
    /// `filename`. Returns a human-readable outcome message.
    async fn generate_code(&self, prompt: &str, language: &str, filename: &str)
        -> Result<String>;
}

#[derive(Debug, Clone)]
struct Turn {
    question: String,
    answer: String,
}

/// Gemini-backed client with a bounded conversation history folded into
/// each ask prompt.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    history: Mutex<VecDeque<Turn>>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            base_url: config.gemini_base_url.clone(),
            api_key: config.gemini_api_key.clone(),
            history: Mutex::new(VecDeque::new()),
        }
    }

    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
        info!("conversation history cleared");
    }

    async fn complete(&self, prompt: String) -> Result<String> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("Gemini API key is missing. Please set GEMINI_API_KEY."))?;

        let body = request_body(&prompt);

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, MODEL, key
        );
        let response = self.client.post(url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("Gemini server error: {}", response.status()));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed
            .candidates
            .and_then(|mut c| c.drain(..).next())
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text.trim().to_string())
            .ok_or_else(|| anyhow!("Gemini returned no candidates"))
    }

    async fn context(&self) -> String {
        let history = self.history.lock().await;
        let mut lines = Vec::new();
        for turn in history.iter() {
            lines.push(format!("User: {}", turn.question));
            lines.push(format!("Jarvo: {}", turn.answer));
        }
        lines.join("\n")
    }

    async fn remember(&self, question: &str, answer: &str) {
        let mut history = self.history.lock().await;
        history.push_back(Turn {
            question: question.to_string(),
            answer: answer.to_string(),
        });
        while history.len() > MAX_HISTORY {
            history.pop_front();
        }
    }
}

#[async_trait]
impl LanguageModelClient for GeminiClient {
    async fn ask(&self, question: &str) -> Result<String> {
        let system_instruction = format!(
            "You are Jarvo, an intelligent and helpful desktop voice assistant. \
             Your goal is to help the user with their tasks, answer questions, and \
             provide code or plans when asked. Keep your voice responses concise \
             (1-3 sentences) but informative. If the user asks for a complex task \
             (like planning or coding), you can be more detailed but summarize the \
             main point first. Context of previous conversation:\n{}",
            self.context().await
        );
        let prompt = format!("{system_instruction}\n\nUser: {question}");

        let answer = self.complete(prompt).await?;
        self.remember(question, &answer).await;
        info!("AI answered question");
        Ok(answer)
    }

    async fn generate_code(
        &self,
        prompt: &str,
        language: &str,
        filename: &str,
    ) -> Result<String> {
        let raw = self
            .complete(format!("Write a {prompt} in {language}."))
            .await?;
        let code = extract_code_block(&raw);

        match tokio::fs::write(filename, code).await {
            Ok(()) => Ok(format!("Code written to {filename}")),
            Err(e) => {
                warn!("failed to write generated code: {e}");
                Err(anyhow!("Failed to write file: {e}"))
            }
        }
    }
}

fn request_body(prompt: &str) -> serde_json::Value {
    json!({
        "contents": [{
            "parts": [{ "text": prompt }],
        }],
    })
}

/// Pull the first fenced code block out of a markdown answer; models often
/// wrap code in ``` fences with a language tag on the opening line. Falls
/// back to the whole answer when there is no fence.
fn extract_code_block(answer: &str) -> &str {
    let Some(open) = answer.find("```") else {
        return answer;
    };
    let after_fence = &answer[open + 3..];
    // Skip the language tag line, if any.
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_fence[body_start..];
    match body.find("```") {
        Some(close) => &body[..close],
        None => body,
    }
}
