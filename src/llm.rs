use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, Result};

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f64,
    max_tokens: u32,
}

/// Requested output formatting for a summary. Unrecognized wire values fall
/// back to `Generic` rather than erroring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummaryStyle {
    Brief,
    Detailed,
    Bullets,
    Json,
    Generic,
}

impl SummaryStyle {
    pub fn from_request(value: &str) -> Self {
        match value {
            "brief" => SummaryStyle::Brief,
            "detailed" => SummaryStyle::Detailed,
            "bullets" => SummaryStyle::Bullets,
            "json" => SummaryStyle::Json,
            _ => SummaryStyle::Generic,
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            SummaryStyle::Brief => "Summarize the conversation briefly in 2-3 sentences.",
            SummaryStyle::Detailed => "Give a detailed summary covering all important points.",
            SummaryStyle::Bullets => "Summarize the conversation using concise bullet points.",
            SummaryStyle::Json => {
                "Analyze the chat and return a structured JSON summary.\n\n\
                 Instructions:\n\
                 1. Respond with only valid JSON (no explanation, no code fences).\n\
                 2. Use exactly these keys: mainIdea (string), supportingPoints (array of strings), actionItems (array of strings).\n\
                 3. Leave a value empty when the chat gives nothing to fill it with.\n\n\
                 Example:\n\
                 {\n  \"mainIdea\": \"\",\n  \"supportingPoints\": [],\n  \"actionItems\": []\n}"
            }
            SummaryStyle::Generic => "Provide a short and useful summary.",
        }
    }
}

pub const TRUNCATION_NOTE: &str = "\n\nNote: input truncated due to length limit.";

/// Clips chat text to the character budget, marking the cut so both the
/// model and the end user know content is missing. Never splits a char.
pub fn clip_chat_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut clipped = text[..cut].to_string();
            clipped.push_str(TRUNCATION_NOTE);
            clipped
        }
        None => text.to_string(),
    }
}

pub fn build_prompt(style: SummaryStyle, chat_text: &str) -> String {
    let instruction = style.instruction();
    let mut prompt = String::with_capacity(instruction.len() + chat_text.len() + 50);
    prompt.push_str("You are an intelligent assistant. ");
    prompt.push_str(instruction);
    prompt.push_str("\n\nChat:\n");
    prompt.push_str(chat_text);
    prompt
}

/// Client for the hosted chat-completions API. Constructed once at startup
/// and injected through application state.
pub struct LlmClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl LlmClient {
    pub fn new(config: &Config) -> Self {
        let http = ClientBuilder::new()
            .timeout(config.llm_timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");

        LlmClient {
            http,
            base_url: config.openai_base_url.clone(),
            api_key: config.openai_api_key.clone(),
            model: config.summary_model.clone(),
            temperature: config.summary_temperature,
            max_tokens: config.summary_max_tokens,
        }
    }

    /// Submits one prompt and returns the trimmed completion text. At most
    /// one upstream call; no retries.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("OPENAI_API_KEY is not set".to_string()))?;

        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".into(),
                content: prompt.into(),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let res = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let detail = res.text().await.unwrap_or_default();
            return Err(AppError::Llm(format!(
                "completion API returned {}: {}",
                status, detail
            )));
        }

        let json: serde_json::Value = res.json().await?;
        let reply = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| AppError::Llm("Invalid response format from LLM".to_string()))?
            .trim()
            .to_string();

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_styles_map_to_their_variant() {
        assert_eq!(SummaryStyle::from_request("brief"), SummaryStyle::Brief);
        assert_eq!(SummaryStyle::from_request("detailed"), SummaryStyle::Detailed);
        assert_eq!(SummaryStyle::from_request("bullets"), SummaryStyle::Bullets);
        assert_eq!(SummaryStyle::from_request("json"), SummaryStyle::Json);
    }

    #[test]
    fn unknown_style_falls_back_to_generic() {
        assert_eq!(SummaryStyle::from_request("haiku"), SummaryStyle::Generic);
        assert_eq!(SummaryStyle::from_request(""), SummaryStyle::Generic);
    }

    #[test]
    fn json_instruction_fixes_the_output_keys() {
        let instruction = SummaryStyle::Json.instruction();
        assert!(instruction.contains("mainIdea"));
        assert!(instruction.contains("supportingPoints"));
        assert!(instruction.contains("actionItems"));
        assert!(instruction.contains("only valid JSON"));
    }

    #[test]
    fn short_text_passes_through_unmodified() {
        let text = "a short conversation";
        assert_eq!(clip_chat_text(text, 15_000), text);
    }

    #[test]
    fn text_at_exactly_the_budget_is_not_marked() {
        let text = "x".repeat(100);
        assert_eq!(clip_chat_text(&text, 100), text);
    }

    #[test]
    fn long_text_is_clipped_and_marked() {
        let text = "x".repeat(120);
        let clipped = clip_chat_text(&text, 100);

        assert!(clipped.starts_with(&"x".repeat(100)));
        assert!(clipped.ends_with(TRUNCATION_NOTE));
        assert_eq!(clipped.chars().count(), 100 + TRUNCATION_NOTE.chars().count());
    }

    #[test]
    fn clipping_counts_characters_not_bytes() {
        let text = "é".repeat(50);
        let clipped = clip_chat_text(&text, 10);

        assert!(clipped.starts_with(&"é".repeat(10)));
        assert!(clipped.ends_with(TRUNCATION_NOTE));
    }

    #[test]
    fn prompt_carries_instruction_then_chat() {
        let prompt = build_prompt(SummaryStyle::Brief, "USER: hi");

        assert!(prompt.starts_with("You are an intelligent assistant. Summarize the conversation briefly"));
        assert!(prompt.ends_with("\n\nChat:\nUSER: hi"));
    }
}
