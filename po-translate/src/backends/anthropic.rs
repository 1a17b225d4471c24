//! Anthropic messages API, driven by the same numbered prompt as the OpenAI
//! client.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{numbered_prompt, parse_numbered};
use crate::{error::Error, translator::Translator};

const ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Anthropic {
    client: Client,
    api_key: String,
    model: String,
}

impl Anthropic {
    pub fn new(client: Client, api_key: String, model: Option<String>) -> Self {
        Anthropic {
            client,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    fn request(&self, texts: &[String], source_lang: &str, target_lang: &str) -> Result<String, Error> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: numbered_prompt(texts, source_lang, target_lang),
            }],
        };
        let response: MessagesResponse = self
            .client
            .post(ENDPOINT)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;
        response
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| Error::backend_error("response has no text content"))
    }
}

impl Translator for Anthropic {
    fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> String {
        let texts = [text.to_string()];
        self.translate_batch(&texts, source_lang, target_lang)
            .into_iter()
            .next()
            .unwrap_or_else(|| text.to_string())
    }

    fn translate_batch(&self, texts: &[String], source_lang: &str, target_lang: &str) -> Vec<String> {
        if texts.is_empty() {
            return Vec::new();
        }
        match self.request(texts, source_lang, target_lang) {
            Ok(reply) => parse_numbered(&reply, texts),
            Err(err) => {
                warn!(service = "anthropic", model = %self.model, error = %err, "batch translation failed, keeping source texts");
                texts.to_vec()
            }
        }
    }
}
