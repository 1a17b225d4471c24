//! OpenAI-compatible chat completions.
//!
//! The whole batch goes out as one numbered prompt; the reply is read back
//! line by line. Any endpoint speaking the same protocol works through
//! `--url`.

use std::borrow::Cow;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{numbered_prompt, parse_numbered};
use crate::{error::Error, translator::Translator};

pub const DEFAULT_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str =
    "You are a professional translator for software localization. Translate accurately and concisely.";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Cow<'a, str>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
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

#[derive(Debug, Clone)]
pub struct OpenAi {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAi {
    pub fn new(client: Client, api_key: String, url: Option<String>, model: Option<String>) -> Self {
        let base_url = url.unwrap_or_else(|| DEFAULT_URL.to_string());
        OpenAi {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    fn request(&self, texts: &[String], source_lang: &str, target_lang: &str) -> Result<String, Error> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: Cow::Borrowed(SYSTEM_PROMPT),
                },
                Message {
                    role: "user",
                    content: Cow::Owned(numbered_prompt(texts, source_lang, target_lang)),
                },
            ],
            temperature: 0.3,
        };
        let response: ChatCompletionResponse = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::backend_error("response has no message content"))
    }
}

impl Translator for OpenAi {
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
                warn!(service = "openai", model = %self.model, error = %err, "batch translation failed, keeping source texts");
                texts.to_vec()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let openai = OpenAi::new(Client::new(), "sk".into(), None, None);
        assert_eq!(openai.base_url, DEFAULT_URL);
        assert_eq!(openai.model, DEFAULT_MODEL);

        let local = OpenAi::new(
            Client::new(),
            "sk".into(),
            Some("http://localhost:11434/v1/".into()),
            Some("llama3".into()),
        );
        assert_eq!(local.base_url, "http://localhost:11434/v1");
        assert_eq!(local.model, "llama3");
    }

    #[test]
    fn test_response_shape() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"1. Hej"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.choices[0].message.content.as_deref(), Some("1. Hej"));
    }

    #[test]
    fn test_failure_returns_inputs() {
        let openai = OpenAi::new(Client::new(), "sk".into(), Some("not a url".into()), None);
        let texts = vec!["One".to_string(), "Two".to_string()];
        assert_eq!(openai.translate_batch(&texts, "en", "sv"), texts);
    }
}
