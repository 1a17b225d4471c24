//! [LibreTranslate](https://libretranslate.com), public or self-hosted.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{error::Error, translator::Translator};

pub const DEFAULT_URL: &str = "https://libretranslate.com";

#[derive(Debug, Serialize)]
struct LibreRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LibreResponse {
    translated_text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LibreTranslate {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl LibreTranslate {
    pub fn new(client: Client, url: Option<String>, api_key: Option<String>) -> Self {
        let base_url = url.unwrap_or_else(|| DEFAULT_URL.to_string());
        LibreTranslate {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn request(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<Option<String>, Error> {
        let body = LibreRequest {
            q: text,
            source: source_lang,
            target: target_lang,
            format: "text",
            api_key: self.api_key.as_deref(),
        };
        let response: LibreResponse = self
            .client
            .post(format!("{}/translate", self.base_url))
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(response.translated_text)
    }
}

impl Translator for LibreTranslate {
    fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }
        match self.request(text, source_lang, target_lang) {
            Ok(Some(translation)) => translation,
            Ok(None) => text.to_string(),
            Err(err) => {
                warn!(service = "libretranslate", error = %err, "translation failed, keeping source text");
                text.to_string()
            }
        }
    }
}
