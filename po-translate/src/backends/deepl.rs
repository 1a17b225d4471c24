//! [DeepL](https://www.deepl.com/docs-api) API, Pro and Free hosts.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::Error,
    lang::AUTO,
    translator::{Translator, reconcile},
};

const PRO_URL: &str = "https://api.deepl.com/v2/translate";
const FREE_URL: &str = "https://api-free.deepl.com/v2/translate";

#[derive(Debug, Serialize)]
struct DeepLRequest<'a> {
    text: &'a [String],
    /// Omitted to let DeepL detect the source language.
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang: Option<String>,
    target_lang: String,
}

impl<'a> DeepLRequest<'a> {
    fn new(text: &'a [String], source_lang: &str, target_lang: &str) -> Self {
        DeepLRequest {
            text,
            source_lang: deepl_source_lang(source_lang),
            target_lang: deepl_lang(target_lang),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeepLTranslation {
    text: String,
}

#[derive(Debug, Deserialize)]
struct DeepLResponse {
    #[serde(default)]
    translations: Vec<DeepLTranslation>,
}

/// Map a language code onto DeepL's uppercase codes.
pub fn deepl_lang(lang: &str) -> String {
    match lang.to_ascii_lowercase().replace('_', "-").as_str() {
        "pt" => "PT-PT".to_string(),
        "pt-br" => "PT-BR".to_string(),
        "no" => "NB".to_string(),
        _ => lang.to_ascii_uppercase(),
    }
}

/// Source languages are plain codes without a region; `auto` means none.
fn deepl_source_lang(lang: &str) -> Option<String> {
    if lang.eq_ignore_ascii_case(AUTO) {
        return None;
    }
    let primary = lang.split(['-', '_']).next().unwrap_or(lang);
    Some(primary.to_ascii_uppercase())
}

#[derive(Debug, Clone)]
pub struct DeepL {
    client: Client,
    api_key: String,
    endpoint: &'static str,
}

impl DeepL {
    pub fn new(client: Client, api_key: String, free: bool) -> Self {
        DeepL {
            client,
            api_key,
            endpoint: if free { FREE_URL } else { PRO_URL },
        }
    }

    fn request(&self, texts: &[String], source_lang: &str, target_lang: &str) -> Result<Vec<String>, Error> {
        let body = DeepLRequest::new(texts, source_lang, target_lang);
        let response: DeepLResponse = self
            .client
            .post(self.endpoint)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(response.translations.into_iter().map(|t| t.text).collect())
    }
}

impl Translator for DeepL {
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
            Ok(results) => reconcile(results, texts),
            Err(err) => {
                warn!(service = "deepl", error = %err, "batch translation failed, keeping source texts");
                texts.to_vec()
            }
        }
    }
}
