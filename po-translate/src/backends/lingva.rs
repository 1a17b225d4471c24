//! [Lingva](https://github.com/thedaviddelta/lingva-translate), a free
//! Google Translate front end. Single-string only.

use reqwest::{Url, blocking::Client};
use serde::Deserialize;
use tracing::warn;

use crate::{error::Error, translator::Translator};

pub const DEFAULT_URL: &str = "https://lingva.ml";

#[derive(Debug, Deserialize)]
struct LingvaResponse {
    translation: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Lingva {
    client: Client,
    base_url: String,
}

impl Lingva {
    pub fn new(client: Client, url: Option<String>) -> Self {
        let base_url = url.unwrap_or_else(|| DEFAULT_URL.to_string());
        Lingva {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `{base}/api/v1/{source}/{target}/{text}`, each segment percent-encoded.
    fn endpoint(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<Url, Error> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::config_error(format!("invalid Lingva URL `{}`: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::config_error(format!("invalid Lingva URL `{}`", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "v1", source_lang, target_lang, text]);
        Ok(url)
    }

    fn request(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<Option<String>, Error> {
        let url = self.endpoint(text, source_lang, target_lang)?;
        let response: LingvaResponse = self.client.get(url).send()?.error_for_status()?.json()?;
        Ok(response.translation)
    }
}

impl Translator for Lingva {
    fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }
        match self.request(text, source_lang, target_lang) {
            Ok(Some(translation)) => translation,
            Ok(None) => text.to_string(),
            Err(err) => {
                warn!(service = "lingva", error = %err, "translation failed, keeping source text");
                text.to_string()
            }
        }
    }
}
