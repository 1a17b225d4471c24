//! Google Cloud Translation, basic edition (v2).

use reqwest::{Url, blocking::Client};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::Error,
    translator::{Translator, reconcile},
};

const ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";

#[derive(Debug, Serialize)]
struct GoogleRequest<'a> {
    q: &'a [String],
    source: &'a str,
    target: &'a str,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleTranslation {
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct GoogleData {
    #[serde(default)]
    translations: Vec<GoogleTranslation>,
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    data: GoogleData,
}

#[derive(Debug, Clone)]
pub struct Google {
    client: Client,
    api_key: String,
}

impl Google {
    pub fn new(client: Client, api_key: String) -> Self {
        Google { client, api_key }
    }

    fn request(&self, texts: &[String], source_lang: &str, target_lang: &str) -> Result<Vec<String>, Error> {
        let url = Url::parse_with_params(ENDPOINT, &[("key", self.api_key.as_str())])
            .map_err(|e| Error::backend_error(e.to_string()))?;
        let body = GoogleRequest {
            q: texts,
            source: source_lang,
            target: target_lang,
            format: "text",
        };
        let response: GoogleResponse = self
            .client
            .post(url)
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(response
            .data
            .translations
            .into_iter()
            .map(|t| t.translated_text)
            .collect())
    }
}

impl Translator for Google {
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
                warn!(service = "google", error = %err, "batch translation failed, keeping source texts");
                texts.to_vec()
            }
        }
    }
}
