//! The free [MyMemory](https://mymemory.translated.net) API.

use reqwest::{Url, blocking::Client};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::{error::Error, translator::Translator};

const ENDPOINT: &str = "https://api.mymemory.translated.net/get";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    translated_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    response_data: Option<ResponseData>,
    /// A number on success, sometimes a string on errors.
    #[serde(default)]
    response_status: Value,
}

impl MyMemoryResponse {
    fn is_ok(&self) -> bool {
        match &self.response_status {
            Value::Number(n) => n.as_u64() == Some(200),
            Value::String(s) => s.trim() == "200",
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MyMemory {
    client: Client,
    email: Option<String>,
}

impl MyMemory {
    pub fn new(client: Client, email: Option<String>) -> Self {
        MyMemory { client, email }
    }

    fn endpoint(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<Url, Error> {
        let langpair = format!("{}|{}", source_lang, target_lang);
        let mut params = vec![("q", text), ("langpair", langpair.as_str())];
        if let Some(email) = self.email.as_deref() {
            params.push(("de", email));
        }
        Url::parse_with_params(ENDPOINT, &params).map_err(|e| Error::backend_error(e.to_string()))
    }

    fn request(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<Option<String>, Error> {
        let url = self.endpoint(text, source_lang, target_lang)?;
        let response: MyMemoryResponse = self.client.get(url).send()?.error_for_status()?.json()?;
        if !response.is_ok() {
            return Err(Error::backend_error(format!(
                "MyMemory returned status {}",
                response.response_status
            )));
        }
        Ok(response.response_data.and_then(|data| data.translated_text))
    }
}

impl Translator for MyMemory {
    fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }
        match self.request(text, source_lang, target_lang) {
            Ok(Some(translation)) => translation,
            Ok(None) => text.to_string(),
            Err(err) => {
                warn!(service = "mymemory", error = %err, "translation failed, keeping source text");
                text.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let memory = MyMemory::new(Client::new(), None);
        let url = memory.endpoint("Good morning", "en", "it").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.mymemory.translated.net/get?q=Good+morning&langpair=en%7Cit"
        );
    }

    #[test]
    fn test_endpoint_with_email() {
        let memory = MyMemory::new(Client::new(), Some("dev@example.org".to_string()));
        let url = memory.endpoint("Hi", "en", "it").unwrap();
        assert!(url.as_str().ends_with("&de=dev%40example.org"));
    }

    #[test]
    fn test_response_status() {
        let ok: MyMemoryResponse = serde_json::from_str(
            r#"{"responseData":{"translatedText":"Ciao"},"responseStatus":200}"#,
        )
        .unwrap();
        assert!(ok.is_ok());
        assert_eq!(ok.response_data.unwrap().translated_text.as_deref(), Some("Ciao"));

        let quota: MyMemoryResponse = serde_json::from_str(
            r#"{"responseData":{"translatedText":"QUOTA EXCEEDED"},"responseStatus":"429"}"#,
        )
        .unwrap();
        assert!(!quota.is_ok());
    }
}
