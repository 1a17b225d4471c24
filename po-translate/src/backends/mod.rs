//! Network translation services.
//!
//! Each client implements [`Translator`] over blocking HTTP. Clients never
//! surface errors to their callers: a failed request is logged and the input
//! text is returned unchanged. Configuration problems, such as a missing API
//! key, are reported once by [`build_translator`] instead.

pub mod anthropic;
pub mod deepl;
pub mod google;
pub mod libretranslate;
pub mod lingva;
pub mod mymemory;
pub mod openai;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
    time::Duration,
};

use indoc::formatdoc;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::blocking::Client;

use crate::{error::Error, translator::Translator};

pub use anthropic::Anthropic;
pub use deepl::DeepL;
pub use google::Google;
pub use libretranslate::LibreTranslate;
pub use lingva::Lingva;
pub use mymemory::MyMemory;
pub use openai::OpenAi;

const USER_AGENT: &str = concat!("po-translate/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Optional per-service overrides, usually taken from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendConfig {
    pub api_key: Option<String>,
    /// Base URL of a self-hosted or compatible instance.
    pub url: Option<String>,
    /// Model name for LLM-backed services.
    pub model: Option<String>,
    /// Contact address; raises MyMemory's anonymous quota.
    pub email: Option<String>,
}

impl BackendConfig {
    /// The API key, treating an empty value as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    fn require_api_key(&self, service: Service) -> Result<String, Error> {
        self.api_key().map(str::to_string).ok_or_else(|| {
            Error::config_error(format!("the {} service requires an API key (--api-key)", service))
        })
    }
}

/// The supported translation services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Service {
    #[default]
    Lingva,
    MyMemory,
    LibreTranslate,
    DeepL,
    DeepLFree,
    Google,
    OpenAi,
    Anthropic,
}

impl Service {
    pub const ALL: [Service; 8] = [
        Service::Lingva,
        Service::MyMemory,
        Service::LibreTranslate,
        Service::DeepL,
        Service::DeepLFree,
        Service::Google,
        Service::OpenAi,
        Service::Anthropic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Service::Lingva => "lingva",
            Service::MyMemory => "mymemory",
            Service::LibreTranslate => "libretranslate",
            Service::DeepL => "deepl",
            Service::DeepLFree => "deepl-free",
            Service::Google => "google",
            Service::OpenAi => "openai",
            Service::Anthropic => "anthropic",
        }
    }

    /// Whether [`build_translator`] refuses to build this service without an
    /// API key.
    pub fn requires_api_key(&self) -> bool {
        matches!(
            self,
            Service::DeepL
                | Service::DeepLFree
                | Service::Google
                | Service::OpenAi
                | Service::Anthropic
        )
    }
}

impl Display for Service {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Service {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Service::ALL
            .into_iter()
            .find(|service| service.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Service::ALL.iter().map(Service::name).collect();
                Error::config_error(format!(
                    "unknown service `{}` (expected one of: {})",
                    s,
                    names.join(", ")
                ))
            })
    }
}

/// Build the client for `service`, validating its configuration.
///
/// # Returns
///
/// [`Error::Config`] when the service needs an API key and none is given.
pub fn build_translator(service: Service, config: &BackendConfig) -> Result<Box<dyn Translator>, Error> {
    let client = http_client()?;
    let url = config.url.clone();
    let model = config.model.clone();

    let translator: Box<dyn Translator> = match service {
        Service::Lingva => Box::new(Lingva::new(client, url)),
        Service::MyMemory => Box::new(MyMemory::new(client, config.email.clone())),
        Service::LibreTranslate => Box::new(LibreTranslate::new(
            client,
            url,
            config.api_key().map(str::to_string),
        )),
        Service::DeepL => Box::new(DeepL::new(client, config.require_api_key(service)?, false)),
        Service::DeepLFree => Box::new(DeepL::new(client, config.require_api_key(service)?, true)),
        Service::Google => Box::new(Google::new(client, config.require_api_key(service)?)),
        Service::OpenAi => Box::new(OpenAi::new(
            client,
            config.require_api_key(service)?,
            url,
            model,
        )),
        Service::Anthropic => Box::new(Anthropic::new(client, config.require_api_key(service)?, model)),
    };
    Ok(translator)
}

/// Shared blocking HTTP client with the tool's user agent.
pub fn http_client() -> Result<Client, Error> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()?)
}

lazy_static! {
    static ref NUMBERED_LINE: Regex = Regex::new(r"^\s*(\d+)[.)]\s*(.*)$").unwrap();
}

/// Build the instruction sent to chat-style models: the texts as a numbered
/// list, one per line, with embedded newlines kept as `\n`.
pub(crate) fn numbered_prompt(texts: &[String], source_lang: &str, target_lang: &str) -> String {
    let items: Vec<String> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| format!("{}. {}", i + 1, text.replace('\n', "\\n")))
        .collect();
    formatdoc! {"
        Translate the following numbered texts from {source_lang} to {target_lang}.
        Keep placeholders such as {{0}}, %s and %d exactly as they are.
        Keep \\n sequences where they appear.
        Reply only with the translations, one per line, using the same numbering.

        {items}",
        items = items.join("\n"),
    }
}

/// Pick `N. text` lines out of a model reply, in numbering order.
///
/// Positions the reply does not answer are filled from `texts`, so the
/// result always has one entry per input.
pub(crate) fn parse_numbered(reply: &str, texts: &[String]) -> Vec<String> {
    let mut results: Vec<Option<String>> = vec![None; texts.len()];
    for line in reply.lines() {
        let Some(caps) = NUMBERED_LINE.captures(line) else {
            continue;
        };
        let Ok(number) = caps[1].parse::<usize>() else {
            continue;
        };
        if number == 0 || number > texts.len() || results[number - 1].is_some() {
            continue;
        }
        results[number - 1] = Some(caps[2].trim().replace("\\n", "\n"));
    }
    results
        .into_iter()
        .zip(texts)
        .map(|(result, text)| result.unwrap_or_else(|| text.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_service_round_trips_through_names() {
        for service in Service::ALL {
            assert_eq!(service.name().parse::<Service>().unwrap(), service);
        }
        assert_eq!("DeepL-Free".parse::<Service>().unwrap(), Service::DeepLFree);
        assert_eq!(Service::default(), Service::Lingva);
        assert_eq!(Service::OpenAi.to_string(), "openai");
    }

    #[test]
    fn test_unknown_service() {
        let err = "babelfish".parse::<Service>().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("babelfish"));
    }

    #[test]
    fn test_api_key_required() {
        let config = BackendConfig::default();
        for service in Service::ALL {
            let result = build_translator(service, &config);
            if service.requires_api_key() {
                let err = result.err().unwrap();
                assert!(matches!(err, Error::Config(_)), "{}", service);
                assert!(err.to_string().contains(service.name()));
            } else {
                assert!(result.is_ok(), "{}", service);
            }
        }
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = BackendConfig {
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(build_translator(Service::Google, &config).is_err());

        let config = BackendConfig {
            api_key: Some("secret".to_string()),
            ..Default::default()
        };
        assert!(build_translator(Service::Google, &config).is_ok());
    }

    #[test]
    fn test_numbered_prompt() {
        let prompt = numbered_prompt(&strings(&["Hello", "Two\nlines"]), "en", "fr");
        assert!(prompt.starts_with("Translate the following numbered texts from en to fr."));
        assert!(prompt.contains("{0}, %s and %d"));
        assert!(prompt.ends_with("1. Hello\n2. Two\\nlines"));
    }

    #[test]
    fn test_parse_numbered() {
        let texts = strings(&["Hello", "Bye", "Yes"]);
        let reply = "Here you go:\n1. Bonjour\n3) Oui\n2. Au revoir\\nà bientôt\n4. extra";
        assert_eq!(
            parse_numbered(reply, &texts),
            strings(&["Bonjour", "Au revoir\nà bientôt", "Oui"])
        );
    }

    #[test]
    fn test_parse_numbered_falls_back_to_input() {
        let texts = strings(&["Hello", "Bye"]);
        assert_eq!(parse_numbered("1. Hallo", &texts), strings(&["Hallo", "Bye"]));
        assert_eq!(parse_numbered("no numbers", &texts), texts);
    }
}
