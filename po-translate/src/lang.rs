//! Language codes: checking user-supplied codes and reading a default
//! target language from the process locale.

use std::{env, str::FromStr};

use unic_langid::LanguageIdentifier;

/// Pseudo-code accepted as a source language by services that detect it.
pub const AUTO: &str = "auto";

/// Check that `code` is a usable language tag and return it with `_`
/// separators turned into `-` (`pt_BR` → `pt-BR`). `auto` is accepted as-is.
pub fn normalize_language(code: &str) -> Option<String> {
    let code = code.trim();
    if code.eq_ignore_ascii_case(AUTO) {
        return Some(AUTO.to_string());
    }
    let canonical = code.replace('_', "-");
    LanguageIdentifier::from_str(&canonical).ok()?;
    Some(canonical)
}

/// Extract the language part of a POSIX locale string such as
/// `sv_SE.UTF-8`. The `C` and `POSIX` locales carry no language.
pub fn language_from_locale(locale: &str) -> Option<String> {
    let language = locale.trim().split('_').next()?.split('.').next()?;
    match language {
        "" | "C" | "POSIX" => None,
        language => Some(language.to_string()),
    }
}

/// Default target language from the environment: `LANG`, or `LC_ALL` when
/// `LANG` is unset or empty.
pub fn target_from_env() -> Option<String> {
    target_from_vars(|name| env::var(name).ok())
}

fn target_from_vars(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    let locale = ["LANG", "LC_ALL"]
        .into_iter()
        .filter_map(&lookup)
        .find(|value| !value.is_empty())?;
    language_from_locale(&locale)
}
