//! All error types for the po-translate crate.
//!
//! These are returned from all fallible operations (parsing, saving, backend
//! construction, glossary loading, etc.).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Creates a new configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Creates a new backend error.
    pub fn backend_error(message: impl Into<String>) -> Self {
        Error::Backend(message.into())
    }

    /// Returns `true` if the error means the file type is not handled at all,
    /// as opposed to a file that could not be read or parsed.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::UnsupportedFormat(_) | Error::UnknownFormat(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_unknown_format_error() {
        let error = Error::UnknownFormat("invalid_format".to_string());
        assert_eq!(error.to_string(), "unknown format `invalid_format`");
    }

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_unsupported_format_error() {
        let error = Error::UnsupportedFormat(".txt".to_string());
        assert_eq!(error.to_string(), "unsupported format: .txt");
        assert!(error.is_unsupported());
    }

    #[test]
    fn test_config_error() {
        let error = Error::config_error("openai requires an API key");
        assert_eq!(
            error.to_string(),
            "configuration error: openai requires an API key"
        );
        assert!(!error.is_unsupported());
    }

    #[test]
    fn test_backend_error() {
        let error = Error::backend_error("malformed response");
        assert_eq!(error.to_string(), "backend error: malformed response");
    }

    #[test]
    fn test_xml_error_is_not_unsupported() {
        let error = Error::InvalidResource("unclosed element".to_string());
        assert!(!error.is_unsupported());
        let debug = format!("{:?}", error);
        assert!(debug.contains("InvalidResource"));
    }
}
