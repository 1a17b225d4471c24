//! All supported localization file formats for po-translate.
//!
//! This module re-exports the main types for each format and provides
//! the [`FormatType`] enum for dispatching on a file's format.

pub mod po;
pub mod ts;
pub mod xliff;

use std::{
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

// Reexporting the formats for easier access
pub use po::Format as PoFormat;
pub use ts::Format as TsFormat;
pub use xliff::Format as XliffFormat;

use crate::Error;

/// Represents all supported localization file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatType {
    /// gettext `.po`.
    Po,
    /// Qt Linguist `.ts`.
    Ts,
    /// XLIFF `.xliff` / `.xlf`, version 1.x or 2.x.
    Xliff,
}

/// Human-friendly names: `"po"`, `"ts"`, `"xliff"`.
impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Po => write!(f, "po"),
            FormatType::Ts => write!(f, "ts"),
            FormatType::Xliff => write!(f, "xliff"),
        }
    }
}

/// Accepts format names and file extensions, case-insensitively:
/// - `"po"`, `"pot"`, `"gettext"` → `FormatType::Po`
/// - `"ts"`, `"qt"` → `FormatType::Ts`
/// - `"xliff"`, `"xlf"` → `FormatType::Xliff`
///
/// Returns [`crate::error::Error::UnknownFormat`] for anything else.
///
/// # Example
/// ```rust
/// use po_translate::formats::FormatType;
/// use std::str::FromStr;
/// assert_eq!(FormatType::from_str("PO").unwrap(), FormatType::Po);
/// assert_eq!(FormatType::from_str("xlf").unwrap(), FormatType::Xliff);
/// assert!(FormatType::from_str("strings").is_err());
/// ```
impl FromStr for FormatType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches('.').to_ascii_lowercase();
        match s.as_str() {
            "po" | "pot" | "gettext" => Ok(FormatType::Po),
            "ts" | "qt" => Ok(FormatType::Ts),
            "xliff" | "xlf" => Ok(FormatType::Xliff),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

/// File extensions picked up when searching directories.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["po", "ts", "xliff", "xlf"];

impl FormatType {
    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Po => "po",
            FormatType::Ts => "ts",
            FormatType::Xliff => "xliff",
        }
    }

    /// Infers the format from a path's extension (`.po`, `.ts`, `.xliff`,
    /// `.xlf`, case-insensitive). `.pot` templates are not matched: they are
    /// never translated in place.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<FormatType> {
        let extension = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        if SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            extension.parse().ok()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_type_display() {
        assert_eq!(FormatType::Po.to_string(), "po");
        assert_eq!(FormatType::Ts.to_string(), "ts");
        assert_eq!(FormatType::Xliff.to_string(), "xliff");
    }

    #[test]
    fn test_format_type_from_str() {
        assert_eq!(FormatType::from_str("po").unwrap(), FormatType::Po);
        assert_eq!(FormatType::from_str(" .PO ").unwrap(), FormatType::Po);
        assert_eq!(FormatType::from_str("gettext").unwrap(), FormatType::Po);
        assert_eq!(FormatType::from_str("TS").unwrap(), FormatType::Ts);
        assert_eq!(FormatType::from_str("xliff").unwrap(), FormatType::Xliff);
        assert_eq!(FormatType::from_str("XLF").unwrap(), FormatType::Xliff);
    }

    #[test]
    fn test_format_type_from_str_invalid() {
        assert!(FormatType::from_str("strings").is_err());
        assert!(FormatType::from_str("").is_err());
    }

    #[test]
    fn test_format_type_from_path() {
        assert_eq!(FormatType::from_path("po/sv.po"), Some(FormatType::Po));
        assert_eq!(FormatType::from_path("i18n/app_sv.TS"), Some(FormatType::Ts));
        assert_eq!(FormatType::from_path("a.xlf"), Some(FormatType::Xliff));
        assert_eq!(FormatType::from_path("a.xliff"), Some(FormatType::Xliff));
        assert_eq!(FormatType::from_path("template.pot"), None);
        assert_eq!(FormatType::from_path("README.md"), None);
        assert_eq!(FormatType::from_path("Makefile"), None);
    }

    #[test]
    fn test_format_type_extension() {
        assert_eq!(FormatType::Po.extension(), "po");
        assert_eq!(FormatType::Ts.extension(), "ts");
        assert_eq!(FormatType::Xliff.extension(), "xliff");
    }
}
