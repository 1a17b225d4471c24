//! Core, format-agnostic types for po-translate.
//! Format adapters parse into these; the batch driver mutates them in place.

use std::fmt::Display;

use crate::xml::NodeId;

/// Flag marking an entry whose translation exists but needs human review.
pub const FLAG_FUZZY: &str = "fuzzy";

/// Flag marking a Qt message whose translation is incomplete, even when text
/// is already present.
pub const FLAG_UNFINISHED: &str = "unfinished";

/// A single translatable unit, shared across all supported formats.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    /// The original-language string. Empty only for the `.po` header.
    pub source_text: String,

    /// The target-language string. Empty means not yet translated.
    pub translated_text: String,

    /// Disambiguating context (`msgctxt`, Qt `<context><name>`, XLIFF group id).
    pub context: String,

    /// Comment lines, re-emitted verbatim on save (`.po` only).
    pub comments: Vec<String>,

    /// Status flags such as `fuzzy` or `unfinished`, in file order.
    pub flags: Vec<String>,

    /// `msgid_plural` of a `.po` entry, when present.
    pub plural_source: Option<String>,

    /// `msgstr[1]`, `msgstr[2]`, ... of a plural `.po` entry. `msgstr[0]` is
    /// held in `translated_text`.
    pub plural_forms: Vec<String>,

    /// Node this entry was read from, for XML-backed formats.
    pub(crate) origin: Option<NodeId>,
}

impl Entry {
    /// Creates an untranslated entry for `source_text`.
    pub fn new(source_text: impl Into<String>) -> Self {
        Entry {
            source_text: source_text.into(),
            ..Default::default()
        }
    }

    /// Builder-style setter for the translation.
    pub fn with_translation(mut self, translated_text: impl Into<String>) -> Self {
        self.translated_text = translated_text.into();
        self
    }

    /// Builder-style setter for the context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Builder-style helper adding a status flag.
    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    pub fn is_header(&self) -> bool {
        self.source_text.is_empty()
    }

    /// `true` when the entry has a source string, no translation, and is not
    /// marked fuzzy.
    ///
    /// Formats with an "unfinished" convention widen this through
    /// [`crate::traits::Catalog::is_untranslated`].
    pub fn needs_translation(&self) -> bool {
        !self.source_text.is_empty()
            && self.translated_text.is_empty()
            && !self.has_flag(FLAG_FUZZY)
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Entry {{ source: {:?}, translation: {:?}, context: {:?}, flags: [{}] }}",
            self.source_text,
            self.translated_text,
            self.context,
            self.flags.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_never_needs_translation() {
        let header = Entry::new("");
        assert!(header.is_header());
        assert!(!header.needs_translation());
    }

    #[test]
    fn test_translated_entry_does_not_need_translation() {
        let entry = Entry::new("Bye").with_translation("Adiós");
        assert!(!entry.needs_translation());
    }

    #[test]
    fn test_fuzzy_entry_is_skipped() {
        let entry = Entry::new("Hello").with_flag(FLAG_FUZZY);
        assert!(!entry.needs_translation());
    }

    #[test]
    fn test_empty_translation_needs_translation() {
        let entry = Entry::new("Hello").with_flag("c-format");
        assert!(entry.needs_translation());
        assert!(entry.has_flag("c-format"));
    }

    #[test]
    fn test_unfinished_alone_does_not_change_predicate() {
        let entry = Entry::new("Open")
            .with_translation("Öppna")
            .with_flag(FLAG_UNFINISHED);
        assert!(!entry.needs_translation());
    }

    #[test]
    fn test_display() {
        let entry = Entry::new("File").with_context("menu").with_flag("fuzzy");
        let shown = entry.to_string();
        assert!(shown.contains("\"File\""));
        assert!(shown.contains("\"menu\""));
        assert!(shown.contains("fuzzy"));
    }
}
