//! Support for gettext `.po` files.
//!
//! A file is a sequence of blocks separated by blank lines. Each block holds
//! comment lines, an optional flags line (`#, fuzzy, c-format`), and the
//! `msgctxt` / `msgid` / `msgid_plural` / `msgstr[N]` keywords, each followed
//! by a quoted string and optional quoted continuation lines.

use std::{
    fs::File,
    io::{BufRead, Read, Write},
    path::Path,
};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use crate::{
    error::Error,
    escape::{escape, unescape},
    traits::{Catalog, Parser},
    types::Entry,
};

lazy_static! {
    static ref KEYWORD_LINE: Regex =
        Regex::new(r#"^(msgctxt|msgid_plural|msgid|msgstr)(?:\[(\d+)\])?\s+"(.*)""#).unwrap();
    static ref CONTINUATION_LINE: Regex = Regex::new(r#"^"(.*)""#).unwrap();
}

/// Highest `msgstr[N]` index accepted. gettext languages use at most six
/// plural forms.
const MAX_PLURAL_INDEX: usize = 15;

/// Represents a parsed `.po` file. Entries are independent values; saving
/// regenerates the file from them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    pub entries: Vec<Entry>,
}

/// Which field a continuation line appends to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Context,
    Id,
    PluralId,
    Str(usize),
}

impl Format {
    /// Parse the whole content of a `.po` file.
    ///
    /// # Returns
    ///
    /// [`Error::InvalidResource`] when a `msgstr[N]` index is out of range.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let mut entries = Vec::new();
        let mut block: Vec<&str> = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                if !block.is_empty() {
                    entries.extend(parse_block(&block)?);
                    block.clear();
                }
            } else {
                block.push(line);
            }
        }
        if !block.is_empty() {
            entries.extend(parse_block(&block)?);
        }

        Ok(Format { entries })
    }
}

/// Parse one blank-line-delimited block. Returns `None` when the block carries
/// neither a source nor a translation (comment-only or trailing blocks).
fn parse_block(lines: &[&str]) -> Result<Option<Entry>, Error> {
    let mut entry = Entry::default();
    let mut current: Option<Field> = None;

    for line in lines {
        if let Some(rest) = line.strip_prefix('#') {
            if let Some(flags) = rest.strip_prefix(',') {
                entry.flags = flags
                    .split(',')
                    .map(str::trim)
                    .filter(|flag| !flag.is_empty())
                    .map(str::to_string)
                    .collect();
            } else {
                entry.comments.push(line.to_string());
            }
            continue;
        }

        if let Some(caps) = KEYWORD_LINE.captures(line) {
            let value = unescape(&caps[3]);
            let field = match &caps[1] {
                "msgctxt" => Field::Context,
                "msgid" => Field::Id,
                "msgid_plural" => Field::PluralId,
                _ => Field::Str(match caps.get(2) {
                    Some(index) => plural_index(index.as_str())?,
                    None => 0,
                }),
            };
            *field_mut(&mut entry, field) = value;
            current = Some(field);
        } else if let Some(caps) = CONTINUATION_LINE.captures(line) {
            if let Some(field) = current {
                field_mut(&mut entry, field).push_str(&unescape(&caps[1]));
            }
        }
    }

    if entry.plural_source.is_none() && !entry.plural_forms.is_empty() {
        warn!(
            msgid = %entry.source_text,
            forms = entry.plural_forms.len(),
            "dropping msgstr[N] forms of an entry without msgid_plural"
        );
        entry.plural_forms.clear();
    }

    if entry.source_text.is_empty() && entry.translated_text.is_empty() {
        Ok(None)
    } else {
        Ok(Some(entry))
    }
}

fn plural_index(digits: &str) -> Result<usize, Error> {
    digits
        .parse::<usize>()
        .ok()
        .filter(|&index| index <= MAX_PLURAL_INDEX)
        .ok_or_else(|| {
            Error::InvalidResource(format!(
                "msgstr[{}] is out of range (at most {} plural forms)",
                digits,
                MAX_PLURAL_INDEX + 1
            ))
        })
}

fn field_mut(entry: &mut Entry, field: Field) -> &mut String {
    match field {
        Field::Context => &mut entry.context,
        Field::Id => &mut entry.source_text,
        Field::PluralId => entry.plural_source.get_or_insert_with(String::new),
        Field::Str(0) => &mut entry.translated_text,
        Field::Str(index) => {
            if entry.plural_forms.len() < index {
                entry.plural_forms.resize(index, String::new());
            }
            &mut entry.plural_forms[index - 1]
        }
    }
}

fn write_entry(content: &mut String, entry: &Entry) {
    for comment in &entry.comments {
        content.push_str(comment);
        content.push('\n');
    }
    if !entry.flags.is_empty() {
        content.push_str(&format!("#, {}\n", entry.flags.join(", ")));
    }
    if !entry.context.is_empty() {
        content.push_str(&format!("msgctxt \"{}\"\n", escape(&entry.context)));
    }
    content.push_str(&format!("msgid \"{}\"\n", escape(&entry.source_text)));

    match &entry.plural_source {
        Some(plural) => {
            content.push_str(&format!("msgid_plural \"{}\"\n", escape(plural)));
            content.push_str(&format!("msgstr[0] \"{}\"\n", escape(&entry.translated_text)));
            for (index, form) in entry.plural_forms.iter().enumerate() {
                content.push_str(&format!("msgstr[{}] \"{}\"\n", index + 1, escape(form)));
            }
        }
        None => {
            content.push_str(&format!("msgstr \"{}\"\n", escape(&entry.translated_text)));
        }
    }
}

impl Parser for Format {
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Format::parse(&content)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut content = String::new();
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                content.push('\n');
            }
            write_entry(&mut content, entry);
        }
        writer.write_all(content.as_bytes()).map_err(Error::Io)
    }

    /// Override default file reading to strip a byte-order mark and decode
    /// UTF-16 files.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        Format::parse(&decoded)
    }
}

impl Catalog for Format {
    fn entries(&self) -> &[Entry] {
        &self.entries
    }

    fn entries_mut(&mut self) -> &mut [Entry] {
        &mut self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FLAG_FUZZY;
    use indoc::indoc;

    fn save(format: &Format) -> String {
        let mut out = Vec::new();
        format.to_writer(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_header_and_entries() {
        let content = indoc! {r#"
            msgid ""
            msgstr ""
            "Content-Type: text/plain; charset=UTF-8\n"

            msgid "Hello"
            msgstr ""

            msgid "World"
            msgstr "Mundo"
        "#};
        let format = Format::parse(content).unwrap();
        assert_eq!(format.entries.len(), 3);
        assert!(format.entries[0].is_header());
        assert_eq!(
            format.entries[0].translated_text,
            "Content-Type: text/plain; charset=UTF-8\n"
        );
        assert_eq!(format.entries[2].translated_text, "Mundo");
    }

    #[test]
    fn test_empty_header_block_is_dropped() {
        let content = indoc! {r#"
            msgid ""
            msgstr ""

            msgid "Hello"
            msgstr ""

            msgid "Bye"
            msgstr "Adiós"
        "#};
        let format = Format::parse(content).unwrap();
        assert_eq!(format.entries.len(), 2);
        let untranslated = format.get_untranslated();
        assert_eq!(untranslated.len(), 1);
        assert_eq!(untranslated[0].source_text, "Hello");
    }

    #[test]
    fn test_fuzzy_entry_is_not_untranslated() {
        let content = indoc! {r#"
            #, fuzzy
            msgid "Hello"
            msgstr ""
        "#};
        let format = Format::parse(content).unwrap();
        assert_eq!(format.entries[0].flags, vec![FLAG_FUZZY.to_string()]);
        assert!(format.get_untranslated().is_empty());
    }

    #[test]
    fn test_comments_flags_and_context() {
        let content = indoc! {r#"
            # Translator note
            #. Extracted comment
            #: src/main.c:42
            #, c-format,  fuzzy
            msgctxt "menu"
            msgid "File"
            msgstr "Arkiv"
        "#};
        let entry = &Format::parse(content).unwrap().entries[0];
        assert_eq!(
            entry.comments,
            vec!["# Translator note", "#. Extracted comment", "#: src/main.c:42"]
        );
        assert_eq!(entry.flags, vec!["c-format", "fuzzy"]);
        assert_eq!(entry.context, "menu");
        assert_eq!(entry.source_text, "File");
        assert_eq!(entry.translated_text, "Arkiv");
    }

    #[test]
    fn test_later_flags_line_replaces_earlier() {
        let content = "#, fuzzy\n#, c-format\nmsgid \"a\"\nmsgstr \"\"\n";
        let entry = &Format::parse(content).unwrap().entries[0];
        assert_eq!(entry.flags, vec!["c-format"]);
    }

    #[test]
    fn test_continuation_lines_and_escapes() {
        let content = indoc! {r#"
            msgid ""
            "Hello "
            "\"World\"\n"
            msgstr ""
            "Hej "
            "\tVärlden"
        "#};
        let entry = &Format::parse(content).unwrap().entries[0];
        assert_eq!(entry.source_text, "Hello \"World\"\n");
        assert_eq!(entry.translated_text, "Hej \tVärlden");
    }

    #[test]
    fn test_plural_forms_are_kept_apart() {
        let content = indoc! {r#"
            msgid "%d file"
            msgid_plural "%d files"
            msgstr[0] "%d fil"
            msgstr[1] "%d "
            "filer"
        "#};
        let entry = &Format::parse(content).unwrap().entries[0];
        assert_eq!(entry.source_text, "%d file");
        assert_eq!(entry.plural_source.as_deref(), Some("%d files"));
        assert_eq!(entry.translated_text, "%d fil");
        assert_eq!(entry.plural_forms, vec!["%d filer"]);

        let saved = save(&Format::parse(content).unwrap());
        assert!(saved.contains("msgid_plural \"%d files\"\n"));
        assert!(saved.contains("msgstr[0] \"%d fil\"\n"));
        assert!(saved.contains("msgstr[1] \"%d filer\"\n"));
    }

    #[test]
    fn test_whitespace_only_lines_separate_blocks() {
        let content = "msgid \"a\"\nmsgstr \"\"\n   \nmsgid \"b\"\nmsgstr \"\"\n";
        assert_eq!(Format::parse(content).unwrap().entries.len(), 2);
    }

    #[test]
    fn test_comment_only_block_is_discarded() {
        let content = "# SOME DESCRIPTIVE TITLE.\n\nmsgid \"a\"\nmsgstr \"\"\n";
        let format = Format::parse(content).unwrap();
        assert_eq!(format.entries.len(), 1);
        assert!(format.entries[0].comments.is_empty());
    }

    #[test]
    fn test_save_layout() {
        let mut format = Format::parse(indoc! {r#"
            #: app.c:1
            #, c-format
            msgctxt "ctx"
            msgid "Hello"
            msgstr ""

            msgid "Bye"
            msgstr "Adiós"
        "#}).unwrap();
        format.entries[0].translated_text = "HELLO".to_string();
        assert_eq!(
            save(&format),
            indoc! {r#"
                #: app.c:1
                #, c-format
                msgctxt "ctx"
                msgid "Hello"
                msgstr "HELLO"

                msgid "Bye"
                msgstr "Adiós"
            "#}
        );
    }

    #[test]
    fn test_save_is_a_fixed_point() {
        let content = indoc! {r#"
            msgid ""
            msgstr ""
            "Language: sv\n"

            # comment
            #, fuzzy
            msgid "Tab\there"
            msgstr ""

            msgid "Back\\slash"
            msgstr "Bak\\snedstreck"
        "#};
        let first = Format::parse(content).unwrap();
        let second = Format::parse(&save(&first)).unwrap();
        assert_eq!(first, second);
        assert_eq!(save(&first), save(&second));
    }

    #[test]
    fn test_untranslated_entry_is_still_written() {
        let format = Format::parse("msgid \"a\"\nmsgstr \"\"\n").unwrap();
        assert_eq!(save(&format), "msgid \"a\"\nmsgstr \"\"\n");
    }

    #[test]
    fn test_out_of_range_plural_index_is_an_error() {
        for index in ["18446744073709551615", "99999999999999999999999", "100000000", "16"] {
            let content = format!(
                "msgid \"a\"\nmsgid_plural \"as\"\nmsgstr[0] \"x\"\nmsgstr[{}] \"y\"\n",
                index
            );
            let err = Format::from_str(&content).unwrap_err();
            assert!(matches!(err, Error::InvalidResource(_)), "{}", index);
            assert!(!err.is_unsupported());
        }
    }

    #[test]
    fn test_highest_plural_index_is_accepted() {
        let content = "msgid \"a\"\nmsgid_plural \"as\"\nmsgstr[0] \"x\"\nmsgstr[15] \"y\"\n";
        let entry = &Format::parse(content).unwrap().entries[0];
        assert_eq!(entry.plural_forms.len(), 15);
        assert_eq!(entry.plural_forms[14], "y");
    }

    #[test]
    fn test_plural_forms_without_msgid_plural_are_dropped() {
        let content = "msgid \"a\"\nmsgstr[0] \"x\"\nmsgstr[1] \"y\"\n";
        let format = Format::parse(content).unwrap();
        let entry = &format.entries[0];
        assert_eq!(entry.translated_text, "x");
        assert!(entry.plural_forms.is_empty());
        assert_eq!(save(&format), "msgid \"a\"\nmsgstr \"x\"\n");
    }
}
