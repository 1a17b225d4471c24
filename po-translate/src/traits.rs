//! Traits for format-agnostic parsing, serialization, and translation state.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Cursor, Write},
    path::Path,
};

use crate::{error::Error, types::Entry};

/// A trait for parsing and writing localization resources from/to one file.
///
/// # Example
///
/// ```rust,no_run
/// use po_translate::traits::Parser;
/// let format = po_translate::formats::po::Format::read_from("messages.po")?;
/// format.write_to("messages_copy.po")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }

    /// Parse from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Serialize into an in-memory string.
    fn to_string_lossy(&self) -> Result<String, Error> {
        let mut out = Vec::new();
        self.to_writer(&mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

/// The translation-facing view of a parsed file: its ordered entries and the
/// rule deciding which of them still need translating.
pub trait Catalog {
    /// All entries, in file order.
    fn entries(&self) -> &[Entry];

    /// Mutable access to all entries. Only `translated_text` is expected to be
    /// changed through this.
    fn entries_mut(&mut self) -> &mut [Entry];

    /// Whether `entry` should be sent to a translation backend.
    fn is_untranslated(&self, entry: &Entry) -> bool {
        entry.needs_translation()
    }

    /// Positions of the untranslated entries, in file order.
    fn untranslated_indices(&self) -> Vec<usize> {
        self.entries()
            .iter()
            .enumerate()
            .filter(|(_, entry)| self.is_untranslated(entry))
            .map(|(index, _)| index)
            .collect()
    }

    /// The untranslated entries, in file order.
    fn get_untranslated(&self) -> Vec<&Entry> {
        self.entries()
            .iter()
            .filter(|entry| self.is_untranslated(entry))
            .collect()
    }
}
