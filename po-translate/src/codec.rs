/// This module provides [`CatalogFile`], a translation file on disk opened
/// with the adapter matching its extension, and [`Document`], the closed set
/// of adapters it dispatches to.
///
/// Dispatch happens once, from the file extension, when the file is opened;
/// the rest of the crate works through the [`Catalog`] trait.
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    error::Error,
    formats::{FormatType, PoFormat, TsFormat, XliffFormat},
    traits::{Catalog, Parser},
    types::Entry,
};

/// A parsed translation file of any supported format.
#[derive(Debug, Clone)]
pub enum Document {
    Po(PoFormat),
    Ts(TsFormat),
    Xliff(XliffFormat),
}

impl Document {
    /// Reads a file with the adapter for `format_type`.
    pub fn read_from<P: AsRef<Path>>(path: P, format_type: FormatType) -> Result<Self, Error> {
        let path = path.as_ref();
        Ok(match format_type {
            FormatType::Po => Document::Po(PoFormat::read_from(path)?),
            FormatType::Ts => Document::Ts(TsFormat::read_from(path)?),
            FormatType::Xliff => Document::Xliff(XliffFormat::read_from(path)?),
        })
    }

    /// Parses in-memory content with the adapter for `format_type`.
    pub fn from_str(content: &str, format_type: FormatType) -> Result<Self, Error> {
        Ok(match format_type {
            FormatType::Po => Document::Po(PoFormat::from_str(content)?),
            FormatType::Ts => Document::Ts(TsFormat::from_str(content)?),
            FormatType::Xliff => Document::Xliff(XliffFormat::from_str(content)?),
        })
    }

    pub fn format_type(&self) -> FormatType {
        match self {
            Document::Po(_) => FormatType::Po,
            Document::Ts(_) => FormatType::Ts,
            Document::Xliff(_) => FormatType::Xliff,
        }
    }

    /// Writes the document, including every translation assigned so far.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        match self {
            Document::Po(format) => format.write_to(path),
            Document::Ts(format) => format.write_to(path),
            Document::Xliff(format) => format.write_to(path),
        }
    }

    /// Serializes the document into a string.
    pub fn to_string_lossy(&self) -> Result<String, Error> {
        match self {
            Document::Po(format) => format.to_string_lossy(),
            Document::Ts(format) => format.to_string_lossy(),
            Document::Xliff(format) => format.to_string_lossy(),
        }
    }

    fn catalog(&self) -> &dyn Catalog {
        match self {
            Document::Po(format) => format,
            Document::Ts(format) => format,
            Document::Xliff(format) => format,
        }
    }
}

impl Catalog for Document {
    fn entries(&self) -> &[Entry] {
        self.catalog().entries()
    }

    fn entries_mut(&mut self) -> &mut [Entry] {
        match self {
            Document::Po(format) => format.entries_mut(),
            Document::Ts(format) => format.entries_mut(),
            Document::Xliff(format) => format.entries_mut(),
        }
    }

    fn is_untranslated(&self, entry: &Entry) -> bool {
        self.catalog().is_untranslated(entry)
    }
}

/// A translation file opened from disk, remembering where to save it.
#[derive(Debug, Clone)]
pub struct CatalogFile {
    path: PathBuf,
    document: Document,
}

impl CatalogFile {
    /// Opens a file, choosing the adapter from its extension.
    ///
    /// # Returns
    ///
    /// [`Error::UnsupportedFormat`] when the extension is not one of the
    /// supported ones, or the adapter's read/parse error.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let format_type = FormatType::from_path(path).ok_or_else(|| {
            let extension = path
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_else(|| "(no extension)".to_string());
            Error::UnsupportedFormat(extension)
        })?;
        Self::open_as(path, format_type)
    }

    /// Opens a file with an explicit format, regardless of its extension.
    pub fn open_as<P: AsRef<Path>>(path: P, format_type: FormatType) -> Result<Self, Error> {
        let path = path.as_ref();
        let document = Document::read_from(path, format_type)?;
        debug!(
            path = %path.display(),
            format = %format_type,
            entries = document.entries().len(),
            "opened translation file"
        );
        Ok(CatalogFile {
            path: path.to_path_buf(),
            document,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format_type(&self) -> FormatType {
        self.document.format_type()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Writes the file back to where it was read from.
    pub fn save(&self) -> Result<(), Error> {
        self.save_as(&self.path)
    }

    /// Writes the file to another location.
    pub fn save_as<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        self.document.write_to(&path)?;
        info!(path = %path.as_ref().display(), "saved translation file");
        Ok(())
    }
}

impl Catalog for CatalogFile {
    fn entries(&self) -> &[Entry] {
        self.document.entries()
    }

    fn entries_mut(&mut self) -> &mut [Entry] {
        self.document.entries_mut()
    }

    fn is_untranslated(&self, entry: &Entry) -> bool {
        self.document.is_untranslated(entry)
    }
}
