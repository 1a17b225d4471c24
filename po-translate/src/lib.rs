#![forbid(unsafe_code)]
//! Batch machine translation for localization files.
//!
//! Reads gettext `.po`, Qt Linguist `.ts`, and XLIFF (`.xliff`/`.xlf`)
//! files, sends their untranslated strings to a translation service in
//! batches, and writes the results back without disturbing anything else in
//! the file.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use po_translate::{BackendConfig, BatchOptions, Service, build_translator, translate_path};
//!
//! let translator = build_translator(Service::Lingva, &BackendConfig::default())?;
//! let options = BatchOptions::new("en", "sv");
//! let report = translate_path("po/sv.po", &translator, &options, |_| {})?;
//! println!("translated {} of {}", report.translated, report.total);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Supported Formats
//!
//! - **gettext `.po`**: comments, flags, contexts and plural forms survive a round trip
//! - **Qt `.ts`**: entries marked `unfinished` are retranslated; the marker is cleared on save
//! - **XLIFF 1.2 / 2.x**: missing `<target>` elements are created next to `<source>`
//!
//! # Services
//!
//! Lingva, MyMemory and LibreTranslate work without credentials. DeepL,
//! Google Cloud Translation, OpenAI-compatible endpoints and Anthropic need an
//! API key. See [`backends`].

pub mod backends;
pub mod codec;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod escape;
pub mod formats;
pub mod glossary;
pub mod lang;
pub mod traits;
pub mod translator;
pub mod types;
pub mod xml;

// Re-export most used types for easy consumption
pub use crate::{
    backends::{BackendConfig, Service, build_translator},
    codec::{CatalogFile, Document},
    discovery::find_files,
    driver::{
        BatchOptions, FileReport, Progress, RunSummary, translate_entries, translate_file,
        translate_path,
    },
    error::Error,
    formats::FormatType,
    glossary::Glossary,
    traits::{Catalog, Parser},
    translator::{Translator, reconcile},
    types::Entry,
};
