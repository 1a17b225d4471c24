//! Batch translation driver.
//!
//! Splits a catalog's untranslated entries into consecutive groups of at most
//! `batch_size`, sends each group to a [`Translator`], and writes the results
//! back onto the entries. Every entry sent ends up with a translation: short
//! or empty backend answers fall back to the source text.

use std::{
    path::Path,
    thread,
    time::{Duration, Instant},
};

use tracing::{debug, info};

use crate::{
    codec::CatalogFile,
    error::Error,
    traits::Catalog,
    translator::{Translator, reconcile},
};

pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Pause between two backend calls for the same file.
pub const DEFAULT_BATCH_PAUSE: Duration = Duration::from_millis(500);

/// Settings for one translation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    pub source_lang: String,
    pub target_lang: String,
    /// Maximum number of strings per backend call. Zero is treated as one.
    pub batch_size: usize,
    /// Translate but do not write files.
    pub dry_run: bool,
    /// Pause between backend calls; `Duration::ZERO` disables it.
    pub batch_pause: Duration,
}

impl BatchOptions {
    pub fn new(source_lang: impl Into<String>, target_lang: impl Into<String>) -> Self {
        BatchOptions {
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            dry_run: false,
            batch_pause: DEFAULT_BATCH_PAUSE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_batch_pause(mut self, batch_pause: Duration) -> Self {
        self.batch_pause = batch_pause;
        self
    }
}

/// Progress notifications emitted while a file is being translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Emitted once before the first backend call.
    Started { pending: usize, batches: usize },
    /// Emitted after batch `index` (1-based) has been applied.
    BatchDone {
        index: usize,
        batches: usize,
        size: usize,
    },
}

/// Outcome of translating one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReport {
    /// Entries that received a translation in this run.
    pub translated: usize,
    /// All entries in the file.
    pub total: usize,
    /// Backend calls made.
    pub batches: usize,
    /// Characters sent to the backend.
    pub source_chars: usize,
    /// Characters received back (after reconciliation).
    pub translated_chars: usize,
    pub elapsed: Duration,
    /// Whether the file was written back.
    pub saved: bool,
}

/// Translate every untranslated entry of `catalog` in place.
///
/// Returns without calling the backend when nothing needs translation.
pub fn translate_entries<C, T>(
    catalog: &mut C,
    translator: &T,
    options: &BatchOptions,
    mut progress: impl FnMut(Progress),
) -> FileReport
where
    C: Catalog + ?Sized,
    T: Translator + ?Sized,
{
    let started = Instant::now();
    let mut report = FileReport {
        total: catalog.entries().len(),
        ..Default::default()
    };

    let pending = catalog.untranslated_indices();
    if pending.is_empty() {
        report.elapsed = started.elapsed();
        return report;
    }

    let batch_size = options.batch_size.max(1);
    let batches = pending.len().div_ceil(batch_size);
    progress(Progress::Started {
        pending: pending.len(),
        batches,
    });

    for (batch, group) in pending.chunks(batch_size).enumerate() {
        if batch > 0 && !options.batch_pause.is_zero() {
            thread::sleep(options.batch_pause);
        }

        let texts: Vec<String> = {
            let entries = catalog.entries();
            group.iter().map(|&i| entries[i].source_text.clone()).collect()
        };
        debug!(batch = batch + 1, batches, size = texts.len(), "sending batch");
        let results = reconcile(
            translator.translate_batch(&texts, &options.source_lang, &options.target_lang),
            &texts,
        );

        let entries = catalog.entries_mut();
        for ((&index, source), result) in group.iter().zip(&texts).zip(results) {
            let result = if result.is_empty() { source.clone() } else { result };
            report.source_chars += source.chars().count();
            report.translated_chars += result.chars().count();
            entries[index].translated_text = result;
            report.translated += 1;
        }
        report.batches += 1;

        progress(Progress::BatchDone {
            index: batch + 1,
            batches,
            size: group.len(),
        });
    }

    report.elapsed = started.elapsed();
    report
}

/// Translate an opened file and save it unless this is a dry run.
pub fn translate_file<T: Translator + ?Sized>(
    file: &mut CatalogFile,
    translator: &T,
    options: &BatchOptions,
    progress: impl FnMut(Progress),
) -> Result<FileReport, Error> {
    let mut report = translate_entries(file, translator, options, progress);
    if report.translated == 0 {
        return Ok(report);
    }

    if options.dry_run {
        info!(path = %file.path().display(), "dry run, not saving");
    } else {
        file.save()?;
        report.saved = true;
    }
    Ok(report)
}

/// Open `path` by extension, translate it, and save it.
///
/// Unsupported extensions yield [`Error::UnsupportedFormat`]; read and parse
/// failures are returned as-is. Either way the caller can move on to the
/// next file.
pub fn translate_path<P, T>(
    path: P,
    translator: &T,
    options: &BatchOptions,
    progress: impl FnMut(Progress),
) -> Result<FileReport, Error>
where
    P: AsRef<Path>,
    T: Translator + ?Sized,
{
    let mut file = CatalogFile::open(path)?;
    translate_file(&mut file, translator, options, progress)
}

/// Totals over all files of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files: usize,
    pub failed: usize,
    pub translated: usize,
    pub total: usize,
    pub source_chars: usize,
    pub translated_chars: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn record(&mut self, report: &FileReport) {
        self.files += 1;
        self.translated += report.translated;
        self.total += report.total;
        self.source_chars += report.source_chars;
        self.translated_chars += report.translated_chars;
        self.elapsed += report.elapsed;
    }

    pub fn record_failure(&mut self) {
        self.files += 1;
        self.failed += 1;
    }

    /// Source characters translated per second of backend time.
    pub fn chars_per_second(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            self.source_chars as f64 / seconds
        } else {
            0.0
        }
    }
}
