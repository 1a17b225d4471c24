//! Collecting translation files from command-line paths.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::formats::FormatType;

/// Expand `paths` into the translation files they name or contain.
///
/// Files are kept when their extension is a supported one. Directories are
/// walked, descending into subdirectories only when `recursive` is set.
/// Hidden files are included and ignore files are not consulted. The result
/// is sorted and free of duplicates; paths that do not exist are skipped.
pub fn find_files<P: AsRef<Path>>(paths: &[P], recursive: bool) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if path.is_file() {
            if FormatType::from_path(path).is_some() {
                files.push(path.to_path_buf());
            } else {
                debug!(path = %path.display(), "skipping file with unsupported extension");
            }
        } else if path.is_dir() {
            walk_dir(path, recursive, &mut files);
        } else {
            warn!(path = %path.display(), "path does not exist");
        }
    }

    files.sort();
    files.dedup();
    files
}

fn walk_dir(root: &Path, recursive: bool, files: &mut Vec<PathBuf>) {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(false)
        .max_depth(if recursive { None } else { Some(1) })
        .build();

    for dent in walker {
        let dent = match dent {
            Ok(d) => d,
            Err(err) => {
                warn!(error = %err, "error while walking directory");
                continue;
            }
        };
        let is_file = dent.file_type().is_some_and(|t| t.is_file());
        if is_file && FormatType::from_path(dent.path()).is_some() {
            files.push(dent.into_path());
        }
    }
}
