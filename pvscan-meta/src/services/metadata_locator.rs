//! Metadata XML locator
//!
//! PrairieView writes one image file per frame and a single XML describing
//! the whole session next to them. Other XML files (environment or voltage
//! recordings) may share the directory, so a candidate only qualifies if it
//! contains a `Sequence` element.
//!
//! Candidates are visited in file-name order and the first qualifying file
//! wins. The instrument normally writes exactly one such file; if a
//! directory holds several, the lexicographically first is authoritative.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::document::PvDocument;
use crate::error::{MetadataError, MetadataResult};

/// Directory that holds the metadata for `image_path`
pub fn acquisition_directory(image_path: &Path) -> PathBuf {
    match image_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Find and parse the metadata XML next to an acquired image file
///
/// Malformed candidates fail the whole lookup rather than being skipped.
pub fn locate_metadata(image_path: &Path, extension: &str) -> MetadataResult<PvDocument> {
    let directory = acquisition_directory(image_path);

    let walker = WalkDir::new(&directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error accessing entry in {}: {}", directory.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_extension(entry.path(), extension) {
            continue;
        }

        debug!(file = %entry.path().display(), "Inspecting metadata candidate");
        let doc = PvDocument::from_file(entry.path())?;
        if doc.has_sequence() {
            info!(file = %entry.path().display(), "Selected metadata file");
            return Ok(doc);
        }
        debug!(file = %entry.path().display(), "Skipping XML without Sequence");
    }

    Err(MetadataError::NotFound { directory })
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy() == extension)
        .unwrap_or(false)
}
