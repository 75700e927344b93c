//! Media file scanner
//!
//! Walks the library root for media files and extracts catalog codes from
//! filenames, producing the code-to-release-directory mapping the rest of the
//! pipeline works from. The parent directory of each media file is the unit
//! of "a release": artwork and metadata are written next to the file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Media extension recognized by the scanner
const MEDIA_EXTENSION: &str = "mp4";

/// Scan `root` recursively and map each recognized catalog code to the parent
/// directory of the file that carries it.
///
/// Filenames with no recognizable code are skipped. When files under two
/// different directories carry the same code, the later one in traversal
/// order wins; the overwrite is logged so the operator can untangle the
/// collision.
pub fn scan(root: &Path, pattern: &Regex) -> Result<BTreeMap<String, PathBuf>> {
    let mut releases = BTreeMap::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry =
            entry.with_context(|| format!("Failed to walk directory {}", root.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !ext.eq_ignore_ascii_case(MEDIA_EXTENSION) {
            continue;
        }
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        // Uploader-tagged names ("group@CODE.mp4") are matched as-is, full
        // filename included, so a code-like uploader prefix wins over the
        // code after the '@'.
        match extract_code(filename, pattern) {
            Some(code) => {
                let dir = path.parent().unwrap_or(root).to_path_buf();
                debug!(code = %code, dir = %dir.display(), "Matched media file");
                if let Some(previous) = releases.insert(code.clone(), dir.clone()) {
                    if previous != dir {
                        warn!(
                            code = %code,
                            kept = %dir.display(),
                            dropped = %previous.display(),
                            "Duplicate catalog code, keeping the later directory"
                        );
                    }
                }
            }
            None => {
                debug!(file = %filename, "No catalog code in filename, skipping");
            }
        }
    }

    Ok(releases)
}

/// Extract the catalog code from a filename: the first pattern alternative
/// that matches anywhere in the name wins, and the matched substring is the
/// code.
pub fn extract_code(filename: &str, pattern: &Regex) -> Option<String> {
    pattern.find(filename).map(|m| m.as_str().to_string())
}
