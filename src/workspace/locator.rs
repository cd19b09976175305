use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::DESCRIPTOR_FILE;
use crate::error::{Error, Result};

/// Deepest level searched below the root (the root itself is depth 0)
pub const MAX_DEPTH: usize = 3;

/// Find every `.tmux` descriptor at most [`MAX_DEPTH`] levels below `root`.
///
/// Directories deeper than the bound are not descended. Entries are visited
/// in file-name order, so the result is stable across runs. Failing to read
/// the root is fatal; unreadable subdirectories are skipped.
pub fn locate(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    let walker = WalkDir::new(root)
        .max_depth(MAX_DEPTH)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(Error::Scan {
                    path: root.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        if entry.file_name() == DESCRIPTOR_FILE {
            debug!("found descriptor {}", entry.path().display());
            found.push(entry.into_path());
        }
    }

    Ok(found)
}
