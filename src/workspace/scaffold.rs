use std::path::{Path, PathBuf};

use tracing::info;

use super::{WindowSpec, WorkspaceDescriptor, DESCRIPTOR_FILE};
use crate::error::{Error, Result};

/// tmux replaces `.` and `:` in session names with `_`; apply the same
/// rewrite so later targets name the session tmux actually creates
fn session_name(raw: &str) -> String {
    raw.replace(['.', ':'], "_")
}

/// Write a starter `.tmux` descriptor into `dir`.
///
/// The session is named after the directory unless `name` is given.
/// An existing descriptor is never overwritten.
pub fn write_scaffold(dir: &Path, name: Option<String>) -> Result<PathBuf> {
    let path = dir.join(DESCRIPTOR_FILE);
    if path.exists() {
        return Err(Error::DescriptorExists(path));
    }

    let session_name = session_name(&name.unwrap_or_else(|| {
        dir.file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "workspace".to_string())
    }));

    let descriptor = WorkspaceDescriptor {
        session_name,
        windows: vec![WindowSpec {
            name: "main".to_string(),
            commands: Vec::new(),
        }],
    };

    let mut content = serde_json::to_string_pretty(&descriptor).map_err(|source| Error::Parse {
        path: path.clone(),
        source,
    })?;
    content.push('\n');

    std::fs::write(&path, content).map_err(|source| Error::Io {
        path: path.clone(),
        source,
    })?;

    info!("wrote {}", path.display());
    Ok(path)
}
