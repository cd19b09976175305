mod locator;
mod scaffold;

pub use locator::locate;
pub use scaffold::write_scaffold;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// File name of a workspace descriptor
pub const DESCRIPTOR_FILE: &str = ".tmux";

/// A tmux workspace: one session and its windows
///
/// Missing fields decode to their empty values; no further validation is
/// done here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceDescriptor {
    /// tmux session name
    #[serde(default)]
    pub session_name: String,
    /// Windows in creation order
    #[serde(default)]
    pub windows: Vec<WindowSpec>,
}

/// A window and the shell commands typed into it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    #[serde(default)]
    pub name: String,
    /// Command lines, sent verbatim and in order
    #[serde(default)]
    pub commands: Vec<String>,
}

impl WorkspaceDescriptor {
    /// Read and decode a descriptor file
    pub fn parse(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_descriptor(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join(DESCRIPTOR_FILE);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_full_descriptor() {
        let tmp = TempDir::new().unwrap();
        let path = write_descriptor(
            tmp.path(),
            r#"{
                "session_name": "api",
                "windows": [
                    {"name": "editor", "commands": ["nvim ."]},
                    {"name": "server", "commands": ["cargo build", "cargo run"]}
                ]
            }"#,
        );

        let descriptor = WorkspaceDescriptor::parse(&path).unwrap();
        assert_eq!(descriptor.session_name, "api");
        assert_eq!(descriptor.windows.len(), 2);
        assert_eq!(descriptor.windows[1].name, "server");
        assert_eq!(descriptor.windows[1].commands, vec!["cargo build", "cargo run"]);
    }

    #[test]
    fn test_parse_is_permissive_about_missing_fields() {
        let tmp = TempDir::new().unwrap();
        let path = write_descriptor(tmp.path(), r#"{"session_name": "", "extra": 1}"#);

        let descriptor = WorkspaceDescriptor::parse(&path).unwrap();
        assert_eq!(descriptor, WorkspaceDescriptor::default());
    }

    #[test]
    fn test_parse_rejects_malformed_content() {
        let tmp = TempDir::new().unwrap();
        let path = write_descriptor(tmp.path(), "session_name = api");

        let err = WorkspaceDescriptor::parse(&path).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        let tmp = TempDir::new().unwrap();
        let path = write_descriptor(tmp.path(), r#"{"session_name": "s", "windows": "main"}"#);

        let err = WorkspaceDescriptor::parse(&path).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_parse_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = WorkspaceDescriptor::parse(&tmp.path().join(DESCRIPTOR_FILE)).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
