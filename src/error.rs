use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by every stage of the pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or unusable settings (no root, root not a directory)
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("could not read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not scan {}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The descriptor is not well-formed JSON of the expected shape
    #[error("could not parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no .tmux descriptors found under {}", .0.display())]
    NothingToSelect(PathBuf),

    #[error("selection aborted: {0}")]
    SelectionAborted(String),

    /// A tmux control command failed
    #[error("tmux {step} failed: {message}")]
    Multiplexer { step: Step, message: String },

    #[error("{} already exists", .0.display())]
    DescriptorExists(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The tmux control command that was running when materialization failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    CreateSession { session: String },
    RenameWindow { window: usize },
    NewWindow { window: usize },
    ChangeDirectory { window: usize },
    SendCommand { window: usize, command: usize },
    Attach { session: String },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::CreateSession { session } => write!(f, "new-session '{}'", session),
            Step::RenameWindow { window } => write!(f, "rename-window (window {})", window),
            Step::NewWindow { window } => write!(f, "new-window (window {})", window),
            Step::ChangeDirectory { window } => write!(f, "send-keys cd (window {})", window),
            Step::SendCommand { window, command } => {
                write!(f, "send-keys (window {}, command {})", window, command)
            }
            Step::Attach { session } => write!(f, "attach-session '{}'", session),
        }
    }
}
