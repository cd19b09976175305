use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::tmux::{CommandExecutor, SystemExecutor};

/// Bridge to an external fuzzy line picker (fzf)
pub struct Picker<E = SystemExecutor> {
    program: String,
    executor: E,
}

impl Picker {
    pub fn new() -> Self {
        Self::with_executor(SystemExecutor)
    }
}

impl Default for Picker {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CommandExecutor> Picker<E> {
    pub fn with_executor(executor: E) -> Self {
        Self {
            program: "fzf".to_string(),
            executor,
        }
    }

    /// Offer `candidates` one per line, in order, and return the chosen one.
    ///
    /// `root` only names the search location when there is nothing to offer.
    pub async fn select(&self, root: &Path, candidates: &[PathBuf]) -> Result<PathBuf> {
        if candidates.is_empty() {
            return Err(Error::NothingToSelect(root.to_path_buf()));
        }

        let lines: Vec<String> = candidates
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect();

        let output = self
            .executor
            .run(&self.program, &[], Some(lines.as_slice()))
            .await
            .map_err(|e| Error::SelectionAborted(format!("could not run {}: {}", self.program, e)))?;

        if !output.success {
            return Err(Error::SelectionAborted(format!(
                "{} exited without a selection",
                self.program
            )));
        }

        let choice = output.stdout.trim();
        if choice.is_empty() {
            return Err(Error::SelectionAborted("nothing was selected".to_string()));
        }

        debug!("selected {}", choice);
        Ok(PathBuf::from(choice))
    }
}
