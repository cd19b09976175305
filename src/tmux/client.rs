use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::executor::{CommandExecutor, SystemExecutor};

/// Terminal type forced on the attaching client
const ATTACH_TERM: &str = "xterm-256color";

/// Format string that makes tmux print the index of a window it created
const WINDOW_INDEX_FORMAT: &str = "#{window_index}";

/// Client for driving tmux through its command line
pub struct TmuxClient<E = SystemExecutor> {
    /// Path to tmux binary
    tmux_path: String,
    executor: E,
}

impl TmuxClient {
    pub fn new() -> Self {
        Self::with_executor(SystemExecutor)
    }
}

impl Default for TmuxClient {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CommandExecutor> TmuxClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self {
            tmux_path: "tmux".to_string(),
            executor,
        }
    }

    #[cfg(test)]
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Check whether a session exists.
    ///
    /// The name is matched exactly. Any failure, including tmux not being
    /// runnable at all, reads as "does not exist".
    pub async fn has_session(&self, name: &str) -> bool {
        let target = exact_session(name);
        match self.output(&["has-session", "-t", target.as_str()]).await {
            Ok(_) => true,
            Err(e) => {
                debug!("has-session '{}': {:#}", name, e);
                false
            }
        }
    }

    /// Create a detached session, returning the index of its first window
    /// if tmux reported one
    pub async fn new_session(&self, name: &str) -> Result<Option<usize>> {
        let stdout = self
            .output(&["new-session", "-d", "-s", name, "-P", "-F", WINDOW_INDEX_FORMAT])
            .await
            .context("Failed to create tmux session")?;
        Ok(parse_index(&stdout))
    }

    /// Append a window to a session, returning its index if tmux reported one
    pub async fn new_window(&self, session: &str, name: &str) -> Result<Option<usize>> {
        let target = format!("{}:", session);
        let stdout = self
            .output(&["new-window", "-t", target.as_str(), "-n", name, "-P", "-F", WINDOW_INDEX_FORMAT])
            .await
            .context("Failed to create tmux window")?;
        Ok(parse_index(&stdout))
    }

    pub async fn rename_window(&self, target: &str, name: &str) -> Result<()> {
        self.output(&["rename-window", "-t", target, name])
            .await
            .context("Failed to rename tmux window")?;
        Ok(())
    }

    /// Type `text` into a window and press Enter
    pub async fn send_keys(&self, target: &str, text: &str) -> Result<()> {
        self.output(&["send-keys", "-t", target, text, "C-m"])
            .await
            .context("Failed to send keys")?;
        Ok(())
    }

    /// Attach the current terminal to a session, blocking until the client
    /// detaches or exits
    pub async fn attach(&self, name: &str) -> Result<()> {
        let target = exact_session(name);
        let args = to_args(&["attach-session", "-t", target.as_str()]);
        let success = self
            .executor
            .run_interactive(&self.tmux_path, &args, &[("TERM", ATTACH_TERM)])
            .await
            .with_context(|| format!("Failed to execute {}", self.tmux_path))?;

        if !success {
            warn!("tmux attach-session '{}' exited with non-zero status", name);
        }
        Ok(())
    }

    /// Run a tmux control command, returning stdout or failing with stderr
    async fn output(&self, args: &[&str]) -> Result<String> {
        let args = to_args(args);
        let output = self
            .executor
            .run(&self.tmux_path, &args, None)
            .await
            .with_context(|| format!("Failed to execute {}", self.tmux_path))?;

        if !output.success {
            anyhow::bail!("{}", output.error_message());
        }

        Ok(output.stdout)
    }
}

/// Target string for a window of a session
pub fn window_target(session: &str, index: usize) -> String {
    format!("{}:{}", session, index)
}

/// Session target that tmux will not resolve by prefix or pattern
fn exact_session(name: &str) -> String {
    format!("={}", name)
}

fn to_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

fn parse_index(stdout: &str) -> Option<usize> {
    stdout.trim().parse().ok()
}
