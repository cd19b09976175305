use std::io;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Captured result of a finished external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Trimmed stderr, or a generic note when the command printed nothing
    pub fn error_message(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            "exited with non-zero status".to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Runs external programs on behalf of the tmux client and the picker.
///
/// `Err` means the program could not be started or waited on; a program
/// that ran and failed is reported through [`CommandOutput::success`].
#[allow(async_fn_in_trait)]
pub trait CommandExecutor {
    /// Run `program` to completion, capturing stdout and stderr.
    ///
    /// When `input` is given, its lines are written to the program's stdin
    /// while it runs, and stdin is closed afterwards. Such a program is
    /// interactive, so its stderr stays on the terminal and is not captured.
    async fn run(
        &self,
        program: &str,
        args: &[String],
        input: Option<&[String]>,
    ) -> io::Result<CommandOutput>;

    /// Run `program` on the caller's terminal with inherited stdio,
    /// returning whether it exited successfully.
    async fn run_interactive(
        &self,
        program: &str,
        args: &[String],
        env: &[(&str, &str)],
    ) -> io::Result<bool>;
}

/// Executor backed by real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        input: Option<&[String]>,
    ) -> io::Result<CommandOutput> {
        debug!("running {} {:?}", program, args);

        let mut child = Command::new(program)
            .args(args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            // Pickers draw on stderr; only control commands have it captured
            .stderr(if input.is_some() {
                Stdio::inherit()
            } else {
                Stdio::piped()
            })
            .spawn()?;

        // The reader may not drain stdin until it has seen all of it, so the
        // writer runs alongside the wait below rather than before it.
        let writer = match (input, child.stdin.take()) {
            (Some(lines), Some(mut stdin)) => {
                let lines = lines.to_vec();
                Some(tokio::spawn(async move {
                    for line in lines {
                        stdin.write_all(line.as_bytes()).await?;
                        stdin.write_all(b"\n").await?;
                    }
                    stdin.shutdown().await
                }))
            }
            _ => None,
        };

        let output = child.wait_with_output().await?;

        if let Some(writer) = writer {
            match writer.await {
                Ok(Err(e)) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e),
                Err(e) => return Err(io::Error::new(io::ErrorKind::Other, e)),
                _ => {}
            }
        }

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    async fn run_interactive(
        &self,
        program: &str,
        args: &[String],
        env: &[(&str, &str)],
    ) -> io::Result<bool> {
        debug!("running {} {:?} on the terminal", program, args);

        let status = Command::new(program)
            .args(args)
            .envs(env.iter().copied())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        Ok(status.success())
    }
}
