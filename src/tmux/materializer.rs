use std::path::Path;

use tracing::{debug, info};

use super::client::{window_target, TmuxClient};
use super::executor::CommandExecutor;
use crate::error::{Error, Result, Step};
use crate::workspace::WorkspaceDescriptor;

/// Where materialization currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// The session was not found and must be built
    NotExists,
    /// The session is live; nothing is built, only attached
    Attaching,
    Creating,
    /// Building `window`; `index` is the tmux index of the window before
    /// it, or of the session's first window when `window` is 0
    WindowsPending { window: usize, index: usize },
    Ready,
}

/// How the session came to be ready for attaching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A live session with this name already existed and was left untouched
    Existing,
    /// The session was built from the descriptor
    Created,
}

/// Builds tmux sessions from workspace descriptors
pub struct Materializer<'a, E> {
    client: &'a TmuxClient<E>,
}

impl<'a, E: CommandExecutor> Materializer<'a, E> {
    pub fn new(client: &'a TmuxClient<E>) -> Self {
        Self { client }
    }

    /// Make sure a session for `descriptor` exists.
    ///
    /// An existing session is never modified. Otherwise the session is
    /// created, each window named or added in order, moved to `base_path`,
    /// and sent its commands. The first failing tmux command aborts the
    /// rest; windows built before it are left in place.
    pub async fn materialize(
        &self,
        descriptor: &WorkspaceDescriptor,
        base_path: &Path,
    ) -> Result<Outcome> {
        let session = descriptor.session_name.as_str();

        let mut state = if self.client.has_session(session).await {
            State::Attaching
        } else {
            State::NotExists
        };

        loop {
            debug!("session '{}': {:?}", session, state);
            state = match state {
                State::Attaching => {
                    info!("Session {} already exists. Attaching to it.", session);
                    return Ok(Outcome::Existing);
                }
                State::NotExists => State::Creating,
                State::Creating => {
                    let first = self
                        .client
                        .new_session(session)
                        .await
                        .map_err(|e| {
                            failed(
                                Step::CreateSession {
                                    session: session.to_string(),
                                },
                                e,
                            )
                        })?
                        .unwrap_or(0);
                    info!("Created session {}", session);
                    State::WindowsPending {
                        window: 0,
                        index: first,
                    }
                }
                State::WindowsPending { window, index } if window < descriptor.windows.len() => {
                    let index = self.build_window(descriptor, window, index, base_path).await?;
                    State::WindowsPending {
                        window: window + 1,
                        index,
                    }
                }
                State::WindowsPending { .. } => State::Ready,
                State::Ready => return Ok(Outcome::Created),
            };
        }
    }

    /// Name or create window `i`, change into `base_path`, then send its
    /// commands. `previous` is the tmux index of the window before it (or of
    /// the session's first window when `i` is 0). Returns the index used.
    async fn build_window(
        &self,
        descriptor: &WorkspaceDescriptor,
        i: usize,
        previous: usize,
        base_path: &Path,
    ) -> Result<usize> {
        let session = descriptor.session_name.as_str();
        let window = &descriptor.windows[i];

        let index = if i == 0 {
            self.client
                .rename_window(&window_target(session, previous), &window.name)
                .await
                .map_err(|e| failed(Step::RenameWindow { window: i }, e))?;
            previous
        } else {
            self.client
                .new_window(session, &window.name)
                .await
                .map_err(|e| failed(Step::NewWindow { window: i }, e))?
                .unwrap_or(previous + 1)
        };

        let target = window_target(session, index);
        debug!("window {} '{}' is {}", i, window.name, target);

        let cd = format!("cd {}", shell_quote(&base_path.to_string_lossy()));
        self.client
            .send_keys(&target, &cd)
            .await
            .map_err(|e| failed(Step::ChangeDirectory { window: i }, e))?;

        for (command, text) in window.commands.iter().enumerate() {
            self.client
                .send_keys(&target, text)
                .await
                .map_err(|e| failed(Step::SendCommand { window: i, command }, e))?;
        }

        Ok(index)
    }
}

fn failed(step: Step, err: anyhow::Error) -> Error {
    Error::Multiplexer {
        step,
        message: format!("{:#}", err),
    }
}

/// Quote `s` for a POSIX shell unless it is made only of safe characters
fn shell_quote(s: &str) -> String {
    let safe = |c: char| c.is_ascii_alphanumeric() || "/._-~+,:@%".contains(c);
    if !s.is_empty() && s.chars().all(safe) {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}
