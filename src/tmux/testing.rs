//! Scripted executor for exercising tmux and picker logic without processes

use std::collections::HashMap;
use std::io;
use std::sync::Mutex;

use super::executor::{CommandExecutor, CommandOutput};

/// Records every invocation and answers from a script.
///
/// Calls are keyed by their first argument (the tmux subcommand), or by
/// the program name when there are no arguments.
#[derive(Default)]
pub struct FakeExecutor {
    calls: Mutex<Vec<Vec<String>>>,
    inputs: Mutex<Vec<Vec<String>>>,
    env: Mutex<Vec<(String, String)>>,
    responses: HashMap<String, String>,
    failures: Vec<Failure>,
    unavailable: bool,
}

struct Failure {
    key: String,
    target: Option<String>,
    stderr: String,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to `key` with `stdout`
    pub fn respond(mut self, key: &str, stdout: &str) -> Self {
        self.responses.insert(key.to_string(), stdout.to_string());
        self
    }

    /// Make every `key` call exit non-zero
    pub fn fail_on(mut self, key: &str, stderr: &str) -> Self {
        self.failures.push(Failure {
            key: key.to_string(),
            target: None,
            stderr: stderr.to_string(),
        });
        self
    }

    /// Make `key` calls exit non-zero when `target` is among their arguments
    pub fn fail_on_target(mut self, key: &str, target: &str, stderr: &str) -> Self {
        self.failures.push(Failure {
            key: key.to_string(),
            target: Some(target.to_string()),
            stderr: stderr.to_string(),
        });
        self
    }

    /// Behave as if the program is not installed
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn inputs(&self) -> Vec<Vec<String>> {
        self.inputs.lock().unwrap().clone()
    }

    pub fn interactive_env(&self) -> Vec<(String, String)> {
        self.env.lock().unwrap().clone()
    }

    /// Subcommands in call order
    pub fn subcommands(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| call.first().cloned())
            .collect()
    }

    fn record(&self, program: &str, args: &[String]) -> io::Result<String> {
        self.calls.lock().unwrap().push(args.to_vec());
        if self.unavailable {
            return Err(io::Error::new(io::ErrorKind::NotFound, "program not found"));
        }
        Ok(args.first().cloned().unwrap_or_else(|| program.to_string()))
    }

    fn failure_for(&self, key: &str, args: &[String]) -> Option<&Failure> {
        self.failures.iter().find(|f| {
            f.key == key
                && f.target
                    .as_ref()
                    .map_or(true, |target| args.iter().any(|a| a == target))
        })
    }
}

impl CommandExecutor for FakeExecutor {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        input: Option<&[String]>,
    ) -> io::Result<CommandOutput> {
        let key = self.record(program, args)?;
        if let Some(lines) = input {
            self.inputs.lock().unwrap().push(lines.to_vec());
        }

        if let Some(failure) = self.failure_for(&key, args) {
            return Ok(CommandOutput {
                success: false,
                stdout: String::new(),
                stderr: failure.stderr.clone(),
            });
        }

        Ok(CommandOutput {
            success: true,
            stdout: self.responses.get(&key).cloned().unwrap_or_default(),
            stderr: String::new(),
        })
    }

    async fn run_interactive(
        &self,
        program: &str,
        args: &[String],
        env: &[(&str, &str)],
    ) -> io::Result<bool> {
        let key = self.record(program, args)?;
        self.env
            .lock()
            .unwrap()
            .extend(env.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        Ok(self.failure_for(&key, args).is_none())
    }
}
