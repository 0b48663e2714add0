//! Process execution abstraction for testability.
//!
//! Every external action (scan CLI, git) is described by a [`CommandSpec`]
//! and executed through the [`CommandRunner`] trait. Production code uses
//! [`ProcessRunner`]; tests substitute scripted runners.
//!
//! Commands are argument lists handed directly to the OS. No shell is
//! involved, so operator-supplied values (project names, branch names,
//! repository URLs) can never be interpreted as shell syntax.
//!
//! # Examples
//!
//! ```ignore
//! use cxflow_scanner::{CommandRunner, CommandSpec, ProcessRunner};
//!
//! let runner = ProcessRunner::new(None);
//! let spec = CommandSpec::new("/usr/local/bin/cx").arg("project").arg("list");
//! let stdout = runner.run(&spec).await?;
//! ```

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tracing::debug;

use crate::error::ScannerError;

/// A single argument, optionally hidden from rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CommandArg {
    value: String,
    secret: bool,
}

/// An external command: program, argument list, and working directory.
///
/// The [`Display`](fmt::Display) rendering is used in logs and error
/// messages. Secret arguments render as `***`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<CommandArg>,
    cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a command for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(CommandArg {
            value: value.into(),
            secret: false,
        });
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self = self.arg(value);
        }
        self
    }

    /// Append an argument that must never appear in logs or errors.
    pub fn secret_arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(CommandArg {
            value: value.into(),
            secret: true,
        });
        self
    }

    /// Run the command in `dir`.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Program to execute.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Raw argument values, secrets included.
    pub fn arg_values(&self) -> Vec<&str> {
        self.args.iter().map(|a| a.value.as_str()).collect()
    }

    /// Working directory, if any.
    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Whether the argument list starts with `prefix`.
    pub fn has_args_prefix(&self, prefix: &[&str]) -> bool {
        self.args.len() >= prefix.len()
            && self
                .args
                .iter()
                .zip(prefix)
                .all(|(arg, expected)| arg.value == *expected)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_token(f, &self.program)?;
        for arg in &self.args {
            f.write_str(" ")?;
            if arg.secret {
                f.write_str("***")?;
            } else {
                write_token(f, &arg.value)?;
            }
        }
        Ok(())
    }
}

fn write_token(f: &mut fmt::Formatter<'_>, token: &str) -> fmt::Result {
    if token.is_empty() || token.chars().any(|c| c.is_whitespace() || c == '"') {
        write!(f, "\"{}\"", token.replace('"', "\\\""))
    } else {
        f.write_str(token)
    }
}

/// Trait abstracting external command execution.
///
/// # Contract
///
/// - Zero exit status: returns stdout with surrounding whitespace trimmed.
/// - Non-zero exit status: returns [`ScannerError::CommandFailed`] carrying the
///   rendered command and captured stderr.
/// - Program cannot be started: returns [`ScannerError::Spawn`].
pub trait CommandRunner: Send + Sync + 'static {
    /// Run `spec` to completion and return its trimmed stdout.
    fn run(&self, spec: &CommandSpec) -> impl Future<Output = Result<String, ScannerError>> + Send;
}

/// Production runner backed by `tokio::process`.
///
/// stdin is closed, stdout/stderr are captured in full. With a timeout set,
/// a command exceeding it is killed and [`ScannerError::Timeout`] is returned.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// Create a runner. `None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<String, ScannerError> {
        let rendered = spec.to_string();

        let mut cmd = tokio::process::Command::new(spec.program());
        cmd.args(spec.arg_values())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = spec.cwd() {
            cmd.current_dir(dir);
        }

        debug!(command = %rendered, cwd = ?spec.cwd(), "running external command");

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| ScannerError::Timeout {
                    command: rendered.clone(),
                    secs: limit.as_secs(),
                })?,
            None => cmd.output().await,
        }
        .map_err(|e| ScannerError::Spawn {
            command: rendered.clone(),
            reason: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            debug!(
                command = %rendered,
                status = ?output.status.code(),
                "external command failed"
            );
            return Err(ScannerError::CommandFailed {
                command: rendered,
                status: output.status.code(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
    }
}

/// Scripted runner for unit tests.
///
/// Responses are matched by argument prefix in registration order; unmatched
/// commands succeed with empty output. Every call is recorded.
#[cfg(test)]
#[derive(Default)]
pub struct MockCommandRunner {
    responses: Vec<(Vec<String>, Result<String, String>)>,
    calls: std::sync::Mutex<Vec<CommandSpec>>,
}

#[cfg(test)]
impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Succeed with `stdout` for commands whose args start with `prefix`.
    pub fn on(mut self, prefix: &[&str], stdout: &str) -> Self {
        self.responses.push((
            prefix.iter().map(|s| (*s).to_owned()).collect(),
            Ok(stdout.to_owned()),
        ));
        self
    }

    /// Fail with `stderr` for commands whose args start with `prefix`.
    pub fn fail_on(mut self, prefix: &[&str], stderr: &str) -> Self {
        self.responses.push((
            prefix.iter().map(|s| (*s).to_owned()).collect(),
            Err(stderr.to_owned()),
        ));
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn count(&self, prefix: &[&str]) -> usize {
        self.calls()
            .iter()
            .filter(|spec| spec.has_args_prefix(prefix))
            .count()
    }
}

#[cfg(test)]
impl CommandRunner for MockCommandRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<String, ScannerError> {
        self.calls.lock().expect("calls lock").push(spec.clone());

        let prefix_matches = |prefix: &Vec<String>| {
            let prefix: Vec<&str> = prefix.iter().map(String::as_str).collect();
            spec.has_args_prefix(&prefix)
        };

        match self.responses.iter().find(|(prefix, _)| prefix_matches(prefix)) {
            Some((_, Ok(stdout))) => Ok(stdout.trim().to_owned()),
            Some((_, Err(stderr))) => Err(ScannerError::CommandFailed {
                command: spec.to_string(),
                status: Some(1),
                stderr: stderr.clone(),
            }),
            None => Ok(String::new()),
        }
    }
}
