#![allow(async_fn_in_trait)]

use std::ffi::OsString;
use std::fmt;
use std::fmt::Display;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;
use tokio::process::Command;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::git::redact_credentials;
use crate::error::GitError;
use crate::error::GitResult;

// -----------------------------------------------------------------------------
// ProcessRunner trait

/// Runs one external command to completion.
#[cfg_attr(test, automock)]
pub trait ProcessRunner {
    /// Resolves when the command exits with code 0. The returned output is
    /// empty unless the runner captures child output.
    async fn run(&self, invocation: &CommandInvocation) -> GitResult<ProcessOutput>;
}

// -----------------------------------------------------------------------------
// Types

/// A program, its argument vector and an optional working directory.
///
/// Arguments are OS strings so paths reach the child byte for byte.
#[derive(Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub program: String,
    pub args: Vec<OsString>,
    /// `None` runs in the current process's working directory.
    pub cwd: Option<PathBuf>,
}

/// Output captured from a child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Where child stdio goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Connect the child directly to this process's stdin/stdout/stderr.
    #[default]
    Inherit,
    /// Pipe stdout/stderr and hand them back in [`ProcessOutput`].
    Capture,
}

impl CommandInvocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

/// Renders `program arg1 arg2 ...` with URL credentials masked.
impl Display for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", redact_credentials(&arg.to_string_lossy()))?;
        }
        Ok(())
    }
}

impl fmt::Debug for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<_> = self
            .args
            .iter()
            .map(|a| redact_credentials(&a.to_string_lossy()).into_owned())
            .collect();
        f.debug_struct("CommandInvocation")
            .field("program", &self.program)
            .field("args", &args)
            .field("cwd", &self.cwd)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// RealProcessRunner

/// Runner that spawns real child processes through tokio.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealProcessRunner {
    pub output: OutputMode,
    /// Kill the child and fail with [`GitError::Timeout`] after this long.
    /// `None` waits forever.
    pub timeout: Option<Duration>,
}

impl RealProcessRunner {
    pub fn new(output: OutputMode, timeout: Option<Duration>) -> Self {
        Self { output, timeout }
    }
}

impl ProcessRunner for RealProcessRunner {
    async fn run(&self, invocation: &CommandInvocation) -> GitResult<ProcessOutput> {
        debug!("Spawn: {invocation}");

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).kill_on_drop(true);
        if let Some(cwd) = &invocation.cwd {
            debug!("Using cwd: {}", cwd.display());
            command.current_dir(cwd);
        }
        match self.output {
            OutputMode::Inherit => {
                command
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
            OutputMode::Capture => {
                command
                    .stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped());
            }
        }

        let child = command.spawn().map_err(|source| {
            error!("{} failed to start: {source}", invocation.program);
            GitError::Spawn {
                command: invocation.to_string(),
                source,
            }
        })?;

        // Dropping the wait future drops the child, and kill_on_drop reaps it
        let wait = child.wait_with_output();
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, wait).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("{} timed out after {limit:?}, killing it", invocation.program);
                    return Err(GitError::Timeout {
                        command: invocation.to_string(),
                        timeout: limit,
                    });
                }
            },
            None => wait.await,
        };
        let output = result.map_err(|source| wait_failed(invocation, source))?;

        let captured = ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        match output.status.code() {
            Some(code) => info!("{} exited with code {code}", invocation.program),
            None => info!("{} was terminated by a signal", invocation.program),
        }

        if !output.status.success() {
            if !captured.stderr.is_empty() {
                error!("{}", redact_credentials(captured.stderr.trim_end()));
            }
            return Err(GitError::ExitCode {
                code: output.status.code(),
                command: invocation.to_string(),
            });
        }

        if !captured.stdout.is_empty() {
            debug!("{}", redact_credentials(captured.stdout.trim_end()));
        }
        // git writes progress and remote messages to stderr even on success
        if !captured.stderr.is_empty() {
            debug!("{}", redact_credentials(captured.stderr.trim_end()));
        }

        Ok(captured)
    }
}

fn wait_failed(invocation: &CommandInvocation, source: std::io::Error) -> GitError {
    error!("Lost track of {}: {source}", invocation.program);
    GitError::Wait {
        command: invocation.to_string(),
        source,
    }
}
