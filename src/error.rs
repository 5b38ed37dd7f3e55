//! Errors raised while driving the version-control executable.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type for git operations
pub type GitResult<T> = Result<T, GitError>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GitError {
    /// The executable could not be launched (missing binary, permissions, ...)
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The executable started but collecting its exit status or output failed
    #[error("Failed while waiting for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The executable ran and exited unsuccessfully
    #[error("`{command}` exited with {}", describe_exit(.code))]
    ExitCode { code: Option<i32>, command: String },

    /// An auth token is configured but the URL has no scheme we can embed it in
    #[error("Can't figure out where to put the auth token: '{url}' is not a git, http or https URL")]
    UnsupportedScheme { url: String },

    /// The auth token can't sit in a URL's userinfo without changing the URL
    #[error("Auth token contains '/', '@' or whitespace and can't be embedded in a URL")]
    InvalidAuthToken,

    /// The executable ran longer than the configured limit and was killed
    #[error("`{command}` did not finish within {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("IO error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GitError {
    /// Exit code carried by an [`GitError::ExitCode`], if any.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ExitCode { code, .. } => *code,
            _ => None,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
