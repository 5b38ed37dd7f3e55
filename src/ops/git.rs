use std::borrow::Cow;
use std::ffi::OsString;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use tracing::info;
use tracing::instrument;

use super::process::CommandInvocation;
use super::process::ProcessRunner;
use super::process::RealProcessRunner;
use crate::config::AuthToken;
use crate::config::Config;
use crate::error::GitError;
use crate::error::GitResult;

/// Executable used for every git operation
pub const GIT_PROGRAM: &str = "git";

/// Commit message used when the caller gives none
pub const DEFAULT_COMMIT_MESSAGE: &str = "automated commit";

/// Status returned by a successful clone
pub const CLONE_SUCCESS: &str = "Cloning successful.";

/// URL schemes that can carry an auth token, in match order
const TOKEN_SCHEMES: [&str; 3] = ["git://", "http://", "https://"];

static URL_CREDENTIALS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<scheme>[A-Za-z][A-Za-z0-9+.-]*://)[^@/\s]+@").expect("valid regex")
});

// -----------------------------------------------------------------------------
// GitClient

/// Git client.
///
/// Clones repositories and pushes local changes back, shelling out to the
/// `git` executable through a [`ProcessRunner`].
pub struct GitClient<R = RealProcessRunner> {
    runner: R,
    auth_token: Option<AuthToken>,
}

impl GitClient<RealProcessRunner> {
    pub fn new(config: &Config) -> Self {
        Self::with_runner(config.runner(), config.auth_token.clone())
    }
}

impl<R: ProcessRunner> GitClient<R> {
    pub fn with_runner(runner: R, auth_token: Option<AuthToken>) -> Self {
        Self { runner, auth_token }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Shallow-clone `repo` into `target`.
    ///
    /// Without a repo the target directory is created instead and git is not
    /// run, so a build can proceed from local sources.
    #[instrument(skip_all, fields(target = %target.display()))]
    pub async fn clone_repo(
        &self,
        repo: Option<&str>,
        branch: Option<&str>,
        target: &Path,
    ) -> GitResult<String> {
        let Some(repo) = non_empty(repo) else {
            info!("Repo was undefined. Skipping clone.");
            tokio::fs::create_dir_all(target)
                .await
                .map_err(|source| GitError::Io {
                    path: target.to_path_buf(),
                    source,
                })?;
            return Ok(String::new());
        };

        let repo = inject_auth_token(repo, self.auth_token.as_ref())?;

        let mut args: Vec<OsString> = vec!["clone".into(), "--quiet".into(), "--progress".into()];
        if let Some(branch) = non_empty(branch) {
            args.extend(["--branch".into(), branch.into()]);
        }
        args.extend(["--depth".into(), "1".into(), repo.into(), target.into()]);

        self.runner
            .run(&CommandInvocation::new(GIT_PROGRAM, args))
            .await?;

        Ok(CLONE_SUCCESS.to_string())
    }

    /// Stage everything in `local_dir`, commit it and push to `repo`.
    ///
    /// The stages run in order and the first failure aborts the rest. Nothing
    /// is rolled back: a failed push leaves the local commit in place.
    #[instrument(skip_all, fields(local_dir = %local_dir.display()))]
    pub async fn save_changes(
        &self,
        repo: Option<&str>,
        local_dir: &Path,
        message: Option<&str>,
    ) -> GitResult<String> {
        let Some(repo) = non_empty(repo) else {
            info!("Repo was undefined. Skipping commit/push.");
            return Ok(String::new());
        };

        let repo = inject_auth_token(repo, self.auth_token.as_ref())?;
        let message = non_empty(message).unwrap_or(DEFAULT_COMMIT_MESSAGE);

        let stages = [
            vec!["add".to_string(), "-A".to_string()],
            vec!["commit".to_string(), "-m".to_string(), message.to_string()],
            vec!["push".to_string(), format!("--repo={repo}")],
        ];
        for args in stages {
            let invocation = CommandInvocation::new(GIT_PROGRAM, args).current_dir(local_dir);
            self.runner.run(&invocation).await?;
        }

        Ok(String::new())
    }
}

// -----------------------------------------------------------------------------
// URL helpers

/// Embed `token` in the authority of `url`.
///
/// Returns a new string; without a (non-empty) token the URL comes back
/// unchanged. A token containing `/`, `@` or whitespace would end the
/// authority early, so it is rejected.
pub fn inject_auth_token(url: &str, token: Option<&AuthToken>) -> GitResult<String> {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        debug!("repo: {}", redact_credentials(url));
        return Ok(url.to_string());
    };
    if token
        .expose()
        .chars()
        .any(|c| c == '/' || c == '@' || c.is_whitespace())
    {
        return Err(GitError::InvalidAuthToken);
    }

    let Some(scheme) = TOKEN_SCHEMES.iter().find(|s| url.starts_with(*s)) else {
        return Err(GitError::UnsupportedScheme {
            url: redact_credentials(url).into_owned(),
        });
    };

    let injected = format!("{scheme}{}@{}", token.expose(), &url[scheme.len()..]);
    debug!("repo: {}", redact_credentials(&injected));
    Ok(injected)
}

/// Mask any `user[:password]@` authority in `text`.
pub fn redact_credentials(text: &str) -> Cow<'_, str> {
    URL_CREDENTIALS.replace_all(text, "${scheme}****@")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
