use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use colored::Colorize;

use crate::App;
use crate::ops::git::redact_credentials;
use crate::ops::process::ProcessRunner;

impl<R: ProcessRunner> App<R> {
    /// Clone `repo` into `target`, or just create `target` when `repo` is empty.
    pub async fn cmd_clone(
        &self,
        repo: &str,
        branch: Option<&str>,
        target: &Path,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let status = self
            .git
            .clone_repo(Some(repo), branch, target)
            .await
            .with_context(|| format!("Failed to clone {}", redact_credentials(repo)))?;

        if status.is_empty() {
            writeln!(
                stdout,
                "No repository given, prepared {}",
                target.display().to_string().cyan()
            )?;
        } else {
            writeln!(stdout, "{} {}", status.green(), target.display())?;
        }

        Ok(())
    }
}
