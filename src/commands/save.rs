use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use colored::Colorize;

use crate::App;
use crate::ops::git::redact_credentials;
use crate::ops::process::ProcessRunner;

impl<R: ProcessRunner> App<R> {
    /// Stage, commit and push everything in `dir` to `repo`.
    ///
    /// An empty `repo` skips all three steps.
    pub async fn cmd_save(
        &self,
        repo: &str,
        dir: &Path,
        message: Option<&str>,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        self.git
            .save_changes(Some(repo), dir, message)
            .await
            .with_context(|| {
                format!(
                    "Failed to save changes in {} to {}",
                    dir.display(),
                    redact_credentials(repo)
                )
            })?;

        if repo.is_empty() {
            writeln!(stdout, "No repository given, nothing pushed")?;
        } else {
            writeln!(
                stdout,
                "{} {} to {}",
                "Pushed".green(),
                dir.display(),
                redact_credentials(repo)
            )?;
        }

        Ok(())
    }
}
