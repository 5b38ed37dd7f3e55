use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use anyhow::Result;
use colored::Colorize;
use tracing::info;
use tracing::instrument;
use tracing::warn;

use super::zip::archive;
use crate::App;
use crate::config::BuildConfig;
use crate::logger::LogLevel;
use crate::logger::write_box;
use crate::ops::process::ProcessRunner;

/// Where the build stages read and write.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Working copy the SDK repo is cloned into and pushed from
    pub repo_dir: PathBuf,
    /// Directory to zip and the archive to write
    pub zip: Option<(PathBuf, PathBuf)>,
    /// Commit message; defaults to the git client's automated message
    pub message: Option<String>,
}

impl<R: ProcessRunner> App<R> {
    /// Run the pipeline described by a build config.
    ///
    /// 1. Clone `settings.sdkRepo` into the repo directory (or create it).
    /// 2. Zip the requested directory, if any.
    /// 3. Commit and push the repo directory when `postbuild.gitCommit` is set.
    ///
    /// The first failing stage aborts the rest.
    #[instrument(skip_all, fields(name = build.name.as_deref().unwrap_or("")))]
    pub async fn cmd_build(
        &self,
        build: &BuildConfig,
        options: &BuildOptions,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let started = Instant::now();
        let sdk_repo = &build.settings.sdk_repo;
        let repo = sdk_repo.repo.as_deref();

        write_box("STAGE: clone", 0, LogLevel::Info);
        let status = self
            .git
            .clone_repo(repo, sdk_repo.branch.as_deref(), &options.repo_dir)
            .await
            .context("Clone stage failed")?;
        if !status.is_empty() {
            writeln!(stdout, "{}", status.green())?;
        }

        if let Some((input_dir, output)) = &options.zip {
            write_box("STAGE: archive", 0, LogLevel::Info);
            let summary = archive(input_dir, output).await?;
            writeln!(
                stdout,
                "Zipped {} files into {}",
                summary.files,
                output.display()
            )?;
        }

        write_box("STAGE: commit", 0, LogLevel::Info);
        if build.stage_settings.postbuild.git_commit {
            self.git
                .save_changes(repo, &options.repo_dir, options.message.as_deref())
                .await
                .context("Commit stage failed")?;
            if repo.is_some_and(|r| !r.is_empty()) {
                writeln!(stdout, "{}", "Changes pushed".green())?;
            }
        } else {
            warn!("Skipping git commit! Set stageSettings.postbuild.gitCommit=true to commit.");
        }

        info!(
            "Full build complete in {:.1}s",
            started.elapsed().as_secs_f64()
        );
        writeln!(stdout, "Build complete: {}", options.repo_dir.display())?;
        Ok(())
    }
}
