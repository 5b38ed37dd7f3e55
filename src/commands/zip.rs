use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use colored::Colorize;

use crate::App;
use crate::archive::ZipSummary;
use crate::archive::zip_dir;
use crate::ops::process::ProcessRunner;

impl<R: ProcessRunner> App<R> {
    /// Zip `input_dir` into `output`.
    pub async fn cmd_zip(
        &self,
        input_dir: &Path,
        output: &Path,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let summary = archive(input_dir, output).await?;
        writeln!(
            stdout,
            "{} {} ({} files, {} bytes)",
            "Wrote".green(),
            output.display(),
            summary.files,
            summary.bytes
        )?;
        Ok(())
    }
}

/// Run [`zip_dir`] off the async runtime.
pub(crate) async fn archive(input_dir: &Path, output: &Path) -> Result<ZipSummary> {
    let input_dir = input_dir.to_path_buf();
    let output = output.to_path_buf();
    tokio::task::spawn_blocking(move || {
        zip_dir(&input_dir, &output)
            .with_context(|| format!("Failed to zip {}", input_dir.display()))
    })
    .await?
}
