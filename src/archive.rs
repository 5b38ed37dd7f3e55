use std::fs::File;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use tracing::info;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::FileOptions;

/// What [`zip_dir`] wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZipSummary {
    pub files: usize,
    pub bytes: u64,
}

/// Zip the contents of `input_dir` into `output_path`.
///
/// Entries are stored relative to `input_dir`. Missing parents of
/// `output_path` are created.
pub fn zip_dir(input_dir: &Path, output_path: &Path) -> Result<ZipSummary> {
    if !input_dir.is_dir() {
        bail!("Input directory does not exist: {}", input_dir.display());
    }
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let file = File::create(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    // The archive may live inside the tree being zipped
    let output_canonical = output_path.canonicalize().ok();

    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut files = 0;

    for entry in WalkDir::new(input_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", input_dir.display()))?;
        let path = entry.path();
        if output_canonical.is_some() && path.canonicalize().ok() == output_canonical {
            continue;
        }

        let relative = path.strip_prefix(input_dir)?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            zip.add_directory(name, options)?;
        } else {
            zip.start_file(name, options)?;
            let mut source =
                File::open(path).with_context(|| format!("Failed to read {}", path.display()))?;
            std::io::copy(&mut source, &mut zip)?;
            files += 1;
        }
    }

    let file = zip.finish()?;
    let bytes = file.metadata()?.len();
    info!("{bytes} total bytes");
    info!(
        "Archive {} has been finalized ({files} files)",
        output_path.display()
    );

    Ok(ZipSummary { files, bytes })
}
