use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer as _;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Runs git quietly in `dir`, failing with `what` if it exits non-zero.
async fn git(dir: &Path, args: &[&str], what: &str) -> anyhow::Result<()> {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await?;
    anyhow::ensure!(status.success(), "{what} failed");
    Ok(())
}

/// Sets the identity git needs for commits in an existing repository.
pub async fn configure_user(dir: &Path) -> anyhow::Result<()> {
    git(dir, &["config", "user.name", "Test User"], "git config user.name").await?;
    git(
        dir,
        &["config", "user.email", "test@example.com"],
        "git config user.email",
    )
    .await?;
    git(dir, &["config", "commit.gpgsign", "false"], "git config commit.gpgsign").await?;
    Ok(())
}

/// Creates a bare repository at `dir/name` whose `main` branch holds one
/// commit with a README, and returns its `file://` URL.
pub async fn create_remote(dir: &Path, name: &str) -> anyhow::Result<String> {
    let bare = dir.join(name);
    tokio::fs::create_dir_all(&bare).await?;
    git(&bare, &["init", "--bare", "--initial-branch=main"], "git init --bare").await?;

    let seed = dir.join(format!("{name}-seed"));
    tokio::fs::create_dir_all(&seed).await?;
    git(&seed, &["init", "--initial-branch=main"], "git init").await?;
    configure_user(&seed).await?;
    tokio::fs::write(seed.join("README.md"), "# SDK\n").await?;
    git(&seed, &["add", "README.md"], "git add").await?;
    git(&seed, &["commit", "-m", "Initial commit"], "git commit").await?;
    git(
        &seed,
        &["push", bare.to_str().expect("utf-8 path"), "main"],
        "git push",
    )
    .await?;

    Ok(format!("file://{}", bare.display()))
}

/// Subject line of the latest commit on `branch` of a bare repository.
pub async fn last_commit_subject(bare: &Path, branch: &str) -> anyhow::Result<String> {
    let output = Command::new("git")
        .arg(format!("--git-dir={}", bare.display()))
        .args(["log", "-1", "--format=%s", branch])
        .output()
        .await?;
    anyhow::ensure!(output.status.success(), "git log failed");

    Ok(String::from_utf8(output.stdout)?.trim().to_string())
}

pub fn setup_logging() -> anyhow::Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let format = tracing_subscriber::fmt::format().with_timer(timer);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?;
    let subscriber = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .with_filter(filter);
    tracing_subscriber::registry().with(subscriber).init();
    Ok(())
}

pub enum TestDir {
    Temp(tempfile::TempDir),
    Kept(std::path::PathBuf),
}

impl TestDir {
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempfile::tempdir()?;

        if std::env::var("DEBUG_TESTS").is_ok() {
            let path = temp_dir.keep();
            eprintln!("Test directory kept at: {}", path.display());
            Ok(TestDir::Kept(path))
        } else {
            Ok(TestDir::Temp(temp_dir))
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            TestDir::Temp(t) => t.path(),
            TestDir::Kept(p) => p.as_path(),
        }
    }
}
