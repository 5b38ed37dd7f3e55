use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use sdkgit::App;
use sdkgit::Config;
use sdkgit::commands::build::BuildOptions;
use sdkgit::config::BuildConfig;
use sdkgit::logger::LogLevel;
use sdkgit::logger::setup_logging;
use sdkgit::ops::process::OutputMode;

#[derive(Parser)]
#[command(name = "sdkgit")]
#[command(about = "Clone, commit and push generated SDK repositories", long_about = None)]
pub struct Cli {
    /// Token embedded in repository URLs (defaults to $GITHUB_TOKEN)
    #[arg(long, global = true)]
    pub auth_token: Option<String>,
    /// Log level (defaults to the build config's logLevel, then info)
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,
    /// Colorize log output
    #[arg(long, global = true)]
    pub color: bool,
    /// Capture git output into the log instead of passing it through
    #[arg(long, global = true)]
    pub capture: bool,
    /// Kill any git process running longer than this many seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Shallow-clone a repository (an empty repo just creates the target)
    Clone {
        repo: String,
        target: PathBuf,
        /// Branch to clone (defaults to the remote's default branch)
        #[arg(short, long)]
        branch: Option<String>,
    },
    /// Stage, commit and push all changes in a working copy
    Save {
        repo: String,
        dir: PathBuf,
        /// Commit message (defaults to "automated commit")
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Zip a directory
    Zip { input_dir: PathBuf, output: PathBuf },
    /// Clone, archive and push as described by a build config file
    Build {
        /// JSON build config
        #[arg(short, long)]
        config: PathBuf,
        /// Working copy for the SDK repository
        #[arg(long)]
        repo_dir: PathBuf,
        /// Directory to zip after cloning
        #[arg(long, requires = "zip_output")]
        zip_dir: Option<PathBuf>,
        /// Archive written from --zip-dir
        #[arg(long, requires = "zip_dir")]
        zip_output: Option<PathBuf>,
        /// Commit message
        #[arg(short, long)]
        message: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let build_config = match &cli.command {
        Commands::Build { config, .. } => Some(BuildConfig::load(config)?),
        _ => None,
    };
    let settings = build_config.as_ref().map(|c| &c.settings);
    let level = cli
        .log_level
        .or(settings.and_then(|s| s.log_level))
        .unwrap_or(LogLevel::Info);
    let use_color = cli.color || settings.is_some_and(|s| s.enable_logger_color);
    setup_logging(level, use_color)?;

    let mut config = Config::from_env()?;
    if let Some(token) = cli.auth_token {
        config = config.with_auth_token(token);
    }
    if cli.capture {
        config.output = OutputMode::Capture;
    }
    if let Some(secs) = cli.timeout {
        config.timeout = Some(Duration::from_secs(secs));
    }

    let app = App::new(config);
    let stdout = &mut std::io::stdout();

    match cli.command {
        Commands::Clone {
            repo,
            target,
            branch,
        } => {
            app.cmd_clone(&repo, branch.as_deref(), &target, stdout)
                .await?
        }
        Commands::Save { repo, dir, message } => {
            app.cmd_save(&repo, &dir, message.as_deref(), stdout)
                .await?
        }
        Commands::Zip { input_dir, output } => app.cmd_zip(&input_dir, &output, stdout).await?,
        Commands::Build {
            repo_dir,
            zip_dir,
            zip_output,
            message,
            ..
        } => {
            let options = BuildOptions {
                repo_dir,
                zip: zip_dir.zip(zip_output),
                message,
            };
            let build = build_config.unwrap_or_default();
            app.cmd_build(&build, &options, stdout).await?
        }
    }

    Ok(())
}
