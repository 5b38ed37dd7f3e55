use crate::config::Config;
use crate::ops::git::GitClient;
use crate::ops::process::ProcessRunner;
use crate::ops::process::RealProcessRunner;

pub struct App<R = RealProcessRunner> {
    pub config: Config,
    pub git: GitClient<R>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let git = GitClient::new(&config);
        Self { config, git }
    }
}

impl<R: ProcessRunner> App<R> {
    /// Build an app around a custom process runner (useful for tests)
    pub fn with_runner(config: Config, runner: R) -> Self {
        let git = GitClient::with_runner(runner, config.auth_token.clone());
        Self { config, git }
    }
}
