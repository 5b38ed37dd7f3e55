use std::fmt;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;

use crate::logger::LogLevel;
use crate::ops::process::OutputMode;
use crate::ops::process::RealProcessRunner;

/// Environment variable holding the token injected into repository URLs
pub const AUTH_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable holding the per-process timeout in seconds
pub const TIMEOUT_ENV: &str = "SDKGIT_TIMEOUT_SECS";

// -----------------------------------------------------------------------------
// AuthToken

/// Credential embedded into repository URLs. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw token, for building the authenticated URL only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(****)")
    }
}

impl fmt::Display for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

// -----------------------------------------------------------------------------
// Config

/// Runtime settings shared by every git operation of one [`crate::App`].
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub auth_token: Option<AuthToken>,
    pub output: OutputMode,
    pub timeout: Option<Duration>,
}

impl Config {
    /// Load config from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load config from an arbitrary variable lookup (useful for tests)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(token) = lookup(AUTH_TOKEN_ENV) {
            config = config.with_auth_token(token);
        }
        if let Some(secs) = lookup(TIMEOUT_ENV) {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("{TIMEOUT_ENV} must be a whole number of seconds"))?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Set the auth token. An empty token clears it.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        let token = AuthToken::new(token);
        self.auth_token = (!token.is_empty()).then_some(token);
        self
    }

    pub fn runner(&self) -> RealProcessRunner {
        RealProcessRunner::new(self.output, self.timeout)
    }
}

// -----------------------------------------------------------------------------
// BuildConfig

/// The part of an SDK build configuration file this tool acts on.
///
/// Build configs carry many more settings (codegen, swagger, scripts); unknown
/// keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildConfig {
    pub name: Option<String>,
    pub settings: Settings,
    pub stage_settings: StageSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub sdk_repo: SdkRepo,
    pub log_level: Option<LogLevel>,
    pub enable_logger_color: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SdkRepo {
    pub repo: Option<String>,
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StageSettings {
    pub postbuild: Postbuild,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Postbuild {
    pub git_commit: bool,
}

impl BuildConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read build config {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid build config {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
