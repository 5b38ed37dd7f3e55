pub mod archive;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ops;

mod app;

// Re-export App, Config and GitError from modules
pub use app::App;
pub use config::Config;
pub use error::GitError;

// Disable colors for all tests to get clean output
#[cfg(test)]
#[ctor::ctor]
fn init_tests() {
    colored::control::set_override(false);
}
