//! One module per CLI subcommand, each adding a `cmd_*` method to [`crate::App`].
//!
//! - [`clone`]: clone a repository (or prepare an empty directory)
//! - [`save`]: stage, commit and push a working copy
//! - [`zip`]: archive a directory
//! - [`build`]: run clone, archive and save from a build config file

pub mod build;
pub mod clone;
pub mod save;
pub mod zip;
