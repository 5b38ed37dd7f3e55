//! Integration with the external version-control executable.
//!
//! - [`process`]: runs a command to completion (`ProcessRunner`), with real and mock implementations
//! - [`git`]: clone and save-changes built on top of a `ProcessRunner`, plus URL token injection

pub mod git;
pub mod process;
