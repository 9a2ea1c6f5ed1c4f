//! Core building blocks for the publishing pipeline
//!
//! - **config**: shipline configuration (shipline.toml) parsing and validation
//! - **error**: pipeline error taxonomy with exit codes and contextual help
//! - **process**: typed external command invocation behind the CommandRunner seam
//! - **vcs**: git operations (tag lookup, downstream clone/commit/push)

pub mod config;
pub mod error;
pub mod process;
pub mod vcs;
