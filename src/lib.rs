//! shipline — multi-target release publishing pipeline
//!
//! Turns a tagged source commit into published artifacts: per-target
//! registry bundles, an umbrella package declaring them as optional
//! dependencies, a forge release with zipped archives, and downstream
//! package-manager manifests (distro recipes and a formula). Partial
//! failure never corrupts already-published state: builds are
//! all-targets-or-none, publishes halt on the first failure, and only the
//! downstream families tolerate isolated failures.

pub mod commands;
pub mod core;
pub mod release;
pub mod ui;
