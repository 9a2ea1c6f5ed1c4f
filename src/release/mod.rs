//! Release pipeline stages
//!
//! - **version**: channel selection and version resolution
//! - **target**: the fixed build matrix
//! - **bundle**: per-target artifact bundles and registry descriptors
//! - **matrix**: parallel build matrix runner
//! - **registry**: per-bundle publish and the umbrella package
//! - **archive**: deterministic zips and SHA-256 digests
//! - **notes**: release notes from the forge comparison API
//! - **github**: forge release creation
//! - **downstream**: distro-recipe and formula manifest families
//! - **pipeline**: stage orchestration and failure policy

pub mod archive;
pub mod bundle;
pub mod downstream;
pub mod github;
pub mod matrix;
pub mod notes;
pub mod pipeline;
pub mod registry;
pub mod target;
pub mod version;
