//! CLI commands for shipline
//!
//! - **publish**: run the full multi-target publishing pipeline
//! - **notes**: generate and print release notes without publishing
//! - **targets**: list the fixed build matrix

pub mod notes;
pub mod publish;
pub mod targets;

pub use notes::run_notes;
pub use publish::run_publish;
pub use targets::run_targets;
