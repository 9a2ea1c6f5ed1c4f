//! Error types for shipline with contextual messages and exit codes
//!
//! The pipeline's failure taxonomy is part of its contract: stages with
//! hard data dependencies (build → publish → release) halt on the first
//! error, while the downstream manifest families isolate their failures
//! and report them together at the end of the run.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for shipline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing release tag)
  User = 1,
  /// System error (build, publish, network, I/O)
  System = 2,
  /// Validation failure (duplicate release, downstream repositories)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for shipline
#[derive(Debug)]
pub enum ShipError {
  /// Configuration errors
  Config(ConfigError),

  /// No release tag reachable in release mode; nothing has been built yet
  VersionUnresolved { detail: String },

  /// One target's build step failed; the whole run is aborted
  BuildFailed { target: String, detail: String },

  /// A registry publish failed; remaining publishes (umbrella included) halt
  PublishFailed { bundle: String, detail: String },

  /// The forge comparison API could not produce release notes
  NotesUnavailable { detail: String },

  /// The forge already has a release for this tag
  ReleaseAlreadyExists { tag: String },

  /// One or more downstream repositories failed; siblings already completed
  DownstreamFailed { failures: Vec<DownstreamFailure> },

  /// External command failures (spawn, timeout, non-zero exit)
  Command(CommandError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

/// A single failed downstream repository, kept for the aggregated report
#[derive(Debug, Clone)]
pub struct DownstreamFailure {
  pub repository: String,
  pub reason: String,
}

impl ShipError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ShipError::Message { message, context, help } => ShipError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ShipError::Config(_) => ExitCode::User,
      ShipError::VersionUnresolved { .. } => ExitCode::User,
      ShipError::BuildFailed { .. } => ExitCode::System,
      ShipError::PublishFailed { .. } => ExitCode::System,
      ShipError::NotesUnavailable { .. } => ExitCode::System,
      ShipError::ReleaseAlreadyExists { .. } => ExitCode::Validation,
      ShipError::DownstreamFailed { .. } => ExitCode::Validation,
      ShipError::Command(_) => ExitCode::System,
      ShipError::Io(_) => ExitCode::System,
      ShipError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ShipError::Config(e) => e.help_message(),
      ShipError::VersionUnresolved { .. } => {
        Some("Create a release tag first (git tag vX.Y.Z) or publish with --snapshot.".to_string())
      }
      ShipError::BuildFailed { .. } => {
        Some("No artifact was published. Fix the build and re-run; the pipeline is all-targets-or-none.".to_string())
      }
      ShipError::PublishFailed { .. } => Some(
        "Check the registry for what was published, then re-run. The umbrella package was not published.".to_string(),
      ),
      ShipError::ReleaseAlreadyExists { tag } => Some(format!(
        "Delete the existing release (gh release delete {}) or tag a new version before re-running.",
        tag
      )),
      ShipError::DownstreamFailed { .. } => Some(
        "Earlier stages completed. Each failed repository can be retried by re-running the pipeline.".to_string(),
      ),
      ShipError::Command(e) => e.help_message(),
      ShipError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ShipError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ShipError::Config(e) => write!(f, "{}", e),
      ShipError::VersionUnresolved { detail } => {
        write!(f, "Could not resolve a release version: {}", detail)
      }
      ShipError::BuildFailed { target, detail } => {
        write!(f, "Build failed for target {}: {}", target, detail)
      }
      ShipError::PublishFailed { bundle, detail } => {
        write!(f, "Registry publish failed for {}: {}", bundle, detail)
      }
      ShipError::NotesUnavailable { detail } => {
        write!(f, "Release notes unavailable: {}", detail)
      }
      ShipError::ReleaseAlreadyExists { tag } => {
        write!(f, "A release for {} already exists on the forge", tag)
      }
      ShipError::DownstreamFailed { failures } => {
        writeln!(f, "{} downstream repositories failed:", failures.len())?;
        for failure in failures {
          writeln!(f, "  {} — {}", failure.repository, failure.reason)?;
        }
        Ok(())
      }
      ShipError::Command(e) => write!(f, "{}", e),
      ShipError::Io(e) => write!(f, "I/O error: {}", e),
      ShipError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ShipError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ShipError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ShipError {
  fn from(err: io::Error) -> Self {
    ShipError::Io(err)
  }
}

impl From<String> for ShipError {
  fn from(msg: String) -> Self {
    ShipError::message(msg)
  }
}

impl From<&str> for ShipError {
  fn from(msg: &str) -> Self {
    ShipError::message(msg)
  }
}

impl From<toml_edit::TomlError> for ShipError {
  fn from(err: toml_edit::TomlError) -> Self {
    ShipError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for ShipError {
  fn from(err: toml_edit::de::Error) -> Self {
    ShipError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ShipError {
  fn from(err: serde_json::Error) -> Self {
    ShipError::message(format!("JSON error: {}", err))
  }
}

impl From<semver::Error> for ShipError {
  fn from(err: semver::Error) -> Self {
    ShipError::message(format!("Version parse error: {}", err))
  }
}

impl From<zip::result::ZipError> for ShipError {
  fn from(err: zip::result::ZipError) -> Self {
    ShipError::message(format!("Archive error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for ShipError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    ShipError::message(format!("UTF-8 conversion error: {}", err))
  }
}

impl From<std::env::VarError> for ShipError {
  fn from(err: std::env::VarError) -> Self {
    ShipError::message(format!("Environment variable error: {}", err))
  }
}

impl From<CommandError> for ShipError {
  fn from(err: CommandError) -> Self {
    ShipError::Command(err)
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// shipline.toml not found
  NotFound { workspace_root: PathBuf },

  /// shipline.toml could not be parsed or fails validation
  Invalid { reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Create a shipline.toml with [package] and [forge] sections at the workspace root.".to_string())
      }
      ConfigError::Invalid { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { workspace_root } => {
        write!(
          f,
          "No shipline configuration found.\nExpected file: {}/shipline.toml",
          workspace_root.display()
        )
      }
      ConfigError::Invalid { reason } => {
        write!(f, "Invalid shipline configuration: {}", reason)
      }
    }
  }
}

/// External command errors
#[derive(Debug)]
pub enum CommandError {
  /// The program could not be spawned at all
  Spawn { program: String, reason: String },

  /// The command exceeded its deadline and was killed
  TimedOut { command: String, secs: u64 },

  /// The command ran but exited non-zero
  Failed { command: String, stderr: String },
}

impl CommandError {
  fn help_message(&self) -> Option<String> {
    match self {
      CommandError::Spawn { program, .. } => Some(format!("Is `{}` installed and on PATH?", program)),
      CommandError::TimedOut { .. } => Some("Check network connectivity and re-run.".to_string()),
      CommandError::Failed { .. } => None,
    }
  }
}

impl fmt::Display for CommandError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CommandError::Spawn { program, reason } => {
        write!(f, "Failed to start {}: {}", program, reason)
      }
      CommandError::TimedOut { command, secs } => {
        write!(f, "Command timed out after {}s: {}", secs, command)
      }
      CommandError::Failed { command, stderr } => {
        write!(f, "Command failed: {}\n{}", command, stderr.trim_end())
      }
    }
  }
}

/// Result type alias for shipline
pub type ShipResult<T> = Result<T, ShipError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ShipResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ShipError>,
{
  fn context(self, ctx: impl Into<String>) -> ShipResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ShipError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

/// Convert anyhow::Error to ShipError (test helpers and glue code)
impl From<anyhow::Error> for ShipError {
  fn from(err: anyhow::Error) -> Self {
    ShipError::message(err.to_string())
  }
}
