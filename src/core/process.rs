//! Typed external process invocation
//!
//! Every external step the pipeline takes (go, bun, git, gh, the registry
//! CLI) goes through a [`ProcessCommand`] so the invocation is a value:
//! inspectable in tests, renderable in errors, and runnable through the
//! [`CommandRunner`] seam. Success is an explicit exit-status check, never
//! inferred from output.

use crate::core::error::{CommandError, ShipResult};
use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use wait_timeout::ChildExt;

/// Deadline applied to network-touching commands (clone, push, publish, gh)
pub const NETWORK_TIMEOUT: Duration = Duration::from_secs(120);

/// A fully described external command invocation
#[derive(Debug, Clone)]
pub struct ProcessCommand {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: Option<PathBuf>,
  pub envs: Vec<(String, String)>,
  /// Clear the inherited environment, keeping only PATH and HOME
  pub env_clear: bool,
  pub timeout: Option<Duration>,
}

impl ProcessCommand {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
      envs: Vec::new(),
      env_clear: false,
      timeout: None,
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
    self.cwd = Some(dir.into());
    self
  }

  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.envs.push((key.into(), value.into()));
    self
  }

  pub fn env_clear(mut self) -> Self {
    self.env_clear = true;
    self
  }

  pub fn timeout(mut self, limit: Duration) -> Self {
    self.timeout = Some(limit);
    self
  }

  /// Render the invocation for error messages and logs
  pub fn rendered(&self) -> String {
    let mut parts = vec![self.program.clone()];
    parts.extend(self.args.iter().cloned());
    parts.join(" ")
  }
}

/// Captured result of a finished command
#[derive(Debug, Clone)]
pub struct ProcessOutput {
  /// Exit code; None when the process was killed by a signal
  pub status: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl ProcessOutput {
  pub fn success(&self) -> bool {
    self.status == Some(0)
  }

  pub fn stdout_trimmed(&self) -> &str {
    self.stdout.trim()
  }
}

/// Seam for executing external commands
///
/// Production uses [`SystemRunner`]; tests substitute a recording stub so
/// the pipeline can run without go/bun/gh installed.
pub trait CommandRunner: Send + Sync {
  fn run(&self, cmd: &ProcessCommand) -> ShipResult<ProcessOutput>;

  /// Run and require exit code zero
  fn run_checked(&self, cmd: &ProcessCommand) -> ShipResult<ProcessOutput> {
    let output = self.run(cmd)?;
    if !output.success() {
      return Err(
        CommandError::Failed {
          command: cmd.rendered(),
          stderr: output.stderr.clone(),
        }
        .into(),
      );
    }
    Ok(output)
  }
}

/// Runner backed by std::process with piped output and optional deadlines
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  fn run(&self, spec: &ProcessCommand) -> ShipResult<ProcessOutput> {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args);

    if let Some(dir) = &spec.cwd {
      cmd.current_dir(dir);
    }

    if spec.env_clear {
      // Isolated environment: keep only what subprocesses need to run
      cmd.env_clear();
      if let Ok(path) = std::env::var("PATH") {
        cmd.env("PATH", path);
      }
      if let Ok(home) = std::env::var("HOME") {
        cmd.env("HOME", home);
      }
    }
    for (key, value) in &spec.envs {
      cmd.env(key, value);
    }

    cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| CommandError::Spawn {
      program: spec.program.clone(),
      reason: e.to_string(),
    })?;

    // Drain both pipes on threads so a chatty child cannot fill a pipe
    // and stall behind the wait below.
    let stdout_handle = drain_pipe(child.stdout.take());
    let stderr_handle = drain_pipe(child.stderr.take());

    let status = match spec.timeout {
      Some(limit) => match child.wait_timeout(limit)? {
        Some(status) => status,
        None => {
          let _ = child.kill();
          let _ = child.wait();
          return Err(
            CommandError::TimedOut {
              command: spec.rendered(),
              secs: limit.as_secs(),
            }
            .into(),
          );
        }
      },
      None => child.wait()?,
    };

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();

    Ok(ProcessOutput {
      status: status.code(),
      stdout: String::from_utf8_lossy(&stdout).into_owned(),
      stderr: String::from_utf8_lossy(&stderr).into_owned(),
    })
  }
}

fn drain_pipe<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
  thread::spawn(move || {
    let mut buf = Vec::new();
    if let Some(mut reader) = pipe {
      let _ = reader.read_to_end(&mut buf);
    }
    buf
  })
}
