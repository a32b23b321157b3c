// src/exec.rs
use std::io::ErrorKind;
use std::path::Path;
use std::process::Output;
use std::time::Duration;

use duct::cmd;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, trace};

use crate::error::ScaffoldError;

/// Runs one external command to completion.
pub trait CommandRunner {
  fn run(&self, command: &str, cwd: Option<&Path>) -> Result<(), ScaffoldError>;
}

/// Runs commands through `sh -c`, capturing output so failures can be
/// reported with their stderr.
#[derive(Debug, Default)]
pub struct ShellRunner {
  /// Show a spinner while the command runs.
  pub spinner: bool,
}

impl ShellRunner {
  pub fn new(spinner: bool) -> Self {
    Self { spinner }
  }

  fn start_spinner(&self, command: &str) -> Option<ProgressBar> {
    if !self.spinner {
      return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
      ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .expect("Failed to set spinner style"),
    );
    pb.set_message(format!("Running `{}`...", command));
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
  }
}

impl CommandRunner for ShellRunner {
  fn run(&self, command: &str, cwd: Option<&Path>) -> Result<(), ScaffoldError> {
    info!(
      "Executing `{}` in {}",
      command,
      cwd.map_or_else(|| ".".to_string(), |p| p.display().to_string())
    );

    let mut expr = cmd!("sh", "-c", command)
      .stdout_capture()
      .stderr_capture()
      .unchecked(); // non-zero exits come back as Ok(Output)
    if let Some(dir) = cwd {
      expr = expr.dir(dir);
    }

    let spinner = self.start_spinner(command);
    let result = expr.run();
    if let Some(pb) = spinner {
      pb.finish_and_clear();
    }

    let output: Output = result.map_err(|e| {
      error!("Failed to start `{}`: {}", command, e);
      if e.kind() == ErrorKind::NotFound {
        ScaffoldError::CommandExecError {
          command: command.to_string(),
          source: format!("Command/shell not found: {}", e).into(),
        }
      } else {
        ScaffoldError::CommandExecError {
          command: command.to_string(),
          source: Box::new(e),
        }
      }
    })?;

    if log::log_enabled!(log::Level::Trace) {
      trace!("`{}` stdout:\n{}", command, String::from_utf8_lossy(&output.stdout));
      trace!("`{}` stderr:\n{}", command, String::from_utf8_lossy(&output.stderr));
    }

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).to_string();
      error!(
        "`{}` failed (status: {:?}).\nStderr:\n{}",
        command, output.status, stderr
      );
      return Err(ScaffoldError::CommandFailedStatus {
        command: command.to_string(),
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr,
      });
    }

    debug!("`{}` finished. Status: {:?}", command, output.status);
    Ok(())
  }
}
