// src/error.rs
use std::{path::PathBuf, process::ExitStatus};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
  #[error("IO Error: {0}")]
  Io(#[from] std::io::Error),

  #[error("YAML Parsing Error: {0}")]
  YamlParse(#[from] serde_yaml::Error),

  #[error("JSON Error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Could not read templates manifest '{manifest_path}': {source}")]
  ManifestReadError {
    manifest_path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Could not parse templates manifest '{manifest_path}': {source}")]
  ManifestParseError {
    manifest_path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  #[error("{action} failed for '{path}': {source}")]
  FileOperation {
    action: &'static str,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Error walking directory '{path}': {source}")]
  WalkDirError {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("Directory '{0}' already exists and is not empty")]
  TargetNotEmpty(PathBuf),

  #[error("Invalid name '{name}': {reason}")]
  InvalidName { name: String, reason: String },

  #[error("Invalid {file}: {reason}")]
  InvalidWorkspaceManifest { file: &'static str, reason: String },

  #[error("Invalid conflict policy '{0}' (expected true, false, \"ask\" or \"backup\")")]
  InvalidConflictPolicy(String),

  #[error("Command Execution Error for `{command}`: {source}")]
  CommandExecError {
    command: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  #[error("Command `{command}` failed with status {status}. Stderr: {stderr}")]
  CommandFailedStatus {
    command: String,
    status: ExitStatus,
    stdout: String,
    stderr: String,
  },

  #[error("User interaction failed: {0}")]
  DialoguerError(#[from] dialoguer::Error),

  #[error("Could not determine templates directory")]
  CannotDetermineTemplatesDir,
}

impl ScaffoldError {
  pub(crate) fn file_op(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
    let path = path.into();
    move |source| ScaffoldError::FileOperation {
      action,
      path,
      source,
    }
  }
}
