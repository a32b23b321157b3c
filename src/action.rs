// src/action.rs
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use log::Level;
use serde::{Deserialize, Serialize};

use crate::case::Substitutions;
use crate::error::ScaffoldError;

/// What to do when a copy lands on a path that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawConflictPolicy", into = "RawConflictPolicy")]
pub enum ConflictPolicy {
  /// Replace the existing content.
  Overwrite,
  /// Leave the existing content alone.
  #[default]
  Skip,
  /// Confirm at execution time; declining means `Skip`.
  Ask,
  /// Move conflicting files to a free `.bak[N]` sibling first.
  Backup,
}

// Wire form: `true | false | "ask" | "backup"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawConflictPolicy {
  Flag(bool),
  Mode(String),
}

impl TryFrom<RawConflictPolicy> for ConflictPolicy {
  type Error = ScaffoldError;

  fn try_from(raw: RawConflictPolicy) -> Result<Self, Self::Error> {
    match raw {
      RawConflictPolicy::Flag(true) => Ok(ConflictPolicy::Overwrite),
      RawConflictPolicy::Flag(false) => Ok(ConflictPolicy::Skip),
      RawConflictPolicy::Mode(mode) => match mode.as_str() {
        "ask" => Ok(ConflictPolicy::Ask),
        "backup" => Ok(ConflictPolicy::Backup),
        _ => Err(ScaffoldError::InvalidConflictPolicy(mode)),
      },
    }
  }
}

impl From<ConflictPolicy> for RawConflictPolicy {
  fn from(policy: ConflictPolicy) -> Self {
    match policy {
      ConflictPolicy::Overwrite => RawConflictPolicy::Flag(true),
      ConflictPolicy::Skip => RawConflictPolicy::Flag(false),
      ConflictPolicy::Ask => RawConflictPolicy::Mode("ask".to_string()),
      ConflictPolicy::Backup => RawConflictPolicy::Mode("backup".to_string()),
    }
  }
}

impl FromStr for ConflictPolicy {
  type Err = ScaffoldError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "true" => Ok(ConflictPolicy::Overwrite),
      "false" => Ok(ConflictPolicy::Skip),
      "ask" => Ok(ConflictPolicy::Ask),
      "backup" => Ok(ConflictPolicy::Backup),
      other => Err(ScaffoldError::InvalidConflictPolicy(other.to_string())),
    }
  }
}

impl fmt::Display for ConflictPolicy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      ConflictPolicy::Overwrite => "true",
      ConflictPolicy::Skip => "false",
      ConflictPolicy::Ask => "ask",
      ConflictPolicy::Backup => "backup",
    };
    f.write_str(s)
  }
}

/// A single declarative step of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  CreateDir {
    path: PathBuf,
  },
  WriteFile {
    path: PathBuf,
    content: String,
  },
  CopyFile {
    source: PathBuf,
    target: PathBuf,
    policy: ConflictPolicy,
  },
  CopyDir {
    source: PathBuf,
    target: PathBuf,
    policy: ConflictPolicy,
  },
  /// `file` is relative to the template root (or `template_root` if set).
  CopyTemplateFile {
    file: String,
    target: PathBuf,
    data: Substitutions,
    template_root: Option<PathBuf>,
  },
  /// `dir` is relative to the template root (or `template_root` if set).
  CopyTemplateDir {
    dir: String,
    target: PathBuf,
    data: Substitutions,
    template_root: Option<PathBuf>,
  },
  DeleteFile {
    path: PathBuf,
  },
  DeleteDir {
    path: PathBuf,
  },
  RunCommand {
    command: String,
    cwd: Option<PathBuf>,
  },
}

impl Action {
  /// Tag used as the prefix of log lines.
  pub fn kind(&self) -> &'static str {
    match self {
      Action::CreateDir { .. } => "CREATE_DIR",
      Action::WriteFile { .. } => "WRITE_FILE",
      Action::CopyFile { .. } => "COPY_FILE",
      Action::CopyDir { .. } => "COPY_DIR",
      Action::CopyTemplateFile { .. } => "COPY_TEMPLATE_FILE",
      Action::CopyTemplateDir { .. } => "COPY_TEMPLATE_DIR",
      Action::DeleteFile { .. } => "DELETE_FILE",
      Action::DeleteDir { .. } => "DELETE_DIR",
      Action::RunCommand { .. } => "RUN_COMMAND",
    }
  }
}

/// Ordered list of actions, executed top to bottom.
pub type Plan = Vec<Action>;

/// Per-execution switches, passed explicitly to every step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionContext {
  pub dry_run: bool,
  pub verbose: bool,
}

impl ExecutionContext {
  pub fn new(dry_run: bool, verbose: bool) -> Self {
    Self { dry_run, verbose }
  }

  pub fn show_log(&self) -> bool {
    self.dry_run || self.verbose
  }

  /// Level for per-action log lines: visible by default when previewing or
  /// verbose, otherwise only with `-v`.
  pub fn level(&self) -> Level {
    if self.show_log() {
      Level::Info
    } else {
      Level::Debug
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Deserialize)]
  struct Holder {
    #[serde(default)]
    overwrite: ConflictPolicy,
  }

  #[test]
  fn policy_parses_wire_forms() {
    let cases = [
      ("overwrite: true", ConflictPolicy::Overwrite),
      ("overwrite: false", ConflictPolicy::Skip),
      ("overwrite: ask", ConflictPolicy::Ask),
      ("overwrite: backup", ConflictPolicy::Backup),
      ("{}", ConflictPolicy::Skip),
    ];
    for (yaml, expected) in cases {
      let holder: Holder = serde_yaml::from_str(yaml).unwrap();
      assert_eq!(holder.overwrite, expected, "input: {}", yaml);
    }
  }

  #[test]
  fn policy_strings_are_case_sensitive() {
    assert!(serde_yaml::from_str::<Holder>("overwrite: Backup").is_err());
    assert!("ASK".parse::<ConflictPolicy>().is_err());
    assert_eq!("backup".parse::<ConflictPolicy>().unwrap(), ConflictPolicy::Backup);
    assert_eq!("true".parse::<ConflictPolicy>().unwrap(), ConflictPolicy::Overwrite);
  }

  #[test]
  fn policy_display_matches_parse() {
    for policy in [
      ConflictPolicy::Overwrite,
      ConflictPolicy::Skip,
      ConflictPolicy::Ask,
      ConflictPolicy::Backup,
    ] {
      assert_eq!(policy.to_string().parse::<ConflictPolicy>().unwrap(), policy);
    }
  }

  #[test]
  fn log_level_follows_flags() {
    assert_eq!(ExecutionContext::new(false, false).level(), Level::Debug);
    assert_eq!(ExecutionContext::new(true, false).level(), Level::Info);
    assert_eq!(ExecutionContext::new(false, true).level(), Level::Info);
  }
}
