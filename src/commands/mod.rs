// src/commands/mod.rs
//! Subcommand drivers: gather answers, run the pre-flight guard, plan, then
//! hand the plan to the executor.

pub mod create;
pub mod use_theme;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, info};

use crate::action::{ExecutionContext, Plan};
use crate::cli::{CreateArgs, UseArgs};
use crate::config::TemplatesManifest;
use crate::error::ScaffoldError;
use crate::exec::ShellRunner;
use crate::executor::Executor;
use crate::prompt::{self, TerminalPrompter};

/// What a bare `create-theme` invocation can go on to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
  Use,
  Create,
}

impl Intent {
  pub const ALL: [Intent; 2] = [Intent::Use, Intent::Create];

  pub fn label(self) -> String {
    match self {
      Intent::Use => "Create project using theme (as theme user)",
      Intent::Create => "Create a new theme (as theme creator)",
    }
    .to_string()
  }
}

/// Entry point without a subcommand: asks which command to run, then runs it
/// with every option left to its prompt.
pub fn run_interactive(templates_dir: &Path, ctx: ExecutionContext) -> Result<(), ScaffoldError> {
  let intent = prompt::ask_select("What do you want to do?", &Intent::ALL, Intent::Use, Intent::label)?;
  debug!("Chose {:?}", intent);
  match intent {
    Intent::Create => create::run_create(CreateArgs::default(), templates_dir, ctx),
    Intent::Use => {
      let theme = prompt::ask_text("Theme package to use", use_theme::validate_theme)?;
      use_theme::run_use(UseArgs::for_theme(theme), templates_dir, ctx)
    }
  }
}

/// Uses the given name when there is one, otherwise prompts (or takes the
/// default under `--skip`). The result is always validated and kebab-cased.
pub(crate) fn resolve_name(
  question: &str,
  given: Option<&str>,
  default: &str,
  interactive: bool,
) -> Result<String, ScaffoldError> {
  match given {
    Some(name) => prompt::normalize_name(name),
    None if interactive => prompt::ask_name(question, default),
    None => prompt::normalize_name(default),
  }
}

pub(crate) fn resolve_choice<T: Copy + PartialEq>(
  question: &str,
  given: Option<T>,
  options: &[T],
  default: T,
  interactive: bool,
  label: impl Fn(T) -> String,
) -> Result<T, ScaffoldError> {
  match given {
    Some(value) => Ok(value),
    None if interactive => prompt::ask_select(question, options, default, label),
    None => Ok(default),
  }
}

/// A flag given on the command line is never asked again.
pub(crate) fn resolve_flag(question: &str, given: bool, interactive: bool) -> Result<bool, ScaffoldError> {
  if given || !interactive {
    Ok(given)
  } else {
    prompt::ask_confirm(question, false)
  }
}

/// Fails when `path` is an existing non-empty directory (or a file).
///
/// Runs before any plan executes, dry-run included.
pub fn ensure_target_available(path: &Path) -> Result<(), ScaffoldError> {
  match fs::read_dir(path) {
    Ok(mut entries) => {
      if entries.next().is_some() {
        return Err(ScaffoldError::TargetNotEmpty(path.to_path_buf()));
      }
      debug!("Target {} exists but is empty.", path.display());
      Ok(())
    }
    Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
    Err(_) if path.is_file() => Err(ScaffoldError::TargetNotEmpty(path.to_path_buf())),
    Err(e) => Err(ScaffoldError::file_op("read directory", path)(e)),
  }
}

/// Reads a file that may legitimately be missing.
pub fn read_optional(path: &Path) -> Result<Option<String>, ScaffoldError> {
  match fs::read_to_string(path) {
    Ok(content) => Ok(Some(content)),
    Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
    Err(e) => Err(ScaffoldError::file_op("read file", path)(e)),
  }
}

/// Executes `plan` with the terminal prompter and the shell runner.
pub fn execute_plan(
  plan: &Plan,
  templates_dir: &Path,
  manifest: TemplatesManifest,
  ctx: ExecutionContext,
) -> Result<(), ScaffoldError> {
  let prompter = TerminalPrompter;
  // Spinner output would interleave with verbose logs.
  let runner = ShellRunner::new(!ctx.verbose);
  debug!("Executing {} action(s).", plan.len());
  Executor::new(templates_dir, manifest, &prompter, &runner).execute(plan, ctx)?;
  if ctx.dry_run {
    info!("Dry run finished, nothing was written.");
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn intents_offer_use_first() {
    assert_eq!(Intent::ALL, [Intent::Use, Intent::Create]);
    assert!(Intent::Use.label().contains("using theme"));
    assert!(Intent::Create.label().contains("new theme"));
  }

  #[test]
  fn missing_and_empty_targets_are_available() {
    let dir = TempDir::new().unwrap();
    assert!(ensure_target_available(&dir.path().join("nope")).is_ok());
    assert!(ensure_target_available(dir.path()).is_ok());
  }

  #[test]
  fn non_empty_target_is_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("README.md"), "hi").unwrap();
    assert!(matches!(
      ensure_target_available(dir.path()),
      Err(ScaffoldError::TargetNotEmpty(_))
    ));
    assert!(matches!(
      ensure_target_available(&dir.path().join("README.md")),
      Err(ScaffoldError::TargetNotEmpty(_))
    ));
  }

  #[test]
  fn non_interactive_answers_use_flags_or_defaults() {
    assert_eq!(resolve_name("Name", Some("My Site"), "x", false).unwrap(), "my-site");
    assert_eq!(resolve_name("Name", None, "my-theme", false).unwrap(), "my-theme");
    assert!(matches!(
      resolve_name("Name", Some("bad/name"), "x", false),
      Err(ScaffoldError::InvalidName { .. })
    ));
    assert_eq!(resolve_choice("Pick", None, &[1, 2, 3], 2, false, |n: i32| n.to_string()).unwrap(), 2);
    assert_eq!(resolve_choice("Pick", Some(3), &[1, 2, 3], 2, true, |n: i32| n.to_string()).unwrap(), 3);
    assert!(!resolve_flag("Git?", false, false).unwrap());
    assert!(resolve_flag("Git?", true, true).unwrap());
  }

  #[test]
  fn read_optional_distinguishes_missing() {
    let dir = TempDir::new().unwrap();
    assert_eq!(read_optional(&dir.path().join("x.json")).unwrap(), None);
    fs::write(dir.path().join("x.json"), "{}").unwrap();
    assert_eq!(read_optional(&dir.path().join("x.json")).unwrap().as_deref(), Some("{}"));
  }
}
