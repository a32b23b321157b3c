// src/commands/use_theme.rs
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::{ensure_target_available, execute_plan, resolve_choice, resolve_flag, resolve_name};
use crate::action::{ConflictPolicy, ExecutionContext};
use crate::cli::UseArgs;
use crate::config::{PackageManager, TemplatesManifest, UseConfig};
use crate::error::ScaffoldError;
use crate::plans;

pub const DEFAULT_PROJECT_NAME: &str = "my-website";

const POLICIES: [ConflictPolicy; 4] = [
  ConflictPolicy::Overwrite,
  ConflictPolicy::Skip,
  ConflictPolicy::Ask,
  ConflictPolicy::Backup,
];

fn policy_label(policy: ConflictPolicy) -> String {
  match policy {
    ConflictPolicy::Overwrite => "overwrite existing files",
    ConflictPolicy::Skip => "skip the example when the project has files",
    ConflictPolicy::Ask => "ask for each conflict",
    ConflictPolicy::Backup => "back up existing files first",
  }
  .to_string()
}

pub fn run_use(args: UseArgs, templates_dir: &Path, ctx: ExecutionContext) -> Result<(), ScaffoldError> {
  info!("Running use command for theme '{}'...", args.theme);
  let manifest = TemplatesManifest::load(templates_dir)?;
  let config = gather_config(&args, &manifest)?;
  ensure_target_available(&config.project_dir)?;
  debug!("Resolved use config: {:?}", config);

  let plan = plans::use_theme::plan(&config);
  execute_plan(&plan, templates_dir, manifest, ctx)?;

  info!(
    "Site '{}' created from theme '{}'.",
    config.project_name, config.theme_name
  );
  println!("\nNext steps:");
  println!("  cd {}", config.project_dir.display());
  println!("  {} run dev", config.package_manager.binary());
  Ok(())
}

/// Package names may be scoped (`@scope/name`), so they are only checked
/// for emptiness and whitespace.
pub(crate) fn validate_theme(theme: &str) -> Result<String, ScaffoldError> {
  let trimmed = theme.trim();
  if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
    return Err(ScaffoldError::InvalidName {
      name: theme.to_string(),
      reason: "theme package name must be non-empty and contain no whitespace".to_string(),
    });
  }
  Ok(trimmed.to_string())
}

fn gather_config(args: &UseArgs, manifest: &TemplatesManifest) -> Result<UseConfig, ScaffoldError> {
  let interactive = !args.skip;
  let theme_name = validate_theme(&args.theme)?;
  let project_name = resolve_name(
    "Project name",
    args.project_name.as_deref(),
    DEFAULT_PROJECT_NAME,
    interactive,
  )?;
  let package_manager = resolve_choice(
    "Package manager",
    args.package_manager,
    &PackageManager::ALL,
    PackageManager::default(),
    interactive,
    |pm| pm.to_string(),
  )?;
  let on_conflict = resolve_choice(
    "When the theme example collides with a generated file",
    args.on_conflict,
    &POLICIES,
    ConflictPolicy::Overwrite,
    interactive,
    policy_label,
  )?;
  let git = resolve_flag("Initialize a git repository?", args.git, interactive)?;

  Ok(UseConfig {
    project_dir: PathBuf::from(&project_name),
    project_name,
    theme_name,
    theme_version: args.theme_version.trim().to_string(),
    package_manager,
    git,
    on_conflict,
    versions: manifest.versions.clone(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn skip_args(theme: &str) -> UseArgs {
    UseArgs {
      skip: true,
      ..UseArgs::for_theme(theme)
    }
  }

  #[test]
  fn skip_defaults_to_overwrite_and_my_website() {
    let config = gather_config(&skip_args("astro-charm"), &TemplatesManifest::default()).unwrap();
    assert_eq!(config.project_name, DEFAULT_PROJECT_NAME);
    assert_eq!(config.project_dir, PathBuf::from("my-website"));
    assert_eq!(config.on_conflict, ConflictPolicy::Overwrite);
    assert_eq!(config.package_manager, PackageManager::Pnpm);
    assert_eq!(config.theme_version, "latest");
  }

  #[test]
  fn scoped_theme_names_are_accepted() {
    let mut args = skip_args("@acme/astro-theme");
    args.on_conflict = Some(ConflictPolicy::Backup);
    let config = gather_config(&args, &TemplatesManifest::default()).unwrap();
    assert_eq!(config.theme_name, "@acme/astro-theme");
    assert_eq!(config.on_conflict, ConflictPolicy::Backup);
  }

  #[test]
  fn theme_only_args_install_latest() {
    let args = UseArgs::for_theme("astro-charm");
    assert!(!args.skip);
    assert_eq!(args.theme_version, "latest");
    assert_eq!(validate_theme(" astro-charm ").unwrap(), "astro-charm");
  }

  #[test]
  fn blank_theme_is_rejected() {
    for bad in ["", "  ", "two words"] {
      assert!(matches!(
        gather_config(&skip_args(bad), &TemplatesManifest::default()),
        Err(ScaffoldError::InvalidName { .. })
      ));
    }
  }
}
