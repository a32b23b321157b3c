// src/cli.rs
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::action::ConflictPolicy;
use crate::config::{PackageManager, Structure};

#[derive(Parser, Debug)]
#[command(
    name = "create-theme", // Command name users type
    author,
    version,
    about = "Scaffolds Astro theme projects, or starts a site from a published theme.",
    long_about = None
)]
pub struct Cli {
  /// Without a subcommand, asks what to do
  #[command(subcommand)]
  pub command: Option<Commands>,

  /// Increase verbosity level (e.g., -v, -vv)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  pub verbose: u8,

  /// Log every planned action without touching the disk or running commands
  #[arg(long, global = true)]
  pub dry_run: bool,

  #[arg(long, global = true)]
  #[clap(env = "CREATE_THEME_TEMPLATES_DIR")] // Environment variable fallback
  pub templates_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Create a new theme package with a playground
  #[command(alias = "new")]
  Create(CreateArgs),
  /// Start a new site from a published theme
  #[command(alias = "with")]
  Use(UseArgs),
}

#[derive(Args, Debug, Default)]
pub struct CreateArgs {
  /// Project name (also the directory to create)
  pub name: Option<String>,

  /// Accept flags and defaults without prompting
  #[arg(long)]
  pub skip: bool,

  #[arg(long)]
  pub project_name: Option<String>,

  /// Theme name; defaults to the project name
  #[arg(long)]
  pub theme_name: Option<String>,

  #[arg(long, value_enum)]
  pub structure: Option<Structure>,

  #[arg(long, value_enum)]
  pub package_manager: Option<PackageManager>,

  /// Add the theme to the project in the current directory
  #[arg(long)]
  pub in_project: bool,

  /// Run `git init` in the new project
  #[arg(long)]
  pub git: bool,

  /// Install dependencies after scaffolding
  #[arg(long)]
  pub install: bool,
}

pub const DEFAULT_THEME_VERSION: &str = "latest";

#[derive(Args, Debug)]
pub struct UseArgs {
  /// Theme package to start from (e.g., astro-charm)
  pub theme: String,

  #[arg(long)]
  pub skip: bool,

  #[arg(long)]
  pub project_name: Option<String>,

  #[arg(long, default_value = DEFAULT_THEME_VERSION)]
  pub theme_version: String,

  #[arg(long, value_enum)]
  pub package_manager: Option<PackageManager>,

  #[arg(long)]
  pub git: bool,

  /// How the theme example treats existing files: true, false, ask or backup
  #[arg(long, value_parser = parse_conflict_policy)]
  pub on_conflict: Option<ConflictPolicy>,
}

impl UseArgs {
  /// Arguments for `theme` with nothing else given.
  pub fn for_theme(theme: impl Into<String>) -> Self {
    Self {
      theme: theme.into(),
      skip: false,
      project_name: None,
      theme_version: DEFAULT_THEME_VERSION.to_string(),
      package_manager: None,
      git: false,
      on_conflict: None,
    }
  }
}

fn parse_conflict_policy(value: &str) -> Result<ConflictPolicy, String> {
  value.parse().map_err(|e: crate::error::ScaffoldError| e.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn create_alias_and_global_flags() {
    let cli = Cli::try_parse_from([
      "create-theme",
      "new",
      "demo",
      "--structure",
      "multi-in-subdir",
      "--package-manager",
      "npm",
      "--dry-run",
      "-vv",
    ])
    .unwrap();
    assert!(cli.dry_run);
    assert_eq!(cli.verbose, 2);
    let Some(Commands::Create(args)) = cli.command else {
      panic!("expected create");
    };
    assert_eq!(args.name.as_deref(), Some("demo"));
    assert_eq!(args.structure, Some(Structure::MultiInSubdir));
    assert_eq!(args.package_manager, Some(PackageManager::Npm));
  }

  #[test]
  fn bare_invocation_has_no_subcommand() {
    let cli = Cli::try_parse_from(["create-theme"]).unwrap();
    assert!(cli.command.is_none());
    assert!(!cli.dry_run);

    let cli = Cli::try_parse_from(["create-theme", "--dry-run", "-v"]).unwrap();
    assert!(cli.command.is_none());
    assert!(cli.dry_run);
    assert_eq!(cli.verbose, 1);
  }

  #[test]
  fn use_parses_conflict_policy() {
    let cli = Cli::try_parse_from(["create-theme", "with", "astro-charm", "--on-conflict", "backup"]).unwrap();
    let Some(Commands::Use(args)) = cli.command else {
      panic!("expected use");
    };
    assert_eq!(args.theme, "astro-charm");
    assert_eq!(args.theme_version, "latest");
    assert_eq!(args.on_conflict, Some(ConflictPolicy::Backup));

    assert!(Cli::try_parse_from(["create-theme", "use", "x", "--on-conflict", "maybe"]).is_err());
  }
}
