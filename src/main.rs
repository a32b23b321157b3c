// src/main.rs
use clap::Parser;
use create_theme::action::ExecutionContext;
use create_theme::cli::{Cli, Commands};
use create_theme::commands;
use create_theme::error::ScaffoldError;
use directories::ProjectDirs;
use log::LevelFilter;
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), ScaffoldError> {
  let cli = Cli::parse();

  // Setup logging based on verbosity
  let log_level = match cli.verbose {
    0 => LevelFilter::Info,
    1 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  };
  env_logger::Builder::new().filter_level(log_level).init();

  log::debug!("CLI args: {:?}", cli);

  let templates_path = determine_templates_dir(cli.templates_dir)?;
  log::debug!("Using templates directory: {}", templates_path.display());

  let ctx = ExecutionContext::new(cli.dry_run, cli.verbose > 0);

  let result = match cli.command {
    Some(Commands::Create(args)) => commands::create::run_create(args, &templates_path, ctx),
    Some(Commands::Use(args)) => commands::use_theme::run_use(args, &templates_path, ctx),
    None => commands::run_interactive(&templates_path, ctx),
  };
  if let Err(e) = &result {
    log::error!("{}", e);
  }
  result
}

/// Determines the templates directory path.
/// Order of preference:
/// 1. --templates-dir CLI argument
/// 2. CREATE_THEME_TEMPLATES_DIR environment variable
/// 3. templates/ subdirectory relative to the executable
/// 4. templates/ in the per-user data directory
/// 5. templates/ subdirectory relative to the current working directory (fallback)
fn determine_templates_dir(cli_path: Option<PathBuf>) -> Result<PathBuf, ScaffoldError> {
  if let Some(path) = cli_path {
    if path.is_dir() {
      return Ok(path);
    }
    log::warn!(
      "Provided --templates-dir path does not exist or is not a directory: {}",
      path.display()
    );
  }

  // Env variable check happens automatically via clap's `env` attribute

  if let Ok(mut exe_path) = env::current_exe() {
    exe_path.pop();
    let path = exe_path.join("templates");
    if path.is_dir() {
      return Ok(path);
    }
  }

  if let Some(dirs) = ProjectDirs::from("", "", "create-theme") {
    let path = dirs.data_dir().join("templates");
    if path.is_dir() {
      return Ok(path);
    }
  }

  let path = PathBuf::from("templates");
  if path.is_dir() {
    return Ok(path);
  }

  Err(ScaffoldError::CannotDetermineTemplatesDir)
}
