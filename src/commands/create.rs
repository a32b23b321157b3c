// src/commands/create.rs
use std::env;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::{ensure_target_available, execute_plan, read_optional, resolve_choice, resolve_flag, resolve_name};
use crate::action::ExecutionContext;
use crate::cli::CreateArgs;
use crate::config::{CreateConfig, PackageManager, Structure, TemplatesManifest};
use crate::error::ScaffoldError;
use crate::plans;
use crate::workspace::PNPM_WORKSPACE_FILE;

pub const DEFAULT_PROJECT_NAME: &str = "my-theme";

pub fn run_create(args: CreateArgs, templates_dir: &Path, ctx: ExecutionContext) -> Result<(), ScaffoldError> {
  info!("Running create command...");
  let manifest = TemplatesManifest::load(templates_dir)?;
  let mut config = gather_config(&args, &manifest)?;
  prepare_target(&mut config)?;
  debug!("Resolved create config: {:?}", config);

  let plan = plans::create::plan(&config)?;
  execute_plan(&plan, templates_dir, manifest, ctx)?;

  info!(
    "Theme '{}' scaffolded in '{}'.",
    config.theme_name,
    config.project_dir.display()
  );
  print_next_steps(&config);
  Ok(())
}

fn gather_config(args: &CreateArgs, manifest: &TemplatesManifest) -> Result<CreateConfig, ScaffoldError> {
  let interactive = !args.skip;
  let given = args.project_name.as_deref().or(args.name.as_deref());

  let (project_dir, project_name) = if args.in_project {
    let here = env::current_dir()?
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string());
    let name = resolve_name("Project name", given, &here, interactive)?;
    (PathBuf::from("."), name)
  } else {
    let name = resolve_name("Project name", given, DEFAULT_PROJECT_NAME, interactive)?;
    (PathBuf::from(&name), name)
  };

  let theme_name = resolve_name("Theme name", args.theme_name.as_deref(), &project_name, interactive)?;
  let structure = resolve_choice(
    "Project structure",
    args.structure,
    &Structure::ALL,
    Structure::default(),
    interactive,
    |s| s.description().to_string(),
  )?;
  let package_manager = resolve_choice(
    "Package manager",
    args.package_manager,
    &PackageManager::ALL,
    PackageManager::default(),
    interactive,
    |pm| pm.to_string(),
  )?;
  let git = !args.in_project && resolve_flag("Initialize a git repository?", args.git, interactive)?;
  let install = resolve_flag("Install dependencies?", args.install, interactive)?;

  Ok(CreateConfig {
    project_dir,
    project_name,
    theme_name,
    structure,
    package_manager,
    git,
    install,
    in_project: args.in_project,
    existing_workspace: None,
    existing_package_json: None,
    versions: manifest.versions.clone(),
  })
}

/// Pre-flight guard. A new project needs a free directory; a theme added to
/// an existing project needs free package and playground directories, and
/// the project's manifests are read so they can be merged.
fn prepare_target(config: &mut CreateConfig) -> Result<(), ScaffoldError> {
  let project = config.project_dir.clone();
  if !config.in_project {
    return ensure_target_available(&project);
  }
  let theme = config.theme_name.as_str();
  ensure_target_available(&project.join(config.structure.package_dir(theme)))?;
  ensure_target_available(&project.join(config.structure.playground_dir(theme)))?;
  config.existing_package_json = read_optional(&project.join("package.json"))?;
  config.existing_workspace = read_optional(&project.join(PNPM_WORKSPACE_FILE))?;
  Ok(())
}

fn next_steps(config: &CreateConfig) -> Vec<String> {
  let pm = config.package_manager;
  let mut steps = Vec::new();
  if !config.in_project {
    steps.push(format!("cd {}", config.project_dir.display()));
  }
  if !config.install {
    steps.push(pm.install_command());
  }
  steps.push(format!(
    "{} run {}",
    pm.binary(),
    plans::create::dev_script_name(&config.theme_name)
  ));
  steps
}

fn print_next_steps(config: &CreateConfig) {
  println!("\nNext steps:");
  for step in next_steps(config) {
    println!("  {}", step);
  }
}
