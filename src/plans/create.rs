// src/plans/create.rs
use crate::action::{Action, Plan};
use crate::case::Substitutions;
use crate::config::{slash_path, CreateConfig};
use crate::error::ScaffoldError;
use crate::workspace::{self, RootPackage, PNPM_WORKSPACE_FILE};

pub const ROOT_TEMPLATE: &str = "create/root";
pub const PACKAGE_TEMPLATE: &str = "create/package";
pub const PLAYGROUND_TEMPLATE: &str = "create/playground";

pub fn playground_package_name(theme_name: &str) -> String {
  format!("{}-playground", theme_name)
}

/// Script added to the root `package.json` to run the playground.
pub fn dev_script_name(theme_name: &str) -> String {
  format!("{}:dev", playground_package_name(theme_name))
}

pub fn template_data(config: &CreateConfig) -> Substitutions {
  let mut data = Substitutions::new()
    .with_name("projectName", &config.project_name)
    .with_name("themeName", &config.theme_name)
    .with_name("playgroundName", &playground_package_name(&config.theme_name))
    .with_group("versions", &config.versions);
  data.insert("packageManager", config.package_manager.binary());
  data
}

/// Builds the plan that scaffolds a theme package and its playground.
pub fn plan(config: &CreateConfig) -> Result<Plan, ScaffoldError> {
  let project = &config.project_dir;
  let theme = config.theme_name.as_str();
  let pm = config.package_manager;
  let package_dir = config.structure.package_dir(theme);
  let playground_dir = config.structure.playground_dir(theme);
  let entries = config.structure.workspace_entries(theme);
  let data = template_data(config);

  let mut plan = Vec::new();
  if !config.in_project {
    plan.push(Action::CreateDir {
      path: project.clone(),
    });
    plan.push(Action::CopyTemplateDir {
      dir: ROOT_TEMPLATE.to_string(),
      target: project.clone(),
      data: data.clone(),
      template_root: None,
    });
  }
  plan.push(Action::CopyTemplateDir {
    dir: PACKAGE_TEMPLATE.to_string(),
    target: project.join(&package_dir),
    data: data.clone(),
    template_root: None,
  });
  plan.push(Action::CopyTemplateDir {
    dir: PLAYGROUND_TEMPLATE.to_string(),
    target: project.join(&playground_dir),
    data,
    template_root: None,
  });

  let script_name = dev_script_name(theme);
  let script_command =
    pm.workspace_dev_command(&playground_package_name(theme), &slash_path(&playground_dir));
  let package_workspaces = (!pm.uses_workspace_file()).then(|| entries.clone());
  let package_json = match &config.existing_package_json {
    Some(existing) => workspace::update_package_json(
      existing,
      (&script_name, &script_command),
      package_workspaces.as_deref(),
    )?,
    None => RootPackage {
      name: &config.project_name,
      scripts: vec![(script_name, script_command)],
      workspaces: package_workspaces,
      dev_dependencies: config
        .versions
        .get("astro")
        .map(|v| vec![("astro".to_string(), format!("^{}", v))])
        .unwrap_or_default(),
    }
    .to_json()?,
  };
  plan.push(Action::WriteFile {
    path: project.join("package.json"),
    content: package_json,
  });

  if pm.uses_workspace_file() {
    plan.push(Action::WriteFile {
      path: project.join(PNPM_WORKSPACE_FILE),
      content: workspace::merge_pnpm_workspace(config.existing_workspace.as_deref(), &entries)?,
    });
  }
  if config.git {
    plan.push(Action::RunCommand {
      command: "git init".to_string(),
      cwd: Some(project.clone()),
    });
  }
  if config.install {
    plan.push(Action::RunCommand {
      command: pm.install_command(),
      cwd: Some(project.clone()),
    });
  }
  Ok(plan)
}
