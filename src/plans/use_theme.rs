// src/plans/use_theme.rs
use crate::action::{Action, Plan};
use crate::case::Substitutions;
use crate::config::UseConfig;

pub const USE_TEMPLATE: &str = "use";
/// Directory inside an installed theme package holding its example site.
pub const THEME_EXAMPLE_DIR: &str = "theme-example";

/// Version range written into `package.json` for the theme dependency.
pub fn version_range(version: &str) -> String {
  if version == "latest" || version.starts_with(['^', '~', '>', '<', '=']) {
    version.to_string()
  } else {
    format!("^{}", version)
  }
}

fn package_spec(config: &UseConfig) -> String {
  if config.theme_version == "latest" {
    config.theme_name.clone()
  } else {
    format!("{}@{}", config.theme_name, config.theme_version)
  }
}

pub fn template_data(config: &UseConfig) -> Substitutions {
  let mut data = Substitutions::new()
    .with_name("projectName", &config.project_name)
    .with_name("themeName", &config.theme_name)
    .with_group("versions", &config.versions);
  data.insert("themeVersion", config.theme_version.as_str());
  data.insert("themeVersionRange", version_range(&config.theme_version));
  data.insert("packageManager", config.package_manager.binary());
  data
}

/// Builds the plan that starts a site from an installed theme's example.
pub fn plan(config: &UseConfig) -> Plan {
  let project = &config.project_dir;
  let mut plan = vec![
    Action::CreateDir {
      path: project.clone(),
    },
    Action::CopyTemplateDir {
      dir: USE_TEMPLATE.to_string(),
      target: project.clone(),
      data: template_data(config),
      template_root: None,
    },
    Action::RunCommand {
      command: config.package_manager.add_command(&package_spec(config)),
      cwd: Some(project.clone()),
    },
    Action::CopyDir {
      source: project
        .join("node_modules")
        .join(&config.theme_name)
        .join(THEME_EXAMPLE_DIR),
      target: project.clone(),
      policy: config.on_conflict,
    },
  ];
  if config.git {
    plan.push(Action::RunCommand {
      command: "git init".to_string(),
      cwd: Some(project.clone()),
    });
  }
  plan
}
