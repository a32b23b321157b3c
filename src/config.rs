// src/config.rs
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::debug;
use serde::Deserialize;

use crate::action::ConflictPolicy;
use crate::error::ScaffoldError;

pub const MANIFEST_FILE: &str = "scaffold.yaml";

/// Optional `scaffold.yaml` at the root of the templates directory.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct TemplatesManifest {
  /// Dependency versions, exposed to templates as `{{versions.<name>}}`.
  #[serde(default = "default_versions")]
  pub versions: BTreeMap<String, String>,
  /// Extensions whose content is echoed in dry-run/verbose logs.
  #[serde(default = "default_text_extensions")]
  pub text_extensions: Vec<String>,
  /// Larger files are summarized by size instead of echoed.
  #[serde(default = "default_preview_limit")]
  pub preview_limit: usize,
}

impl Default for TemplatesManifest {
  fn default() -> Self {
    Self {
      versions: default_versions(),
      text_extensions: default_text_extensions(),
      preview_limit: default_preview_limit(),
    }
  }
}

fn default_versions() -> BTreeMap<String, String> {
  [("astro", "5.14.1"), ("astroThemeProvider", "0.7.1")]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_text_extensions() -> Vec<String> {
  [
    "js", "ts", "cjs", "cts", "mjs", "mts", "jsx", "tsx", "json", "jsonc", "json5", "md", "mdx",
    "txt", "xml", "yml", "yaml", "html", "css", "scss", "less", "astro", "vue", "svelte",
  ]
  .into_iter()
  .map(String::from)
  .collect()
}

fn default_preview_limit() -> usize {
  4096
}

impl TemplatesManifest {
  /// Loads `scaffold.yaml` from `templates_dir`, falling back to defaults
  /// when the file is absent.
  pub fn load(templates_dir: &Path) -> Result<Self, ScaffoldError> {
    let manifest_path = templates_dir.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
      debug!(
        "No {} in {}, using built-in defaults.",
        MANIFEST_FILE,
        templates_dir.display()
      );
      return Ok(Self::default());
    }
    let content = fs::read_to_string(&manifest_path).map_err(|e| ScaffoldError::ManifestReadError {
      manifest_path: manifest_path.clone(),
      source: e,
    })?;
    serde_yaml::from_str(&content).map_err(|e| ScaffoldError::ManifestParseError {
      manifest_path,
      source: e,
    })
  }

  /// Whether a file's content is small text worth echoing in logs.
  pub fn is_previewable(&self, path: &Path, len: usize) -> bool {
    len <= self.preview_limit
      && path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| {
          self
            .text_extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
  }
}

/// How the theme package and its playground are laid out in the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Structure {
  /// `package/` + `playground/`
  #[default]
  Single,
  /// `packages/<name>/` + `playgrounds/<name>/`
  MultiInSubdir,
  /// `<name>-package/` + `<name>-playground/`
  MultiInRoot,
  /// `<name>-package/` + `playground/`
  SinglePlayground,
}

impl Structure {
  pub const ALL: [Structure; 4] = [
    Structure::Single,
    Structure::MultiInSubdir,
    Structure::MultiInRoot,
    Structure::SinglePlayground,
  ];

  pub fn package_dir(self, theme: &str) -> PathBuf {
    match self {
      Structure::Single => PathBuf::from("package"),
      Structure::MultiInSubdir => Path::new("packages").join(theme),
      Structure::MultiInRoot | Structure::SinglePlayground => PathBuf::from(format!("{}-package", theme)),
    }
  }

  pub fn playground_dir(self, theme: &str) -> PathBuf {
    match self {
      Structure::Single | Structure::SinglePlayground => PathBuf::from("playground"),
      Structure::MultiInSubdir => Path::new("playgrounds").join(theme),
      Structure::MultiInRoot => PathBuf::from(format!("{}-playground", theme)),
    }
  }

  /// Entries the workspace manifest must list for this layout.
  pub fn workspace_entries(self, theme: &str) -> Vec<String> {
    match self {
      Structure::MultiInSubdir => vec!["packages/*".to_string(), "playgrounds/*".to_string()],
      _ => vec![
        slash_path(&self.package_dir(theme)),
        slash_path(&self.playground_dir(theme)),
      ],
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      Structure::Single => "single: package/ + playground/",
      Structure::MultiInSubdir => "multi-in-subdir: packages/<name>/ + playgrounds/<name>/",
      Structure::MultiInRoot => "multi-in-root: <name>-package/ + <name>-playground/",
      Structure::SinglePlayground => "single-playground: <name>-package/ + playground/",
    }
  }
}

/// Renders a relative path with `/` separators, as package managers expect.
pub(crate) fn slash_path(path: &Path) -> String {
  path
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PackageManager {
  #[default]
  Pnpm,
  Npm,
  Yarn,
  Bun,
}

impl PackageManager {
  pub const ALL: [PackageManager; 4] = [
    PackageManager::Pnpm,
    PackageManager::Npm,
    PackageManager::Yarn,
    PackageManager::Bun,
  ];

  pub fn binary(self) -> &'static str {
    match self {
      PackageManager::Pnpm => "pnpm",
      PackageManager::Npm => "npm",
      PackageManager::Yarn => "yarn",
      PackageManager::Bun => "bun",
    }
  }

  /// pnpm keeps workspace globs in `pnpm-workspace.yaml`; the others use the
  /// `workspaces` field of the root `package.json`.
  pub fn uses_workspace_file(self) -> bool {
    matches!(self, PackageManager::Pnpm)
  }

  pub fn install_command(self) -> String {
    format!("{} install", self.binary())
  }

  pub fn add_command(self, package: &str) -> String {
    match self {
      PackageManager::Npm => format!("npm install {}", package),
      other => format!("{} add {}", other.binary(), package),
    }
  }

  /// Command that starts the dev server of one workspace package.
  pub fn workspace_dev_command(self, package_name: &str, dir: &str) -> String {
    match self {
      PackageManager::Pnpm => format!("pnpm --filter {} dev", package_name),
      PackageManager::Npm => format!("npm run dev -w {}", dir),
      PackageManager::Yarn => format!("yarn workspace {} dev", package_name),
      PackageManager::Bun => format!("bun --filter {} dev", package_name),
    }
  }
}

impl fmt::Display for PackageManager {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.binary())
  }
}

/// Fully resolved input of the `create` planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateConfig {
  /// Project root, relative to the working directory (or absolute).
  pub project_dir: PathBuf,
  pub project_name: String,
  pub theme_name: String,
  pub structure: Structure,
  pub package_manager: PackageManager,
  pub git: bool,
  pub install: bool,
  /// Add the theme to an existing project instead of creating one.
  pub in_project: bool,
  /// Contents of the project's `pnpm-workspace.yaml`, if any.
  pub existing_workspace: Option<String>,
  /// Contents of the project's root `package.json`, if any.
  pub existing_package_json: Option<String>,
  pub versions: BTreeMap<String, String>,
}

/// Fully resolved input of the `use` planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseConfig {
  pub project_dir: PathBuf,
  pub project_name: String,
  pub theme_name: String,
  pub theme_version: String,
  pub package_manager: PackageManager,
  pub git: bool,
  /// Policy for copying the theme's bundled example over the project.
  pub on_conflict: ConflictPolicy,
  pub versions: BTreeMap<String, String>,
}
