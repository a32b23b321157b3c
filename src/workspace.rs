// src/workspace.rs
use serde_json::{json, Map, Value as JsonValue};
use serde_yaml::{Mapping, Value as YamlValue};

use crate::error::ScaffoldError;

pub const PNPM_WORKSPACE_FILE: &str = "pnpm-workspace.yaml";

/// Appends each of `wanted` to `list` unless it is already present.
fn append_missing(list: &mut Vec<String>, wanted: &[String]) {
  for entry in wanted {
    if !list.contains(entry) {
      list.push(entry.clone());
    }
  }
}

/// Returns `pnpm-workspace.yaml` content listing `entries` under `packages`,
/// keeping everything already in `existing` and never duplicating entries.
pub fn merge_pnpm_workspace(existing: Option<&str>, entries: &[String]) -> Result<String, ScaffoldError> {
  let mut doc = match existing {
    Some(text) if !text.trim().is_empty() => serde_yaml::from_str::<YamlValue>(text)?,
    _ => YamlValue::Null,
  };
  if doc.is_null() {
    doc = YamlValue::Mapping(Mapping::new());
  }
  let invalid = |reason: &str| ScaffoldError::InvalidWorkspaceManifest {
    file: PNPM_WORKSPACE_FILE,
    reason: reason.to_string(),
  };
  let Some(map) = doc.as_mapping_mut() else {
    return Err(invalid("expected a mapping at the top level"));
  };

  let mut packages: Vec<String> = match map.get("packages") {
    None | Some(YamlValue::Null) => Vec::new(),
    Some(YamlValue::Sequence(seq)) => seq.iter().filter_map(|v| v.as_str().map(String::from)).collect(),
    Some(_) => return Err(invalid("`packages` must be a list")),
  };
  append_missing(&mut packages, entries);

  map.insert(
    YamlValue::from("packages"),
    YamlValue::Sequence(packages.into_iter().map(YamlValue::from).collect()),
  );
  Ok(serde_yaml::to_string(&doc)?)
}

/// Adds missing entries to the `workspaces` of a `package.json` value. The
/// yarn classic object form (`{ "packages": [...], "nohoist": [...] }`) is
/// merged into its `packages` list and keeps its other keys.
pub fn merge_package_workspaces(package: &mut JsonValue, entries: &[String]) {
  let Some(object) = package.as_object_mut() else {
    return;
  };
  let slot = object.entry("workspaces").or_insert_with(|| json!([]));
  let list = match slot {
    JsonValue::Object(map) => map.entry("packages").or_insert_with(|| json!([])),
    other => other,
  };
  let mut workspaces: Vec<String> = list
    .as_array()
    .map(|arr| arr.iter().filter_map(|v| v.as_str().map(String::from)).collect())
    .unwrap_or_default();
  append_missing(&mut workspaces, entries);
  *list = json!(workspaces);
}

/// Adds a script (replacing one of the same name) and, when given, missing
/// workspace entries to an existing `package.json`.
pub fn update_package_json(
  existing: &str,
  script: (&str, &str),
  workspaces: Option<&[String]>,
) -> Result<String, ScaffoldError> {
  let mut package: JsonValue = serde_json::from_str(existing)?;
  if let Some(object) = package.as_object_mut() {
    let scripts = object
      .entry("scripts")
      .or_insert_with(|| JsonValue::Object(Map::new()));
    if !scripts.is_object() {
      *scripts = JsonValue::Object(Map::new());
    }
    if let Some(scripts) = scripts.as_object_mut() {
      scripts.insert(script.0.to_string(), json!(script.1));
    }
  }
  if let Some(entries) = workspaces {
    merge_package_workspaces(&mut package, entries);
  }
  let mut text = serde_json::to_string_pretty(&package)?;
  text.push('\n');
  Ok(text)
}

/// Everything needed to write the root `package.json` of a theme project.
#[derive(Debug, Clone)]
pub struct RootPackage<'a> {
  pub name: &'a str,
  /// Script name and command, e.g. `my-theme-playground:dev`.
  pub scripts: Vec<(String, String)>,
  /// Set for package managers that keep workspaces in `package.json`.
  pub workspaces: Option<Vec<String>>,
  pub dev_dependencies: Vec<(String, String)>,
}

impl RootPackage<'_> {
  pub fn to_json(&self) -> Result<String, ScaffoldError> {
    let mut scripts = Map::new();
    for (name, command) in &self.scripts {
      scripts.insert(name.clone(), json!(command));
    }
    let mut dev_dependencies = Map::new();
    for (name, version) in &self.dev_dependencies {
      dev_dependencies.insert(name.clone(), json!(version));
    }
    let mut package = json!({
      "name": self.name,
      "private": true,
      "license": "MIT",
      "scripts": scripts,
      "devDependencies": dev_dependencies,
    });
    if let Some(entries) = &self.workspaces {
      merge_package_workspaces(&mut package, entries);
    }
    let mut text = serde_json::to_string_pretty(&package)?;
    text.push('\n');
    Ok(text)
  }
}
