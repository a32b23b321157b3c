// src/case.rs
use std::collections::BTreeMap;

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseTransformation {
  PascalCase,   // MyTheme
  CamelCase,    // myTheme
  SnakeCase,    // my_theme
  KebabCase,    // my-theme
  ConstantCase, // MY_THEME
}

impl CaseTransformation {
  pub const ALL: [CaseTransformation; 5] = [
    CaseTransformation::PascalCase,
    CaseTransformation::CamelCase,
    CaseTransformation::SnakeCase,
    CaseTransformation::KebabCase,
    CaseTransformation::ConstantCase,
  ];

  pub fn apply(self, value: &str) -> String {
    match self {
      CaseTransformation::PascalCase => value.to_pascal_case(),
      CaseTransformation::CamelCase => value.to_lower_camel_case(),
      CaseTransformation::SnakeCase => value.to_snake_case(),
      CaseTransformation::KebabCase => value.to_kebab_case(),
      CaseTransformation::ConstantCase => value.to_shouty_snake_case(),
    }
  }

  /// Name used both as a template helper (`{{kebabCase name}}`) and as the
  /// key suffix of the expanded variant (`nameKebabCase`).
  pub fn helper_name(self) -> &'static str {
    match self {
      CaseTransformation::PascalCase => "pascalCase",
      CaseTransformation::CamelCase => "camelCase",
      CaseTransformation::SnakeCase => "snakeCase",
      CaseTransformation::KebabCase => "kebabCase",
      CaseTransformation::ConstantCase => "constantCase",
    }
  }

  /// Case-insensitive lookup of a helper name.
  pub fn from_helper(name: &str) -> Option<Self> {
    Self::ALL
      .into_iter()
      .find(|t| t.helper_name().eq_ignore_ascii_case(name))
  }
}

/// Token values available to the template renderer.
///
/// Keys are stored lower-cased so lookups are case-insensitive. Ordered so
/// debug output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions(BTreeMap<String, String>);

impl Substitutions {
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts a single key as-is, without case variants.
  pub fn insert(&mut self, key: &str, value: impl Into<String>) {
    self.0.insert(key.to_lowercase(), value.into());
  }

  /// Inserts `key` plus one variant per case transformation, e.g. for
  /// `themeName=my theme`: `themeName`, `themeNameCamelCase=myTheme`,
  /// `themeNameKebabCase=my-theme`, ...
  pub fn insert_name(&mut self, key: &str, value: &str) {
    self.insert(key, value);
    for transform in CaseTransformation::ALL {
      let variant_key = format!("{}{}", key, transform.helper_name());
      self.insert(&variant_key, transform.apply(value));
    }
  }

  /// Builder form of [`Substitutions::insert_name`].
  pub fn with_name(mut self, key: &str, value: &str) -> Self {
    self.insert_name(key, value);
    self
  }

  /// Flattens a nested group as `group.key` tokens (e.g. `versions.astro`).
  pub fn with_group<'a, I>(mut self, group: &str, entries: I) -> Self
  where
    I: IntoIterator<Item = (&'a String, &'a String)>,
  {
    for (key, value) in entries {
      self.insert(&format!("{}.{}", group, key), value.clone());
    }
    self
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.0.get(&key.to_lowercase()).map(String::as_str)
  }
}
