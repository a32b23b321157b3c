// src/prompt.rs
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use heck::ToKebabCase;
use regex::Regex;
use std::sync::OnceLock;

use crate::error::ScaffoldError;

pub const NAME_RULE: &str = "Only letters, numbers, spaces, hyphens and underscores are allowed";

/// Answers the yes/no questions raised while a plan executes.
pub trait Prompter {
  fn confirm(&self, message: &str) -> Result<bool, ScaffoldError>;
}

/// Prompts on the terminal with dialoguer.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
  fn confirm(&self, message: &str) -> Result<bool, ScaffoldError> {
    Ok(
      Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .default(false)
        .interact()?,
    )
  }
}

fn invalid_name_chars() -> &'static Regex {
  static INVALID: OnceLock<Regex> = OnceLock::new();
  INVALID.get_or_init(|| Regex::new(r"[^\w\s\-]").expect("name pattern is valid"))
}

/// Checks a human-entered name; returns it kebab-cased.
pub fn normalize_name(name: &str) -> Result<String, ScaffoldError> {
  let trimmed = name.trim();
  if trimmed.is_empty() {
    return Err(ScaffoldError::InvalidName {
      name: name.to_string(),
      reason: "name must not be empty".to_string(),
    });
  }
  if invalid_name_chars().is_match(trimmed) {
    return Err(ScaffoldError::InvalidName {
      name: name.to_string(),
      reason: NAME_RULE.to_string(),
    });
  }
  Ok(trimmed.to_kebab_case())
}

/// Asks for a name, re-prompting until it passes [`normalize_name`].
pub fn ask_name(prompt: &str, default: &str) -> Result<String, ScaffoldError> {
  let value: String = Input::with_theme(&ColorfulTheme::default())
    .with_prompt(prompt)
    .default(default.to_string())
    .validate_with(|input: &String| -> Result<(), String> {
      normalize_name(input).map(|_| ()).map_err(|e| e.to_string())
    })
    .interact_text()?;
  normalize_name(&value)
}

/// Asks for free text, re-prompting until `check` accepts it; returns what
/// `check` makes of the answer.
pub fn ask_text(
  prompt: &str,
  check: impl Fn(&str) -> Result<String, ScaffoldError>,
) -> Result<String, ScaffoldError> {
  let value: String = Input::with_theme(&ColorfulTheme::default())
    .with_prompt(prompt)
    .validate_with(|input: &String| -> Result<(), String> {
      check(input).map(|_| ()).map_err(|e| e.to_string())
    })
    .interact_text()?;
  check(&value)
}

pub fn ask_confirm(prompt: &str, default: bool) -> Result<bool, ScaffoldError> {
  Ok(
    Confirm::with_theme(&ColorfulTheme::default())
      .with_prompt(prompt)
      .default(default)
      .interact()?,
  )
}

/// Lets the user pick one of `options`, labelled by `label`.
pub fn ask_select<T: Copy>(
  prompt: &str,
  options: &[T],
  default: T,
  label: impl Fn(T) -> String,
) -> Result<T, ScaffoldError>
where
  T: PartialEq,
{
  let labels: Vec<String> = options.iter().map(|o| label(*o)).collect();
  let default_index = options.iter().position(|o| *o == default).unwrap_or(0);
  let selection = Select::with_theme(&ColorfulTheme::default())
    .with_prompt(prompt)
    .items(&labels)
    .default(default_index)
    .interact()?;
  Ok(options[selection])
}
