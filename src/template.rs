// src/template.rs
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{error, log, warn};
use regex::{Captures, Regex};
use walkdir::WalkDir;

use crate::action::ExecutionContext;
use crate::case::{CaseTransformation, Substitutions};
use crate::config::TemplatesManifest;
use crate::error::ScaffoldError;

/// Suffix marking a file whose content goes through placeholder substitution.
pub const TEMPLATE_SUFFIX: &str = ".hbs";
/// Leading character stripped from every output path segment.
pub const ESCAPE_PREFIX: char = '_';

pub struct RenderOptions<'a> {
  pub ctx: ExecutionContext,
  /// Directory that relative template paths are resolved against.
  pub template_root: &'a Path,
  pub manifest: &'a TemplatesManifest,
  pub log_prefix: String,
}

impl<'a> RenderOptions<'a> {
  pub fn new(ctx: ExecutionContext, template_root: &'a Path, manifest: &'a TemplatesManifest) -> Self {
    Self {
      ctx,
      template_root,
      manifest,
      log_prefix: String::new(),
    }
  }
}

fn placeholder_regex() -> &'static Regex {
  static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
  PLACEHOLDER.get_or_init(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][\w.\-]*)(?:\s+([A-Za-z_][\w.\-]*))?\s*\}\}")
      .expect("placeholder pattern is valid")
  })
}

/// Replaces `{{key}}` and `{{helper key}}` tokens. Keys are matched
/// case-insensitively; anything unresolved is left as written.
pub fn render_str(template: &str, data: &Substitutions) -> String {
  placeholder_regex()
    .replace_all(template, |caps: &Captures| {
      let literal = caps[0].to_string();
      match caps.get(2) {
        Some(arg) => {
          let Some(transform) = CaseTransformation::from_helper(&caps[1]) else {
            return literal;
          };
          data
            .get(arg.as_str())
            .map_or(literal, |value| transform.apply(value))
        }
        None => data.get(&caps[1]).map_or(literal, str::to_string),
      }
    })
    .into_owned()
}

/// Strips the escape prefix from every segment, keeping the separators.
fn strip_escapes(rel: &str) -> String {
  rel
    .split(['/', '\\'])
    .map(|segment| segment.strip_prefix(ESCAPE_PREFIX).unwrap_or(segment))
    .collect::<Vec<_>>()
    .join("/")
}

/// Joins the non-empty segments of a rendered relative path onto `target`.
/// Returns the destination and whether it names a directory only.
fn destination(target_dir: &Path, rendered: &str) -> (PathBuf, bool) {
  let mut dest = target_dir.to_path_buf();
  for segment in rendered.split('/').filter(|s| !s.is_empty()) {
    dest.push(segment);
  }
  let dir_only = rendered.is_empty() || rendered.ends_with('/');
  (dest, dir_only)
}

fn ensure_dir(path: &Path, opts: &RenderOptions<'_>, label: &str) -> Result<(), ScaffoldError> {
  if !opts.ctx.dry_run {
    fs::create_dir_all(path).map_err(ScaffoldError::file_op("create directory", path))?;
  }
  log!(
    opts.ctx.level(),
    "{}[COPY_TEMPLATE_FILE({})] ensureDir: {}",
    opts.log_prefix,
    label,
    path.display()
  );
  Ok(())
}

/// Renders one template file (relative to the template root) into
/// `target_dir`. The output name drops `_` segment prefixes and the `.hbs`
/// suffix, and is itself rendered with `data`.
pub fn render_file(
  rel: &str,
  target_dir: &Path,
  data: &Substitutions,
  opts: &RenderOptions<'_>,
) -> Result<(), ScaffoldError> {
  let level = opts.ctx.level();
  log!(
    level,
    "{}COPY_TEMPLATE_FILE: {} -> {}",
    opts.log_prefix,
    rel,
    target_dir.display()
  );

  let source = opts.template_root.join(rel);
  let mut out_rel = strip_escapes(rel);
  let is_template = out_rel.ends_with(TEMPLATE_SUFFIX);
  if is_template {
    out_rel.truncate(out_rel.len() - TEMPLATE_SUFFIX.len());
  }
  let rendered_name = render_str(&out_rel, data);
  let (dest, dir_only) = destination(target_dir, &rendered_name);

  if dir_only {
    return ensure_dir(&dest, opts, &out_rel);
  }

  if !source.is_file() {
    warn!(
      "{}COPY_TEMPLATE_FILE: Template \"{}\" does not exist, skipping...",
      opts.log_prefix,
      source.display()
    );
    return Ok(());
  }

  if let Some(parent) = dest.parent() {
    ensure_dir(parent, opts, &out_rel)?;
  }

  if is_template {
    let content = match fs::read_to_string(&source) {
      Ok(s) => s,
      Err(e) => {
        if e.kind() == ErrorKind::InvalidData {
          error!(
            "UTF-8 READ ERROR: Failed to read '{}' as UTF-8 text. Drop the {} suffix if it is binary.",
            source.display(),
            TEMPLATE_SUFFIX
          );
        }
        return Err(ScaffoldError::file_op("read template", &source)(e));
      }
    };
    let rendered = render_str(&content, data);
    if !opts.ctx.dry_run {
      fs::write(&dest, &rendered).map_err(ScaffoldError::file_op("write file", &dest))?;
    }
    if opts.manifest.is_previewable(&dest, rendered.len()) {
      log!(
        level,
        "{}[COPY_TEMPLATE_FILE({})] writeFile: {}, content: (next line)\n{}",
        opts.log_prefix,
        out_rel,
        dest.display(),
        rendered
      );
    } else {
      log!(
        level,
        "{}[COPY_TEMPLATE_FILE({})] writeFile: {} ({} bytes)",
        opts.log_prefix,
        out_rel,
        dest.display(),
        rendered.len()
      );
    }
  } else {
    if !opts.ctx.dry_run {
      fs::copy(&source, &dest).map_err(ScaffoldError::file_op("copy file", &dest))?;
    }
    log!(
      level,
      "{}[COPY_TEMPLATE_FILE({})] copyFile: {} -> {}",
      opts.log_prefix,
      out_rel,
      source.display(),
      dest.display()
    );
  }
  Ok(())
}

/// Renders every entry below `rel_dir` into `target_dir`. Directories are
/// reproduced even when empty; sibling order is not significant.
pub fn render_dir(
  rel_dir: &str,
  target_dir: &Path,
  data: &Substitutions,
  opts: &RenderOptions<'_>,
) -> Result<(), ScaffoldError> {
  log!(
    opts.ctx.level(),
    "{}COPY_TEMPLATE_DIR: {} -> {}",
    opts.log_prefix,
    rel_dir,
    target_dir.display()
  );

  let dir_root = opts.template_root.join(rel_dir);
  if !dir_root.is_dir() {
    warn!(
      "{}COPY_TEMPLATE_DIR: Template directory \"{}\" does not exist, skipping...",
      opts.log_prefix,
      dir_root.display()
    );
    return Ok(());
  }

  let nested = RenderOptions {
    ctx: opts.ctx,
    template_root: &dir_root,
    manifest: opts.manifest,
    log_prefix: format!(
      "{}[COPY_TEMPLATE_DIR({} -> {})]",
      opts.log_prefix,
      rel_dir,
      target_dir.display()
    ),
  };

  for entry in WalkDir::new(&dir_root).min_depth(1) {
    let entry = entry.map_err(|e| ScaffoldError::WalkDirError {
      path: dir_root.clone(),
      source: e,
    })?;
    let Ok(relative) = entry.path().strip_prefix(&dir_root) else {
      continue;
    };
    let mut rel = relative
      .components()
      .map(|c| c.as_os_str().to_string_lossy())
      .collect::<Vec<_>>()
      .join("/");
    if entry.file_type().is_dir() {
      rel.push('/');
    }
    render_file(&rel, target_dir, data, &nested)?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
  }

  fn file_count(dir: &Path) -> usize {
    WalkDir::new(dir)
      .into_iter()
      .filter_map(Result::ok)
      .filter(|e| e.file_type().is_file())
      .count()
  }

  #[test]
  fn render_str_substitutes_known_tokens() {
    let data = Substitutions::new().with_name("name", "TestName");
    assert_eq!(render_str("hello {{name}}", &data), "hello TestName");
    assert_eq!(render_str("hello {{ NAME }}", &data), "hello TestName");
    assert_eq!(render_str("{{kebabCase name}}", &data), "test-name");
    assert_eq!(render_str("{{nameSnakeCase}}", &data), "test_name");
  }

  #[test]
  fn render_str_leaves_unknown_tokens() {
    let data = Substitutions::new().with_name("name", "x");
    assert_eq!(render_str("{{other}} {{titleCase name}}", &data), "{{other}} {{titleCase name}}");
    assert_eq!(render_str("{{kebabCase other}}", &data), "{{kebabCase other}}");
    assert_eq!(render_str("no tokens", &data), "no tokens");
  }

  #[test]
  fn hbs_file_is_rendered_and_renamed() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(&templates.path().join("name.txt.hbs"), "hello {{name}}");
    let manifest = TemplatesManifest::default();
    let opts = RenderOptions::new(ExecutionContext::default(), templates.path(), &manifest);
    let data = Substitutions::new().with_name("name", "world");

    render_file("name.txt.hbs", out.path(), &data, &opts).unwrap();

    assert_eq!(fs::read_to_string(out.path().join("name.txt")).unwrap(), "hello world");
    assert_eq!(file_count(out.path()), 1);
  }

  #[test]
  fn directory_render_strips_escape_and_templates_names() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let root = templates.path().join("demo");
    write(&root.join("_pkg.json"), "{\"name\": \"{{name}}\"}");
    write(&root.join("{{kebabCase name}}.txt.hbs"), "body of {{name}}");
    write(&root.join("_nested/_inner.md"), "inner");
    fs::create_dir_all(root.join("empty")).unwrap();
    let manifest = TemplatesManifest::default();
    let opts = RenderOptions::new(ExecutionContext::default(), templates.path(), &manifest);
    let data = Substitutions::new().with_name("name", "TestName");

    render_dir("demo", out.path(), &data, &opts).unwrap();

    assert_eq!(
      fs::read_to_string(out.path().join("pkg.json")).unwrap(),
      "{\"name\": \"{{name}}\"}"
    );
    assert_eq!(
      fs::read_to_string(out.path().join("test-name.txt")).unwrap(),
      "body of TestName"
    );
    assert_eq!(fs::read_to_string(out.path().join("nested/inner.md")).unwrap(), "inner");
    assert!(out.path().join("empty").is_dir());
  }

  #[test]
  fn trailing_separator_only_creates_directory() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let manifest = TemplatesManifest::default();
    let opts = RenderOptions::new(ExecutionContext::default(), templates.path(), &manifest);
    let data = Substitutions::new().with_name("themeName", "Cool Theme");

    render_file("src/{{kebabCase themeName}}/", out.path(), &data, &opts).unwrap();

    assert!(out.path().join("src/cool-theme").is_dir());
    assert_eq!(file_count(out.path()), 0);
  }

  #[test]
  fn rendering_overwrites_existing_files() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(&templates.path().join("a.txt.hbs"), "new {{v}}");
    write(&out.path().join("a.txt"), "old");
    let manifest = TemplatesManifest::default();
    let opts = RenderOptions::new(ExecutionContext::default(), templates.path(), &manifest);
    let mut data = Substitutions::new();
    data.insert("v", "1");

    render_file("a.txt.hbs", out.path(), &data, &opts).unwrap();

    assert_eq!(fs::read_to_string(out.path().join("a.txt")).unwrap(), "new 1");
  }

  #[test]
  fn binary_files_are_copied_verbatim() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let bytes = [0u8, 159, 146, 150, b'{', b'{'];
    fs::write(templates.path().join("logo.png"), bytes).unwrap();
    let manifest = TemplatesManifest::default();
    let opts = RenderOptions::new(ExecutionContext::default(), templates.path(), &manifest);

    render_file("logo.png", out.path(), &Substitutions::new(), &opts).unwrap();

    assert_eq!(fs::read(out.path().join("logo.png")).unwrap(), bytes);
  }

  #[test]
  fn missing_template_is_skipped() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let manifest = TemplatesManifest::default();
    let opts = RenderOptions::new(ExecutionContext::default(), templates.path(), &manifest);

    render_file("absent.txt.hbs", out.path(), &Substitutions::new(), &opts).unwrap();
    render_dir("absent", out.path(), &Substitutions::new(), &opts).unwrap();

    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
  }

  #[test]
  fn dry_run_writes_nothing() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(&templates.path().join("demo/sub/a.txt.hbs"), "hello {{name}}");
    write(&templates.path().join("demo/b.bin"), "raw");
    let manifest = TemplatesManifest::default();
    let opts = RenderOptions::new(ExecutionContext::new(true, false), templates.path(), &manifest);
    let target = out.path().join("target");

    render_dir("demo", &target, &Substitutions::new().with_name("name", "x"), &opts).unwrap();

    assert!(!target.exists());
  }
}
