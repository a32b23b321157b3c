// src/executor.rs
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, log, trace, warn};

use crate::action::{Action, ConflictPolicy, ExecutionContext};
use crate::config::TemplatesManifest;
use crate::error::ScaffoldError;
use crate::exec::CommandRunner;
use crate::fsops::{self, MergeMode};
use crate::prompt::Prompter;
use crate::template::{self, RenderOptions};

/// Outcome of checking a copy target against its conflict policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
  Copy,
  Skip,
  Backup,
}

/// Interprets plans against the filesystem and the command runner.
pub struct Executor<'a> {
  templates_dir: PathBuf,
  manifest: TemplatesManifest,
  prompter: &'a dyn Prompter,
  runner: &'a dyn CommandRunner,
}

impl<'a> Executor<'a> {
  pub fn new(
    templates_dir: impl Into<PathBuf>,
    manifest: TemplatesManifest,
    prompter: &'a dyn Prompter,
    runner: &'a dyn CommandRunner,
  ) -> Self {
    Self {
      templates_dir: templates_dir.into(),
      manifest,
      prompter,
      runner,
    }
  }

  /// Runs every action in order. The first failure aborts the run; effects
  /// of earlier actions stay in place.
  pub fn execute(&self, plan: &[Action], ctx: ExecutionContext) -> Result<(), ScaffoldError> {
    if ctx.dry_run {
      info!("Dry run: {} action(s), no changes will be made.", plan.len());
    }
    for (i, action) in plan.iter().enumerate() {
      trace!("[{}/{}] {}", i + 1, plan.len(), action.kind());
      self.execute_action(action, ctx)?;
    }
    Ok(())
  }

  fn execute_action(&self, action: &Action, ctx: ExecutionContext) -> Result<(), ScaffoldError> {
    let level = ctx.level();
    match action {
      Action::CreateDir { path } => {
        if !ctx.dry_run {
          fs::create_dir_all(path).map_err(ScaffoldError::file_op("create directory", path))?;
        }
        log!(level, "CREATE_DIR: {}", path.display());
      }
      Action::WriteFile { path, content } => {
        if !ctx.dry_run {
          fs::write(path, content).map_err(ScaffoldError::file_op("write file", path))?;
        }
        if self.manifest.is_previewable(path, content.len()) {
          log!(level, "WRITE_FILE: {}, content: (next line)\n{}", path.display(), content);
        } else {
          log!(level, "WRITE_FILE: {} ({} bytes)", path.display(), content.len());
        }
      }
      Action::CopyFile {
        source,
        target,
        policy,
      } => self.copy_file(source, target, *policy, ctx)?,
      Action::CopyDir {
        source,
        target,
        policy,
      } => self.copy_dir(source, target, *policy, ctx)?,
      Action::CopyTemplateFile {
        file,
        target,
        data,
        template_root,
      } => {
        let opts = self.render_options(template_root.as_deref(), ctx);
        template::render_file(file, target, data, &opts)?;
      }
      Action::CopyTemplateDir {
        dir,
        target,
        data,
        template_root,
      } => {
        let opts = self.render_options(template_root.as_deref(), ctx);
        template::render_dir(dir, target, data, &opts)?;
      }
      Action::DeleteFile { path } => {
        if !ctx.dry_run {
          ignore_missing(fs::remove_file(path)).map_err(ScaffoldError::file_op("delete file", path))?;
        }
        log!(level, "DELETE_FILE: {}", path.display());
      }
      Action::DeleteDir { path } => {
        if !ctx.dry_run {
          ignore_missing(fs::remove_dir_all(path))
            .map_err(ScaffoldError::file_op("delete directory", path))?;
        }
        log!(level, "DELETE_DIR: {}", path.display());
      }
      Action::RunCommand { command, cwd } => {
        if !ctx.dry_run {
          self.runner.run(command, cwd.as_deref())?;
        }
        log!(
          level,
          "RUN_COMMAND: {}, cwd: {}",
          command,
          cwd.as_ref().map_or_else(|| ".".to_string(), |p| p.display().to_string())
        );
      }
    }
    Ok(())
  }

  fn render_options<'o>(&'o self, template_root: Option<&'o Path>, ctx: ExecutionContext) -> RenderOptions<'o> {
    RenderOptions::new(
      ctx,
      template_root.unwrap_or(&self.templates_dir),
      &self.manifest,
    )
  }

  /// Decides what a copy onto `target` should do. Under dry-run `Ask` never
  /// prompts and resolves to `Skip`.
  fn resolve_conflict(
    &self,
    kind: &str,
    target: &Path,
    policy: ConflictPolicy,
    ctx: ExecutionContext,
  ) -> Result<Resolution, ScaffoldError> {
    if !target.exists() {
      return Ok(Resolution::Copy);
    }
    let resolution = match policy {
      ConflictPolicy::Overwrite => Resolution::Copy,
      ConflictPolicy::Backup => Resolution::Backup,
      ConflictPolicy::Skip => {
        log!(
          ctx.level(),
          "{}: Target \"{}\" already exists and overwrite is not enabled.",
          kind,
          target.display()
        );
        Resolution::Skip
      }
      ConflictPolicy::Ask if ctx.dry_run => {
        log!(
          ctx.level(),
          "{}: Target \"{}\" already exists; would ask before overwriting, skipping in dry run.",
          kind,
          target.display()
        );
        Resolution::Skip
      }
      ConflictPolicy::Ask => {
        let message = format!("Target \"{}\" already exists. Overwrite?", target.display());
        if self.prompter.confirm(&message)? {
          Resolution::Copy
        } else {
          log!(ctx.level(), "{}: Keeping existing \"{}\".", kind, target.display());
          Resolution::Skip
        }
      }
    };
    Ok(resolution)
  }

  fn copy_file(
    &self,
    source: &Path,
    target: &Path,
    policy: ConflictPolicy,
    ctx: ExecutionContext,
  ) -> Result<(), ScaffoldError> {
    if !source.exists() {
      warn!(
        "COPY_FILE: Source file \"{}\" does not exist, skipping...",
        source.display()
      );
      return Ok(());
    }
    match self.resolve_conflict("COPY_FILE", target, policy, ctx)? {
      Resolution::Skip => return Ok(()),
      Resolution::Backup => {
        fsops::backup_file(target, ctx, "COPY_FILE")?;
      }
      Resolution::Copy => {}
    }
    fsops::copy_file(source, target, ctx)?;
    log!(ctx.level(), "COPY_FILE: {} -> {}", source.display(), target.display());
    Ok(())
  }

  fn copy_dir(
    &self,
    source: &Path,
    target: &Path,
    policy: ConflictPolicy,
    ctx: ExecutionContext,
  ) -> Result<(), ScaffoldError> {
    if !source.exists() {
      warn!(
        "COPY_DIR: Source directory \"{}\" does not exist, skipping...",
        source.display()
      );
      return Ok(());
    }
    let mode = match self.resolve_conflict("COPY_DIR", target, policy, ctx)? {
      Resolution::Skip => return Ok(()),
      Resolution::Copy => MergeMode::Overwrite,
      Resolution::Backup => {
        log!(
          ctx.level(),
          "COPY_DIR: Merging \"{}\" into \"{}\" with file backup...",
          source.display(),
          target.display()
        );
        MergeMode::Backup
      }
    };
    fsops::merge_dir(source, target, mode, ctx)?;
    log!(ctx.level(), "COPY_DIR: {} -> {}", source.display(), target.display());
    Ok(())
  }
}

fn ignore_missing(result: std::io::Result<()>) -> std::io::Result<()> {
  match result {
    Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
    other => other,
  }
}
