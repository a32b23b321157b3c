// src/fsops.rs
use std::fs;
use std::path::{Path, PathBuf};

use log::{log, trace};
use walkdir::WalkDir;

use crate::action::ExecutionContext;
use crate::backup::backup_path;
use crate::error::ScaffoldError;

/// How colliding files are handled while merging one tree into another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
  /// Replace colliding files in place.
  Overwrite,
  /// Rename colliding files to a free `.bak[N]` sibling, then copy.
  Backup,
}

/// Copies `source` onto `target`, creating parent directories. An existing
/// target is replaced.
pub fn copy_file(source: &Path, target: &Path, ctx: ExecutionContext) -> Result<(), ScaffoldError> {
  if !ctx.dry_run {
    if let Some(parent) = target.parent() {
      fs::create_dir_all(parent).map_err(ScaffoldError::file_op("create directory", parent))?;
    }
    fs::copy(source, target).map_err(ScaffoldError::file_op("copy file", target))?;
  }
  Ok(())
}

/// Moves an existing `target` out of the way and returns where it went.
pub fn backup_file(target: &Path, ctx: ExecutionContext, label: &str) -> Result<PathBuf, ScaffoldError> {
  let backup = backup_path(target);
  log!(
    ctx.level(),
    "{}: Renaming existing \"{}\" to \"{}\"",
    label,
    target.display(),
    backup.display()
  );
  if !ctx.dry_run {
    fs::rename(target, &backup).map_err(ScaffoldError::file_op("rename", target))?;
  }
  Ok(backup)
}

/// Merges the tree under `source` into `target`.
///
/// Directories are created as needed and never renamed. Files are matched by
/// relative path; collisions are handled according to `mode`. Files under
/// `target` without a counterpart in `source` are never touched.
pub fn merge_dir(
  source: &Path,
  target: &Path,
  mode: MergeMode,
  ctx: ExecutionContext,
) -> Result<(), ScaffoldError> {
  let level = ctx.level();
  let label = match mode {
    MergeMode::Overwrite => "COPY_DIR",
    MergeMode::Backup => "COPY_DIR (backup)",
  };

  for entry in WalkDir::new(source) {
    let entry = entry.map_err(|e| ScaffoldError::WalkDirError {
      path: source.to_path_buf(),
      source: e,
    })?;
    let Ok(relative) = entry.path().strip_prefix(source) else {
      continue;
    };
    let dest = target.join(relative);

    if entry.file_type().is_dir() {
      if !ctx.dry_run {
        fs::create_dir_all(&dest).map_err(ScaffoldError::file_op("create directory", &dest))?;
      }
      trace!("{}: ensureDir {}", label, dest.display());
    } else if entry.file_type().is_file() {
      if mode == MergeMode::Backup && dest.exists() {
        backup_file(&dest, ctx, label)?;
      }
      if !ctx.dry_run {
        fs::copy(entry.path(), &dest).map_err(ScaffoldError::file_op("copy file", &dest))?;
      }
      log!(level, "{} (copy): {} -> {}", label, entry.path().display(), dest.display());
    } else {
      log::debug!(
        "Skipping non-file/non-directory entry: {}",
        entry.path().display()
      );
    }
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

  fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
  }

  #[test]
  fn merge_copies_nested_tree() {
    let tmp = TempDir::new().unwrap();
    let (source, target) = (tmp.path().join("source"), tmp.path().join("target"));
    write(&source.join("a.txt"), "a");
    write(&source.join("b/c.txt"), "c");

    merge_dir(&source, &target, MergeMode::Overwrite, ExecutionContext::default()).unwrap();

    assert_eq!(read(&target.join("a.txt")), "a");
    assert_eq!(read(&target.join("b/c.txt")), "c");
  }

  #[test]
  fn backup_merge_preserves_colliding_files() {
    let tmp = TempDir::new().unwrap();
    let (source, target) = (tmp.path().join("source"), tmp.path().join("target"));
    write(&source.join("a.txt"), "new");
    write(&source.join("sub/d.txt"), "new d");
    write(&target.join("a.txt"), "old");
    write(&target.join("sub/d.txt"), "old d");
    write(&target.join("sub/d.txt.bak"), "older d");
    write(&target.join("keep.txt"), "keep");

    merge_dir(&source, &target, MergeMode::Backup, ExecutionContext::default()).unwrap();

    assert_eq!(read(&target.join("a.txt")), "new");
    assert_eq!(read(&target.join("a.txt.bak")), "old");
    assert_eq!(read(&target.join("sub/d.txt")), "new d");
    assert_eq!(read(&target.join("sub/d.txt.bak")), "older d");
    assert_eq!(read(&target.join("sub/d.txt.bak2")), "old d");
    assert_eq!(read(&target.join("keep.txt")), "keep");
    assert!(target.join("sub").is_dir());
  }

  #[test]
  fn dry_run_merge_touches_nothing() {
    let tmp = TempDir::new().unwrap();
    let (source, target) = (tmp.path().join("source"), tmp.path().join("target"));
    write(&source.join("a.txt"), "new");
    write(&source.join("x/y.txt"), "y");
    write(&target.join("a.txt"), "old");

    merge_dir(&source, &target, MergeMode::Backup, ExecutionContext::new(true, false)).unwrap();

    assert_eq!(read(&target.join("a.txt")), "old");
    assert!(!target.join("a.txt.bak").exists());
    assert!(!target.join("x").exists());
  }

  #[test]
  fn copy_file_creates_parents() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("s.txt");
    write(&source, "s");
    let target = tmp.path().join("deep/er/t.txt");

    copy_file(&source, &target, ExecutionContext::default()).unwrap();

    assert_eq!(read(&target), "s");
  }
}
