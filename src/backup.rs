// src/backup.rs
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use log::trace;

/// Returns the first free sibling of `target` named `<target>.bak`,
/// `<target>.bak2`, `<target>.bak3`, ...
///
/// If `target` itself does not exist it is returned unchanged. Probing is
/// linear and unbounded; backup chains are expected to be short.
pub fn backup_path(target: &Path) -> PathBuf {
  if !target.exists() {
    return target.to_path_buf();
  }

  let mut counter: u32 = 1;
  loop {
    let candidate = backup_candidate(target, counter);
    if !candidate.exists() {
      trace!(
        "Backup slot for {} -> {}",
        target.display(),
        candidate.display()
      );
      return candidate;
    }
    counter += 1;
  }
}

fn backup_candidate(target: &Path, counter: u32) -> PathBuf {
  let mut name = OsString::from(target.as_os_str());
  if counter == 1 {
    name.push(".bak");
  } else {
    name.push(format!(".bak{}", counter));
  }
  PathBuf::from(name)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  #[test]
  fn missing_target_is_returned_unchanged() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("a.txt");
    assert_eq!(backup_path(&target), target);
  }

  #[test]
  fn first_backup_uses_plain_bak() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("a.txt");
    fs::write(&target, "a").unwrap();
    assert_eq!(backup_path(&target), dir.path().join("a.txt.bak"));
  }

  #[test]
  fn occupied_slots_are_skipped() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("a.txt");
    fs::write(&target, "a").unwrap();
    fs::write(dir.path().join("a.txt.bak"), "b").unwrap();
    assert_eq!(backup_path(&target), dir.path().join("a.txt.bak2"));

    fs::write(dir.path().join("a.txt.bak2"), "c").unwrap();
    assert_eq!(backup_path(&target), dir.path().join("a.txt.bak3"));
  }

  #[test]
  fn first_free_slot_wins_over_later_ones() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("a.txt");
    fs::write(&target, "a").unwrap();
    fs::write(dir.path().join("a.txt.bak2"), "old").unwrap();
    assert_eq!(backup_path(&target), dir.path().join("a.txt.bak"));
  }
}
