//! Directory tree copy helpers

use std::fs;
use std::io;
use std::path::Path;

use log::{debug, trace};

use crate::error::{GlyphError, GlyphResult};

/// Marks a directory as a work directory the merge may clear
pub const WORK_MARKER: &str = ".glyphwidths-work";

/// Make `dir` an empty, marked work directory.
///
/// Refuses a directory that overlaps any of `protected` (equal, inside or
/// containing it), and a non-empty directory without [`WORK_MARKER`].
pub fn prepare_work_dir(dir: &Path, protected: &[&Path]) -> GlyphResult<()> {
    let existed = dir.exists();
    fs::create_dir_all(dir)?;
    let work = fs::canonicalize(dir)?;

    if let Some(reason) = unsafe_work_dir(&work, protected)? {
        if !existed {
            fs::remove_dir(&work)?;
        }
        return Err(GlyphError::WorkDir {
            path: dir.to_path_buf(),
            reason,
        });
    }

    reset_dir(&work)?;
    fs::write(work.join(WORK_MARKER), "")?;
    debug!("Work directory {}", work.display());
    Ok(())
}

fn unsafe_work_dir(work: &Path, protected: &[&Path]) -> io::Result<Option<String>> {
    for path in protected {
        let Ok(path) = fs::canonicalize(path) else {
            continue;
        };
        if path.starts_with(work) || work.starts_with(&path) {
            return Ok(Some(format!("overlaps input {}", path.display())));
        }
    }
    let has_entries = fs::read_dir(work)?.next().is_some();
    if has_entries && !work.join(WORK_MARKER).is_file() {
        return Ok(Some(format!("not empty and has no {} marker", WORK_MARKER)));
    }
    Ok(None)
}

/// Remove `dir` if it exists and recreate it empty
pub fn reset_dir(dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    fs::create_dir_all(dir)
}

/// Copy every file under `source` to the same relative path under
/// `target`, replacing files that already exist there.
/// Returns the number of files copied.
pub fn overlay_copy(source: &Path, target: &Path) -> io::Result<usize> {
    fs::create_dir_all(target)?;
    let mut copied = 0;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let from = entry.path();
        let to = target.join(entry.file_name());
        if entry.file_type()?.is_dir() || from.is_dir() {
            copied += overlay_copy(&from, &to)?;
        } else {
            trace!("{} -> {}", from.display(), to.display());
            fs::copy(&from, &to)?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_overlay_replaces_and_keeps() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("base");
        let pack = dir.path().join("pack");
        let merged = dir.path().join("merged");
        fs::create_dir_all(base.join("ns/textures")).unwrap();
        fs::create_dir_all(pack.join("ns/textures")).unwrap();
        fs::write(base.join("ns/textures/a.png"), "base-a").unwrap();
        fs::write(base.join("ns/textures/b.png"), "base-b").unwrap();
        fs::write(pack.join("ns/textures/a.png"), "pack-a").unwrap();

        assert_eq!(overlay_copy(&base, &merged).unwrap(), 2);
        assert_eq!(overlay_copy(&pack, &merged).unwrap(), 1);

        assert_eq!(fs::read_to_string(merged.join("ns/textures/a.png")).unwrap(), "pack-a");
        assert_eq!(fs::read_to_string(merged.join("ns/textures/b.png")).unwrap(), "base-b");
    }

    #[test]
    fn test_work_dir_marked_and_reused() {
        let dir = TempDir::new().unwrap();
        let work = dir.path().join("work");

        prepare_work_dir(&work, &[]).unwrap();
        assert!(work.join(WORK_MARKER).is_file());
        fs::write(work.join("stale"), "x").unwrap();

        prepare_work_dir(&work, &[]).unwrap();
        assert!(!work.join("stale").exists());
        assert!(work.join(WORK_MARKER).is_file());
    }

    #[test]
    fn test_unmarked_work_dir_refused() {
        let dir = TempDir::new().unwrap();
        let work = dir.path().join("work");
        fs::create_dir_all(&work).unwrap();
        fs::write(work.join("notes.txt"), "keep").unwrap();

        let err = prepare_work_dir(&work, &[]).unwrap_err();
        assert!(matches!(err, GlyphError::WorkDir { .. }));
        assert_eq!(fs::read_to_string(work.join("notes.txt")).unwrap(), "keep");
    }

    #[test]
    fn test_work_dir_overlapping_input_refused() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("assets");
        fs::create_dir_all(base.join("minecraft")).unwrap();
        fs::write(base.join(WORK_MARKER), "").unwrap();

        // Same directory, a parent of it, and a fresh directory inside it
        for work in [base.clone(), dir.path().to_path_buf(), base.join("tmp")] {
            let err = prepare_work_dir(&work, &[base.as_path()]).unwrap_err();
            assert!(matches!(err, GlyphError::WorkDir { .. }), "{}", work.display());
        }
        assert!(base.join("minecraft").is_dir());
        assert!(!base.join("tmp").exists());
    }

    #[test]
    fn test_reset_dir_clears_contents() {
        let dir = TempDir::new().unwrap();
        let work = dir.path().join("work");
        fs::create_dir_all(work.join("stale")).unwrap();
        fs::write(work.join("stale/file"), "x").unwrap();

        reset_dir(&work).unwrap();
        assert!(work.is_dir());
        assert_eq!(fs::read_dir(&work).unwrap().count(), 0);

        // Missing directory is created
        let fresh = dir.path().join("fresh");
        reset_dir(&fresh).unwrap();
        assert!(fresh.is_dir());
    }
}
