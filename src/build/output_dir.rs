//! Output directory preparation.

use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::Result;

/// Make `dir` an empty directory, creating it if needed.
///
/// The directory itself is kept so watchers and symlinks pointing at it
/// survive.
pub fn empty_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        return Ok(());
    }

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Copy the static `public` tree into the output directory.
///
/// Symlinks are followed. Paths in `exclude` are relative to `public` and
/// skipped. A missing public directory copies nothing. Returns the number
/// of files copied.
pub fn copy_public(public: &Path, output: &Path, exclude: &[String]) -> Result<usize> {
    if !public.is_dir() {
        tracing::debug!("No public directory at {}", public.display());
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(public).follow_links(true).min_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        let Ok(relative) = entry.path().strip_prefix(public) else {
            continue;
        };
        if is_excluded(relative, exclude) {
            tracing::debug!("Skipping excluded {}", relative.display());
            continue;
        }

        let target = output.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    tracing::debug!("Copied {} public files into {}", copied, output.display());
    Ok(copied)
}

fn is_excluded(relative: &Path, exclude: &[String]) -> bool {
    exclude.iter().any(|e| relative == Path::new(e))
}
