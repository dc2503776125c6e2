//! Monorepo layout discovery.
//!
//! An application may live inside a JavaScript workspace. The workspace
//! root contributes its own `.env` files, so the resolver needs to know
//! whether such a root exists and where it is.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Marker files that identify a workspace root on their own.
const WORKSPACE_MARKERS: &[&str] = &["lerna.json", "pnpm-workspace.yaml"];

/// Where the application and its monorepo root live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// The application directory (contains the app `.env` files).
    pub app_dir: PathBuf,

    /// The monorepo root, or the app directory when not in a monorepo.
    pub monorepo_root: PathBuf,

    /// Whether a workspace root was found above the app directory.
    pub is_monorepo: bool,
}

impl ProjectLayout {
    /// Discover the layout for an application directory.
    ///
    /// Walks up from the parent of `app_dir` looking for a directory with
    /// `lerna.json`, `pnpm-workspace.yaml`, or a `package.json` that
    /// declares `workspaces`.
    pub fn discover(app_dir: &Path) -> Self {
        match find_workspace_root(app_dir) {
            Some(root) => {
                tracing::debug!("Found workspace root at {}", root.display());
                Self {
                    app_dir: app_dir.to_path_buf(),
                    monorepo_root: root,
                    is_monorepo: true,
                }
            }
            None => Self::standalone(app_dir),
        }
    }

    /// A layout with no monorepo root.
    pub fn standalone(app_dir: &Path) -> Self {
        Self {
            app_dir: app_dir.to_path_buf(),
            monorepo_root: app_dir.to_path_buf(),
            is_monorepo: false,
        }
    }
}

#[derive(Deserialize)]
struct PackageManifest {
    workspaces: Option<serde_json::Value>,
}

/// Find the nearest workspace root strictly above `app_dir`.
pub fn find_workspace_root(app_dir: &Path) -> Option<PathBuf> {
    let mut current = app_dir.parent()?.to_path_buf();

    loop {
        if is_workspace_root(&current) {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

fn is_workspace_root(dir: &Path) -> bool {
    if WORKSPACE_MARKERS.iter().any(|m| dir.join(m).is_file()) {
        return true;
    }

    let manifest = dir.join("package.json");
    let Ok(content) = std::fs::read_to_string(&manifest) else {
        return false;
    };

    match serde_json::from_str::<PackageManifest>(&content) {
        Ok(pkg) => pkg.workspaces.is_some(),
        Err(e) => {
            tracing::debug!("Ignoring unreadable {}: {}", manifest.display(), e);
            false
        }
    }
}
