// src/workspace.rs
// =============================================================================
// The local directory a repository is cloned into.
//
// A Workspace is a scoped resource:
// - prepare() clears anything already at the path and creates it empty
// - dropping the Workspace removes the directory again
//
// Because removal lives in Drop, the directory goes away on every exit
// path: success, an error returned with ?, or an early return. Removal
// failures are logged and never override the caller's result.
//
// Concurrent runs must use distinct paths; nothing here locks the directory.
// =============================================================================

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};

// Keeps temporary names unique within one process
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    armed: bool,
}

impl Workspace {
    // Clears `path` and creates it as an empty directory
    //
    // Parameters:
    //   path: where the repository will be cloned
    //
    // Returns: a guard that removes the directory when dropped
    pub fn prepare(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let workspace_error = |source: io::Error| Error::Workspace {
            path: path.clone(),
            source,
        };

        check_workspace_path(&path).map_err(workspace_error)?;

        if remove_path(&path).map_err(workspace_error)? {
            debug!(path = %path.display(), "removed stale workspace");
        }
        fs::create_dir_all(&path).map_err(workspace_error)?;

        Ok(Self { path, armed: true })
    }

    // Creates a fresh workspace under the system temp directory
    //
    // The directory name contains `label`, the process id, a timestamp and a
    // counter, e.g. /tmp/repo-scout-rust-lang-rust-4242-1700000000000-0
    pub fn temporary(label: &str) -> Result<Self> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let name = format!(
            "repo-scout-{}-{}-{}-{}",
            label,
            std::process::id(),
            millis,
            counter
        );
        Self::prepare(std::env::temp_dir().join(name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Removes the workspace now and reports how that went
    //
    // Use this instead of dropping when the caller wants to see the error.
    pub fn cleanup(mut self) -> io::Result<()> {
        self.armed = false;
        remove_path(&self.path)?;
        info!(path = %self.path.display(), "cleaned up workspace");
        Ok(())
    }

    // Leaves the directory on disk and hands back its path
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match remove_path(&self.path) {
            Ok(_) => info!(path = %self.path.display(), "cleaned up workspace"),
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "failed to clean up workspace"
            ),
        }
    }
}

// Rejects paths that would make prepare() wipe something it does not own
//
// The last component has to be a plain name, which rules out "", "/", "."
// and "..". The current directory and its ancestors are refused too, however
// they are spelled.
fn check_workspace_path(path: &Path) -> io::Result<()> {
    if !matches!(path.components().next_back(), Some(Component::Normal(_))) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "workspace path must end in a directory name",
        ));
    }

    if let (Ok(target), Ok(cwd)) = (
        fs::canonicalize(path),
        std::env::current_dir().and_then(fs::canonicalize),
    ) {
        if cwd.starts_with(&target) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "refusing to clear the current directory or one of its parents",
            ));
        }
    }
    Ok(())
}

// Removes a file or directory tree; Ok(false) if nothing was there
fn remove_path(path: &Path) -> io::Result<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(true)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is Drop?
//    - A trait whose drop() runs when a value goes out of scope
//    - It runs on normal returns, on early returns via ?, and while unwinding
//    - That makes it the natural place to release resources like directories
//
// 2. Why the `armed` flag?
//    - cleanup() and keep() consume the Workspace, but Drop still runs after
//    - Setting armed = false tells drop() there is nothing left to do
//
// 3. Why symlink_metadata instead of metadata?
//    - metadata follows symlinks; a symlinked workspace would make us delete
//      the link target's contents
//    - symlink_metadata looks at the link itself, so we just remove the link
// -----------------------------------------------------------------------------
