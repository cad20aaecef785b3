// src/readme/locate.rs
// =============================================================================
// This module finds the README at the root of a checked-out repository.
//
// Repositories spell the file many ways (README.md, Readme.md, README, ...).
// The locator tries an ordered list of names and returns the first one that
// exists and can be read. Only the top level is searched.
//
// A missing README is a normal outcome, so this module returns Option
// rather than Result: None means "no README", while Some with empty text
// means "an empty README". Downstream metrics treat those differently.
// =============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::DEFAULT_README_NAMES;

/// A README file found in a workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readme {
    /// The candidate name that matched, e.g. "README.md"
    pub file_name: String,
    pub path: PathBuf,
    /// Raw file contents, decoded as UTF-8 (invalid bytes become U+FFFD)
    pub text: String,
}

/// Looks for README files using an ordered list of candidate names
#[derive(Debug, Clone)]
pub struct ReadmeLocator {
    candidates: Vec<String>,
}

impl Default for ReadmeLocator {
    fn default() -> Self {
        Self::with_candidates(DEFAULT_README_NAMES.iter().copied())
    }
}

impl ReadmeLocator {
    /// Builds a locator that tries `candidates` in the given order
    pub fn with_candidates<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    // Returns the first readable README under `root`
    //
    // Candidates that exist but fail to read are logged and skipped, so an
    // unreadable README.md can still fall through to a readable README.
    pub fn locate(&self, root: &Path) -> Option<Readme> {
        for name in &self.candidates {
            let path = root.join(name);

            // A directory called README does not count
            if !path.is_file() {
                continue;
            }

            match fs::read(&path) {
                Ok(bytes) => {
                    debug!(file = %name, bytes = bytes.len(), "found README");
                    return Some(Readme {
                        file_name: name.clone(),
                        text: String::from_utf8_lossy(&bytes).into_owned(),
                        path,
                    });
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "cannot read README candidate");
                }
            }
        }

        debug!(root = %root.display(), "no README found");
        None
    }
}

/// Shorthand for `ReadmeLocator::default().locate(root)`
pub fn locate_readme(root: &Path) -> Option<Readme> {
    ReadmeLocator::default().locate(root)
}
