// src/config.rs
// =============================================================================
// Knobs for the pipeline.
//
// The CLI fills these in from flags and REPO_SCOUT_* environment variables;
// library callers can build them directly or take the defaults.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

/// README file names tried at the repository root, first match wins
pub const DEFAULT_README_NAMES: &[&str] = &[
    "README.md",
    "README.MD",
    "Readme.md",
    "ReadMe.md",
    "README",
    "readme.md",
    "readme",
];

/// How long a clone may take before the git process is killed
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings for the repository fetcher
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Upper bound for the whole clone
    pub timeout: Duration,
    /// git executable to run (looked up on PATH when not absolute)
    pub git_program: PathBuf,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
            git_program: PathBuf::from("git"),
        }
    }
}

impl FetchOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_git_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.git_program = program.into();
        self
    }
}

/// Settings for a whole fetch → locate → parse run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub fetch: FetchOptions,
    /// Ordered README candidates handed to the locator
    pub readme_names: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fetch: FetchOptions::default(),
            readme_names: DEFAULT_README_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
