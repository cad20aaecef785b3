// src/error.rs
// =============================================================================
// Error types for the repository pipeline.
//
// Only the fetch side and workspace setup can fail hard. A missing or
// unreadable README is an Option, and the parser never fails, so neither
// shows up here.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a single pipeline invocation.
#[derive(Error, Debug)]
pub enum Error {
    /// The repository URL could not be parsed or uses an unsupported scheme
    #[error("invalid repository URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The workspace directory could not be cleared or created
    #[error("cannot prepare workspace {}: {source}", path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The git executable could not be started
    #[error("cannot run '{program}': {source}")]
    GitUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The clone did not finish within the configured timeout
    #[error("cloning {url} timed out after {}s", after.as_secs())]
    TimedOut { url: String, after: Duration },

    /// The remote asked for credentials
    #[error("authentication required for {url}")]
    AuthenticationRequired { url: String },

    /// The remote answered but the repository does not exist
    #[error("repository not found: {url}")]
    RepositoryNotFound { url: String },

    /// DNS, connection or TLS failure talking to the remote
    #[error("network error while cloning {url}: {detail}")]
    Network { url: String, detail: String },

    /// git could not write into the destination directory
    #[error("cannot write to {}: {detail}", path.display())]
    DestinationUnwritable { path: PathBuf, detail: String },

    /// git exited unsuccessfully for a reason we do not classify
    #[error("git clone of {url} failed ({}): {detail}", exit_code_label(*code))]
    CloneFailed {
        url: String,
        code: Option<i32>,
        detail: String,
    },

    /// git reported success but left no working tree behind
    #[error("clone of {url} produced an empty working tree")]
    EmptyCheckout { url: String },

    /// Any other I/O failure while talking to the git process
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_code_label(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl Error {
    /// True for failures that happened on the network side of a fetch
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::TimedOut { .. }
                | Error::AuthenticationRequired { .. }
                | Error::RepositoryNotFound { .. }
                | Error::Network { .. }
        )
    }
}
