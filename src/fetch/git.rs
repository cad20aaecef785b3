// src/fetch/git.rs
// =============================================================================
// This module clones a repository snapshot into a local directory.
//
// Strategy:
// - Run the system `git` binary with a shallow, single-branch clone
//   (depth 1, default branch only, no tags)
// - Bound the whole clone with a timeout and kill git if it runs over
// - Turn git's stderr into one of our typed errors
//
// Why the git CLI?
// - It speaks every transport (https, ssh, git, file) out of the box
// - It already knows how to do shallow clones efficiently
// - tokio::process lets us await it and kill it on timeout
//
// No retries: one attempt either succeeds or fails, callers decide what
// to do next.
// =============================================================================

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info};

use super::repo_url::RepositoryUrl;
use crate::config::FetchOptions;
use crate::error::{Error, Result};

// Clones the tip of the default branch of `url` into `destination`
//
// Parameters:
//   url: validated repository URL
//   destination: directory to clone into (must be absent or empty)
//   options: timeout and git executable
//
// Returns: Ok(()) once the working tree is populated, or a typed error.
// On error the destination may hold partial data; the caller owns cleanup.
pub async fn fetch(
    url: &RepositoryUrl,
    destination: &Path,
    options: &FetchOptions,
) -> Result<()> {
    info!(url = %url, destination = %destination.display(), "cloning repository");

    let mut command = Command::new(&options.git_program);
    command
        .arg("clone")
        .arg("--depth")
        .arg("1")
        .arg("--single-branch")
        .arg("--no-tags")
        .arg("--quiet")
        .arg("--")
        .arg(url.as_str())
        .arg(destination)
        // Fail instead of blocking on a username/password prompt
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = command.spawn().map_err(|source| Error::GitUnavailable {
        program: options.git_program.display().to_string(),
        source,
    })?;

    // Dropping the wait future on timeout drops the child, which kills it
    let output = match timeout(options.timeout, child.wait_with_output()).await {
        Ok(output) => output?,
        Err(_) => {
            return Err(Error::TimedOut {
                url: url.to_string(),
                after: options.timeout,
            })
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        debug!(status = ?output.status.code(), stderr = %stderr, "git clone failed");
        return Err(classify_failure(url, destination, output.status.code(), stderr));
    }

    if !has_working_tree(destination)? {
        return Err(Error::EmptyCheckout {
            url: url.to_string(),
        });
    }

    info!(url = %url, "clone finished");
    Ok(())
}

// Checks that the clone left at least one file besides the .git directory
fn has_working_tree(destination: &Path) -> Result<bool> {
    for entry in std::fs::read_dir(destination)? {
        if entry?.file_name() != ".git" {
            return Ok(true);
        }
    }
    Ok(false)
}

// Maps git's stderr onto our error taxonomy
//
// git does not give structured exit codes (almost everything is 128), so
// we look at the message text.
fn classify_failure(
    url: &RepositoryUrl,
    destination: &Path,
    code: Option<i32>,
    stderr: String,
) -> Error {
    let lower = stderr.to_lowercase();
    let url_string = url.to_string();

    if lower.contains("could not read username")
        || lower.contains("could not read password")
        || lower.contains("authentication failed")
        || lower.contains("terminal prompts disabled")
        || lower.contains("permission denied (publickey")
    {
        Error::AuthenticationRequired { url: url_string }
    } else if lower.contains("not found")
        || lower.contains("does not appear to be a git repository")
        || lower.contains("does not exist")
    {
        Error::RepositoryNotFound { url: url_string }
    } else if lower.contains("could not resolve host")
        || lower.contains("failed to connect")
        || lower.contains("connection refused")
        || lower.contains("connection timed out")
        || lower.contains("network is unreachable")
        || lower.contains("ssl certificate")
        || lower.contains("ssl_")
        || lower.contains("tls handshake")
        || lower.contains("gnutls")
        || lower.contains("certificate verify")
        || lower.contains("unable to access")
    {
        Error::Network {
            url: url_string,
            detail: stderr,
        }
    } else if lower.contains("could not create")
        || lower.contains("permission denied")
        || lower.contains("read-only file system")
        || lower.contains("already exists and is not an empty directory")
    {
        Error::DestinationUnwritable {
            path: destination.to_path_buf(),
            detail: stderr,
        }
    } else {
        Error::CloneFailed {
            url: url_string,
            code,
            detail: stderr,
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does tokio::time::timeout do?
//    - Wraps a future and races it against a timer
//    - Returns Ok(output) if the future wins, Err(Elapsed) if the timer wins
//    - When the timer wins the inner future is dropped, not left running
//
// 2. What is kill_on_drop?
//    - By default a dropped tokio Child keeps running in the background
//    - kill_on_drop(true) sends it a kill signal instead, so a timed-out
//      git process does not linger
// -----------------------------------------------------------------------------
