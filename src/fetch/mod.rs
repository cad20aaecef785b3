// src/fetch/mod.rs
// =============================================================================
// This module retrieves repositories into a local directory.
//
// Currently implements:
// - Validating repository URLs (repo_url.rs)
// - Shallow, single-branch clones through the git CLI (git.rs)
// =============================================================================

mod git;
mod repo_url;

pub use git::fetch;
pub use repo_url::RepositoryUrl;
