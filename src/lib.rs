// src/lib.rs
// =============================================================================
// repo-scout: fetch a repository, find its README, parse it into a tree.
//
// The pieces:
// - fetch:     shallow, single-branch clone of a repository URL
// - readme:    README lookup, markdown parsing, structural metrics
// - workspace: the temporary clone directory, removed on drop
// - pipeline:  runs all of the above and hands a snapshot to a consumer
//
// Example:
//   let pipeline = Pipeline::default();
//   let sections = pipeline
//       .run_in_temp("https://github.com/user/repo", |snapshot| {
//           snapshot.document.as_ref().map(|doc| doc.section_count())
//       })
//       .await?;
// =============================================================================

pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod readme;
pub mod workspace;

pub use config::{FetchOptions, PipelineConfig, DEFAULT_README_NAMES};
pub use error::{Error, Result};
pub use fetch::{fetch, RepositoryUrl};
pub use pipeline::{Pipeline, RepositorySnapshot};
pub use readme::{locate_readme, parse, Document, DocumentStats, Node, Readme, ReadmeLocator};
pub use workspace::Workspace;
