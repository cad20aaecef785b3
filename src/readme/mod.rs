// src/readme/mod.rs
// =============================================================================
// This module finds a repository's README and parses it.
//
// Currently implements:
// - Locating the README among the usual name variants (locate.rs)
// - Parsing markdown with GitHub extensions into a tree (parse.rs, tree.rs)
// - Structural metrics over the tree (stats.rs)
// =============================================================================

mod locate;
mod parse;
mod stats;
mod tree;

pub use locate::{locate_readme, Readme, ReadmeLocator};
pub use parse::parse;
pub use stats::DocumentStats;
pub use tree::{Align, Document, Node};
