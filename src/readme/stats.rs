// src/readme/stats.rs
// =============================================================================
// Gross structural metrics over a Document.
//
// These are the numbers a ramp-up scorer wants: how many sections, how much
// example code, whether there are tables, links, task lists and so on.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::tree::{Document, Node};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Children of the root node
    pub top_level_nodes: usize,
    /// Top-level headings
    pub sections: usize,
    /// Headings at any depth
    pub headings: usize,
    pub paragraphs: usize,
    pub code_blocks: usize,
    pub lists: usize,
    pub list_items: usize,
    /// List items written as `- [ ]` or `- [x]`
    pub task_items: usize,
    pub completed_tasks: usize,
    pub tables: usize,
    pub links: usize,
    pub images: usize,
    /// Whitespace-separated words of visible text, code included
    pub words: usize,
}

impl DocumentStats {
    pub fn from_document(document: &Document) -> Self {
        let mut stats = DocumentStats {
            top_level_nodes: document.len(),
            sections: document.section_count(),
            ..Default::default()
        };

        document.walk(&mut |node| match node {
            Node::Heading { .. } => stats.headings += 1,
            Node::Paragraph { .. } => stats.paragraphs += 1,
            Node::Code { value, .. } => {
                stats.code_blocks += 1;
                stats.words += value.split_whitespace().count();
            }
            Node::List { .. } => stats.lists += 1,
            Node::ListItem { checked, .. } => {
                stats.list_items += 1;
                if let Some(done) = checked {
                    stats.task_items += 1;
                    if *done {
                        stats.completed_tasks += 1;
                    }
                }
            }
            Node::Table { .. } => stats.tables += 1,
            Node::Link { .. } => stats.links += 1,
            Node::Image { .. } => stats.images += 1,
            Node::Text { value } | Node::InlineCode { value } => {
                stats.words += value.split_whitespace().count();
            }
            _ => {}
        });

        stats
    }
}
