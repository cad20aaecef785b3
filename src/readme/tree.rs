// src/readme/tree.rs
// =============================================================================
// The document tree produced by the markdown parser.
//
// The shape follows mdast: a root holding an ordered list of block nodes,
// each of which holds inline nodes. Trees are built once by parse() and
// never modified afterwards.
//
// Serialized with a "type" tag so a JSON dump reads like:
//   {"type":"heading","depth":1,"children":[{"type":"text","value":"Title"}]}
// =============================================================================

use serde::{Deserialize, Serialize};

/// Column alignment of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    None,
    Left,
    Center,
    Right,
}

/// One node of the document tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    // ----- block nodes -----
    Heading {
        depth: u8,
        children: Vec<Node>,
    },
    Paragraph {
        children: Vec<Node>,
    },
    Blockquote {
        children: Vec<Node>,
    },
    List {
        ordered: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        start: Option<u64>,
        children: Vec<Node>,
    },
    ListItem {
        /// Some(_) for task-list items: `- [x] done` / `- [ ] todo`
        #[serde(skip_serializing_if = "Option::is_none")]
        checked: Option<bool>,
        children: Vec<Node>,
    },
    Code {
        #[serde(skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
        value: String,
    },
    Html {
        value: String,
    },
    ThematicBreak,
    Table {
        align: Vec<Align>,
        children: Vec<Node>,
    },
    TableRow {
        /// True for the header row
        header: bool,
        children: Vec<Node>,
    },
    TableCell {
        children: Vec<Node>,
    },
    FootnoteDefinition {
        label: String,
        children: Vec<Node>,
    },

    // ----- inline nodes -----
    Text {
        value: String,
    },
    Emphasis {
        children: Vec<Node>,
    },
    Strong {
        children: Vec<Node>,
    },
    /// ~~strikethrough~~
    Delete {
        children: Vec<Node>,
    },
    InlineCode {
        value: String,
    },
    Link {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        children: Vec<Node>,
    },
    Image {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        alt: String,
    },
    FootnoteReference {
        label: String,
    },
    Break,
}

impl Node {
    /// Child nodes, empty for leaves
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Heading { children, .. }
            | Node::Paragraph { children }
            | Node::Blockquote { children }
            | Node::List { children, .. }
            | Node::ListItem { children, .. }
            | Node::Table { children, .. }
            | Node::TableRow { children, .. }
            | Node::TableCell { children }
            | Node::FootnoteDefinition { children, .. }
            | Node::Emphasis { children }
            | Node::Strong { children }
            | Node::Delete { children }
            | Node::Link { children, .. } => children,
            Node::Code { .. }
            | Node::Html { .. }
            | Node::ThematicBreak
            | Node::Text { .. }
            | Node::InlineCode { .. }
            | Node::Image { .. }
            | Node::FootnoteReference { .. }
            | Node::Break => &[],
        }
    }

    /// The mdast type name, e.g. "heading" or "listItem"
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Heading { .. } => "heading",
            Node::Paragraph { .. } => "paragraph",
            Node::Blockquote { .. } => "blockquote",
            Node::List { .. } => "list",
            Node::ListItem { .. } => "listItem",
            Node::Code { .. } => "code",
            Node::Html { .. } => "html",
            Node::ThematicBreak => "thematicBreak",
            Node::Table { .. } => "table",
            Node::TableRow { .. } => "tableRow",
            Node::TableCell { .. } => "tableCell",
            Node::FootnoteDefinition { .. } => "footnoteDefinition",
            Node::Text { .. } => "text",
            Node::Emphasis { .. } => "emphasis",
            Node::Strong { .. } => "strong",
            Node::Delete { .. } => "delete",
            Node::InlineCode { .. } => "inlineCode",
            Node::Link { .. } => "link",
            Node::Image { .. } => "image",
            Node::FootnoteReference { .. } => "footnoteReference",
            Node::Break => "break",
        }
    }

    /// Visits this node and all descendants, depth first, in document order
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Concatenated text content of this node and its descendants
    ///
    /// Code blocks, inline code and image alt text count as text; raw HTML
    /// does not.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text { value } | Node::InlineCode { value } | Node::Code { value, .. } => {
                out.push_str(value)
            }
            Node::Image { alt, .. } => out.push_str(alt),
            Node::Break => out.push('\n'),
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Root of a parsed README
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub(super) children: Vec<Node>,
}

impl Document {
    /// Top-level nodes in document order
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Number of top-level nodes
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of top-level headings, i.e. sections of the README
    pub fn section_count(&self) -> usize {
        self.children
            .iter()
            .filter(|node| matches!(node, Node::Heading { .. }))
            .count()
    }

    /// All headings anywhere in the tree as (depth, text) pairs
    pub fn headings(&self) -> Vec<(u8, String)> {
        let mut headings = Vec::new();
        self.walk(&mut |node| {
            if let Node::Heading { depth, .. } = node {
                headings.push((*depth, node.plain_text()));
            }
        });
        headings
    }

    /// Visits every node in document order
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Text content of the whole document, one top-level block per line
    pub fn plain_text(&self) -> String {
        self.children
            .iter()
            .map(Node::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
