// src/readme/parse.rs
// =============================================================================
// This module turns README markdown into a Document tree.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into a stream of events (Start(tag), Text, End(tag), ...)
// - Follows the CommonMark specification
// - Supports the GitHub extensions READMEs rely on: tables, ~~strikethrough~~,
//   task lists and footnotes
//
// pulldown-cmark is a streaming parser, so we rebuild the hierarchy
// ourselves with a stack of open nodes: Start pushes a frame, End pops it
// and attaches the finished node to its parent.
//
// Any input produces a tree. pulldown-cmark never rejects text and the
// builder closes whatever is still open at the end. Nesting is capped at
// MAX_NESTING levels: anything deeper is flattened into the deepest node, so
// walking, serializing and dropping the tree stay within a small stack.
// =============================================================================

use pulldown_cmark::{Alignment, CodeBlockKind, Event, LinkType, Options, Parser, Tag};

use super::tree::{Align, Document, Node};

/// Deepest tree the builder will produce below the root
pub const MAX_NESTING: usize = 256;

// Parses markdown text into a Document
//
// Parameters:
//   text: README contents (a leading byte-order mark is ignored)
//
// Returns: the document tree; never fails
//
// Example:
//   "# Title\n\nBody text." -> [heading, paragraph]
pub fn parse(text: &str) -> Document {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut builder = TreeBuilder::default();
    for event in Parser::new_ext(text, markdown_options()) {
        builder.handle(event);
    }
    builder.finish()
}

// The extension set enabled on top of CommonMark
fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

// A node whose children are still being collected
enum Pending {
    Heading(u8),
    Paragraph,
    Blockquote,
    List { ordered: bool, start: Option<u64> },
    ListItem { checked: Option<bool> },
    Code { lang: Option<String> },
    Table(Vec<Align>),
    TableRow { header: bool },
    TableCell,
    FootnoteDefinition(String),
    Emphasis,
    Strong,
    Delete,
    Link { url: String, title: Option<String> },
    Image { url: String, title: Option<String> },
}

struct Frame {
    pending: Pending,
    children: Vec<Node>,
}

#[derive(Default)]
struct TreeBuilder {
    root: Vec<Node>,
    stack: Vec<Frame>,
    // Start tags dropped because the stack was full; their End tags are skipped
    flattened: usize,
}

impl TreeBuilder {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(_) => self.close(),
            Event::Text(text) => self.push_text(&text),
            Event::Code(code) => self.push(Node::InlineCode {
                value: code.to_string(),
            }),
            Event::Html(html) => self.push_html(&html),
            Event::FootnoteReference(label) => self.push(Node::FootnoteReference {
                label: label.to_string(),
            }),
            Event::SoftBreak => self.push_text("\n"),
            Event::HardBreak => self.push(Node::Break),
            Event::Rule => self.push(Node::ThematicBreak),
            Event::TaskListMarker(checked) => self.mark_task(checked),
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        if self.stack.len() >= MAX_NESTING {
            self.flattened += 1;
            return;
        }

        let pending = match tag {
            Tag::Paragraph => Pending::Paragraph,
            Tag::Heading(level, _, _) => Pending::Heading(level as u8),
            Tag::BlockQuote => Pending::Blockquote,
            Tag::CodeBlock(kind) => Pending::Code {
                lang: match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|lang| lang.to_string()),
                    CodeBlockKind::Indented => None,
                },
            },
            Tag::List(start) => Pending::List {
                ordered: start.is_some(),
                start,
            },
            Tag::Item => Pending::ListItem { checked: None },
            Tag::FootnoteDefinition(label) => Pending::FootnoteDefinition(label.to_string()),
            Tag::Table(alignments) => {
                Pending::Table(alignments.into_iter().map(convert_alignment).collect())
            }
            Tag::TableHead => Pending::TableRow { header: true },
            Tag::TableRow => Pending::TableRow { header: false },
            Tag::TableCell => Pending::TableCell,
            Tag::Emphasis => Pending::Emphasis,
            Tag::Strong => Pending::Strong,
            Tag::Strikethrough => Pending::Delete,
            Tag::Link(link_type, url, title) => Pending::Link {
                url: link_destination(link_type, &url),
                title: non_empty(&title),
            },
            Tag::Image(_, url, title) => Pending::Image {
                url: url.to_string(),
                title: non_empty(&title),
            },
        };

        self.stack.push(Frame {
            pending,
            children: Vec::new(),
        });
    }

    // Events are balanced, so End always matches the innermost frame
    fn close(&mut self) {
        if self.flattened > 0 {
            self.flattened -= 1;
            return;
        }
        if let Some(frame) = self.stack.pop() {
            let node = build_node(frame);
            self.push(node);
        }
    }

    fn current(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut self.root,
        }
    }

    fn push(&mut self, node: Node) {
        self.current().push(node);
    }

    // pulldown-cmark splits text at brackets, entities and line breaks;
    // glue adjacent runs back together
    fn push_text(&mut self, text: &str) {
        let children = self.current();
        if let Some(Node::Text { value }) = children.last_mut() {
            value.push_str(text);
        } else {
            children.push(Node::Text {
                value: text.to_string(),
            });
        }
    }

    // Block HTML arrives one line per event
    fn push_html(&mut self, html: &str) {
        let children = self.current();
        if let Some(Node::Html { value }) = children.last_mut() {
            value.push_str(html);
        } else {
            children.push(Node::Html {
                value: html.to_string(),
            });
        }
    }

    fn mark_task(&mut self, checked: bool) {
        // The item this marker belongs to was flattened away
        if self.flattened > 0 {
            return;
        }
        let item = self
            .stack
            .iter_mut()
            .rev()
            .find_map(|frame| match &mut frame.pending {
                Pending::ListItem { checked } => Some(checked),
                _ => None,
            });
        if let Some(slot) = item {
            *slot = Some(checked);
        }
    }

    fn finish(mut self) -> Document {
        self.flattened = 0;
        while !self.stack.is_empty() {
            self.close();
        }
        Document {
            children: self.root,
        }
    }
}

fn build_node(frame: Frame) -> Node {
    let children = frame.children;
    match frame.pending {
        Pending::Heading(depth) => Node::Heading { depth, children },
        Pending::Paragraph => Node::Paragraph { children },
        Pending::Blockquote => Node::Blockquote { children },
        Pending::List { ordered, start } => Node::List {
            ordered,
            start,
            children,
        },
        Pending::ListItem { checked } => Node::ListItem { checked, children },
        Pending::Code { lang } => Node::Code {
            lang,
            value: concat_text(&children),
        },
        Pending::Table(align) => Node::Table { align, children },
        Pending::TableRow { header } => Node::TableRow { header, children },
        Pending::TableCell => Node::TableCell { children },
        Pending::FootnoteDefinition(label) => Node::FootnoteDefinition { label, children },
        Pending::Emphasis => Node::Emphasis { children },
        Pending::Strong => Node::Strong { children },
        Pending::Delete => Node::Delete { children },
        Pending::Link { url, title } => Node::Link {
            url,
            title,
            children,
        },
        Pending::Image { url, title } => Node::Image {
            url,
            title,
            alt: concat_text(&children),
        },
    }
}

fn concat_text(children: &[Node]) -> String {
    children.iter().map(Node::plain_text).collect()
}

fn convert_alignment(alignment: Alignment) -> Align {
    match alignment {
        Alignment::None => Align::None,
        Alignment::Left => Align::Left,
        Alignment::Center => Align::Center,
        Alignment::Right => Align::Right,
    }
}

// Email autolinks come through without their scheme
fn link_destination(link_type: LinkType, url: &str) -> String {
    if link_type == LinkType::Email && !url.starts_with("mailto:") {
        format!("mailto:{}", url)
    } else {
        url.to_string()
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Node {
        Node::Text {
            value: value.to_string(),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\n  ").is_empty());
    }

    #[test]
    fn test_heading_then_paragraph() {
        let doc = parse("# Title\n\nBody text.");
        assert_eq!(
            doc.children,
            vec![
                Node::Heading {
                    depth: 1,
                    children: vec![text("Title")],
                },
                Node::Paragraph {
                    children: vec![text("Body text.")],
                },
            ]
        );
    }

    #[test]
    fn test_parse_is_deterministic() {
        let readme = "# A\n\n- one\n- two\n\n| x | y |\n|---|---|\n| 1 | 2 |\n";
        let first = parse(readme);
        for _ in 0..5 {
            assert_eq!(parse(readme), first);
        }
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let doc = parse("\u{feff}# Title");
        assert!(matches!(doc.children[0], Node::Heading { depth: 1, .. }));
    }

    #[test]
    fn test_table() {
        let doc = parse("| a | b |\n|:--|--:|\n| 1 | 2 |\n");
        assert_eq!(doc.len(), 1);

        match &doc.children[0] {
            Node::Table { align, children } => {
                assert_eq!(align, &vec![Align::Left, Align::Right]);
                assert_eq!(children.len(), 2);
                assert!(matches!(children[0], Node::TableRow { header: true, .. }));
                assert!(matches!(children[1], Node::TableRow { header: false, .. }));
                assert_eq!(children[1].children().len(), 2);
                assert_eq!(children[1].children()[0].plain_text().trim(), "1");
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_strikethrough() {
        let doc = parse("This is ~~gone~~ now");
        let paragraph = &doc.children[0];
        assert_eq!(
            paragraph.children()[1],
            Node::Delete {
                children: vec![text("gone")],
            }
        );
    }

    #[test]
    fn test_task_list() {
        let doc = parse("- [x] done\n- [ ] todo\n- plain\n");
        let items = doc.children[0].children();
        assert_eq!(items.len(), 3);
        assert!(matches!(items[0], Node::ListItem { checked: Some(true), .. }));
        assert!(matches!(items[1], Node::ListItem { checked: Some(false), .. }));
        assert!(matches!(items[2], Node::ListItem { checked: None, .. }));
        assert_eq!(items[0].plain_text().trim(), "done");
    }

    #[test]
    fn test_ordered_list_start() {
        let doc = parse("3. three\n4. four\n");
        assert!(matches!(
            doc.children[0],
            Node::List {
                ordered: true,
                start: Some(3),
                ..
            }
        ));
    }

    #[test]
    fn test_fenced_code_block() {
        let doc = parse("```rust title\nfn main() {}\n```\n");
        assert_eq!(
            doc.children[0],
            Node::Code {
                lang: Some("rust".to_string()),
                value: "fn main() {}\n".to_string(),
            }
        );
    }

    #[test]
    fn test_links_and_images() {
        let doc =
            parse("See [docs](https://docs.rs \"Docs\") and ![logo](logo.png) or <me@example.com>");
        let inline = doc.children[0].children();

        assert!(inline.iter().any(|node| matches!(
            node,
            Node::Link { url, title: Some(title), .. }
                if url == "https://docs.rs" && title == "Docs"
        )));
        assert!(inline.iter().any(|node| matches!(
            node,
            Node::Image { url, alt, .. } if url == "logo.png" && alt == "logo"
        )));
        assert!(inline.iter().any(|node| matches!(
            node,
            Node::Link { url, .. } if url == "mailto:me@example.com"
        )));
    }

    #[test]
    fn test_soft_breaks_merge_into_text() {
        let doc = parse("line one\nline two");
        assert_eq!(
            doc.children[0],
            Node::Paragraph {
                children: vec![text("line one\nline two")],
            }
        );
    }

    #[test]
    fn test_footnotes() {
        let doc = parse("Claim[^1].\n\n[^1]: Source.\n");
        let paragraph = doc.children[0].children();
        assert!(paragraph
            .iter()
            .any(|node| matches!(node, Node::FootnoteReference { label } if label == "1")));
        assert!(doc
            .children
            .iter()
            .any(|node| matches!(node, Node::FootnoteDefinition { label, .. } if label == "1")));
    }

    #[test]
    fn test_html_block() {
        let doc = parse("<div align=\"center\">\n<img src=\"x.png\">\n</div>\n\n# After\n");
        assert!(matches!(doc.children[0], Node::Html { .. }));
        assert!(matches!(doc.children.last(), Some(Node::Heading { .. })));
    }

    fn nesting_depth(doc: &Document) -> usize {
        let mut deepest = 0;
        let mut pending: Vec<(&Node, usize)> = doc.children().iter().map(|n| (n, 1)).collect();
        while let Some((node, level)) = pending.pop() {
            deepest = deepest.max(level);
            pending.extend(node.children().iter().map(|child| (child, level + 1)));
        }
        deepest
    }

    #[test]
    fn test_deep_blockquotes_are_flattened() {
        let input = format!("{}x", "> ".repeat(100_000));
        let doc = parse(&input);

        assert_eq!(doc.len(), 1);
        assert!(nesting_depth(&doc) <= MAX_NESTING);
        assert_eq!(doc.plain_text(), "x");

        let mut nodes = 0;
        doc.walk(&mut |_| nodes += 1);
        assert!(nodes > MAX_NESTING - 1);
        drop(doc);
    }

    #[test]
    fn test_nesting_below_the_cap_is_kept() {
        let doc = parse(&format!("{}x", "> ".repeat(10)));
        // ten blockquotes, a paragraph, the text
        assert_eq!(nesting_depth(&doc), 12);
    }

    #[test]
    fn test_deep_task_list_does_not_panic() {
        let mut input = String::new();
        for level in 0..400 {
            input.push_str(&"  ".repeat(level));
            input.push_str("- [x] item\n");
        }
        let doc = parse(&input);
        assert!(nesting_depth(&doc) <= MAX_NESTING);
        assert!(matches!(doc.children()[0], Node::List { .. }));
    }

    #[test]
    fn test_malformed_input_still_parses() {
        let inputs = [
            "[unclosed link(",
            "```\nnever closed",
            "| just | a pipe",
            "> > > deeply\n>>>> nested",
            "**bold _mixed ~~all~~ the* way_",
            "\0\u{7}\u{1b}[31m",
        ];
        for input in inputs {
            let doc = parse(input);
            assert!(!doc.is_empty(), "no nodes for {:?}", input);
        }
    }
}
