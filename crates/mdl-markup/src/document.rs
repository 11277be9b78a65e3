#![forbid(unsafe_code)]

//! Owned block model of a parsed markdown document.

/// A styled run of plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub strong: bool,
    pub emphasis: bool,
}

/// Inline content of a paragraph or heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(Span),
    /// An inline code span.
    Code(String),
    /// A hyperlink with its flattened label.
    Link { text: String, url: String },
}

impl Inline {
    /// The visible text of this inline.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Text(span) => &span.text,
            Self::Code(code) => code,
            Self::Link { text, .. } => text,
        }
    }
}

/// One block of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, inlines: Vec<Inline> },
    Paragraph(Vec<Inline>),
    Code { info: Option<String>, code: String },
    Quote(Vec<Block>),
    /// `start` is `Some` for ordered lists.
    List {
        start: Option<u64>,
        items: Vec<Vec<Block>>,
    },
    Rule,
}

/// A parsed document: a sequence of top-level blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Text of the document without markup, blocks separated by blank lines.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        write_blocks(&self.blocks, "\n\n", &mut out);
        out
    }

    /// Link targets in document order, duplicates included.
    #[must_use]
    pub fn links(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_links(&self.blocks, &mut out);
        out
    }

    #[must_use]
    pub fn has_links(&self) -> bool {
        !self.links().is_empty()
    }
}

fn inline_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        out.push_str(inline.text());
    }
}

fn write_blocks(blocks: &[Block], sep: &str, out: &mut String) {
    let mut first = true;
    for block in blocks {
        if matches!(block, Block::Rule) {
            continue;
        }
        if !first {
            out.push_str(sep);
        }
        first = false;
        match block {
            Block::Heading { inlines, .. } | Block::Paragraph(inlines) => inline_text(inlines, out),
            Block::Code { code, .. } => out.push_str(code),
            Block::Quote(inner) => write_blocks(inner, sep, out),
            Block::List { items, .. } => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    write_blocks(item, "\n", out);
                }
            }
            Block::Rule => {}
        }
    }
}

fn collect_links<'a>(blocks: &'a [Block], out: &mut Vec<&'a str>) {
    for block in blocks {
        match block {
            Block::Heading { inlines, .. } | Block::Paragraph(inlines) => {
                out.extend(inlines.iter().filter_map(|i| match i {
                    Inline::Link { url, .. } => Some(url.as_str()),
                    _ => None,
                }));
            }
            Block::Quote(inner) => collect_links(inner, out),
            Block::List { items, .. } => {
                for item in items {
                    collect_links(item, out);
                }
            }
            Block::Code { .. } | Block::Rule => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(Span {
            text: s.into(),
            strong: false,
            emphasis: false,
        })
    }

    #[test]
    fn plain_text_skips_rules_and_joins_items() {
        let doc = Document {
            blocks: vec![
                Block::Heading {
                    level: 1,
                    inlines: vec![text("Title")],
                },
                Block::Rule,
                Block::List {
                    start: None,
                    items: vec![
                        vec![Block::Paragraph(vec![text("a")])],
                        vec![Block::Paragraph(vec![text("b")])],
                    ],
                },
            ],
        };
        assert_eq!(doc.plain_text(), "Title\n\na\nb");
    }

    #[test]
    fn links_are_found_in_nested_blocks() {
        let doc = Document {
            blocks: vec![Block::Quote(vec![Block::Paragraph(vec![
                text("see "),
                Inline::Link {
                    text: "here".into(),
                    url: "https://x".into(),
                },
            ])])],
        };
        assert_eq!(doc.links(), vec!["https://x"]);
        assert!(doc.has_links());
        assert_eq!(doc.plain_text(), "see here");
    }
}
