#![forbid(unsafe_code)]

//! Markdown parsing.
//!
//! [`MarkdownParser`] drives `pulldown-cmark` and folds its flat event stream
//! into an owned [`Document`]. Folding uses an explicit frame stack, so deeply
//! nested quotes and lists do not recurse.
//!
//! Parsing never fails: CommonMark assigns a meaning to every input.

use std::fmt;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use crate::document::{Block, Document, Inline, Span};

/// Parsed content the label can summarize without a render tree.
pub trait ParsedContent {
    /// Text of the content with all markup removed.
    fn plain_text(&self) -> String;
}

impl ParsedContent for Document {
    fn plain_text(&self) -> String {
        Document::plain_text(self)
    }
}

/// Turns raw markup text into parsed content.
pub trait MarkupParser {
    type Output: ParsedContent;

    fn parse(&self, text: &str) -> Self::Output;
}

/// CommonMark parser producing a [`Document`].
#[derive(Clone)]
pub struct MarkdownParser {
    options: Options,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self {
            options: Options::empty(),
        }
    }
}

impl fmt::Debug for MarkdownParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkdownParser")
            .field("options", &self.options.bits())
            .finish()
    }
}

impl MarkdownParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Extra `pulldown-cmark` extensions. Constructs the extensions add
    /// (tables, footnotes) are flattened into their surrounding text.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}

impl MarkupParser for MarkdownParser {
    type Output = Document;

    fn parse(&self, text: &str) -> Document {
        let mut folder = Folder::new();
        for event in Parser::new_ext(text, self.options) {
            folder.event(event);
        }
        folder.finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Root,
    Quote,
    Item,
}

#[derive(Debug)]
enum Frame {
    /// Holds blocks. Inlines arriving directly (tight list items, bare HTML)
    /// collect in `pending` and become an implicit paragraph.
    Blocks {
        container: Container,
        blocks: Vec<Block>,
        pending: Vec<Inline>,
    },
    List {
        start: Option<u64>,
        items: Vec<Vec<Block>>,
    },
    Paragraph(Vec<Inline>),
    Heading {
        level: u8,
        inlines: Vec<Inline>,
    },
    Code {
        info: Option<String>,
        code: String,
    },
    Link {
        url: String,
        text: String,
    },
    Strong,
    Emphasis,
    /// A tag whose content folds into the enclosing frame.
    Transparent,
}

struct Folder {
    stack: Vec<Frame>,
}

impl Folder {
    fn new() -> Self {
        Self {
            stack: vec![Frame::Blocks {
                container: Container::Root,
                blocks: Vec::new(),
                pending: Vec::new(),
            }],
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(_) => self.close(),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline(Inline::Code(code.into_string())),
            Event::Html(html) | Event::InlineHtml(html) => self.text(&html),
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => self.text("\n"),
            Event::Rule => self.block(Block::Rule),
            Event::TaskListMarker(done) => self.text(if done { "[x] " } else { "[ ] " }),
            Event::FootnoteReference(name) => self.text(&format!("[{name}]")),
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => Frame::Paragraph(Vec::new()),
            Tag::Heading { level, .. } => Frame::Heading {
                level: level as u8,
                inlines: Vec::new(),
            },
            Tag::BlockQuote(_) => Frame::Blocks {
                container: Container::Quote,
                blocks: Vec::new(),
                pending: Vec::new(),
            },
            Tag::CodeBlock(kind) => Frame::Code {
                info: match kind {
                    CodeBlockKind::Fenced(info) if !info.trim().is_empty() => {
                        Some(info.trim().to_owned())
                    }
                    _ => None,
                },
                code: String::new(),
            },
            Tag::List(start) => Frame::List {
                start,
                items: Vec::new(),
            },
            Tag::Item => Frame::Blocks {
                container: Container::Item,
                blocks: Vec::new(),
                pending: Vec::new(),
            },
            Tag::Strong => Frame::Strong,
            Tag::Emphasis => Frame::Emphasis,
            Tag::Link { dest_url, .. } => Frame::Link {
                url: dest_url.into_string(),
                text: String::new(),
            },
            _ => Frame::Transparent,
        };
        self.stack.push(frame);
    }

    fn close(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame {
            Frame::Blocks {
                container,
                mut blocks,
                pending,
            } => {
                flush(&mut blocks, pending);
                match container {
                    Container::Item => self.item(blocks),
                    Container::Quote | Container::Root => self.block(Block::Quote(blocks)),
                }
            }
            Frame::List { start, items } => self.block(Block::List { start, items }),
            Frame::Paragraph(inlines) => self.block(Block::Paragraph(inlines)),
            Frame::Heading { level, inlines } => self.block(Block::Heading { level, inlines }),
            Frame::Code { info, mut code } => {
                if code.ends_with('\n') {
                    code.pop();
                }
                self.block(Block::Code { info, code });
            }
            Frame::Link { url, text } => self.inline(Inline::Link { text, url }),
            Frame::Strong | Frame::Emphasis | Frame::Transparent => {}
        }
    }

    fn item(&mut self, blocks: Vec<Block>) {
        if let Some(Frame::List { items, .. }) = self.stack.last_mut() {
            items.push(blocks);
        } else {
            for block in blocks {
                self.block(block);
            }
        }
    }

    fn block(&mut self, block: Block) {
        for frame in self.stack.iter_mut().rev() {
            if let Frame::Blocks {
                blocks, pending, ..
            } = frame
            {
                flush(blocks, std::mem::take(pending));
                blocks.push(block);
                return;
            }
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(Frame::Code { code, .. }) = self.stack.last_mut() {
            code.push_str(text);
            return;
        }
        let strong = self.stack.iter().any(|f| matches!(f, Frame::Strong));
        let emphasis = self.stack.iter().any(|f| matches!(f, Frame::Emphasis));
        self.inline(Inline::Text(Span {
            text: text.to_owned(),
            strong,
            emphasis,
        }));
    }

    fn inline(&mut self, inline: Inline) {
        for frame in self.stack.iter_mut().rev() {
            let sink = match frame {
                Frame::Link { text, .. } => {
                    text.push_str(inline.text());
                    return;
                }
                Frame::Code { code, .. } => {
                    code.push_str(inline.text());
                    return;
                }
                Frame::Paragraph(inlines) | Frame::Heading { inlines, .. } => inlines,
                Frame::Blocks { pending, .. } => pending,
                _ => continue,
            };
            push_merged(sink, inline);
            return;
        }
    }

    fn finish(mut self) -> Document {
        while self.stack.len() > 1 {
            self.close();
        }
        match self.stack.pop() {
            Some(Frame::Blocks {
                mut blocks,
                pending,
                ..
            }) => {
                flush(&mut blocks, pending);
                Document { blocks }
            }
            _ => Document::default(),
        }
    }
}

fn flush(blocks: &mut Vec<Block>, pending: Vec<Inline>) {
    if !pending.is_empty() {
        blocks.push(Block::Paragraph(pending));
    }
}

/// Append `inline`, merging adjacent text runs of the same style.
fn push_merged(sink: &mut Vec<Inline>, inline: Inline) {
    if let (Some(Inline::Text(last)), Inline::Text(next)) = (sink.last_mut(), &inline)
        && last.strong == next.strong
        && last.emphasis == next.emphasis
    {
        last.text.push_str(&next.text);
        return;
    }
    sink.push(inline);
}
