#![forbid(unsafe_code)]

//! The default [`TreeBuilder`] for parsed markdown.
//!
//! # Layout
//!
//! In widgets mode every block maps to a fixed node shape:
//!
//! | Block | Nodes |
//! |-------|-------|
//! | heading | one text leaf scaled by level |
//! | paragraph | container of inline leaves; adjacent text merges into one leaf |
//! | code block | container with the code background holding one code leaf |
//! | quote | container of child blocks |
//! | list | container of item containers, each a marker leaf then the item's blocks |
//! | thematic break | empty container |
//!
//! Texture mode produces the root and a single rasterized leaf with the
//! document's plain text. `auto` picks texture unless the document has links.
//!
//! Only structure properties are read here. Style-only values are pushed onto
//! the finished tree by the caller.

use mdl_core::color::PackedRgba;
use mdl_core::node::{FallbackFont, NodeId, NodeKind, NodeRole, RenderNode};
use mdl_core::registry::PropertyMap;
use mdl_tree::builder::{BuildContext, BuildError, TreeBuilder};
use tracing::trace;

use crate::config::BuilderConfig;
use crate::document::{Block, Document, Inline, Span};

/// How the document is rendered after resolving `auto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Widgets,
    Texture,
}

impl RenderMode {
    /// Resolve the `render_mode` keyword against `doc`.
    pub fn resolve(keyword: &str, doc: &Document) -> Result<Self, BuildError> {
        match keyword {
            "widgets" => Ok(Self::Widgets),
            "texture" => Ok(Self::Texture),
            "auto" if doc.has_links() => Ok(Self::Widgets),
            "auto" => Ok(Self::Texture),
            other => Err(BuildError::Builder(format!("unknown render mode {other:?}"))),
        }
    }
}

/// Structure properties resolved once per build.
#[derive(Debug, Clone)]
struct Structure {
    mode: RenderMode,
    styled_links: bool,
    strict: bool,
    link_color: PackedRgba,
    code_bg: PackedRgba,
    fallback: Vec<FallbackFont>,
}

impl Structure {
    fn read(props: &PropertyMap, doc: &Document) -> Result<Self, BuildError> {
        let mode = RenderMode::resolve(props.str("render_mode").unwrap_or("widgets"), doc)?;
        let styled_links = props.str("link_style") == Some("styled");
        let fallback = if props.bool("fallback_enabled").unwrap_or(false) {
            let scales = props.floats("fallback_font_scales").unwrap_or_default();
            props
                .strings("fallback_fonts")
                .unwrap_or_default()
                .iter()
                .enumerate()
                .map(|(i, name)| FallbackFont {
                    name: name.clone(),
                    scale: scales.get(i).copied().unwrap_or(1.0),
                })
                .collect()
        } else {
            Vec::new()
        };
        Ok(Self {
            mode,
            styled_links,
            strict: props.bool("strict_label_mode").unwrap_or(false),
            link_color: props
                .color("link_color")
                .unwrap_or(PackedRgba::rgb(0, 128, 255)),
            code_bg: props
                .color("code_bg_color")
                .unwrap_or(PackedRgba::rgb(38, 38, 38)),
            fallback,
        })
    }
}

/// Builds render trees from [`Document`]s.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    config: BuilderConfig,
}

impl DocumentBuilder {
    #[must_use]
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    fn leaf<'a>(
        &self,
        ctx: &'a mut BuildContext,
        parent: NodeId,
        kind: NodeKind,
        role: NodeRole,
        text: String,
        s: &Structure,
    ) -> Result<&'a mut RenderNode, BuildError> {
        let node = ctx.push_child_mut(parent, kind, role)?;
        node.text = text;
        node.strict = s.strict;
        node.fallback_fonts.clone_from(&s.fallback);
        if kind == NodeKind::CodeLeaf {
            node.scale = self.config.code_scale;
        }
        Ok(node)
    }

    fn blocks(
        &self,
        ctx: &mut BuildContext,
        parent: NodeId,
        blocks: &[Block],
        s: &Structure,
    ) -> Result<(), BuildError> {
        for block in blocks {
            self.block(ctx, parent, block, s)?;
        }
        Ok(())
    }

    fn block(
        &self,
        ctx: &mut BuildContext,
        parent: NodeId,
        block: &Block,
        s: &Structure,
    ) -> Result<(), BuildError> {
        match block {
            Block::Heading { level, inlines } => {
                let text: String = inlines.iter().map(Inline::text).collect();
                let link = if s.styled_links {
                    inlines.iter().find_map(|i| match i {
                        Inline::Link { url, .. } => Some(url.clone()),
                        _ => None,
                    })
                } else {
                    None
                };
                let scale = self.config.heading_scale(*level);
                let node = self.leaf(
                    ctx,
                    parent,
                    NodeKind::TextLeaf,
                    NodeRole::Heading(*level),
                    text,
                    s,
                )?;
                node.scale = scale;
                node.strong = true;
                if link.is_some() {
                    node.link = link;
                    node.link_color = Some(s.link_color);
                }
            }
            Block::Paragraph(inlines) => {
                let para = ctx.push_child(parent, NodeKind::Container, NodeRole::Paragraph)?;
                self.inlines(ctx, para, inlines, s)?;
            }
            Block::Code { code, .. } => {
                let container = ctx.push_child_mut(parent, NodeKind::Container, NodeRole::CodeBlock)?;
                container.background = Some(s.code_bg);
                let container = container.id;
                self.leaf(
                    ctx,
                    container,
                    NodeKind::CodeLeaf,
                    NodeRole::CodeBlock,
                    code.clone(),
                    s,
                )?;
            }
            Block::Quote(inner) => {
                let quote = ctx.push_child(parent, NodeKind::Container, NodeRole::Quote)?;
                self.blocks(ctx, quote, inner, s)?;
            }
            Block::List { start, items } => {
                let list = ctx.push_child(parent, NodeKind::Container, NodeRole::List)?;
                for (i, item) in items.iter().enumerate() {
                    let marker = match start {
                        Some(first) => self.config.ordered_marker_for(first + i as u64),
                        None => self.config.bullet.clone(),
                    };
                    let item_id = ctx.push_child(list, NodeKind::Container, NodeRole::ListItem)?;
                    self.leaf(
                        ctx,
                        item_id,
                        NodeKind::TextLeaf,
                        NodeRole::ListMarker,
                        marker,
                        s,
                    )?;
                    self.blocks(ctx, item_id, item, s)?;
                }
            }
            Block::Rule => {
                ctx.push_child(parent, NodeKind::Container, NodeRole::Rule)?;
            }
        }
        Ok(())
    }

    fn inlines(
        &self,
        ctx: &mut BuildContext,
        parent: NodeId,
        inlines: &[Inline],
        s: &Structure,
    ) -> Result<(), BuildError> {
        let mut run: Vec<&Span> = Vec::new();
        let mut run_text = String::new();
        for inline in inlines {
            match inline {
                Inline::Text(span) => {
                    run_text.push_str(&span.text);
                    run.push(span);
                }
                Inline::Link { text, .. } if !s.styled_links => run_text.push_str(text),
                Inline::Link { text, url } => {
                    self.flush_run(ctx, parent, &mut run, &mut run_text, s)?;
                    let node = self.leaf(
                        ctx,
                        parent,
                        NodeKind::TextLeaf,
                        NodeRole::Link,
                        text.clone(),
                        s,
                    )?;
                    node.link = Some(url.clone());
                    node.link_color = Some(s.link_color);
                }
                Inline::Code(code) => {
                    self.flush_run(ctx, parent, &mut run, &mut run_text, s)?;
                    self.leaf(
                        ctx,
                        parent,
                        NodeKind::CodeLeaf,
                        NodeRole::CodeSpan,
                        code.clone(),
                        s,
                    )?;
                }
            }
        }
        self.flush_run(ctx, parent, &mut run, &mut run_text, s)
    }

    /// Emit the pending text run as one leaf. The leaf is strong or emphasized
    /// only when every span of the run is.
    fn flush_run(
        &self,
        ctx: &mut BuildContext,
        parent: NodeId,
        run: &mut Vec<&Span>,
        text: &mut String,
        s: &Structure,
    ) -> Result<(), BuildError> {
        if text.is_empty() {
            run.clear();
            return Ok(());
        }
        let strong = !run.is_empty() && run.iter().all(|span| span.strong);
        let emphasis = !run.is_empty() && run.iter().all(|span| span.emphasis);
        let node = self.leaf(
            ctx,
            parent,
            NodeKind::TextLeaf,
            NodeRole::Inline,
            std::mem::take(text),
            s,
        )?;
        node.strong = strong;
        node.emphasis = emphasis;
        run.clear();
        Ok(())
    }
}

impl TreeBuilder<Document> for DocumentBuilder {
    fn build(
        &mut self,
        doc: &Document,
        props: &PropertyMap,
        ctx: &mut BuildContext,
    ) -> Result<NodeId, BuildError> {
        let s = Structure::read(props, doc)?;
        let root = ctx.push_root(NodeKind::Container, NodeRole::Document)?;
        match s.mode {
            RenderMode::Widgets => self.blocks(ctx, root, &doc.blocks, &s)?,
            RenderMode::Texture => {
                let node = self.leaf(
                    ctx,
                    root,
                    NodeKind::TextLeaf,
                    NodeRole::Texture,
                    doc.plain_text(),
                    &s,
                )?;
                node.rasterized = true;
            }
        }
        trace!(
            generation = ctx.generation(),
            mode = ?s.mode,
            nodes = ctx.len(),
            "document built"
        );
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{MarkdownParser, MarkupParser};
    use mdl_core::node::NodeFilter;
    use mdl_core::registry::registry;
    use mdl_core::value::PropertyValue;
    use mdl_tree::accessor::select_ids;
    use mdl_tree::tree::RenderTree;

    fn build_with(text: &str, overrides: &[(&'static str, PropertyValue)]) -> RenderTree {
        let mut props = registry().defaults();
        for (name, value) in overrides {
            props.insert(*name, value.clone());
        }
        let doc = MarkdownParser::new().parse(text);
        let mut ctx = BuildContext::new(1);
        DocumentBuilder::default()
            .build(&doc, &props, &mut ctx)
            .unwrap();
        ctx.finish().unwrap().tree
    }

    fn build(text: &str) -> RenderTree {
        build_with(text, &[])
    }

    fn leaf_texts(tree: &RenderTree) -> Vec<String> {
        select_ids(tree, NodeFilter::LEAVES)
            .into_iter()
            .map(|id| tree.get(id).unwrap().text.clone())
            .collect()
    }

    #[test]
    fn heading_and_paragraph_make_four_nodes() {
        let tree = build("# Title\n\nBody");
        assert_eq!(tree.len(), 4);
        assert_eq!(leaf_texts(&tree), vec!["Title", "Body"]);
        let heading = tree.get(tree.children(tree.root().unwrap())[0]).unwrap();
        assert_eq!(heading.scale, 2.0);
        assert_eq!(heading.role, NodeRole::Heading(1));
    }

    #[test]
    fn single_paragraph_has_one_leaf() {
        let tree = build("New");
        assert_eq!(tree.len(), 3);
        assert_eq!(leaf_texts(&tree), vec!["New"]);
    }

    #[test]
    fn empty_document_is_just_a_root() {
        let tree = build("");
        assert_eq!(tree.len(), 1);
        assert!(tree.get(tree.root().unwrap()).unwrap().is_root());
    }

    #[test]
    fn code_block_gets_background_and_code_leaf() {
        let tree = build_with("```\nx = 1\n```", &[("code_bg_color", "#102030".into())]);
        let code = select_ids(&tree, NodeFilter::CODE_LEAVES);
        assert_eq!(code.len(), 1);
        let leaf = tree.get(code[0]).unwrap();
        assert_eq!(leaf.text, "x = 1");
        let container = tree.get(leaf.parent.unwrap()).unwrap();
        assert_eq!(container.background, Some(PackedRgba::rgb(0x10, 0x20, 0x30)));
    }

    #[test]
    fn unstyled_links_merge_into_text() {
        let tree = build("see [docs](https://d) now");
        assert_eq!(leaf_texts(&tree), vec!["see docs now"]);
        assert!(tree.links().is_empty());
    }

    #[test]
    fn styled_links_get_their_own_leaf() {
        let tree = build_with(
            "see [docs](https://d) now",
            &[
                ("link_style", "styled".into()),
                ("link_color", "#ff0000".into()),
            ],
        );
        assert_eq!(leaf_texts(&tree), vec!["see ", "docs", " now"]);
        assert_eq!(tree.links(), vec!["https://d"]);
        let link = tree.nodes().find(|n| n.link.is_some()).unwrap();
        assert_eq!(link.link_color, Some(PackedRgba::RED));
    }

    #[test]
    fn list_items_have_markers() {
        let tree = build("2. a\n3. b\n");
        assert_eq!(leaf_texts(&tree), vec!["2.", "a", "3.", "b"]);
        let tree = build("- a\n");
        assert_eq!(leaf_texts(&tree), vec!["•", "a"]);
    }

    #[test]
    fn texture_mode_is_one_rasterized_leaf() {
        let tree = build_with("# T\n\nbody", &[("render_mode", "texture".into())]);
        assert_eq!(tree.len(), 2);
        let leaf = tree.nodes().find(|n| n.kind.is_leaf()).unwrap();
        assert!(leaf.rasterized);
        assert_eq!(leaf.text, "T\n\nbody");
    }

    #[test]
    fn auto_mode_depends_on_links() {
        let auto = [("render_mode", PropertyValue::from("auto"))];
        assert_eq!(build_with("plain", &auto).len(), 2);
        assert_eq!(build_with("[a](b)", &auto).len(), 3);
    }

    #[test]
    fn strict_and_fallback_fonts_reach_leaves() {
        let tree = build_with(
            "a `b`",
            &[
                ("strict_label_mode", true.into()),
                ("fallback_enabled", true.into()),
                ("fallback_fonts", vec!["Noto", "Emoji"].into()),
                ("fallback_font_scales", vec![0.9].into()),
            ],
        );
        for id in select_ids(&tree, NodeFilter::LEAVES) {
            let leaf = tree.get(id).unwrap();
            assert!(leaf.strict);
            assert_eq!(
                leaf.fallback_fonts,
                vec![
                    FallbackFont {
                        name: "Noto".into(),
                        scale: 0.9,
                    },
                    FallbackFont {
                        name: "Emoji".into(),
                        scale: 1.0,
                    },
                ]
            );
        }
    }

    #[test]
    fn disabled_fallback_leaves_fonts_empty() {
        let tree = build_with("a", &[("fallback_fonts", vec!["Noto"].into())]);
        assert!(tree.nodes().all(|n| n.fallback_fonts.is_empty()));
    }

    #[test]
    fn unknown_render_mode_fails_the_build() {
        let doc = MarkdownParser::new().parse("x");
        let mut props = registry().defaults();
        props.insert("render_mode", "vector".into());
        let mut ctx = BuildContext::new(1);
        assert!(matches!(
            DocumentBuilder::default().build(&doc, &props, &mut ctx),
            Err(BuildError::Builder(_))
        ));
    }
}
