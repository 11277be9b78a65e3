#![forbid(unsafe_code)]

//! Markdown input for mdlabel.
//!
//! - [`parser`]: the [`MarkupParser`] seam and the CommonMark [`MarkdownParser`]
//! - [`document`]: the owned block model parsers produce
//! - [`builder`]: [`DocumentBuilder`], the default render-tree layout
//! - [`config`]: [`BuilderConfig`] layout knobs

pub mod builder;
pub mod config;
pub mod document;
pub mod parser;

pub use builder::{DocumentBuilder, RenderMode};
pub use config::BuilderConfig;
pub use document::{Block, Document, Inline, Span};
pub use parser::{MarkdownParser, MarkupParser, ParsedContent};

#[cfg(test)]
mod proptests {
    use super::*;
    use mdl_core::registry::registry;
    use mdl_tree::builder::{BuildContext, TreeBuilder};
    use mdl_tree::tree::RenderTree;
    use proptest::prelude::*;

    fn build(text: &str, generation: u32, mode: &str) -> RenderTree {
        let doc = MarkdownParser::new().parse(text);
        let mut props = registry().defaults();
        props.insert("render_mode", mode.into());
        let mut ctx = BuildContext::new(generation);
        DocumentBuilder::default()
            .build(&doc, &props, &mut ctx)
            .expect("build");
        ctx.finish().expect("finish").tree
    }

    const TOKENS: &[&str] = &[
        "# ", "## ", "> ", "- ", "1. ", "```\n", "---\n", "`", "*", "**", "[a](b)", "\n", "\n\n",
    ];

    fn markdown() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                prop::sample::select(TOKENS).prop_map(str::to_owned),
                "[a-z ]{1,8}",
            ],
            0..30,
        )
        .prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn builds_are_deterministic(
            text in markdown(),
            a in 1u32..100,
            b in 100u32..200,
            mode in prop_oneof![Just("widgets"), Just("texture"), Just("auto")],
        ) {
            let first = build(&text, a, mode);
            let second = build(&text, b, mode);
            prop_assert_eq!(first.snapshot(), second.snapshot());
            prop_assert!(first.identity_set().is_disjoint(&second.identity_set()));
        }

        #[test]
        fn parent_links_are_consistent(text in markdown()) {
            let tree = build(&text, 1, "widgets");
            for node in tree.nodes() {
                for child in &node.children {
                    prop_assert_eq!(tree.get(*child).and_then(|c| c.parent), Some(node.id));
                }
                prop_assert!(!node.kind.is_leaf() || node.children.is_empty());
            }
        }
    }
}
