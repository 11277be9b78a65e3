#![no_main]

use libfuzzer_sys::fuzz_target;
use mdl_core::registry::registry;
use mdl_markup::{DocumentBuilder, MarkdownParser, MarkupParser};
use mdl_tree::{BuildContext, TreeBuilder};

fuzz_target!(|input: (&str, u8, bool)| {
    let (text, mode, styled) = input;
    let doc = MarkdownParser::new().parse(text);
    let mut props = registry().defaults();
    let mode = ["widgets", "texture", "auto"][usize::from(mode % 3)];
    props.insert("render_mode", mode.into());
    props.insert("link_style", if styled { "styled" } else { "unstyled" }.into());

    let mut ctx = BuildContext::new(1);
    let root = DocumentBuilder::default()
        .build(&doc, &props, &mut ctx)
        .expect("default builder accepts any document");
    let tree = ctx.finish().expect("builder leaves one root").tree;
    assert_eq!(tree.root(), Some(root));
    for node in tree.nodes() {
        assert!(!node.kind.is_leaf() || node.children.is_empty());
        for child in &node.children {
            assert_eq!(tree.get(*child).and_then(|c| c.parent), Some(node.id));
        }
    }
});
