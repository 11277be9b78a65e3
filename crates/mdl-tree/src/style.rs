#![forbid(unsafe_code)]

//! In-place application of style-only properties.
//!
//! A style-only change never adds, removes, or re-identifies nodes. It
//! selects the rule's target subset from the live tree and writes one
//! attribute on each target. Targets are collected before any write so the
//! traversal never observes a half-updated tree.

use mdl_core::error::{ApplicationError, PropertyError};
use mdl_core::node::{NodeId, NodeKind, NodeRole, RenderNode};
use mdl_core::registry::{StyleRule, registry};
use mdl_core::value::PropertyValue;
use tracing::trace;

use crate::accessor::select_nodes;
use crate::tree::RenderTree;

/// Normalize `value` for the style-only property `name` and apply it.
///
/// Returns the number of nodes updated. Structure properties update nothing
/// and return `Ok(0)`; they only take effect through a rebuild.
pub fn apply_style(
    tree: &mut RenderTree,
    name: &str,
    value: PropertyValue,
) -> Result<usize, PropertyError> {
    let (descriptor, value) = registry().normalize(name, value)?;
    let Some(rule) = descriptor.style_rule() else {
        return Ok(0);
    };
    Ok(apply_rule(tree, descriptor.name, rule, &value)?)
}

/// Apply an already-normalized value through `rule`.
///
/// The write is first tried on a detached leaf, so a value the rule cannot
/// write is rejected before any target changes, including on an empty tree.
pub fn apply_rule(
    tree: &mut RenderTree,
    property: &'static str,
    rule: StyleRule,
    value: &PropertyValue,
) -> Result<usize, ApplicationError> {
    check_rule(property, rule, value)?;

    let targets: Vec<u32> = select_nodes(tree, |n| rule.target.matches(n))
        .map(|n| n.id.index())
        .collect();

    for &index in &targets {
        if let Some(node) = tree.slot_mut(index) {
            (rule.apply)(node, value).map_err(|reason| ApplicationError::new(property, reason))?;
        }
    }

    trace!(property, updated = targets.len(), "style applied");
    Ok(targets.len())
}

/// Run `rule` against a detached leaf without touching any tree.
pub fn check_rule(
    property: &'static str,
    rule: StyleRule,
    value: &PropertyValue,
) -> Result<(), ApplicationError> {
    let mut scratch = RenderNode::new(NodeId::new(0, 0), NodeKind::TextLeaf, NodeRole::Inline);
    (rule.apply)(&mut scratch, value).map_err(|reason| ApplicationError::new(property, reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuildContext;
    use mdl_core::color::PackedRgba;
    use tracing_test::traced_test;

    fn two_leaves() -> RenderTree {
        let mut ctx = BuildContext::new(4);
        let root = ctx.push_root(NodeKind::Container, NodeRole::Document).unwrap();
        let h = ctx.push_child(root, NodeKind::TextLeaf, NodeRole::Heading(1)).unwrap();
        ctx.node_mut(h).unwrap().scale = 2.0;
        ctx.push_child(root, NodeKind::CodeLeaf, NodeRole::CodeBlock).unwrap();
        ctx.finish().unwrap().tree
    }

    #[test]
    fn empty_tree_is_a_noop() {
        let mut tree = RenderTree::empty();
        assert_eq!(apply_style(&mut tree, "color", "red".into()), Ok(0));
    }

    #[test]
    fn identities_are_preserved() {
        let mut tree = two_leaves();
        let before = tree.identity_set();
        apply_style(&mut tree, "base_font_size", 10.0.into()).unwrap();
        assert_eq!(tree.identity_set(), before);
    }

    #[test]
    fn color_skips_code_leaves() {
        let mut tree = two_leaves();
        assert_eq!(apply_style(&mut tree, "color", "#ff0000".into()), Ok(1));
        let colors: Vec<_> = tree
            .nodes()
            .filter(|n| n.kind.is_leaf())
            .map(|n| n.style.color)
            .collect();
        assert_eq!(colors, vec![PackedRgba::RED, PackedRgba::WHITE]);
    }

    #[test]
    fn scaled_font_size() {
        let mut tree = two_leaves();
        apply_style(&mut tree, "base_font_size", 12.0.into()).unwrap();
        let sizes: Vec<f64> = tree
            .nodes()
            .filter(|n| n.kind.is_leaf())
            .map(|n| n.style.font_size)
            .collect();
        assert_eq!(sizes, vec![24.0, 12.0]);
    }

    #[test]
    fn padding_targets_root_only() {
        let mut tree = two_leaves();
        assert_eq!(apply_style(&mut tree, "padding", vec![1.0, 2.0].into()), Ok(1));
        let root = tree.get(tree.root().unwrap()).unwrap();
        assert_eq!(root.style.padding, [1.0, 2.0, 1.0, 2.0]);
    }

    #[test]
    fn leaf_root_keeps_both_paddings() {
        let mut ctx = BuildContext::new(2);
        ctx.push_root(NodeKind::TextLeaf, NodeRole::Inline).unwrap();
        let mut tree = ctx.finish().unwrap().tree;
        apply_style(&mut tree, "padding", 3.0.into()).unwrap();
        apply_style(&mut tree, "text_padding", 1.0.into()).unwrap();
        apply_style(&mut tree, "padding", 3.0.into()).unwrap();
        let root = tree.get(tree.root().unwrap()).unwrap();
        assert_eq!(root.style.padding, [3.0; 4]);
        assert_eq!(root.style.text_padding, [1.0; 4]);
    }

    #[test]
    fn unwritable_value_is_rejected_on_empty_tree() {
        let rule = registry().style_rule("max_lines").unwrap().unwrap();
        let mut tree = RenderTree::empty();
        let err = apply_rule(&mut tree, "max_lines", rule, &PropertyValue::Int(-3)).unwrap_err();
        assert_eq!(err.property, "max_lines");
        assert_eq!(apply_rule(&mut tree, "max_lines", rule, &PropertyValue::Int(7)), Ok(0));
    }

    #[test]
    fn structure_properties_update_nothing() {
        let mut tree = two_leaves();
        assert_eq!(apply_style(&mut tree, "text", "x".into()), Ok(0));
    }

    #[test]
    fn invalid_value_is_rejected_before_mutation() {
        let mut tree = two_leaves();
        let before = tree.snapshot();
        let err = apply_style(&mut tree, "line_height", (-2.0).into()).unwrap_err();
        assert!(matches!(err, PropertyError::Application(_)));
        assert_eq!(tree.snapshot(), before);
    }

    #[test]
    #[traced_test]
    fn logs_update_count() {
        let mut tree = two_leaves();
        apply_style(&mut tree, "disabled", true.into()).unwrap();
        assert!(logs_contain("style applied"));
        assert!(logs_contain("updated=3"));
    }
}
