#![forbid(unsafe_code)]

//! Generational render-node arena.
//!
//! A [`RenderTree`] is one generation of nodes stored in a flat arena. Slot 0
//! is the root. Identities are `(generation, index)`, so a tree produced by a
//! later rebuild can never collide with an earlier one even though arena
//! slots are reused from zero.
//!
//! # Invariants
//!
//! 1. Every node in the arena carries the tree's generation.
//! 2. The root, when present, is slot 0 and has no parent.
//! 3. Parent/child links only reference nodes of the same tree.

use std::collections::BTreeSet;

use mdl_core::color::PackedRgba;
use mdl_core::node::{FallbackFont, NodeId, NodeKind, NodeRole, NodeStyle, RenderNode};

/// One generation of render nodes.
#[derive(Debug, Clone, Default)]
pub struct RenderTree {
    generation: u32,
    nodes: Vec<RenderNode>,
}

impl RenderTree {
    /// A tree with no nodes, as before the first build.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(generation: u32, nodes: Vec<RenderNode>) -> Self {
        Self { generation, nodes }
    }

    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.nodes.first().map(|n| n.id)
    }

    /// Look up a node. Identities from other generations resolve to `None`.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&RenderNode> {
        if id.generation() != self.generation {
            return None;
        }
        self.nodes.get(id.index() as usize)
    }

    pub(crate) fn slot_mut(&mut self, index: u32) -> Option<&mut RenderNode> {
        self.nodes.get_mut(index as usize)
    }

    /// Whether `id` names a node of this tree.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Nodes in arena order.
    pub fn nodes(&self) -> impl Iterator<Item = &RenderNode> {
        self.nodes.iter()
    }

    /// The identity of every live node.
    #[must_use]
    pub fn identity_set(&self) -> BTreeSet<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    /// Distinct link targets present in the tree, in pre-order.
    #[must_use]
    pub fn links(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for node in crate::accessor::select_nodes(self, |n| n.link.is_some()) {
            if let Some(link) = node.link.as_deref()
                && !out.contains(&link)
            {
                out.push(link);
            }
        }
        out
    }

    /// Identity-free description of the tree in pre-order.
    ///
    /// Two trees built from the same content and properties have equal
    /// snapshots even though their identities differ.
    #[must_use]
    pub fn snapshot(&self) -> Vec<NodeSnapshot> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let Some(root) = self.root() else {
            return out;
        };
        let mut stack = vec![(root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            out.push(NodeSnapshot::of(node, depth));
            for child in node.children.iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
        out
    }
}

/// A node without its identity, plus its depth.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot {
    pub depth: usize,
    pub kind: NodeKind,
    pub role: NodeRole,
    pub text: String,
    pub scale: f64,
    pub style: NodeStyle,
    pub link: Option<String>,
    pub link_color: Option<PackedRgba>,
    pub background: Option<PackedRgba>,
    pub strong: bool,
    pub emphasis: bool,
    pub strict: bool,
    pub rasterized: bool,
    pub fallback_fonts: Vec<FallbackFont>,
}

impl NodeSnapshot {
    fn of(node: &RenderNode, depth: usize) -> Self {
        Self {
            depth,
            kind: node.kind,
            role: node.role,
            text: node.text.clone(),
            scale: node.scale,
            style: node.style.clone(),
            link: node.link.clone(),
            link_color: node.link_color,
            background: node.background,
            strong: node.strong,
            emphasis: node.emphasis,
            strict: node.strict,
            rasterized: node.rasterized,
            fallback_fonts: node.fallback_fonts.clone(),
        }
    }
}
