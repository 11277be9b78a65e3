#![forbid(unsafe_code)]

//! The tree-builder seam.
//!
//! A [`TreeBuilder`] turns parsed content plus the current property snapshot
//! into a fresh [`RenderTree`]. The widget owns the generation counter and
//! hands the builder a [`BuildContext`] stamped with the next generation, so
//! builders cannot mint identities that collide with an earlier tree.
//!
//! Builders must be deterministic: identical content and properties produce
//! trees with equal [`snapshot`](RenderTree::snapshot)s.

use std::fmt;

use mdl_core::error::ApplicationError;
use mdl_core::node::{NodeId, NodeKind, NodeRole, RenderNode};
use mdl_core::registry::PropertyMap;

use crate::tree::RenderTree;

/// Builds a render tree from parsed content of type `C`.
pub trait TreeBuilder<C: ?Sized> {
    /// Populate `ctx` from `content` and return the root.
    fn build(
        &mut self,
        content: &C,
        props: &PropertyMap,
        ctx: &mut BuildContext,
    ) -> Result<NodeId, BuildError>;
}

/// Errors raised while building a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The builder finished without creating a root.
    MissingRoot,
    /// `push_root` was called twice.
    DuplicateRoot,
    /// A parent id that is not part of this build.
    UnknownParent(NodeId),
    /// Children may only be attached to containers.
    LeafParent(NodeId),
    /// Builder-specific failure.
    Builder(String),
    /// A stored style value could not be replayed onto the new tree.
    Style(ApplicationError),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRoot => f.write_str("builder produced no root node"),
            Self::DuplicateRoot => f.write_str("builder created a second root node"),
            Self::UnknownParent(id) => write!(f, "unknown parent node {id}"),
            Self::LeafParent(id) => write!(f, "node {id} is a leaf and cannot have children"),
            Self::Builder(msg) => write!(f, "build failed: {msg}"),
            Self::Style(e) => write!(f, "style replay failed: {e}"),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Style(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ApplicationError> for BuildError {
    fn from(e: ApplicationError) -> Self {
        Self::Style(e)
    }
}

/// Output of a finished build.
#[derive(Debug)]
pub struct Built {
    pub tree: RenderTree,
    /// Whether the builder asked for another rebuild while building.
    pub rebuild_requested: bool,
}

/// Arena under construction for one generation.
#[derive(Debug)]
pub struct BuildContext {
    generation: u32,
    nodes: Vec<RenderNode>,
    rebuild_requested: bool,
}

impl BuildContext {
    #[must_use]
    pub fn new(generation: u32) -> Self {
        Self {
            generation,
            nodes: Vec::new(),
            rebuild_requested: false,
        }
    }

    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn next_id(&self) -> NodeId {
        NodeId::new(self.generation, self.nodes.len() as u32)
    }

    /// Create the root. Must be the first node.
    pub fn push_root(&mut self, kind: NodeKind, role: NodeRole) -> Result<NodeId, BuildError> {
        if !self.nodes.is_empty() {
            return Err(BuildError::DuplicateRoot);
        }
        let id = self.next_id();
        self.nodes.push(RenderNode::new(id, kind, role));
        Ok(id)
    }

    /// Append a child to `parent`, which must be a container of this build.
    pub fn push_child(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        role: NodeRole,
    ) -> Result<NodeId, BuildError> {
        self.push_child_mut(parent, kind, role).map(|n| n.id)
    }

    /// Like [`push_child`](Self::push_child), returning the new node for
    /// initialization.
    pub fn push_child_mut(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        role: NodeRole,
    ) -> Result<&mut RenderNode, BuildError> {
        let id = self.next_id();
        let parent_node = self
            .node_mut(parent)
            .ok_or(BuildError::UnknownParent(parent))?;
        if parent_node.kind.is_leaf() {
            return Err(BuildError::LeafParent(parent));
        }
        parent_node.children.push(id);

        let mut node = RenderNode::new(id, kind, role);
        node.parent = Some(parent);
        let slot = self.nodes.len();
        self.nodes.push(node);
        Ok(&mut self.nodes[slot])
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut RenderNode> {
        if id.generation() != self.generation {
            return None;
        }
        self.nodes.get_mut(id.index() as usize)
    }

    /// Ask for another rebuild after this one completes.
    ///
    /// Used when building itself changes an input the tree depends on.
    pub fn request_rebuild(&mut self) {
        self.rebuild_requested = true;
    }

    #[must_use]
    pub const fn rebuild_requested(&self) -> bool {
        self.rebuild_requested
    }

    pub fn finish(self) -> Result<Built, BuildError> {
        if self.nodes.is_empty() {
            return Err(BuildError::MissingRoot);
        }
        Ok(Built {
            tree: RenderTree::from_parts(self.generation, self.nodes),
            rebuild_requested: self.rebuild_requested,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_root_is_rejected() {
        let mut ctx = BuildContext::new(1);
        ctx.push_root(NodeKind::Container, NodeRole::Document).unwrap();
        assert_eq!(
            ctx.push_root(NodeKind::Container, NodeRole::Document),
            Err(BuildError::DuplicateRoot)
        );
    }

    #[test]
    fn leaves_cannot_have_children() {
        let mut ctx = BuildContext::new(1);
        let root = ctx.push_root(NodeKind::Container, NodeRole::Document).unwrap();
        let leaf = ctx.push_child(root, NodeKind::TextLeaf, NodeRole::Inline).unwrap();
        assert_eq!(
            ctx.push_child(leaf, NodeKind::TextLeaf, NodeRole::Inline),
            Err(BuildError::LeafParent(leaf))
        );
    }

    #[test]
    fn foreign_parent_is_rejected() {
        let mut ctx = BuildContext::new(3);
        ctx.push_root(NodeKind::Container, NodeRole::Document).unwrap();
        let stale = NodeId::new(2, 0);
        assert_eq!(
            ctx.push_child(stale, NodeKind::TextLeaf, NodeRole::Inline),
            Err(BuildError::UnknownParent(stale))
        );
    }

    #[test]
    fn empty_build_has_no_root() {
        assert_eq!(BuildContext::new(1).finish().unwrap_err(), BuildError::MissingRoot);
    }

    #[test]
    fn ids_carry_generation_and_link_parents() {
        let mut ctx = BuildContext::new(9);
        let root = ctx.push_root(NodeKind::Container, NodeRole::Document).unwrap();
        let child = ctx.push_child(root, NodeKind::TextLeaf, NodeRole::Inline).unwrap();
        ctx.request_rebuild();
        let built = ctx.finish().unwrap();
        assert!(built.rebuild_requested);
        assert_eq!(child, NodeId::new(9, 1));
        assert_eq!(built.tree.children(root), &[child]);
        assert_eq!(built.tree.get(child).unwrap().parent, Some(root));
    }
}
