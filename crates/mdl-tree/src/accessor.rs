#![forbid(unsafe_code)]

//! Pre-order traversal over a [`RenderTree`].
//!
//! [`select_nodes`] walks the live tree from the root and yields every node
//! the predicate accepts, parents before children and siblings in order. The
//! walk is lazy; it keeps a small explicit stack instead of recursing.

use mdl_core::node::{NodeFilter, NodeId, RenderNode};
use smallvec::SmallVec;

use crate::tree::RenderTree;

/// Lazy pre-order iterator returned by [`select_nodes`].
pub struct Select<'a, P> {
    tree: &'a RenderTree,
    stack: SmallVec<[NodeId; 16]>,
    predicate: P,
}

impl<'a, P> Iterator for Select<'a, P>
where
    P: FnMut(&RenderNode) -> bool,
{
    type Item = &'a RenderNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            self.stack.extend(node.children.iter().rev().copied());
            if (self.predicate)(node) {
                return Some(node);
            }
        }
        None
    }
}

/// Every node of `tree` matching `predicate`, in pre-order.
///
/// An empty tree yields nothing.
pub fn select_nodes<P>(tree: &RenderTree, predicate: P) -> Select<'_, P>
where
    P: FnMut(&RenderNode) -> bool,
{
    let mut stack = SmallVec::new();
    stack.extend(tree.root());
    Select {
        tree,
        stack,
        predicate,
    }
}

/// Identities of the nodes matching `filter`, in pre-order.
#[must_use]
pub fn select_ids(tree: &RenderTree, filter: NodeFilter) -> Vec<NodeId> {
    select_nodes(tree, |n| filter.matches(n))
        .map(|n| n.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuildContext;
    use mdl_core::node::{NodeKind, NodeRole};

    fn nested() -> RenderTree {
        let mut ctx = BuildContext::new(1);
        let root = ctx.push_root(NodeKind::Container, NodeRole::Document).unwrap();
        let quote = ctx.push_child(root, NodeKind::Container, NodeRole::Quote).unwrap();
        let inner = ctx.push_child(quote, NodeKind::Container, NodeRole::Paragraph).unwrap();
        ctx.push_child(inner, NodeKind::TextLeaf, NodeRole::Inline).unwrap();
        ctx.push_child(inner, NodeKind::CodeLeaf, NodeRole::CodeSpan).unwrap();
        ctx.push_child(root, NodeKind::TextLeaf, NodeRole::Heading(2)).unwrap();
        ctx.finish().unwrap().tree
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let tree = RenderTree::empty();
        assert_eq!(select_nodes(&tree, |_| true).count(), 0);
    }

    #[test]
    fn order_is_preorder() {
        let tree = nested();
        let order: Vec<u32> = select_nodes(&tree, |_| true).map(|n| n.id.index()).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn filters_select_by_kind() {
        let tree = nested();
        assert_eq!(select_ids(&tree, NodeFilter::LEAVES).len(), 3);
        assert_eq!(select_ids(&tree, NodeFilter::CODE_LEAVES), vec![NodeId::new(1, 4)]);
        assert_eq!(select_ids(&tree, NodeFilter::ROOT), vec![NodeId::new(1, 0)]);
        assert_eq!(select_ids(&tree, NodeFilter::CONTAINERS).len(), 3);
    }
}
