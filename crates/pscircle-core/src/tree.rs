//! Arena-backed multi-way tree used as the substrate for layout.
//!
//! Nodes are allocated once into a [`Tree`] and linked with [`Tree::add`].
//! All cross-node links (parent, first/last child, previous/next sibling) are
//! [`NodeId`] indices into the arena, so the whole structure is released
//! together and no node is ever freed individually.
//!
//! # Sibling Numbering
//!
//! Every attached node carries a sibling number, assigned in insertion order
//! starting at 1. Sibling numbers are contiguous and increase left to right,
//! which lets [`Tree::child_count`] answer in constant time as
//! `last.id - first.id + 1`. Any operation that reorders children must
//! renumber them (see [`reorder`](crate::reorder)).
//!
//! # Example
//!
//! ```
//! # use pscircle_core::tree::Tree;
//! let mut tree = Tree::new();
//! let root = tree.push();
//! let a = tree.push();
//! let b = tree.push();
//!
//! tree.add(root, a);
//! tree.add(root, b);
//!
//! assert_eq!(tree.child_count(root), 2);
//! assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![a, b]);
//! ```

use std::fmt;

use crate::real::Real;

/// Index of a node inside a [`Tree`] arena.
///
/// A `NodeId` is only meaningful for the tree that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the arena slot of this node.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single tree node record.
///
/// The layout scalars are mutated in place by
/// [`arrange_and_normalize`](crate::layout::arrange_and_normalize).
#[derive(Debug, Clone, Default)]
pub(crate) struct TreeNode {
    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
    pub(crate) prev_sibling: Option<NodeId>,

    /// Sibling number, contiguous among the children of one parent.
    pub(crate) id: usize,

    /// Position along the layout axis.
    pub(crate) x: Real,
    /// Offset applied to the whole subtree during accumulation.
    pub(crate) modifier: Real,
    pub(crate) shift: Real,
    pub(crate) change: Real,
}

/// Owner of all nodes of one tree.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty tree with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Allocates a new, unattached node and returns its index.
    pub fn push(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode::default());
        id
    }

    /// Returns the number of allocated nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no node has been allocated.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends `child` to the children of `parent` in O(1).
    ///
    /// The child receives sibling number 1 if it is the first child, or the
    /// last child's number plus one otherwise.
    ///
    /// No cycle checking is performed. Adding a node twice, or to two parents,
    /// corrupts the sibling list; debug builds assert against it.
    pub fn add(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            self.nodes[child.0].parent.is_none(),
            "node {child} is already attached"
        );
        debug_assert_ne!(parent, child, "node {child} cannot be its own parent");

        self.nodes[child.0].parent = Some(parent);

        let Some(last) = self.nodes[parent.0].last_child else {
            let node = &mut self.nodes[child.0];
            node.id = 1;
            node.prev_sibling = None;
            node.next_sibling = None;

            let parent = &mut self.nodes[parent.0];
            parent.first_child = Some(child);
            parent.last_child = Some(child);
            return;
        };

        let id = self.nodes[last.0].id + 1;
        self.nodes[last.0].next_sibling = Some(child);

        let node = &mut self.nodes[child.0];
        node.id = id;
        node.prev_sibling = Some(last);
        node.next_sibling = None;

        self.nodes[parent.0].last_child = Some(child);
    }

    /// Returns the number of children of `node`.
    ///
    /// Relies on contiguous sibling numbers.
    pub fn child_count(&self, node: NodeId) -> usize {
        let node = &self.nodes[node.0];
        match (node.first_child, node.last_child) {
            (Some(first), Some(last)) if first == last => 1,
            (Some(first), Some(last)) => self.nodes[last.0].id - self.nodes[first.0].id + 1,
            _ => 0,
        }
    }

    /// Returns the parent of `node`, or `None` for a root or unattached node.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// Returns the leftmost child of `node`.
    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].first_child
    }

    /// Returns the rightmost child of `node`.
    pub fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].last_child
    }

    /// Returns the sibling right of `node`.
    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].next_sibling
    }

    /// Returns the sibling left of `node`.
    pub fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].prev_sibling
    }

    /// Returns the sibling number of `node` (1-based, left to right).
    pub fn sibling_id(&self, node: NodeId) -> usize {
        self.nodes[node.0].id
    }

    /// Returns `true` if `node` has no children.
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.nodes[node.0].first_child.is_none()
    }

    /// Returns the layout coordinate of `node`.
    ///
    /// After [`arrange_and_normalize`](crate::layout::arrange_and_normalize)
    /// this lies in `[0, 1]`.
    pub fn x(&self, node: NodeId) -> Real {
        self.nodes[node.0].x
    }

    /// Iterates over the children of `node`, left to right.
    pub fn children(&self, node: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.nodes[node.0].first_child,
            forward: true,
        }
    }

    /// Iterates over the children of `node`, right to left.
    pub fn children_rev(&self, node: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.nodes[node.0].last_child,
            forward: false,
        }
    }

    /// Iterates over the subtree rooted at `node` in preorder.
    pub fn preorder(&self, node: NodeId) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![node],
        }
    }

    /// Replaces the child list of `parent` with `order` and renumbers the
    /// children 1..n.
    ///
    /// `order` must be a permutation of the current children.
    pub(crate) fn relink_children(&mut self, parent: NodeId, order: &[NodeId]) {
        debug_assert_eq!(
            order.len(),
            self.child_count(parent),
            "relinking must keep every child of {parent}"
        );

        let mut prev: Option<NodeId> = None;
        for (index, &child) in order.iter().enumerate() {
            let node = &mut self.nodes[child.0];
            node.id = index + 1;
            node.prev_sibling = prev;
            node.next_sibling = None;

            if let Some(prev) = prev {
                self.nodes[prev.0].next_sibling = Some(child);
            }
            prev = Some(child);
        }

        let node = &mut self.nodes[parent.0];
        node.first_child = order.first().copied();
        node.last_child = order.last().copied();
    }

    pub(crate) fn node(&self, node: NodeId) -> &TreeNode {
        &self.nodes[node.0]
    }

    pub(crate) fn node_mut(&mut self, node: NodeId) -> &mut TreeNode {
        &mut self.nodes[node.0]
    }
}

/// Iterator over the children of one node. See [`Tree::children`].
#[derive(Debug, Clone)]
pub struct Children<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
    forward: bool,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        let node = self.tree.node(current);
        self.next = if self.forward {
            node.next_sibling
        } else {
            node.prev_sibling
        };
        Some(current)
    }
}

/// Preorder iterator over a subtree. See [`Tree::preorder`].
#[derive(Debug, Clone)]
pub struct Preorder<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        self.stack.extend(self.tree.children_rev(current));
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_updates_links() {
        let mut tree = Tree::new();
        let p = tree.push();
        let c1 = tree.push();
        let c2 = tree.push();
        let c3 = tree.push();

        tree.add(p, c1);
        tree.add(p, c2);
        tree.add(p, c3);

        assert_eq!(tree.first_child(p), Some(c1));
        assert_eq!(tree.next_sibling(c1), Some(c2));
        assert_eq!(tree.next_sibling(c2), Some(c3));
        assert_eq!(tree.next_sibling(c3), None);

        assert_eq!(tree.last_child(p), Some(c3));
        assert_eq!(tree.prev_sibling(c3), Some(c2));
        assert_eq!(tree.prev_sibling(c2), Some(c1));
        assert_eq!(tree.prev_sibling(c1), None);

        assert_eq!(tree.parent(c2), Some(p));
        assert_eq!(tree.parent(p), None);
    }

    #[test]
    fn test_add_assigns_sibling_ids() {
        let mut tree = Tree::new();
        let p = tree.push();
        let children: Vec<_> = (0..4).map(|_| tree.push()).collect();
        for &c in &children {
            tree.add(p, c);
        }

        let ids: Vec<_> = children.iter().map(|&c| tree.sibling_id(c)).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_child_count_large_tree() {
        let mut tree = Tree::new();
        let p = tree.push();
        let c1 = tree.push();
        let c2 = tree.push();
        let c3 = tree.push();
        tree.add(p, c1);
        tree.add(p, c2);
        tree.add(p, c3);

        for _ in 0..1 {
            let n = tree.push();
            tree.add(c1, n);
        }
        for _ in 0..2 {
            let n = tree.push();
            tree.add(c2, n);
        }
        for _ in 0..3 {
            let n = tree.push();
            tree.add(c3, n);
        }

        assert_eq!(tree.child_count(p), 3);
        assert_eq!(tree.child_count(c1), 1);
        assert_eq!(tree.child_count(c2), 2);
        assert_eq!(tree.child_count(c3), 3);
        assert_eq!(tree.child_count(tree.first_child(c1).unwrap()), 0);
    }

    #[test]
    fn test_children_iterators() {
        let mut tree = Tree::new();
        let p = tree.push();
        let c: Vec<_> = (0..3).map(|_| tree.push()).collect();
        for &n in &c {
            tree.add(p, n);
        }

        assert_eq!(tree.children(p).collect::<Vec<_>>(), c);
        let mut reversed = c.clone();
        reversed.reverse();
        assert_eq!(tree.children_rev(p).collect::<Vec<_>>(), reversed);
        assert_eq!(tree.children(c[0]).count(), 0);
    }

    #[test]
    fn test_preorder() {
        let mut tree = Tree::new();
        let r = tree.push();
        let a = tree.push();
        let b = tree.push();
        let a1 = tree.push();
        let a2 = tree.push();
        let b1 = tree.push();
        tree.add(r, a);
        tree.add(r, b);
        tree.add(a, a1);
        tree.add(a, a2);
        tree.add(b, b1);

        assert_eq!(
            tree.preorder(r).collect::<Vec<_>>(),
            vec![r, a, a1, a2, b, b1]
        );
        assert_eq!(tree.preorder(b).collect::<Vec<_>>(), vec![b, b1]);
    }

    #[test]
    fn test_relink_children_renumbers() {
        let mut tree = Tree::new();
        let p = tree.push();
        let c: Vec<_> = (0..3).map(|_| tree.push()).collect();
        for &n in &c {
            tree.add(p, n);
        }

        tree.relink_children(p, &[c[2], c[0], c[1]]);

        assert_eq!(tree.children(p).collect::<Vec<_>>(), vec![c[2], c[0], c[1]]);
        assert_eq!(tree.sibling_id(c[2]), 1);
        assert_eq!(tree.sibling_id(c[0]), 2);
        assert_eq!(tree.sibling_id(c[1]), 3);
        assert_eq!(tree.prev_sibling(c[2]), None);
        assert_eq!(tree.next_sibling(c[1]), None);
        assert_eq!(tree.child_count(p), 3);
    }
}
