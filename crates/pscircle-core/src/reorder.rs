//! Leaf-balancing child reordering.
//!
//! Before layout, every node's children are rearranged so that subtrees
//! carrying many leaves sit at both outer edges and light subtrees gather in
//! the middle. Without this pass a parent whose children grow steadily in size
//! produces a long one-sided cascade that skews the radial picture.
//!
//! Children are sorted by ascending leaf count and then dealt alternately onto
//! a front list and a back list. The front list keeps sorted ranks
//! `0, 2, 4, ...` in order, the back list receives ranks `1, 3, 5, ...` in
//! reverse, and the final order is front followed by back. Five children with
//! increasing leaf counts therefore end up as `[0, 2, 4, 3, 1]`.

use log::trace;

use crate::tree::{NodeId, Tree};

/// Reorders the children of every node under `node` by leaf count and
/// returns the number of leaves in the subtree.
///
/// A node without children counts as one leaf. Sibling numbers are
/// reassigned `1..n` in the final order.
///
/// Children with equal leaf counts keep their previous relative order.
///
/// # Examples
///
/// ```
/// # use pscircle_core::{reorder::reorder_by_leaves, tree::Tree};
/// let mut tree = Tree::new();
/// let root = tree.push();
/// let a = tree.push();
/// let b = tree.push();
/// tree.add(root, a);
/// tree.add(root, b);
///
/// assert_eq!(reorder_by_leaves(&mut tree, root), 2);
/// ```
pub fn reorder_by_leaves(tree: &mut Tree, node: NodeId) -> usize {
    // Reversed preorder visits every child before its parent.
    let order: Vec<NodeId> = tree.preorder(node).collect();
    let mut leaves = vec![0usize; tree.len()];

    for &current in order.iter().rev() {
        leaves[current.index()] = if tree.is_leaf(current) {
            1
        } else {
            reorder_children(tree, current, &leaves)
        };
    }

    leaves[node.index()]
}

/// Deals the children of `node` onto the front and back lists and returns
/// the leaf count of `node`. `leaves` must hold the counts of its children.
fn reorder_children(tree: &mut Tree, node: NodeId, leaves: &[usize]) -> usize {
    let mut weighted: Vec<(usize, NodeId)> = tree
        .children(node)
        .map(|child| (leaves[child.index()], child))
        .collect();
    let total = weighted.iter().map(|(count, _)| count).sum();

    weighted.sort_by_key(|&(count, _)| count);

    let mut front = Vec::with_capacity(weighted.len());
    let mut back = Vec::with_capacity(weighted.len() / 2);
    for (rank, &(_, child)) in weighted.iter().enumerate() {
        if rank % 2 == 0 {
            front.push(child);
        } else {
            back.push(child);
        }
    }
    front.extend(back.into_iter().rev());

    tree.relink_children(node, &front);

    trace!(node:% = node, leaves = total; "Children reordered");

    total
}
