//! Widest-subtree query used to anchor the radial rotation.
//!
//! After layout, the node whose children fan out the most is a good default
//! for the zero angle of the radial picture. The span of a node's children is
//! weighted by depth so that a wide fan far from the center, which occupies
//! more of the circle's circumference, wins over an equally wide fan near it.

use crate::{
    real::Real,
    tree::{NodeId, Tree},
};

/// Returns the node under `root` with the largest depth-weighted child span.
///
/// The width of a node is `|x(first child) - x(last child)| * depth`, where
/// `root` has depth 1. Leaves have width 0. Ties go to the node met first in
/// preorder. If no node has a positive width, the first child of `root` is
/// returned, or `root` itself when it has no children.
///
/// Meant to run after [`arrange_and_normalize`](crate::layout::arrange_and_normalize).
pub fn find_widest(tree: &Tree, root: NodeId) -> NodeId {
    let mut widest = tree.first_child(root).unwrap_or(root);
    let mut max_width: Real = 0.0;

    // Children are pushed right to left so they pop in preorder.
    let mut stack = vec![(root, 1.0)];
    while let Some((node, depth)) = stack.pop() {
        let width = match (tree.first_child(node), tree.last_child(node)) {
            (Some(first), Some(last)) => (tree.x(first) - tree.x(last)).abs() * depth,
            _ => 0.0,
        };

        if width > max_width {
            max_width = width;
            widest = node;
        }

        stack.extend(tree.children_rev(node).map(|child| (child, depth + 1.0)));
    }

    widest
}
