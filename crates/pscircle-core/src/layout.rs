//! Contour-based tidy tree layout.
//!
//! Computes a horizontal coordinate for every node of an arbitrary-arity tree
//! so that sibling subtrees never overlap and the parent sits centered over its
//! children. The result is normalized to `[0, 1]` and later mapped to an angle
//! by the radial renderer.
//!
//! # Algorithm
//!
//! The engine is a linear-time variant of the Reingold–Tilford/Walker
//! algorithm and runs in three phases:
//!
//! 1. **Arrange** (post-order): leaves are placed one unit right of their left
//!    sibling. Each subtree is compared against the already placed subtrees to
//!    its left by walking their facing contours in lockstep. Overlaps push the
//!    subtree right, and the push is spread over the intermediate siblings so
//!    spacing grows gradually. Thread links let a contour walk jump across a
//!    shallower subtree in amortized constant time.
//! 2. **Accumulate** (pre-order): the subtree offsets collected in phase 1 are
//!    added top-down, while the global minimum and maximum are tracked.
//! 3. **Normalize** (pre-order): every coordinate is rescaled into `[0, 1]`.
//!
//! Thread and ancestor-hint links only exist for the duration of one
//! [`arrange_and_normalize`] call; they live in a [`LayoutContext`] rather
//! than on the tree.
//!
//! # Example
//!
//! ```
//! # use pscircle_core::{layout::arrange_and_normalize, tree::Tree};
//! let mut tree = Tree::new();
//! let root = tree.push();
//! let a = tree.push();
//! let b = tree.push();
//! tree.add(root, a);
//! tree.add(root, b);
//!
//! arrange_and_normalize(&mut tree, root);
//!
//! assert_eq!(tree.x(a), 0.0);
//! assert_eq!(tree.x(b), 1.0);
//! assert_eq!(tree.x(root), 0.5);
//! ```

use log::{debug, trace};

use crate::{
    real::Real,
    tree::{NodeId, Tree},
};

/// Lays out the subtree rooted at `root` and normalizes every coordinate to
/// `[0, 1]`.
///
/// At least one node ends at `0` and, unless all nodes share a single
/// position, at least one ends at `1`. A single node ends at `0`.
///
/// The call never fails for a well-formed tree. Running it again on an
/// unchanged tree yields the same coordinates.
pub fn arrange_and_normalize(tree: &mut Tree, root: NodeId) {
    let mut context = LayoutContext::new(tree.len());
    context.arrange(tree, root);

    let extent = move_and_find_extent(tree, root);
    debug!(root:% = root, min_x = extent.min, max_x = extent.max; "Tree arranged");

    normalize(tree, root, extent.min, extent.max);
}

/// Per-call scratch state of the arrange phase.
///
/// `thread` and `ancestor` are side tables indexed by node slot.
#[derive(Debug)]
pub struct LayoutContext {
    /// Contour shortcut installed when one side of a contour walk runs out.
    thread: Vec<Option<NodeId>>,
    /// Hint to the sibling subtree a right-contour node currently belongs to.
    ancestor: Vec<Option<NodeId>>,
}

impl LayoutContext {
    /// Creates a context for a tree arena of `len` nodes.
    pub fn new(len: usize) -> Self {
        Self {
            thread: vec![None; len],
            ancestor: vec![None; len],
        }
    }

    /// Phase 1: computes relative coordinates and subtree offsets.
    ///
    /// Coordinates are relative: a node's final position is its `x` plus the
    /// offsets of all its ancestors, applied by the accumulate phase.
    ///
    /// The walk is post-order over an explicit stack, so the depth of the
    /// tree is not limited by the call stack.
    pub fn arrange(&mut self, tree: &mut Tree, node: NodeId) {
        let mut stack: Vec<Frame> = Vec::new();
        if let Some(frame) = enter(tree, node) {
            stack.push(frame);
        }

        while let Some(top) = stack.last() {
            let Some(child) = top.next else {
                let done = top.node;
                stack.pop();
                finish(tree, done);
                self.placed(tree, &mut stack, done);
                continue;
            };

            match enter(tree, child) {
                Some(frame) => stack.push(frame),
                None => self.placed(tree, &mut stack, child),
            }
        }
    }

    /// Resolves `child` against its left siblings once its subtree is
    /// arranged and advances its parent's frame.
    fn placed(&mut self, tree: &mut Tree, stack: &mut [Frame], child: NodeId) {
        let Some(parent) = stack.last_mut() else {
            return;
        };
        parent.default_ancestor = self.apportion(tree, child, parent.default_ancestor);
        parent.next = tree.next_sibling(child);
    }

    /// Next node on the left contour below `node`.
    fn left(&self, tree: &Tree, node: NodeId) -> Option<NodeId> {
        self.thread[node.index()].or_else(|| tree.first_child(node))
    }

    /// Next node on the right contour below `node`.
    fn right(&self, tree: &Tree, node: NodeId) -> Option<NodeId> {
        self.thread[node.index()].or_else(|| tree.last_child(node))
    }

    /// Resolves the ancestor hint of `contour` to a sibling of `node`.
    fn hinted_ancestor(&self, tree: &Tree, node: NodeId, contour: NodeId) -> Option<NodeId> {
        let parent = tree.parent(node)?;
        self.ancestor[contour.index()].filter(|&hint| tree.parent(hint) == Some(parent))
    }

    /// Pushes the subtree of `node` clear of the subtrees to its left and
    /// returns the updated default ancestor.
    ///
    /// The inside and outside contours of the left forest (`vil`, `vol`) and
    /// of the current subtree (`vir`, `vor`) are walked level by level. The
    /// `s*` sums are the offsets accumulated along each contour.
    fn apportion(&mut self, tree: &mut Tree, node: NodeId, default_ancestor: NodeId) -> NodeId {
        let Some(left_sibling) = tree.prev_sibling(node) else {
            return default_ancestor;
        };
        let Some(first_sibling) = tree.parent(node).and_then(|p| tree.first_child(p)) else {
            return default_ancestor;
        };

        let mut vir = node;
        let mut vor = node;
        let mut vil = left_sibling;
        let mut vol = first_sibling;

        let mut sir = tree.node(vir).modifier;
        let mut sor = tree.node(vor).modifier;
        let mut sil = tree.node(vil).modifier;
        let mut sol = tree.node(vol).modifier;

        while let (Some(next_il), Some(next_ir)) = (self.right(tree, vil), self.left(tree, vir)) {
            let (Some(next_ol), Some(next_or)) = (self.left(tree, vol), self.right(tree, vor))
            else {
                debug_assert!(false, "outer contours end before inner contours of {node}");
                break;
            };

            vil = next_il;
            vir = next_ir;
            vol = next_ol;
            vor = next_or;
            self.ancestor[vor.index()] = Some(node);

            let shift = (tree.x(vil) + sil) - (tree.x(vir) + sir) + 1.0;
            if shift > 0.0 {
                let ancestor = self
                    .hinted_ancestor(tree, node, vil)
                    .unwrap_or(default_ancestor);
                move_subtree(tree, node, ancestor, shift);
                sir += shift;
                sor += shift;
            }

            sil += tree.node(vil).modifier;
            sir += tree.node(vir).modifier;
            sol += tree.node(vol).modifier;
            sor += tree.node(vor).modifier;
        }

        match (self.right(tree, vil), self.right(tree, vor)) {
            (Some(thread), None) => {
                self.thread[vor.index()] = Some(thread);
                tree.node_mut(vor).modifier += sil - sor;
                default_ancestor
            }
            _ => {
                if let (Some(thread), None) = (self.left(tree, vir), self.left(tree, vol)) {
                    self.thread[vol.index()] = Some(thread);
                    tree.node_mut(vol).modifier += sir - sol;
                }
                node
            }
        }
    }
}

/// An internal node whose children are being arranged.
#[derive(Debug, Clone, Copy)]
struct Frame {
    node: NodeId,
    /// Next child to arrange, `None` once all are done.
    next: Option<NodeId>,
    default_ancestor: NodeId,
}

/// Resets the offsets of `node`. Leaves are placed right away; internal
/// nodes get a frame.
fn enter(tree: &mut Tree, node: NodeId) -> Option<Frame> {
    {
        let n = tree.node_mut(node);
        n.modifier = 0.0;
        n.shift = 0.0;
        n.change = 0.0;
    }

    let Some(first) = tree.first_child(node) else {
        let x = tree.prev_sibling(node).map_or(0.0, |prev| tree.x(prev) + 1.0);
        tree.node_mut(node).x = x;
        return None;
    };

    Some(Frame {
        node,
        next: Some(first),
        default_ancestor: first,
    })
}

/// Centers an internal node over its arranged children.
fn finish(tree: &mut Tree, node: NodeId) {
    execute_shifts(tree, node);

    let (Some(first), Some(last)) = (tree.first_child(node), tree.last_child(node)) else {
        return;
    };
    let midpoint = (tree.x(first) + tree.x(last)) / 2.0;

    if let Some(prev) = tree.prev_sibling(node) {
        let x = tree.x(prev) + 1.0;
        let n = tree.node_mut(node);
        n.x = x;
        n.modifier = x - midpoint;
    } else {
        tree.node_mut(node).x = midpoint;
    }

    trace!(node:% = node, x = tree.x(node); "Node arranged");
}

/// Shifts the subtree of `right` by `shift` and records how the shift is
/// spread over the siblings between `left` and `right`.
fn move_subtree(tree: &mut Tree, right: NodeId, left: NodeId, shift: Real) {
    let subtrees = tree.sibling_id(right) - tree.sibling_id(left);
    debug_assert!(subtrees > 0, "{left} must be a left sibling of {right}");
    let step = shift / subtrees as Real;

    tree.node_mut(left).change += step;

    let r = tree.node_mut(right);
    r.change -= step;
    r.x += shift;
    r.shift += shift;
    r.modifier += shift;
}

/// Applies the shifts recorded by [`move_subtree`] to the children of `node`,
/// right to left.
fn execute_shifts(tree: &mut Tree, node: NodeId) {
    let mut shift = 0.0;
    let mut change = 0.0;

    let mut cursor = tree.last_child(node);
    while let Some(child) = cursor {
        let n = tree.node_mut(child);
        n.x += shift;
        n.modifier += shift;
        change += n.change;
        shift += n.shift + change;
        cursor = n.prev_sibling;
    }
}

/// Running bounds of the accumulate phase.
#[derive(Debug, Clone, Copy)]
struct Extent {
    min: Real,
    max: Real,
}

impl Default for Extent {
    fn default() -> Self {
        Self {
            min: Real::MAX,
            max: -Real::MAX,
        }
    }
}

impl Extent {
    fn include(&mut self, x: Real) {
        if x < self.min {
            self.min = x;
        }
        if x > self.max {
            self.max = x;
        }
    }
}

/// Phase 2: adds the offsets of all ancestors to each node.
fn move_and_find_extent(tree: &mut Tree, root: NodeId) -> Extent {
    let mut extent = Extent::default();
    let mut stack = vec![(root, 0.0)];

    while let Some((node, offset)) = stack.pop() {
        let n = tree.node_mut(node);
        n.x += offset;
        extent.include(n.x);

        let offset = offset + n.modifier;
        stack.extend(tree.children(node).map(|child| (child, offset)));
    }

    extent
}

/// Phase 3: rescales coordinates from `[min_x, max_x]` into `[0, 1]`.
///
/// A degenerate range collapses every node onto `0`.
fn normalize(tree: &mut Tree, root: NodeId, min_x: Real, max_x: Real) {
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        let n = tree.node_mut(node);
        n.x -= min_x;
        if min_x != max_x {
            n.x /= max_x - min_x;
        }

        stack.extend(tree.children(node));
    }
}
