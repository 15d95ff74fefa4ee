//! Radial mapping of a laid-out process tree.
//!
//! Children of the root are placed on the first ring, their children on the
//! second and so on. A node's angle is its normalized layout coordinate scaled
//! by the angular sector and shifted by the rotation. The output is plain
//! drawing data: dot centers and colors, link shapes and label anchors.
//!
//! # Rotation
//!
//! The rotation is picked in this order:
//!
//! 1. A configured rotation.
//! 2. The anchor process, placed at the configured anchor angle.
//! 3. The widest subtree, placed at angle 0.

use log::{debug, info, warn};

use pscircle_core::{
    color::Color,
    geometry::{Point, PolarPoint},
    real::{PI, Real},
    tree::NodeId,
    widest::find_widest,
};
use pscircle_procs::ProcessTree;

use crate::config::AppConfig;

/// Width of one character relative to the font size, for
/// [`EstimatedTextMeasure`].
const CHAR_WIDTH_RATIO: Real = 0.6;

/// Extent of a rendered text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSize {
    pub width: Real,
    pub height: Real,
}

/// Measures label text.
///
/// Implement this on top of a text shaping engine to get exact label anchors.
pub trait TextMeasure {
    fn measure(&self, text: &str) -> TextSize;
}

/// Approximates text extents from the font size alone.
#[derive(Debug, Clone, Copy)]
pub struct EstimatedTextMeasure {
    font_size: Real,
}

impl EstimatedTextMeasure {
    pub fn new(font_size: Real) -> Self {
        Self { font_size }
    }
}

impl TextMeasure for EstimatedTextMeasure {
    fn measure(&self, text: &str) -> TextSize {
        TextSize {
            width: CHAR_WIDTH_RATIO * self.font_size * text.chars().count() as Real,
            height: self.font_size,
        }
    }
}

/// Filled circle marking a process.
#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    pub center: Point,
    pub radius: Real,
    pub border: Real,
    /// Follows CPU usage.
    pub background: Color,
    /// Follows memory usage.
    pub border_color: Color,
}

/// Process name placed next to its dot.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    /// Start of the text baseline.
    pub anchor: Point,
    /// Baseline direction in radians.
    pub angle: Real,
}

/// One process placed on its ring.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub node: NodeId,
    pub pid: i32,
    /// Ring number; children of the root are on ring 1.
    pub depth: usize,
    /// Normalized layout coordinate.
    pub x: Real,
    /// Angle in radians.
    pub angle: Real,
    pub position: PolarPoint,
    pub dot: Dot,
    pub label: Label,
}

/// Path of a link between two dots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinkShape {
    /// Both ends lie on the same ray.
    Line { from: Point, to: Point },
    /// Cubic Bézier curve.
    Curve {
        from: Point,
        from_control: Point,
        to_control: Point,
        to: Point,
    },
}

/// Connection from a parent dot to a child dot.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub parent: NodeId,
    pub child: NodeId,
    pub shape: LinkShape,
    pub width: Real,
    /// Follows the child's memory usage.
    pub color: Color,
}

/// Drawing data of a whole process tree.
///
/// The root sits at the center and has no entry in [`RadialLayout::nodes`].
#[derive(Debug, Clone, PartialEq)]
pub struct RadialLayout {
    sector: Real,
    rotation: Real,
    nodes: Vec<PlacedNode>,
    links: Vec<Link>,
}

impl RadialLayout {
    /// Angular range covered by the tree, in radians.
    pub fn sector(&self) -> Real {
        self.sector
    }

    /// Angle added to every node, in radians.
    pub fn rotation(&self) -> Real {
        self.rotation
    }

    /// Placed nodes in preorder.
    pub fn nodes(&self) -> &[PlacedNode] {
        &self.nodes
    }

    /// Links in the preorder of their child.
    pub fn links(&self) -> &[Link] {
        &self.links
    }
}

/// Returns the angular sector covered by the tree.
///
/// Without a configured value the sector stops one dot short of a full turn,
/// so the first and last node on the outer ring do not touch.
pub fn sector(config: &AppConfig) -> Real {
    if let Some(sector) = config.tree().sector() {
        return sector;
    }

    let dot = config.dot().radius() + config.dot().border();
    2.0 * PI - (dot / config.tree().radius_increment()).atan()
}

/// Returns the rotation applied to every angle.
pub fn rotation(procs: &ProcessTree, config: &AppConfig, sector: Real) -> Real {
    let tree = procs.tree();

    if let Some(rotation) = config.tree().rotation() {
        return -rotation;
    }

    if let Some(name) = config.tree().anchor_process() {
        match procs.find_by_name(name) {
            Some(anchor) => return -sector * tree.x(anchor) + config.tree().anchor_angle(),
            None => warn!(anchor = name; "Anchor process not found, falling back to widest subtree"),
        }
    }

    let root = procs.root();
    let widest = find_widest(tree, root);
    if widest == root {
        return 0.0;
    }

    debug!(pid = procs.process(widest).pid; "Rotating to widest subtree");
    -sector * tree.x(widest)
}

/// Maps every process under the root onto its ring.
///
/// Expects the tree to be arranged already, see
/// [`arrange_and_normalize`](pscircle_core::layout::arrange_and_normalize).
pub fn map_radial<M>(procs: &ProcessTree, config: &AppConfig, measure: &M) -> RadialLayout
where
    M: TextMeasure + ?Sized,
{
    let sector = sector(config);
    let rotation = rotation(procs, config, sector);

    let dot = config.dot();
    let mut mapper = Mapper {
        procs,
        config,
        measure,
        sector,
        rotation,
        link_offset: dot.radius() + dot.border() / 2.0,
        label_offset: 2.0 * dot.radius() + dot.border() / 2.0,
        nodes: Vec::with_capacity(procs.len()),
        links: Vec::with_capacity(procs.len()),
    };
    mapper.map(procs.root());

    info!(
        sector,
        rotation,
        nodes = mapper.nodes.len(),
        links = mapper.links.len();
        "Radial layout mapped"
    );

    RadialLayout {
        sector,
        rotation,
        nodes: mapper.nodes,
        links: mapper.links,
    }
}

/// A node waiting to be placed, with what it needs from its parent.
#[derive(Debug, Clone, Copy)]
struct Pending {
    node: NodeId,
    parent: NodeId,
    parent_position: PolarPoint,
    depth: usize,
}

struct Mapper<'a, M: ?Sized> {
    procs: &'a ProcessTree,
    config: &'a AppConfig,
    measure: &'a M,
    sector: Real,
    rotation: Real,
    link_offset: Real,
    label_offset: Real,
    nodes: Vec<PlacedNode>,
    links: Vec<Link>,
}

impl<M: TextMeasure + ?Sized> Mapper<'_, M> {
    /// Places every node under `root` in preorder.
    fn map(&mut self, root: NodeId) {
        let procs = self.procs;
        let tree = procs.tree();

        let mut stack: Vec<Pending> = tree
            .children_rev(root)
            .map(|node| Pending {
                node,
                parent: root,
                parent_position: PolarPoint::default(),
                depth: 1,
            })
            .collect();

        while let Some(pending) = stack.pop() {
            let Pending {
                node: child,
                parent,
                parent_position,
                depth,
            } = pending;

            let radius = self.config.tree().radius_increment() * depth as Real;
            let x = tree.x(child);
            let angle = self.sector * x + self.rotation;
            let position = PolarPoint::from_radial(angle, radius);

            let process = procs.process(child);
            let metrics = self.config.metrics();
            let cpu = metrics.cpu().fraction(process.cpu);
            let mem = metrics.memory().fraction(process.mem as Real);

            if depth > 1 {
                let link = self.config.link();
                let shape = self.link_shape(parent_position, position);
                self.links.push(Link {
                    parent,
                    child,
                    shape,
                    width: link.width(),
                    color: Color::between(link.color_min(), link.color_max(), mem),
                });
            }

            let dot = self.config.dot();
            let label = self.label(&process.name, position, angle);
            self.nodes.push(PlacedNode {
                node: child,
                pid: process.pid,
                depth,
                x,
                angle,
                position,
                dot: Dot {
                    center: position.to_point(),
                    radius: dot.radius(),
                    border: dot.border(),
                    background: Color::between(dot.background_min(), dot.background_max(), cpu),
                    border_color: Color::between(dot.border_min(), dot.border_max(), mem),
                },
                label,
            });

            stack.extend(tree.children_rev(child).map(|node| Pending {
                node,
                parent: child,
                parent_position: position,
                depth: depth + 1,
            }));
        }
    }

    fn link_shape(&self, parent: PolarPoint, child: PolarPoint) -> LinkShape {
        let from = parent.with_radius_offset(self.link_offset);
        let to = child.with_radius_offset(-self.link_offset);

        if from.is_codirectional(to) {
            return LinkShape::Line {
                from: from.to_point(),
                to: to.to_point(),
            };
        }

        let convexity = self.config.link().convexity() * self.config.tree().radius_increment();
        LinkShape::Curve {
            from: from.to_point(),
            from_control: parent.with_radius_offset(convexity).to_point(),
            to_control: child.with_radius_offset(-convexity).to_point(),
            to: to.to_point(),
        }
    }

    /// Text on the left half is flipped to read left to right and moved out
    /// by its own width so it still starts next to the dot.
    fn label(&self, text: &str, position: PolarPoint, angle: Real) -> Label {
        let size = self.measure.measure(text);

        let (mut anchor, mut angle) = (position, angle);
        if anchor.nx() < 0.0 {
            angle += PI;
            anchor = anchor.with_radius_offset(size.width);
        }

        let normal = anchor
            .normal(anchor.nx() > 0.0)
            .with_radius(size.height / 2.0);
        let anchor = anchor.add(normal).with_radius_offset(self.label_offset);

        Label {
            text: text.to_string(),
            anchor: anchor.to_point(),
            angle,
        }
    }
}
