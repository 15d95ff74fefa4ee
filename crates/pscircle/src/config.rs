//! Configuration types for the radial process tree.
//!
//! All types implement [`serde::Deserialize`] and every field has a default,
//! so a configuration file only needs to name the values it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`ProcessConfig`] - How the listing is read and linked.
//! - [`TreeConfig`] - Ring spacing, angular sector and rotation.
//! - [`DotConfig`] - Process dot size and colors.
//! - [`LinkConfig`] - Parent/child link width, curvature and colors.
//! - [`MetricsConfig`] - Value ranges mapped onto the color gradients.
//!
//! # Example
//!
//! ```
//! # use pscircle::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.process().max_children(), 38);
//! assert!(config.validate().is_ok());
//! ```

use serde::Deserialize;

use pscircle_core::{color::Color, real::Real};
use pscircle_procs::{MemoryUnit, MetricRange, TreeOptions};

use crate::error::PscircleError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    process: ProcessConfig,

    #[serde(default)]
    tree: TreeConfig,

    #[serde(default)]
    dot: DotConfig,

    #[serde(default)]
    link: LinkConfig,

    #[serde(default)]
    metrics: MetricsConfig,
}

impl AppConfig {
    pub fn process(&self) -> &ProcessConfig {
        &self.process
    }

    pub fn tree(&self) -> &TreeConfig {
        &self.tree
    }

    pub fn dot(&self) -> &DotConfig {
        &self.dot
    }

    pub fn link(&self) -> &LinkConfig {
        &self.link
    }

    pub fn metrics(&self) -> &MetricsConfig {
        &self.metrics
    }

    /// Checks values that deserialize fine but cannot be laid out.
    ///
    /// # Errors
    ///
    /// Returns [`PscircleError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<(), PscircleError> {
        let positive = [
            ("tree.radius_increment", self.tree.radius_increment),
            ("tree.font_size", self.tree.font_size),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, value, "must be a positive number"));
            }
        }

        let non_negative = [
            ("dot.radius", self.dot.radius),
            ("dot.border", self.dot.border),
            ("link.width", self.link.width),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, value, "must not be negative"));
            }
        }

        if let Some(sector) = self.tree.sector {
            if !(sector.is_finite() && sector > 0.0) {
                return Err(invalid("tree.sector", sector, "must be a positive angle"));
            }
        }

        if !self.link.convexity.is_finite() {
            return Err(invalid(
                "link.convexity",
                self.link.convexity,
                "must be finite",
            ));
        }

        let bounds = [
            ("metrics.memory_min", self.metrics.memory_min),
            ("metrics.memory_max", self.metrics.memory_max),
            ("metrics.cpu_min", self.metrics.cpu_min),
            ("metrics.cpu_max", self.metrics.cpu_max),
        ];
        for (field, value) in bounds {
            if !value.is_finite() {
                return Err(invalid(field, value, "must be finite"));
            }
        }

        if self.metrics.memory_min > self.metrics.memory_max {
            return Err(PscircleError::Config(
                "metrics.memory_min must not exceed metrics.memory_max".to_string(),
            ));
        }
        if self.metrics.cpu_min > self.metrics.cpu_max {
            return Err(PscircleError::Config(
                "metrics.cpu_min must not exceed metrics.cpu_max".to_string(),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, value: Real, reason: &str) -> PscircleError {
    PscircleError::Config(format!("`{field}` {reason}, got {value}"))
}

/// How the process listing is read and linked.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Pid of the process drawn at the center.
    root_pid: i32,

    /// Most children shown under one parent before the rest are folded.
    max_children: usize,

    /// Unit of the memory column of the listing.
    memory_unit: MemoryUnit,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        let options = TreeOptions::default();
        Self {
            root_pid: options.root_pid,
            max_children: options.max_children,
            memory_unit: MemoryUnit::default(),
        }
    }
}

impl ProcessConfig {
    pub fn root_pid(&self) -> i32 {
        self.root_pid
    }

    pub fn max_children(&self) -> usize {
        self.max_children
    }

    pub fn memory_unit(&self) -> MemoryUnit {
        self.memory_unit
    }

    /// Returns the linking options for [`ProcessTree::build`](pscircle_procs::ProcessTree::build).
    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            root_pid: self.root_pid,
            max_children: self.max_children,
        }
    }
}

/// Geometry of the rings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Distance between two consecutive rings.
    radius_increment: Real,

    /// Angular range covered by the tree, in radians. Derived from the dot
    /// size when unset.
    sector: Option<Real>,

    /// Fixed rotation in radians. Overrides the anchor process.
    rotation: Option<Real>,

    /// Name of a process placed at `anchor_angle`.
    anchor_process: Option<String>,

    /// Angle of the anchor process, in radians.
    anchor_angle: Real,

    /// Label font size.
    font_size: Real,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            radius_increment: 400.0,
            sector: None,
            rotation: None,
            anchor_process: None,
            anchor_angle: 0.0,
            font_size: 12.0,
        }
    }
}

impl TreeConfig {
    pub fn radius_increment(&self) -> Real {
        self.radius_increment
    }

    pub fn sector(&self) -> Option<Real> {
        self.sector
    }

    pub fn rotation(&self) -> Option<Real> {
        self.rotation
    }

    pub fn anchor_process(&self) -> Option<&str> {
        self.anchor_process.as_deref()
    }

    pub fn anchor_angle(&self) -> Real {
        self.anchor_angle
    }

    pub fn font_size(&self) -> Real {
        self.font_size
    }
}

/// Size and colors of the process dots.
///
/// The background follows CPU usage, the border follows memory usage.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DotConfig {
    radius: Real,
    border: Real,
    background_min: Color,
    background_max: Color,
    border_min: Color,
    border_max: Color,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            radius: 8.0,
            border: 2.0,
            background_min: color("#a8a8a8"),
            background_max: color("#ff4f4f"),
            border_min: color("#6c7a89"),
            border_max: color("#e8a03c"),
        }
    }
}

impl DotConfig {
    pub fn radius(&self) -> Real {
        self.radius
    }

    pub fn border(&self) -> Real {
        self.border
    }

    pub fn background_min(&self) -> Color {
        self.background_min
    }

    pub fn background_max(&self) -> Color {
        self.background_max
    }

    pub fn border_min(&self) -> Color {
        self.border_min
    }

    pub fn border_max(&self) -> Color {
        self.border_max
    }
}

/// Width, curvature and colors of the parent/child links.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    width: Real,

    /// Control point distance as a fraction of the ring spacing.
    convexity: Real,

    color_min: Color,
    color_max: Color,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            width: 1.3,
            convexity: 0.4,
            color_min: color("#4a4a4a"),
            color_max: color("#e8a03c"),
        }
    }
}

impl LinkConfig {
    pub fn width(&self) -> Real {
        self.width
    }

    pub fn convexity(&self) -> Real {
        self.convexity
    }

    pub fn color_min(&self) -> Color {
        self.color_min
    }

    pub fn color_max(&self) -> Color {
        self.color_max
    }
}

/// Value ranges mapped onto the color gradients.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Resident memory in bytes shown with the minimum color.
    memory_min: Real,
    /// Resident memory in bytes shown with the maximum color.
    memory_max: Real,
    /// CPU percentage shown with the minimum color.
    cpu_min: Real,
    /// CPU percentage shown with the maximum color.
    cpu_max: Real,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            memory_min: 0.0,
            memory_max: (1u64 << 30) as Real,
            cpu_min: 0.0,
            cpu_max: 100.0,
        }
    }
}

impl MetricsConfig {
    pub fn memory(&self) -> MetricRange {
        MetricRange::new(self.memory_min, self.memory_max)
    }

    pub fn cpu(&self) -> MetricRange {
        MetricRange::new(self.cpu_min, self.cpu_max)
    }
}

/// Parses a built-in default color.
fn color(css: &str) -> Color {
    Color::new(css).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.process().root_pid(), 0);
        assert_eq!(config.process().memory_unit(), MemoryUnit::K);
        assert_approx_eq!(Real, config.tree().radius_increment(), 400.0);
        assert_eq!(config.tree().sector(), None);
        assert_approx_eq!(Real, config.dot().radius(), 8.0);
        assert_approx_eq!(Real, config.link().convexity(), 0.4);
        assert_approx_eq!(Real, config.metrics().cpu().max(), 100.0);
        assert_ne!(config.dot().background_min(), config.dot().background_max());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r##"
            [process]
            root_pid = 1
            memory_unit = "M"

            [tree]
            anchor_process = "sshd"
            anchor_angle = 1.5

            [dot]
            background_min = "#336699"
            "##,
        )
        .unwrap();

        assert_eq!(config.process().root_pid(), 1);
        assert_eq!(config.process().max_children(), 38);
        assert_eq!(config.process().memory_unit(), MemoryUnit::M);
        assert_eq!(config.tree().anchor_process(), Some("sshd"));
        assert_approx_eq!(Real, config.tree().anchor_angle(), 1.5);
        assert_approx_eq!(Real, config.tree().font_size(), 12.0);
        assert_eq!(
            config.dot().background_min(),
            Color::new("#336699").unwrap()
        );
        assert_approx_eq!(Real, config.dot().border(), 2.0);
    }

    #[test]
    fn test_invalid_color_rejected() {
        let result = toml::from_str::<AppConfig>(
            r#"
            [link]
            color_min = "definitely-not-a-color"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_zero_radius_increment() {
        let config: AppConfig = toml::from_str("[tree]\nradius_increment = 0.0\n").unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tree.radius_increment"), "{err}");
    }

    #[test]
    fn test_validate_rejects_inverted_metrics() {
        let config: AppConfig =
            toml::from_str("[metrics]\ncpu_min = 50.0\ncpu_max = 10.0\n").unwrap();

        assert!(matches!(config.validate(), Err(PscircleError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_nan_metrics() {
        let config: AppConfig = toml::from_str("[metrics]\nmemory_max = nan\n").unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("metrics.memory_max"), "{err}");
    }

    #[test]
    fn test_validate_rejects_negative_sector() {
        let config: AppConfig = toml::from_str("[tree]\nsector = -1.0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tree_options() {
        let config: AppConfig =
            toml::from_str("[process]\nroot_pid = 7\nmax_children = 3\n").unwrap();

        assert_eq!(
            config.process().tree_options(),
            TreeOptions {
                root_pid: 7,
                max_children: 3
            }
        );
    }
}
