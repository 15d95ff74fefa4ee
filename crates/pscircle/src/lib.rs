//! Pscircle - radial process tree layout.
//!
//! Reads a process listing, links it into a tree and places every process on
//! concentric rings around a root process. Parents sit on the inner ring,
//! children further out, and sibling subtrees never overlap.

pub mod config;
pub mod radial;

mod error;

pub use pscircle_core::{color, geometry, real};
pub use pscircle_procs::{MemoryUnit, Process, ProcessTree};

pub use error::PscircleError;

use std::io::Read;

use log::{debug, info, trace};

use pscircle_core::{layout::arrange_and_normalize, reorder::reorder_by_leaves};
use pscircle_procs::stream::parse_stream;

use config::AppConfig;
use radial::{EstimatedTextMeasure, RadialLayout, TextMeasure};

/// Builder for reading process listings and laying them out.
///
/// # Examples
///
/// ```
/// use pscircle::{CircleBuilder, config::AppConfig};
///
/// let listing = "1 0 0.0 1024 init\n2 1 0.0 512 sshd\n3 1 0.0 256 cron\n";
///
/// let builder = CircleBuilder::new(AppConfig::default());
/// let mut procs = builder.parse(listing).expect("Failed to parse");
/// let layout = builder.layout(&mut procs).expect("Failed to lay out");
///
/// assert_eq!(layout.nodes().len(), 3);
/// println!("{}", builder.render_report(&procs, &layout));
/// ```
#[derive(Default)]
pub struct CircleBuilder {
    config: AppConfig,
}

impl CircleBuilder {
    /// Create a new builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a process listing and link it into a tree.
    ///
    /// # Errors
    ///
    /// Returns [`PscircleError::Stream`] for a malformed line.
    pub fn parse(&self, source: &str) -> Result<ProcessTree, PscircleError> {
        info!("Parsing process listing");

        let processes = parse_stream(source, self.config.process().memory_unit())?;
        let procs = ProcessTree::build(processes, &self.config.process().tree_options());

        debug!(processes = procs.len(); "Process listing parsed");
        Ok(procs)
    }

    /// Read a whole process listing from `reader` and parse it.
    ///
    /// # Errors
    ///
    /// Returns [`PscircleError::Io`] when reading fails, otherwise the errors
    /// of [`CircleBuilder::parse`].
    pub fn parse_reader<R: Read>(&self, mut reader: R) -> Result<ProcessTree, PscircleError> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        self.parse(&source)
    }

    /// Lay out a process tree with estimated label sizes.
    ///
    /// Reorders the children of every process, arranges the tree and maps it
    /// onto rings.
    ///
    /// # Errors
    ///
    /// Returns [`PscircleError::Config`] when the configuration cannot be
    /// laid out.
    pub fn layout(&self, procs: &mut ProcessTree) -> Result<RadialLayout, PscircleError> {
        let measure = EstimatedTextMeasure::new(self.config.tree().font_size());
        self.layout_with(procs, &measure)
    }

    /// Lay out a process tree, measuring labels with `measure`.
    ///
    /// # Errors
    ///
    /// Same as [`CircleBuilder::layout`].
    pub fn layout_with<M>(
        &self,
        procs: &mut ProcessTree,
        measure: &M,
    ) -> Result<RadialLayout, PscircleError>
    where
        M: TextMeasure + ?Sized,
    {
        self.config.validate()?;

        let root = procs.root();
        info!(root_pid = procs.process(root).pid; "Arranging process tree");

        let leaves = reorder_by_leaves(procs.tree_mut(), root);
        arrange_and_normalize(procs.tree_mut(), root);
        debug!(leaves; "Process tree arranged");

        let layout = radial::map_radial(procs, &self.config, measure);
        trace!(layout:?; "Radial layout");

        Ok(layout)
    }

    /// Render a laid-out tree as a plain text report.
    ///
    /// The report has one line per placed process, `pid depth x angle radius
    /// name`, followed by the CPU and memory toplists.
    pub fn render_report(&self, procs: &ProcessTree, layout: &RadialLayout) -> String {
        let mut lines = Vec::with_capacity(layout.nodes().len() + 16);

        lines.push(format!(
            "# sector {:.6} rotation {:.6}",
            layout.sector(),
            layout.rotation()
        ));
        lines.push("# pid depth x angle radius name".to_string());
        lines.extend(layout.nodes().iter().map(|node| {
            format!(
                "{} {} {:.6} {:.6} {:.3} {}",
                node.pid,
                node.depth,
                node.x,
                node.angle,
                node.position.r(),
                node.label.text
            )
        }));

        lines.push("# top cpu: pid cpu name".to_string());
        lines.extend(procs.cpu_toplist().iter().map(|&node| {
            let process = procs.process(node);
            format!("{} {:.1} {}", process.pid, process.cpu, process.name)
        }));

        lines.push("# top mem: pid bytes name".to_string());
        lines.extend(procs.mem_toplist().iter().map(|&node| {
            let process = procs.process(node);
            format!("{} {} {}", process.pid, process.mem, process.name)
        }));

        debug!(lines = lines.len(); "Report rendered");

        let mut report = lines.join("\n");
        report.push('\n');
        report
    }
}
