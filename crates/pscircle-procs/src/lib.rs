//! Process model for the radial process tree.
//!
//! This crate turns a textual process listing into a linked process tree:
//!
//! - [`process`] - Process records, memory units and metric ranges
//! - [`stream`] - Parser for `pid ppid cpu mem name` listings
//! - [`tree`] - [`ProcessTree`] linking with stubs, toplists and lookups
//! - [`error`] - Errors raised while reading a listing
//!
//! # Example
//!
//! ```
//! use pscircle_procs::{
//!     process::MemoryUnit,
//!     stream::parse_stream,
//!     tree::{ProcessTree, TreeOptions},
//! };
//!
//! let listing = "1 0 0.0 1024 init\n42 1 3.5 2048 sshd\n";
//! let processes = parse_stream(listing, MemoryUnit::K).unwrap();
//! let procs = ProcessTree::build(processes, &TreeOptions::default());
//!
//! let sshd = procs.find_by_name("sshd").unwrap();
//! assert_eq!(procs.process(sshd).pid, 42);
//! ```

pub mod error;
pub mod process;
pub mod stream;
pub mod tree;

pub use error::StreamError;
pub use process::{MemoryUnit, MetricRange, Process};
pub use tree::{ProcessTree, TreeOptions};
