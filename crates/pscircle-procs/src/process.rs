//! Process records and the metrics attached to them.

use serde::Deserialize;

use pscircle_core::real::Real;

/// Longest process name kept, in characters.
pub const MAX_NAME_LENGTH: usize = 15;

/// Scale of the memory column of a process listing.
///
/// The unit is stored as an exponent of 1024, so `K` multiplies by 1024 and
/// `M` by 1024².
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum MemoryUnit {
    /// Bytes
    #[serde(alias = "b")]
    B,
    /// Kibibytes, the unit `ps` reports resident set sizes in
    #[default]
    #[serde(alias = "k")]
    K,
    /// Mebibytes
    #[serde(alias = "m")]
    M,
    /// Gibibytes
    #[serde(alias = "g")]
    G,
    /// Tebibytes
    #[serde(alias = "t")]
    T,
}

impl MemoryUnit {
    /// Returns the number of bytes in one unit.
    pub fn multiplier(self) -> u64 {
        let exponent = match self {
            Self::B => 0,
            Self::K => 1,
            Self::M => 2,
            Self::G => 3,
            Self::T => 4,
        };
        1024u64.pow(exponent)
    }
}

/// One process as read from a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    /// Process id.
    pub pid: i32,
    /// Parent process id.
    pub ppid: i32,
    /// CPU utilization in percent.
    pub cpu: Real,
    /// Resident memory in bytes.
    pub mem: u64,
    /// Command name, at most [`MAX_NAME_LENGTH`] characters.
    pub name: String,
}

impl Process {
    /// Creates a process record. `name` is cut to its first word and to
    /// [`MAX_NAME_LENGTH`] characters.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pscircle_procs::process::Process;
    /// let p = Process::new(7, 1, 0.5, 4096, "systemd-journald --flag");
    /// assert_eq!(p.name, "systemd-journal");
    /// ```
    pub fn new(pid: i32, ppid: i32, cpu: Real, mem: u64, name: &str) -> Self {
        Self {
            pid,
            ppid,
            cpu,
            mem,
            name: truncate_name(name),
        }
    }
}

fn truncate_name(name: &str) -> String {
    name.split_whitespace()
        .next()
        .unwrap_or_default()
        .chars()
        .take(MAX_NAME_LENGTH)
        .collect()
}

/// Value range used to turn a metric into a fraction for coloring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRange {
    min: Real,
    max: Real,
}

impl MetricRange {
    pub fn new(min: Real, max: Real) -> Self {
        Self { min, max }
    }

    pub fn min(self) -> Real {
        self.min
    }

    pub fn max(self) -> Real {
        self.max
    }

    /// Maps `value` into `[0, 1]`.
    ///
    /// Values at or below `min` yield 0, values at or above `max` yield 1 and
    /// values in between are interpolated linearly. An empty range yields 0
    /// at or below `min` and 1 above it.
    pub fn fraction(self, value: Real) -> Real {
        if value <= self.min {
            0.0
        } else if value >= self.max {
            1.0
        } else {
            (value - self.min) / (self.max - self.min)
        }
    }
}
