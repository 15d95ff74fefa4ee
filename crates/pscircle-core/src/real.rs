//! Build-wide floating point precision.
//!
//! All layout and geometry arithmetic uses [`Real`]. It is `f64` unless the
//! `single-precision` feature is enabled, in which case it is `f32`.
//! [`EPS`] is the tolerance used by near-zero comparisons at that precision.

#[cfg(not(feature = "single-precision"))]
mod imp {
    /// Floating point type used across the workspace.
    pub type Real = f64;

    /// Tolerance for near-zero and equality comparisons.
    pub const EPS: Real = 1e-8;

    /// Archimedes' constant at [`Real`] precision.
    pub const PI: Real = std::f64::consts::PI;
}

#[cfg(feature = "single-precision")]
mod imp {
    /// Floating point type used across the workspace.
    pub type Real = f32;

    /// Tolerance for near-zero and equality comparisons.
    pub const EPS: Real = 1e-5;

    /// Archimedes' constant at [`Real`] precision.
    pub const PI: Real = std::f32::consts::PI;
}

pub use imp::{EPS, PI, Real};
