//! Pscircle Core Types and Algorithms
//!
//! This crate provides the layout engine behind the radial process tree
//! visualization. It includes:
//!
//! - **Precision**: The build-wide floating point type ([`real::Real`])
//! - **Tree**: An arena-backed multi-way tree ([`tree::Tree`])
//! - **Reorder**: Leaf-balancing child reordering ([`reorder`] module)
//! - **Layout**: Contour-based tidy tree layout ([`layout`] module)
//! - **Widest**: Rotation anchor selection ([`widest`] module)
//! - **Geometry**: Cartesian and polar points ([`geometry`] module)
//! - **Colors**: Color parsing and interpolation ([`color::Color`])

pub mod color;
pub mod geometry;
pub mod layout;
pub mod real;
pub mod reorder;
pub mod tree;
pub mod widest;
