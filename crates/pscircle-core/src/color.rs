//! Color handling for the radial tree
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Dots and links are tinted by interpolating between a
//! minimum and a maximum color according to a process metric, see
//! [`Color::between`].

use std::fmt;
use std::str::FromStr;

use color::{AlphaColor, DynamicColor, Srgb};
use serde::Deserialize;

use crate::real::Real;

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use pscircle_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Interpolates linearly between `from` and `to` in sRGB.
    ///
    /// `k = 0` yields `from`, `k = 1` yields `to`. Every channel, alpha
    /// included, is interpolated independently. `k` is clamped to `[0, 1]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pscircle_core::color::Color;
    ///
    /// let black = Color::new("black").unwrap();
    /// let white = Color::new("white").unwrap();
    ///
    /// let gray = Color::between(black, white, 0.5);
    /// let [r, g, b, a] = gray.srgb_components();
    /// assert!((r - 0.5).abs() < 1e-6 && r == g && g == b);
    /// assert_eq!(a, 1.0);
    /// ```
    pub fn between(from: Color, to: Color, k: Real) -> Self {
        let k = k.clamp(0.0, 1.0) as f32;
        let a = from.srgb_components();
        let b = to.srgb_components();

        let mut components = [0.0; 4];
        for (out, (a, b)) in components.iter_mut().zip(a.into_iter().zip(b)) {
            *out = a + k * (b - a);
        }

        Self {
            color: DynamicColor::from_alpha_color(AlphaColor::<Srgb>::new(components)),
        }
    }

    /// Returns the `[r, g, b, alpha]` components in sRGB, each in `[0, 1]`.
    pub fn srgb_components(self) -> [f32; 4] {
        self.color.to_alpha_color::<Srgb>().components
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#ff0000").is_ok());
        assert!(Color::new("rgb(0, 128, 255)").is_ok());
        assert!(Color::new("not-a-color").is_err());
    }

    #[test]
    fn test_color_default() {
        let color = Color::default();
        assert_eq!(color.to_string(), "black");
    }

    #[test]
    fn test_between_endpoints() {
        let red = Color::new("#ff0000").unwrap();
        let blue = Color::new("#0000ff").unwrap();

        assert_eq!(
            Color::between(red, blue, 0.0).srgb_components(),
            red.srgb_components()
        );
        assert_eq!(
            Color::between(red, blue, 1.0).srgb_components(),
            blue.srgb_components()
        );
    }

    #[test]
    fn test_between_interpolates_alpha() {
        let clear = Color::new("#00000000").unwrap();
        let opaque = Color::new("#000000ff").unwrap();

        let half = Color::between(clear, opaque, 0.25);
        assert_approx_eq!(f32, half.srgb_components()[3], 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_between_clamps_factor() {
        let red = Color::new("red").unwrap();
        let blue = Color::new("blue").unwrap();

        assert_eq!(
            Color::between(red, blue, 3.0).srgb_components(),
            blue.srgb_components()
        );
        assert_eq!(
            Color::between(red, blue, -1.0).srgb_components(),
            red.srgb_components()
        );
    }
}
