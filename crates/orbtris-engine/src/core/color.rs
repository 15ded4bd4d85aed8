use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque base color of a piece, orb, or particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Self = Self::new(255, 0, 0);
    pub const GREEN: Self = Self::new(0, 128, 0);
    pub const YELLOW: Self = Self::new(255, 255, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);
    pub const PURPLE: Self = Self::new(128, 0, 128);
    pub const CYAN: Self = Self::new(0, 255, 255);
    pub const ORANGE: Self = Self::new(255, 165, 0);
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Color of the column beam and the orb that triggers it.
    pub const VIOLET: Self = Self::new(128, 0, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba { rgb: self, alpha }
    }
}

/// A base color with a separate alpha channel.
///
/// Alpha is kept as a float next to the base color and only composed into a
/// string at the render boundary through the [`Display`](fmt::Display) impl:
///
/// ```
/// use orbtris_engine::Rgb;
///
/// let color = Rgb::RED.with_alpha(0.5);
/// assert_eq!(color.to_string(), "rgba(255, 0, 0, 0.5)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Rgba {
    /// Returns the same color scaled by an additional alpha factor.
    #[must_use]
    pub fn faded(self, factor: f32) -> Self {
        Self {
            rgb: self.rgb,
            alpha: (self.alpha * factor).clamp(0.0, 1.0),
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgb { r, g, b } = self.rgb;
        write!(f, "rgba({r}, {g}, {b}, {})", self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_display() {
        assert_eq!(Rgb::VIOLET.with_alpha(0.8).to_string(), "rgba(128, 0, 255, 0.8)");
        assert_eq!(Rgb::BLACK.with_alpha(0.0).to_string(), "rgba(0, 0, 0, 0)");
    }

    #[test]
    fn test_faded_clamps() {
        let color = Rgb::WHITE.with_alpha(0.6);
        assert!((color.faded(0.5).alpha - 0.3).abs() < f32::EPSILON);
        assert!((color.faded(4.0).alpha - 1.0).abs() < f32::EPSILON);
        assert!(color.faded(-1.0).alpha.abs() < f32::EPSILON);
    }
}
