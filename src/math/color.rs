use serde::Deserialize;

/// An RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Color3 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color3 {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const GRAY: Self = Self::new(0.5, 0.5, 0.5);

    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Moves every channel `fraction` of the way towards white.
    #[must_use]
    pub fn lightened(self, fraction: f32) -> Self {
        Self {
            r: self.r + (1.0 - self.r) * fraction,
            g: self.g + (1.0 - self.g) * fraction,
            b: self.b + (1.0 - self.b) * fraction,
        }
    }

    /// Linear interpolation between `self` (t = 0) and `other` (t = 1).
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }
}
