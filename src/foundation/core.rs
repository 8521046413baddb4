use crate::foundation::error::{ThumbError, ThumbResult};

pub use kurbo::{Affine, Point};

/// Fraction of the canvas width a single text line may occupy before wrapping.
pub const WIDTH_BUDGET_FRACTION: f64 = 0.9;

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The fixed 16:9 thumbnail surface every composite is rendered onto.
    pub const THUMBNAIL: Canvas = Canvas {
        width: 1280,
        height: 720,
    };

    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> ThumbResult<Self> {
        if width == 0 || height == 0 {
            return Err(ThumbError::validation("canvas dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Maximum horizontal extent of one line of text.
    pub fn width_budget(self) -> f64 {
        f64::from(self.width) * WIDTH_BUDGET_FRACTION
    }

    /// Map a normalized anchor onto absolute canvas coordinates.
    pub fn resolve(self, anchor: Anchor) -> Point {
        Point::new(
            anchor.x * f64::from(self.width),
            anchor.y * f64::from(self.height),
        )
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::THUMBNAIL
    }
}

/// Normalized point (`0..=1` on both axes) around which the text block is centered.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Anchor {
    /// Horizontal position as a fraction of canvas width.
    pub x: f64,
    /// Vertical position as a fraction of canvas height.
    pub y: f64,
}

impl Anchor {
    /// Canvas center.
    pub const CENTER: Anchor = Anchor { x: 0.5, y: 0.5 };

    /// Construct an anchor without validation.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Return `true` when both coordinates are finite and inside `[0, 1]`.
    pub fn is_normalized(self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }

    /// Clamp both coordinates into `[0, 1]`. NaN maps to the center.
    pub fn clamped(self) -> Self {
        fn clamp01(v: f64) -> f64 {
            if v.is_nan() { 0.5 } else { v.clamp(0.0, 1.0) }
        }
        Self {
            x: clamp01(self.x),
            y: clamp01(self.y),
        }
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Self::CENTER
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
