use crate::style::options::FontFamily;

/// Glyph-metrics capability the layout engine measures words with.
///
/// Implementations must be deterministic: the same word, family and size always yield the same
/// advance width.
pub trait TextMeasurer {
    /// Advance width of `word` set in `font` at `size_px`, in canvas pixels.
    fn measure(&mut self, word: &str, font: FontFamily, size_px: f64) -> f64;
}

/// Measurer that gives every character the same advance (`advance_em * size_px`).
///
/// Used where real font files are unavailable (tests, layout previews).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvanceMeasurer {
    /// Advance of one character as a fraction of the font size.
    pub advance_em: f64,
}

impl FixedAdvanceMeasurer {
    /// Create a measurer with the given per-character advance.
    pub fn new(advance_em: f64) -> Self {
        Self { advance_em }
    }
}

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self { advance_em: 0.5 }
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure(&mut self, word: &str, _font: FontFamily, size_px: f64) -> f64 {
        word.chars().count() as f64 * self.advance_em * size_px
    }
}
