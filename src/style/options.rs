use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::core::Anchor;
use crate::foundation::error::{ThumbError, ThumbResult};
use crate::style::color::Color;

/// Font size range offered by the editor, in pixels.
pub const FONT_SIZE_RANGE: std::ops::RangeInclusive<f64> = 32.0..=140.0;
/// Line height multiplier range offered by the editor.
pub const LINE_HEIGHT_SCALE_RANGE: std::ops::RangeInclusive<f64> = 1.0..=2.0;
/// Highlight multiplier range offered by the editor.
pub const HIGHLIGHT_SCALE_RANGE: std::ops::RangeInclusive<f64> = 1.0..=2.5;

/// Horizontal alignment of the text block relative to its anchor.
///
/// `Right` and `Center` flow words right-to-left from the anchor; `Left` flows left-to-right.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Words flow rightward starting at the anchor.
    Left,
    /// The line straddles the anchor.
    #[default]
    Center,
    /// Words flow leftward ending at the anchor.
    Right,
}

impl TextAlign {
    /// Return `true` when words are laid out from right to left.
    pub fn flows_right_to_left(self) -> bool {
        matches!(self, Self::Right | Self::Center)
    }
}

/// Supported overlay font families.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    /// Cairo.
    #[default]
    Cairo,
    /// Tajawal.
    Tajawal,
    /// Changa.
    Changa,
    /// Amiri.
    Amiri,
    /// Reem Kufi.
    #[serde(rename = "Reem Kufi")]
    ReemKufi,
    /// Lemonada.
    Lemonada,
}

impl FontFamily {
    /// Every supported family, in editor order.
    pub const ALL: [FontFamily; 6] = [
        FontFamily::Cairo,
        FontFamily::Tajawal,
        FontFamily::Changa,
        FontFamily::Amiri,
        FontFamily::ReemKufi,
        FontFamily::Lemonada,
    ];

    /// Family name as registered by the font file.
    pub fn name(self) -> &'static str {
        match self {
            Self::Cairo => "Cairo",
            Self::Tajawal => "Tajawal",
            Self::Changa => "Changa",
            Self::Amiri => "Amiri",
            Self::ReemKufi => "Reem Kufi",
            Self::Lemonada => "Lemonada",
        }
    }

    /// File-name stem used when looking the family up on disk (`ReemKufi-Black.ttf`, ...).
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::ReemKufi => "ReemKufi",
            other => other.name(),
        }
    }
}

/// Every user-editable property of the thumbnail text overlay.
///
/// Values are immutable snapshots: every edit produces a new `TextOptions` and the render
/// pipeline holds them behind an `Arc`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextOptions {
    /// Overlay text; `\n` forces a line break.
    pub text: String,
    /// Normalized point the text block is centered around.
    #[serde(alias = "position")]
    pub anchor: Anchor,
    /// Horizontal alignment and word flow direction.
    pub align: TextAlign,
    /// Font family.
    pub font: FontFamily,
    /// Base font size in canvas pixels.
    pub font_size: f64,
    /// Fill color of regular words.
    pub text_color: Color,
    /// Outline color, drawn behind the fill.
    pub stroke_color: Color,
    /// Highlight terms, matched by case-insensitive substring.
    pub highlighted_words: Vec<String>,
    /// Fill color of highlighted words.
    pub highlight_color: Color,
    /// Size multiplier applied to highlighted words.
    pub highlight_scale: f64,
    /// Line advance as a multiple of the base font size.
    pub line_height_scale: f64,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            text: String::new(),
            anchor: Anchor::CENTER,
            align: TextAlign::Center,
            font: FontFamily::Cairo,
            font_size: 72.0,
            text_color: Color::WHITE,
            stroke_color: Color::BLACK,
            highlighted_words: Vec::new(),
            highlight_color: Color::YELLOW,
            highlight_scale: 1.2,
            line_height_scale: 1.2,
        }
    }
}

impl TextOptions {
    /// Default options carrying `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Load options from a JSON file.
    #[tracing::instrument]
    pub fn from_path(path: &Path) -> ThumbResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read text options '{}'", path.display()))?;
        let opts: TextOptions = serde_json::from_slice(&bytes)
            .map_err(|e| ThumbError::validation(format!("invalid text options JSON: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Check values against the ranges the editor exposes.
    ///
    /// The layout engine itself never validates; this is for options arriving from files or
    /// other untrusted sources.
    pub fn validate(&self) -> ThumbResult<()> {
        fn check(
            name: &str,
            v: f64,
            range: &std::ops::RangeInclusive<f64>,
        ) -> ThumbResult<()> {
            if !v.is_finite() || !range.contains(&v) {
                return Err(ThumbError::validation(format!(
                    "{name} must be within {}..={} (got {v})",
                    range.start(),
                    range.end()
                )));
            }
            Ok(())
        }

        check("fontSize", self.font_size, &FONT_SIZE_RANGE)?;
        check(
            "lineHeightScale",
            self.line_height_scale,
            &LINE_HEIGHT_SCALE_RANGE,
        )?;
        check(
            "highlightScale",
            self.highlight_scale,
            &HIGHLIGHT_SCALE_RANGE,
        )?;
        if !self.anchor.is_normalized() {
            return Err(ThumbError::validation(
                "position must lie within [0, 1] on both axes",
            ));
        }
        Ok(())
    }

    /// Return `true` when there is nothing to draw.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// New value with `word` added to, or removed from, the highlight terms.
    pub fn toggle_highlight(&self, word: &str) -> Self {
        let mut next = self.clone();
        if let Some(pos) = next.highlighted_words.iter().position(|w| w == word) {
            next.highlighted_words.remove(pos);
        } else {
            next.highlighted_words.push(word.to_owned());
        }
        next
    }

    /// New value showing `title`, highlighting only `keyword` (when non-empty).
    pub fn with_title(&self, title: &str, keyword: Option<&str>) -> Self {
        let highlighted_words = keyword
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| vec![k.to_owned()])
            .unwrap_or_default();
        Self {
            text: title.to_owned(),
            highlighted_words,
            ..self.clone()
        }
    }

    /// New value with the anchor moved (clamped into the canvas).
    pub fn with_anchor(&self, anchor: Anchor) -> Self {
        Self {
            anchor: anchor.clamped(),
            ..self.clone()
        }
    }
}

/// Distinct tokens of `text` longer than two characters, in first-seen order.
///
/// These are the words the editor offers as highlight toggles.
pub fn highlight_candidates(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        if word.chars().count() <= 2 {
            continue;
        }
        if !out.iter().any(|w| w == word) {
            out.push(word.to_owned());
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/style/options.rs"]
mod tests;
