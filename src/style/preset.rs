use serde::{Deserialize, Serialize};

use crate::style::color::Color;
use crate::style::options::{FontFamily, TextAlign, TextOptions};

/// One-click styles offered next to the text editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StylePreset {
    /// Right-aligned news look.
    News,
    /// Large, loud, centered.
    Bold,
    /// Serif, muted, generous line spacing.
    Documentary,
}

impl StylePreset {
    /// Every preset, in editor order.
    pub const ALL: [StylePreset; 3] = [Self::News, Self::Bold, Self::Documentary];

    /// Apply the preset's typography to `base`, keeping text, anchor and highlight terms.
    pub fn apply(self, base: &TextOptions) -> TextOptions {
        let (
            font,
            font_size,
            text_color,
            stroke_color,
            highlight_color,
            highlight_scale,
            line_height_scale,
            align,
        ) = match self {
            Self::News => (
                FontFamily::Tajawal,
                80.0,
                Color::WHITE,
                Color::BLACK,
                Color::rgb(0xFF, 0xDD, 0x00),
                1.1,
                1.1,
                TextAlign::Right,
            ),
            Self::Bold => (
                FontFamily::Changa,
                96.0,
                Color::YELLOW,
                Color::BLACK,
                Color::rgb(0xFF, 0x00, 0x00),
                1.25,
                1.0,
                TextAlign::Center,
            ),
            Self::Documentary => (
                FontFamily::Amiri,
                70.0,
                Color::rgb(0xE0, 0xE0, 0xE0),
                Color::rgb(0x1C, 0x1C, 0x1C),
                Color::rgb(0x4A, 0x90, 0xE2),
                1.15,
                1.3,
                TextAlign::Center,
            ),
        };

        TextOptions {
            font,
            font_size,
            text_color,
            stroke_color,
            highlight_color,
            highlight_scale,
            line_height_scale,
            align,
            ..base.clone()
        }
    }
}
