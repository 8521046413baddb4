use serde::Serialize;

use crate::foundation::core::Canvas;
use crate::layout::measure::TextMeasurer;
use crate::style::options::{TextAlign, TextOptions};

/// Inter-word space as a fraction of the base font size.
pub const WORD_SPACE_EM: f64 = 0.2;

const TRAILING_PUNCTUATION: [char; 6] = ['.', ',', '!', '?', ':', ';'];

/// Case-insensitive substring matcher for highlight terms.
///
/// A word matches when, after case-folding and dropping one trailing punctuation mark, it
/// *contains* any term. Substring containment can over-match inside longer words; that is the
/// editor's documented behavior.
#[derive(Clone, Debug, Default)]
pub struct HighlightMatcher {
    terms: Vec<String>,
}

impl HighlightMatcher {
    /// Build a matcher from raw terms. Blank terms are ignored.
    pub fn new<S: AsRef<str>>(terms: &[S]) -> Self {
        let terms = terms
            .iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }

    /// Return `true` when `word` should be drawn highlighted.
    pub fn matches(&self, word: &str) -> bool {
        if self.terms.is_empty() {
            return false;
        }
        let folded = word.trim().to_lowercase();
        let folded = folded
            .strip_suffix(TRAILING_PUNCTUATION)
            .unwrap_or(&folded);
        self.terms.iter().any(|t| folded.contains(t.as_str()))
    }
}

/// A word with its style and absolute placement on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlacedWord {
    /// Word text as typed.
    pub text: String,
    /// Whether the word matched a highlight term.
    pub highlighted: bool,
    /// Font size the word is drawn at (base size times the highlight scale when highlighted).
    pub font_size: f64,
    /// Measured advance width at `font_size`.
    pub width: f64,
    /// Left edge of the word's glyphs.
    pub x: f64,
    /// Vertical middle of the word's em box.
    pub center_y: f64,
}

/// One wrapped line of words.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayoutLine {
    /// Words in reading (input) order.
    pub words: Vec<PlacedWord>,
    /// Sum of word widths plus inter-word spacing.
    pub width: f64,
    /// Vertical middle of the line before per-word highlight offsets.
    pub center_y: f64,
}

/// Output of [`layout_text`]: every line of the overlay, top to bottom.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TextLayout {
    /// Lines, top to bottom.
    pub lines: Vec<LayoutLine>,
    /// Distance between consecutive line centers.
    pub line_height: f64,
    /// Height of the whole block, first line top to last line bottom.
    pub block_height: f64,
}

impl TextLayout {
    /// Return `true` when nothing is drawn.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterate over every placed word, line by line.
    pub fn words(&self) -> impl Iterator<Item = &PlacedWord> {
        self.lines.iter().flat_map(|l| l.words.iter())
    }
}

#[derive(Clone, Debug)]
struct MeasuredWord<'a> {
    text: &'a str,
    highlighted: bool,
    font_size: f64,
    width: f64,
}

/// Break `options.text` into lines and place every word on `canvas`.
///
/// Pure with respect to its inputs: the same canvas, options and measurer always produce the
/// same layout. Empty or whitespace-only text yields an empty layout. Degenerate option values
/// (non-positive font size, NaN scales) are not rejected here.
#[tracing::instrument(skip(options, measurer), fields(chars = options.text.len()))]
pub fn layout_text(
    canvas: Canvas,
    options: &TextOptions,
    measurer: &mut dyn TextMeasurer,
) -> TextLayout {
    let font_size = options.font_size;
    let space = font_size * WORD_SPACE_EM;
    let budget = canvas.width_budget();
    let matcher = HighlightMatcher::new(&options.highlighted_words);

    let mut lines: Vec<(Vec<MeasuredWord<'_>>, f64)> = Vec::new();
    for paragraph in options.text.split('\n') {
        let mut current: Vec<MeasuredWord<'_>> = Vec::new();
        let mut running = 0.0;

        for word in paragraph.split_whitespace() {
            let highlighted = matcher.matches(word);
            let size = if highlighted {
                font_size * options.highlight_scale
            } else {
                font_size
            };
            let width = measurer.measure(word, options.font, size);
            let gap = if current.is_empty() { 0.0 } else { space };
            let candidate = running + gap + width;

            let measured = MeasuredWord {
                text: word,
                highlighted,
                font_size: size,
                width,
            };
            if candidate > budget && !current.is_empty() {
                lines.push((std::mem::take(&mut current), running));
                running = width;
            } else {
                running = candidate;
            }
            current.push(measured);
        }

        if !current.is_empty() {
            lines.push((current, running));
        }
    }

    if lines.is_empty() {
        return TextLayout::default();
    }

    let line_height = font_size * options.line_height_scale;
    let block_height = lines.len() as f64 * line_height - (line_height - font_size);
    let origin = canvas.resolve(options.anchor);
    let first_center = origin.y - block_height / 2.0 + line_height / 2.0;

    let placed = lines
        .into_iter()
        .enumerate()
        .map(|(i, (words, width))| {
            let center_y = first_center + i as f64 * line_height;
            place_line(
                words,
                width,
                origin.x,
                center_y,
                space,
                font_size,
                options.align,
            )
        })
        .collect();

    TextLayout {
        lines: placed,
        line_height,
        block_height,
    }
}

fn place_line(
    words: Vec<MeasuredWord<'_>>,
    width: f64,
    origin_x: f64,
    center_y: f64,
    space: f64,
    base_size: f64,
    align: TextAlign,
) -> LayoutLine {
    let rtl = align.flows_right_to_left();
    let mut cursor = match align {
        TextAlign::Center => origin_x + width / 2.0,
        TextAlign::Left | TextAlign::Right => origin_x,
    };

    let words = words
        .into_iter()
        .map(|w| {
            let x = if rtl { cursor - w.width } else { cursor };
            if rtl {
                cursor -= w.width + space;
            } else {
                cursor += w.width + space;
            }
            PlacedWord {
                text: w.text.to_owned(),
                highlighted: w.highlighted,
                font_size: w.font_size,
                width: w.width,
                x,
                // Enlarged words sink by half their extra size so they stay optically centered.
                center_y: center_y - (base_size - w.font_size) / 2.0,
            }
        })
        .collect();

    LayoutLine {
        words,
        width,
        center_y,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
