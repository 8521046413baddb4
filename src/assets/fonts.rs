use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{ThumbError, ThumbResult};
use crate::layout::measure::TextMeasurer;
use crate::style::options::FontFamily;

/// Weight suffixes tried, heaviest first, when looking a family up on disk.
const WEIGHT_SUFFIXES: [&str; 5] = ["-Black", "-ExtraBold", "-Bold", "-Regular", ""];
const EXTENSIONS: [&str; 2] = ["ttf", "otf"];

#[derive(Clone)]
struct LoadedFace {
    /// Family name as registered with Parley.
    family_name: String,
    /// Same bytes wrapped for the rasterizer.
    data: vello_cpu::peniko::FontData,
}

/// One word shaped with a single face, positioned relative to its own layout origin.
#[derive(Clone)]
pub(crate) struct ShapedWord {
    /// Glyphs with `y` on the baseline.
    pub(crate) glyphs: Vec<vello_cpu::Glyph>,
    /// Advance width in pixels.
    pub(crate) advance: f32,
    /// Baseline offset from the layout top.
    pub(crate) baseline: f32,
    /// Ascent above the baseline.
    pub(crate) ascent: f32,
    /// Descent below the baseline (positive).
    pub(crate) descent: f32,
    /// Face to rasterize `glyphs` with.
    pub(crate) font: vello_cpu::peniko::FontData,
}

impl ShapedWord {
    /// Translation that puts the middle of the em box at `center_y`.
    ///
    /// Mirrors a `middle` text baseline: half-way between ascent and descent.
    pub(crate) fn middle_offset(&self, center_y: f64) -> f64 {
        center_y - f64::from(self.baseline) + f64::from(self.ascent - self.descent) / 2.0
    }
}

/// Raw font files for the overlay families, shared between render threads.
#[derive(Clone, Debug, Default)]
pub struct FontLibrary {
    files: HashMap<FontFamily, Arc<[u8]>>,
}

impl FontLibrary {
    /// Empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every family found under `dir`.
    ///
    /// For each family the heaviest available cut is used (`Cairo-Black.ttf` before
    /// `Cairo-Bold.ttf`, ...). Families with no file are skipped; rendering with them fails later
    /// and falls back to the plain background.
    #[tracing::instrument]
    pub fn load_dir(dir: &Path) -> ThumbResult<Self> {
        let mut lib = Self::new();
        for family in FontFamily::ALL {
            let Some(path) = find_face_file(dir, family) else {
                tracing::debug!(family = family.name(), "no font file found");
                continue;
            };
            let bytes = std::fs::read(&path).map_err(|e| {
                ThumbError::asset(format!("read font '{}': {e}", path.display()))
            })?;
            tracing::debug!(family = family.name(), path = %path.display(), "font file found");
            lib.insert(family, bytes);
        }
        Ok(lib)
    }

    /// Add or replace the file for `family`.
    pub fn insert(&mut self, family: FontFamily, bytes: impl Into<Arc<[u8]>>) {
        self.files.insert(family, bytes.into());
    }

    /// Return `true` when a file is present for `family`.
    pub fn has(&self, family: FontFamily) -> bool {
        self.files.contains_key(&family)
    }

    /// Families with a file, in editor order.
    pub fn families(&self) -> Vec<FontFamily> {
        FontFamily::ALL
            .into_iter()
            .filter(|f| self.files.contains_key(f))
            .collect()
    }
}

/// Parley shaping state with the overlay families registered.
///
/// Also acts as the production [`TextMeasurer`]: widths come from the same shaping pass that
/// later produces the glyphs, so measured and drawn words always agree.
pub struct FontBook {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    faces: HashMap<FontFamily, LoadedFace>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("families", &self.families())
            .finish()
    }
}

impl FontBook {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: HashMap::new(),
        }
    }

    /// Register every file of `lib`.
    pub fn from_library(lib: &FontLibrary) -> ThumbResult<Self> {
        let mut book = Self::new();
        for family in lib.families() {
            if let Some(bytes) = lib.files.get(&family) {
                book.register(family, bytes.to_vec())?;
            }
        }
        Ok(book)
    }

    /// Register raw font bytes for `family`, replacing any earlier face.
    pub fn register(&mut self, family: FontFamily, bytes: Vec<u8>) -> ThumbResult<()> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ThumbError::asset("no font families registered from font bytes"))?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ThumbError::asset("registered font family has no name"))?
            .to_string();

        let data = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
        self.faces.insert(family, LoadedFace { family_name, data });
        Ok(())
    }

    /// Return `true` when a face is registered for `family`.
    pub fn has(&self, family: FontFamily) -> bool {
        self.faces.contains_key(&family)
    }

    /// Registered families, in editor order.
    pub fn families(&self) -> Vec<FontFamily> {
        FontFamily::ALL
            .into_iter()
            .filter(|f| self.faces.contains_key(f))
            .collect()
    }

    /// Shape `word` in `family` at `size_px`.
    pub(crate) fn shape(
        &mut self,
        word: &str,
        family: FontFamily,
        size_px: f64,
    ) -> ThumbResult<ShapedWord> {
        let size = size_px as f32;
        if !size.is_finite() || size <= 0.0 {
            return Err(ThumbError::validation("font size must be finite and > 0"));
        }
        let face = self
            .faces
            .get(&family)
            .cloned()
            .ok_or_else(|| ThumbError::asset(format!("font '{}' is not loaded", family.name())))?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, word, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(face.family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::BLACK,
        ));
        let mut layout: parley::Layout<()> = builder.build(word);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        let (mut baseline, mut ascent, mut descent) = (0.0, 0.0, 0.0);
        if let Some(line) = layout.lines().next() {
            let m = line.metrics();
            baseline = m.baseline;
            ascent = m.ascent;
            descent = m.descent;
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }

        Ok(ShapedWord {
            glyphs,
            advance: layout.width(),
            baseline,
            ascent,
            descent,
            font: face.data,
        })
    }
}

impl TextMeasurer for FontBook {
    fn measure(&mut self, word: &str, font: FontFamily, size_px: f64) -> f64 {
        match self.shape(word, font, size_px) {
            Ok(shaped) => f64::from(shaped.advance),
            Err(e) => {
                tracing::debug!(error = %e, word, "measure failed; treating word as zero-width");
                0.0
            }
        }
    }
}

fn find_face_file(dir: &Path, family: FontFamily) -> Option<PathBuf> {
    WEIGHT_SUFFIXES.iter().find_map(|suffix| {
        EXTENSIONS.iter().find_map(|ext| {
            let p = dir.join(format!("{}{suffix}.{ext}", family.file_stem()));
            p.is_file().then_some(p)
        })
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
