use std::sync::{Arc, Mutex};

use crate::{
    assets::{
        fonts::{FontBook, FontLibrary},
        raster::{EncodedImage, PreparedImage, decode_image, encode_png},
    },
    foundation::{
        core::{Affine, Canvas},
        error::{ThumbError, ThumbResult},
    },
    layout::engine::{PlacedWord, layout_text},
    render::backend::Compositor,
    style::{color::Color, options::TextOptions},
};

/// Stroke width as a fraction of the word's effective font size.
const STROKE_WIDTH_EM: f64 = 1.0 / 8.0;

/// Idle font books kept for reuse once a render returns its book.
const MAX_IDLE_BOOKS: usize = 4;

/// CPU compositor built on `vello_cpu`.
///
/// Shaping state is not `Sync`, so each render borrows a [`FontBook`] from a small pool and
/// hands it back afterwards. A render that never returns simply keeps its book; later renders
/// build a fresh one from the shared [`FontLibrary`].
pub struct CpuCompositor {
    canvas: Canvas,
    fonts: Arc<FontLibrary>,
    idle_books: Mutex<Vec<FontBook>>,
}

impl std::fmt::Debug for CpuCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuCompositor")
            .field("canvas", &self.canvas)
            .field("families", &self.fonts.families())
            .finish()
    }
}

impl CpuCompositor {
    pub fn new(canvas: Canvas, fonts: Arc<FontLibrary>) -> ThumbResult<Self> {
        surface_dims(canvas)?;
        Ok(Self {
            canvas,
            fonts,
            idle_books: Mutex::new(Vec::new()),
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    fn checkout_book(&self) -> ThumbResult<FontBook> {
        let pooled = self
            .idle_books
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop();
        match pooled {
            Some(book) => Ok(book),
            None => FontBook::from_library(&self.fonts),
        }
    }

    fn checkin_book(&self, book: FontBook) {
        let mut idle = self
            .idle_books
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if idle.len() < MAX_IDLE_BOOKS {
            idle.push(book);
        }
    }
}

impl Compositor for CpuCompositor {
    #[tracing::instrument(skip_all, fields(font = options.font.name(), chars = options.text.chars().count()))]
    fn composite(
        &self,
        background: &EncodedImage,
        options: &TextOptions,
    ) -> ThumbResult<EncodedImage> {
        if !self.fonts.has(options.font) {
            return Err(ThumbError::asset(format!(
                "font '{}' is not loaded",
                options.font.name()
            )));
        }
        let bg = decode_image(background)?;

        let mut book = self.checkout_book()?;
        let drawn = draw(self.canvas, &bg, options, &mut book);
        self.checkin_book(book);
        let pixmap = drawn?;

        encode_png(
            self.canvas.width,
            self.canvas.height,
            pixmap.data_as_u8_slice(),
        )
    }
}

fn draw(
    canvas: Canvas,
    bg: &PreparedImage,
    options: &TextOptions,
    book: &mut FontBook,
) -> ThumbResult<vello_cpu::Pixmap> {
    let (w, h) = surface_dims(canvas)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);

    draw_background(&mut ctx, canvas, bg)?;

    let layout = layout_text(canvas, options, book);
    tracing::debug!(lines = layout.lines.len(), "layout done");
    for word in layout.words() {
        draw_word(&mut ctx, book, options, word)?;
    }

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap)
}

/// Stretch the background over the whole surface.
fn draw_background(
    ctx: &mut vello_cpu::RenderContext,
    canvas: Canvas,
    bg: &PreparedImage,
) -> ThumbResult<()> {
    let pixmap = premul_bytes_to_pixmap(bg)?;
    let paint = vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    };

    let (bw, bh) = (f64::from(bg.width), f64::from(bg.height));
    let scale = Affine::scale_non_uniform(
        f64::from(canvas.width) / bw,
        f64::from(canvas.height) / bh,
    );
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(affine_to_cpu(scale));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, bw, bh));
    Ok(())
}

/// Outline first, then fill, so the stroke sits behind the glyph body.
fn draw_word(
    ctx: &mut vello_cpu::RenderContext,
    book: &mut FontBook,
    options: &TextOptions,
    word: &PlacedWord,
) -> ThumbResult<()> {
    let shaped = book.shape(&word.text, options.font, word.font_size)?;
    let y = shaped.middle_offset(word.center_y);
    ctx.set_transform(affine_to_cpu(Affine::translate((word.x, y))));

    let size = word.font_size as f32;
    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(word.font_size * STROKE_WIDTH_EM));
    ctx.set_paint(paint_color(options.stroke_color));
    ctx.glyph_run(&shaped.font)
        .font_size(size)
        .stroke_glyphs(shaped.glyphs.iter().copied());

    let fill = if word.highlighted {
        options.highlight_color
    } else {
        options.text_color
    };
    ctx.set_paint(paint_color(fill));
    ctx.glyph_run(&shaped.font)
        .font_size(size)
        .fill_glyphs(shaped.glyphs.iter().copied());
    Ok(())
}

fn paint_color(c: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn surface_dims(canvas: Canvas) -> ThumbResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| ThumbError::render("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| ThumbError::render("canvas height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(ThumbError::render("canvas dimensions must be > 0"));
    }
    Ok((w, h))
}

fn premul_bytes_to_pixmap(img: &PreparedImage) -> ThumbResult<vello_cpu::Pixmap> {
    let w: u16 = img
        .width
        .try_into()
        .map_err(|_| ThumbError::asset("background width exceeds u16"))?;
    let h: u16 = img
        .height
        .try_into()
        .map_err(|_| ThumbError::asset("background height exceeds u16"))?;
    if img.rgba8_premul.len() != img.width as usize * img.height as usize * 4 {
        return Err(ThumbError::asset("decoded background byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels = img
        .rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
