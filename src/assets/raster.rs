use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::{ThumbError, ThumbResult};

/// An encoded raster image (PNG, JPEG or WebP bytes).
///
/// Cloning is cheap; the payload is shared.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Arc<[u8]>,
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("len", &self.bytes.len())
            .field("format", &self.format())
            .finish()
    }
}

impl EncodedImage {
    /// Wrap already-encoded bytes. The payload is not decoded until it is composited.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Read an encoded image from disk.
    pub fn from_path(path: &Path) -> ThumbResult<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| ThumbError::asset(format!("read '{}': {e}", path.display())))?;
        Ok(Self::from_bytes(bytes))
    }

    /// Borrow the encoded payload.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Return `true` when both values share the same payload allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }

    /// Container format sniffed from the payload's magic bytes.
    pub fn format(&self) -> Option<image::ImageFormat> {
        image::guess_format(&self.bytes).ok()
    }

    /// Write the payload to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> ThumbResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        std::fs::write(path, &self.bytes)
            .with_context(|| format!("write image '{}'", path.display()))?;
        Ok(())
    }
}

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub(crate) struct PreparedImage {
    /// Width in pixels.
    pub(crate) width: u32,
    /// Height in pixels.
    pub(crate) height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub(crate) rgba8_premul: Arc<Vec<u8>>,
}

/// Decode an encoded payload into premultiplied RGBA8.
pub(crate) fn decode_image(img: &EncodedImage) -> ThumbResult<PreparedImage> {
    let dyn_img = image::load_from_memory(img.bytes())
        .map_err(|e| ThumbError::asset(format!("decode background image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ThumbError::asset("background image has zero size"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Encode premultiplied RGBA8 pixels as PNG.
pub(crate) fn encode_png(width: u32, height: u32, rgba8_premul: &[u8]) -> ThumbResult<EncodedImage> {
    let mut straight = rgba8_premul.to_vec();
    demultiply_rgba8_in_place(&mut straight);
    let buf = image::RgbaImage::from_raw(width, height, straight)
        .ok_or_else(|| ThumbError::encode("pixel buffer does not match surface size"))?;

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(buf)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| ThumbError::encode(format!("png: {e}")))?;
    Ok(EncodedImage::from_bytes(out))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        let unpremul = |c: u8| -> u8 { ((c as u16 * 255 + a / 2) / a).min(255) as u8 };
        px[0] = unpremul(px[0]);
        px[1] = unpremul(px[1]);
        px[2] = unpremul(px[2]);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/raster.rs"]
mod tests;
