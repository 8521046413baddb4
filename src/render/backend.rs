use crate::assets::raster::EncodedImage;
use crate::foundation::error::ThumbResult;
use crate::style::options::TextOptions;

/// Rasterizes a text overlay onto a background.
///
/// Implementations are shared by every in-flight render, so they take `&self` and must be
/// thread-safe. Each call starts from a blank surface; nothing is carried between calls.
pub trait Compositor: Send + Sync + 'static {
    /// Draw `options` over `background` and return the encoded composite.
    fn composite(
        &self,
        background: &EncodedImage,
        options: &TextOptions,
    ) -> ThumbResult<EncodedImage>;
}

/// What the view layer should show.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RenderOutput {
    /// No background has been supplied yet.
    #[default]
    NoImage,
    /// The unmodified background (empty text, or a failed composite).
    Background(EncodedImage),
    /// A successfully encoded composite.
    Composite(EncodedImage),
}

impl RenderOutput {
    /// Encoded image to display, if any.
    pub fn image(&self) -> Option<&EncodedImage> {
        match self {
            Self::NoImage => None,
            Self::Background(img) | Self::Composite(img) => Some(img),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }
}
