use std::path::PathBuf;
use std::time::Duration;

use crate::foundation::core::Canvas;

/// Default quiet period before an option edit triggers a re-render.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Runtime settings for [`crate::RenderPipeline`] and the CPU compositor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Output surface size.
    pub canvas: Canvas,
    /// Debounce applied to text-option edits.
    pub debounce: Duration,
    /// Directory searched for the overlay font files.
    pub fonts_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::THUMBNAIL,
            debounce: DEFAULT_DEBOUNCE,
            fonts_dir: PathBuf::from("fonts"),
        }
    }
}

impl PipelineConfig {
    /// Defaults, overridden by `THUMBCRAFT_DEBOUNCE_MS` and `THUMBCRAFT_FONTS_DIR` when set.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Unparsable values are ignored.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(ms) = lookup("THUMBCRAFT_DEBOUNCE_MS").and_then(|v| v.trim().parse::<u64>().ok())
        {
            self.debounce = Duration::from_millis(ms);
        }
        if let Some(dir) = lookup("THUMBCRAFT_FONTS_DIR").filter(|v| !v.trim().is_empty()) {
            self.fonts_dir = PathBuf::from(dir);
        }
        self
    }
}
