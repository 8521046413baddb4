//! Thumbcraft renders thumbnail text overlays.
//!
//! The core is a pure layout engine (wrapping under a width budget, per-word highlight sizing,
//! right-to-left and left-to-right flow, vertical centering around a normalized anchor) and a
//! debounced, cancelable re-render pipeline around a CPU compositor:
//!
//! - Describe the overlay with [`TextOptions`]
//! - Lay it out with [`layout_text`], or composite it with a [`CpuCompositor`]
//! - Drive live edits through a [`RenderPipeline`]
//!
//! Credential and history stores plus the [`ContentBackend`] contract cover the rest of the
//! content package workflow.
#![forbid(unsafe_code)]

mod assets;
mod config;
mod foundation;
mod layout;
mod render;
mod store;
mod studio;
mod style;

pub use crate::foundation::core::{Affine, Anchor, Canvas, Point};
pub use crate::foundation::error::{ThumbError, ThumbResult};

pub use crate::assets::fonts::{FontBook, FontLibrary};
pub use crate::assets::raster::EncodedImage;
pub use crate::config::{DEFAULT_DEBOUNCE, PipelineConfig};
pub use crate::layout::engine::{
    HighlightMatcher, LayoutLine, PlacedWord, TextLayout, WORD_SPACE_EM, layout_text,
};
pub use crate::layout::measure::{FixedAdvanceMeasurer, TextMeasurer};
pub use crate::render::backend::{Compositor, RenderOutput};
pub use crate::render::cpu::CpuCompositor;
pub use crate::render::pipeline::{
    EVENT_QUEUE_CAPACITY, PipelineEvent, PipelineSnapshot, RenderPipeline,
};
pub use crate::render::scheduler::{RenderJob, Scheduler, SchedulerState, Transition};
pub use crate::store::credentials::CredentialStore;
pub use crate::store::history::{HistoryEntry, HistoryStore};
pub use crate::studio::backend::{
    ContentBackend, MAX_BACKGROUND_CANDIDATES, Studio, is_content_policy, with_credential_retry,
};
pub use crate::studio::json::{
    extract_json_payload, parse_analysis, parse_highlight_keyword, parse_script, parse_titles,
};
pub use crate::studio::model::{
    AnalysisResult, ArtStyle, GroundingSource, ScriptResult, TitleSuggestion, WebSource,
};
pub use crate::style::color::Color;
pub use crate::style::options::{
    FONT_SIZE_RANGE, FontFamily, HIGHLIGHT_SCALE_RANGE, LINE_HEIGHT_SCALE_RANGE, TextAlign,
    TextOptions, highlight_candidates,
};
pub use crate::style::preset::StylePreset;
