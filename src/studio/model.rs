use serde::{Deserialize, Serialize};

/// One suggested video title with its scroll-stopping score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TitleSuggestion {
    pub title: String,
    /// Score out of 100.
    pub score: f64,
    pub reason: String,
}

/// Web page cited by a grounded analysis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub web: WebSource,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    pub uri: String,
    pub title: String,
}

/// Metadata package derived from an article.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// One-sentence visual brief used to prompt background generation.
    pub summary: String,
    pub titles: Vec<TitleSuggestion>,
    pub description: String,
    pub tags: Vec<String>,
    pub hashtags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<GroundingSource>>,
}

/// Voiceover script with its self-assessment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptResult {
    pub script: String,
    pub word_count: u32,
    pub score: f64,
    pub reason: String,
}

/// Rendering style requested for generated backgrounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtStyle {
    #[default]
    Realistic,
    Artistic,
    Minimalist,
    Cartoon,
}

impl ArtStyle {
    pub const ALL: [ArtStyle; 4] = [
        ArtStyle::Realistic,
        ArtStyle::Artistic,
        ArtStyle::Minimalist,
        ArtStyle::Cartoon,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ArtStyle::Realistic => "Realistic",
            ArtStyle::Artistic => "Artistic",
            ArtStyle::Minimalist => "Minimalist",
            ArtStyle::Cartoon => "Cartoon",
        }
    }
}

impl std::fmt::Display for ArtStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
