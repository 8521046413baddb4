use serde::de::DeserializeOwned;

use crate::foundation::error::{ThumbError, ThumbResult};
use crate::studio::model::{AnalysisResult, GroundingSource, ScriptResult, TitleSuggestion};

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Body of the first fenced ```` ```json ```` block in `text`, or the whole text when there is
/// no complete fence. Surrounding whitespace is trimmed either way.
pub fn extract_json_payload(text: &str) -> &str {
    if let Some(start) = text.find(JSON_FENCE) {
        let body = &text[start + JSON_FENCE.len()..];
        if let Some(end) = body.find(FENCE) {
            return body[..end].trim();
        }
    }
    text.trim()
}

fn decode<T: DeserializeOwned>(what: &str, text: &str) -> ThumbResult<T> {
    let payload = extract_json_payload(text);
    serde_json::from_str(payload).map_err(|e| {
        tracing::debug!(what, payload, "malformed backend payload");
        ThumbError::parse(format!("{what}: {e}"))
    })
}

/// Decode an analysis response. `sources` from grounding metadata replace any in the payload.
pub fn parse_analysis(text: &str, sources: Vec<GroundingSource>) -> ThumbResult<AnalysisResult> {
    let mut result: AnalysisResult = decode("analysis", text)?;
    if !sources.is_empty() || result.sources.is_none() {
        result.sources = Some(sources);
    }
    Ok(result)
}

pub fn parse_titles(text: &str) -> ThumbResult<Vec<TitleSuggestion>> {
    decode("titles", text)
}

pub fn parse_script(text: &str) -> ThumbResult<ScriptResult> {
    decode("script", text)
}

/// Decode `{"keyword": "..."}`. A missing or null keyword yields an empty string.
pub fn parse_highlight_keyword(text: &str) -> ThumbResult<String> {
    #[derive(serde::Deserialize)]
    struct Keyword {
        #[serde(default)]
        keyword: Option<String>,
    }
    let k: Keyword = decode("highlight keyword", text)?;
    Ok(k.keyword.map(|s| s.trim().to_string()).unwrap_or_default())
}

#[cfg(test)]
#[path = "../../tests/unit/studio/json.rs"]
mod tests;
