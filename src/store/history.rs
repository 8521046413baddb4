use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::foundation::error::ThumbResult;
use crate::studio::model::AnalysisResult;

/// One saved analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Creation time in unix milliseconds, as a string.
    pub id: String,
    pub date: DateTime<Utc>,
    pub article: String,
    pub analysis_result: AnalysisResult,
}

/// File-backed analysis history, kept newest first.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Load from `path`. A missing or unreadable file yields an empty history.
    #[tracing::instrument]
    pub fn load(path: &Path) -> ThumbResult<Self> {
        let mut entries: Vec<HistoryEntry> = super::read_json(path)?.unwrap_or_default();
        sort_newest_first(&mut entries);
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Record an analysis dated now.
    pub fn add(&mut self, article: &str, result: AnalysisResult) -> ThumbResult<&HistoryEntry> {
        self.add_at(article, result, Utc::now())
    }

    /// Record an analysis dated `now`.
    pub fn add_at(
        &mut self,
        article: &str,
        result: AnalysisResult,
        now: DateTime<Utc>,
    ) -> ThumbResult<&HistoryEntry> {
        let mut millis = now.timestamp_millis();
        while self.get(&millis.to_string()).is_some() {
            millis += 1;
        }
        let id = millis.to_string();
        self.entries.push(HistoryEntry {
            id: id.clone(),
            date: now,
            article: article.to_string(),
            analysis_result: result,
        });
        self.save()?;

        let idx = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .unwrap_or_default();
        Ok(&self.entries[idx])
    }

    pub fn remove(&mut self, id: &str) -> ThumbResult<bool> {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    pub fn clear(&mut self) -> ThumbResult<()> {
        self.entries.clear();
        self.save()
    }

    fn save(&mut self) -> ThumbResult<()> {
        sort_newest_first(&mut self.entries);
        super::write_json(&self.path, &self.entries)
    }
}

fn sort_newest_first(entries: &mut [HistoryEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
#[path = "../../tests/unit/store/history.rs"]
mod tests;
