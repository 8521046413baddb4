use std::path::{Path, PathBuf};

use crate::foundation::error::ThumbResult;

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialFile {
    #[serde(default)]
    keys: Vec<String>,
    #[serde(default)]
    active_index: usize,
}

/// File-backed list of API credentials with a rotating active index.
///
/// Every mutation is written through to disk.
#[derive(Debug)]
pub struct CredentialStore {
    path: Option<PathBuf>,
    keys: Vec<String>,
    active: usize,
}

impl CredentialStore {
    /// Store that lives only in memory.
    pub fn in_memory(keys: impl IntoIterator<Item = String>) -> Self {
        let mut store = Self {
            path: None,
            keys: Vec::new(),
            active: 0,
        };
        for key in keys {
            let _ = store.push_unique(key);
        }
        store
    }

    /// Load from `path`. A missing or unreadable file yields an empty store bound to `path`.
    #[tracing::instrument]
    pub fn load(path: &Path) -> ThumbResult<Self> {
        let file: CredentialFile = super::read_json(path)?.unwrap_or_default();
        let mut store = Self::in_memory(file.keys);
        store.path = Some(path.to_path_buf());
        store.active = if store.keys.is_empty() {
            0
        } else {
            file.active_index % store.keys.len()
        };
        tracing::debug!(keys = store.keys.len(), active = store.active, "credentials loaded");
        Ok(store)
    }

    /// Like [`CredentialStore::load`], but an empty store starts with `fallback` as its only key.
    ///
    /// The seeded key is not written back until the store is next mutated.
    pub fn load_with_fallback(path: &Path, fallback: Option<String>) -> ThumbResult<Self> {
        let mut store = Self::load(path)?;
        if store.keys.is_empty()
            && let Some(key) = fallback
            && store.push_unique(key)
        {
            tracing::debug!("seeded credentials from fallback key");
        }
        Ok(store)
    }

    /// First non-empty value of `API_KEY`, then `GEMINI_API_KEY`, as returned by `lookup`.
    pub fn env_fallback(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        ["API_KEY", "GEMINI_API_KEY"]
            .into_iter()
            .filter_map(lookup)
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty())
    }

    /// Persist to the bound path. No-op for in-memory stores.
    pub fn save(&self) -> ThumbResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        super::write_json(
            path,
            &CredentialFile {
                keys: self.keys.clone(),
                active_index: self.active,
            },
        )
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Add `key`. Returns `false` (and changes nothing) for empty or duplicate keys.
    pub fn add(&mut self, key: &str) -> ThumbResult<bool> {
        if !self.push_unique(key.to_string()) {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Remove `key` if present. The active index resets to the first key when it falls off the
    /// end of the list.
    pub fn remove(&mut self, key: &str) -> ThumbResult<bool> {
        let before = self.keys.len();
        self.keys.retain(|k| k != key);
        if self.keys.len() == before {
            return Ok(false);
        }
        if self.active >= self.keys.len() {
            self.active = 0;
        }
        self.save()?;
        Ok(true)
    }

    /// Credential to use for the next call.
    pub fn active(&self) -> Option<&str> {
        self.keys.get(self.active).map(String::as_str)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Advance to the next credential (wrapping) and return it.
    pub fn rotate(&mut self) -> ThumbResult<Option<&str>> {
        if self.keys.is_empty() {
            return Ok(None);
        }
        self.active = (self.active + 1) % self.keys.len();
        self.save()?;
        tracing::warn!(index = self.active, "switched to next credential");
        Ok(self.active())
    }

    fn push_unique(&mut self, key: String) -> bool {
        if key.is_empty() || self.keys.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/credentials.rs"]
mod tests;
