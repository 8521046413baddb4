/// API credential list with an active index.
pub mod credentials;
/// Past analyses, newest first.
pub mod history;

use std::path::Path;

use crate::foundation::error::{ThumbError, ThumbResult};

/// Read a JSON document, returning `None` when the file does not exist.
///
/// A file that exists but fails to parse is logged and treated as absent.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> ThumbResult<Option<T>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ThumbError::store(format!(
                "read '{}': {e}",
                path.display()
            )));
        }
    };
    match serde_json::from_str(&text) {
        Ok(v) => Ok(Some(v)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable store file");
            Ok(None)
        }
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> ThumbResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| ThumbError::store(format!("create '{}': {e}", parent.display())))?;
    }
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ThumbError::store(format!("serialize: {e}")))?;
    std::fs::write(path, text)
        .map_err(|e| ThumbError::store(format!("write '{}': {e}", path.display())))
}
