use crate::assets::raster::EncodedImage;
use crate::foundation::error::{ThumbError, ThumbResult};
use crate::store::credentials::CredentialStore;
use crate::studio::model::{AnalysisResult, ArtStyle, ScriptResult, TitleSuggestion};

/// Upper bound on background candidates kept from one generation call.
pub const MAX_BACKGROUND_CANDIDATES: usize = 3;

/// Generative content collaborator.
///
/// Every call takes the credential to use explicitly; credential choice and retry live in
/// [`with_credential_retry`].
pub trait ContentBackend {
    /// Derive summary, titles, description, tags and hashtags from `article`.
    fn analyze(
        &self,
        credential: &str,
        article: &str,
        use_search_grounding: bool,
    ) -> ThumbResult<AnalysisResult>;

    fn generate_background(
        &self,
        credential: &str,
        summary: &str,
        style: ArtStyle,
    ) -> ThumbResult<Vec<EncodedImage>>;

    fn generate_short_titles(
        &self,
        credential: &str,
        summary: &str,
    ) -> ThumbResult<Vec<TitleSuggestion>>;

    /// Single word (or two-word phrase) of `title` worth highlighting.
    fn generate_highlight_keyword(&self, credential: &str, title: &str) -> ThumbResult<String>;

    fn generate_script(
        &self,
        credential: &str,
        title: &str,
        description: &str,
        tags: &[String],
        min_word_count: u32,
    ) -> ThumbResult<ScriptResult>;
}

/// Return `true` for failures that another credential cannot fix.
pub fn is_content_policy(err: &ThumbError) -> bool {
    if matches!(err, ThumbError::ContentPolicy(_)) {
        return true;
    }
    let msg = err.to_string().to_lowercase();
    msg.contains("safety") || msg.contains("policy")
}

/// Run `call` with the active credential, retrying once with the next one on failure.
///
/// Content-policy failures are returned as [`ThumbError::ContentPolicy`] without a retry. When
/// rotation yields no different credential the original failure is returned.
pub fn with_credential_retry<T>(
    store: &mut CredentialStore,
    mut call: impl FnMut(&str) -> ThumbResult<T>,
) -> ThumbResult<T> {
    let first = store
        .active()
        .map(str::to_string)
        .ok_or(ThumbError::NoCredentials)?;

    let err = match call(&first) {
        Ok(v) => return Ok(v),
        Err(e) => e,
    };
    if is_content_policy(&err) {
        return Err(match err {
            ThumbError::ContentPolicy(_) => err,
            other => ThumbError::content_policy(other.to_string()),
        });
    }
    tracing::warn!(error = %err, "backend call failed; trying next credential");

    let rotated = match store.rotate().map(|next| next.map(str::to_string)) {
        Ok(next) => next,
        Err(save_err) => {
            tracing::warn!(error = %save_err, "could not persist credential rotation");
            store.active().map(str::to_string)
        }
    };
    let next = match rotated {
        Some(next) if next != first => next,
        _ => return Err(err),
    };
    call(&next).inspect_err(|e| {
        tracing::warn!(error = %e, "backend call failed again after switching credential");
    })
}

/// Content backend paired with the credential store it draws from.
#[derive(Debug)]
pub struct Studio<B> {
    backend: B,
    credentials: CredentialStore,
}

impl<B: ContentBackend> Studio<B> {
    pub fn new(backend: B, credentials: CredentialStore) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn credentials_mut(&mut self) -> &mut CredentialStore {
        &mut self.credentials
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[tracing::instrument(skip(self, article), fields(chars = article.chars().count()))]
    pub fn analyze(&mut self, article: &str, use_search_grounding: bool) -> ThumbResult<AnalysisResult> {
        if article.trim().is_empty() {
            return Err(ThumbError::validation("article text is empty"));
        }
        let backend = &self.backend;
        with_credential_retry(&mut self.credentials, |key| {
            backend.analyze(key, article, use_search_grounding)
        })
    }

    /// Generate background candidates, keeping at most [`MAX_BACKGROUND_CANDIDATES`].
    ///
    /// An empty result means the images were filtered out and is reported as
    /// [`ThumbError::ContentPolicy`], so it is not retried with another credential.
    pub fn generate_backgrounds(
        &mut self,
        summary: &str,
        style: ArtStyle,
    ) -> ThumbResult<Vec<EncodedImage>> {
        let backend = &self.backend;
        let mut images = with_credential_retry(&mut self.credentials, |key| {
            let images = backend.generate_background(key, summary, style)?;
            if images.is_empty() {
                return Err(ThumbError::content_policy(
                    "image generation returned no images; try a more neutral summary",
                ));
            }
            Ok(images)
        })?;
        images.truncate(MAX_BACKGROUND_CANDIDATES);
        Ok(images)
    }

    pub fn short_titles(&mut self, summary: &str) -> ThumbResult<Vec<TitleSuggestion>> {
        let backend = &self.backend;
        with_credential_retry(&mut self.credentials, |key| {
            backend.generate_short_titles(key, summary)
        })
    }

    /// Keyword to highlight in `title`. A blank title yields an empty keyword without a call.
    pub fn highlight_keyword(&mut self, title: &str) -> ThumbResult<String> {
        if title.trim().is_empty() {
            return Ok(String::new());
        }
        let backend = &self.backend;
        with_credential_retry(&mut self.credentials, |key| {
            backend.generate_highlight_keyword(key, title)
        })
    }

    pub fn script(
        &mut self,
        title: &str,
        analysis: &AnalysisResult,
        min_word_count: u32,
    ) -> ThumbResult<ScriptResult> {
        if min_word_count == 0 {
            return Err(ThumbError::validation("minimum word count must be > 0"));
        }
        let backend = &self.backend;
        with_credential_retry(&mut self.credentials, |key| {
            backend.generate_script(
                key,
                title,
                &analysis.description,
                &analysis.tags,
                min_word_count,
            )
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/studio/backend.rs"]
mod tests;
