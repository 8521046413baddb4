use std::cell::RefCell;
use std::collections::HashMap;

use super::*;

/// Backend whose behaviour per credential is scripted up front.
#[derive(Default)]
struct ScriptedBackend {
    failures: HashMap<String, String>,
    images: usize,
    calls: RefCell<Vec<String>>,
}

impl ScriptedBackend {
    fn failing(mut self, key: &str, msg: &str) -> Self {
        self.failures.insert(key.to_string(), msg.to_string());
        self
    }

    fn check(&self, credential: &str) -> ThumbResult<()> {
        self.calls.borrow_mut().push(credential.to_string());
        match self.failures.get(credential) {
            Some(msg) => Err(ThumbError::backend(msg.clone())),
            None => Ok(()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

fn analysis() -> AnalysisResult {
    AnalysisResult {
        summary: "s".to_string(),
        titles: Vec::new(),
        description: "d".to_string(),
        tags: vec!["t".to_string()],
        hashtags: Vec::new(),
        sources: None,
    }
}

impl ContentBackend for ScriptedBackend {
    fn analyze(&self, credential: &str, _article: &str, _g: bool) -> ThumbResult<AnalysisResult> {
        self.check(credential)?;
        Ok(analysis())
    }

    fn generate_background(
        &self,
        credential: &str,
        _summary: &str,
        _style: ArtStyle,
    ) -> ThumbResult<Vec<EncodedImage>> {
        self.check(credential)?;
        Ok((0..self.images)
            .map(|i| EncodedImage::from_bytes(vec![i as u8]))
            .collect())
    }

    fn generate_short_titles(
        &self,
        credential: &str,
        summary: &str,
    ) -> ThumbResult<Vec<TitleSuggestion>> {
        self.check(credential)?;
        Ok(vec![TitleSuggestion {
            title: summary.to_string(),
            score: 70.0,
            reason: "r".to_string(),
        }])
    }

    fn generate_highlight_keyword(&self, credential: &str, title: &str) -> ThumbResult<String> {
        self.check(credential)?;
        Ok(title.split_whitespace().last().unwrap_or_default().to_string())
    }

    fn generate_script(
        &self,
        credential: &str,
        title: &str,
        _description: &str,
        tags: &[String],
        min_word_count: u32,
    ) -> ThumbResult<ScriptResult> {
        self.check(credential)?;
        Ok(ScriptResult {
            script: format!("{title} {}", tags.join(" ")),
            word_count: min_word_count,
            score: 90.0,
            reason: "r".to_string(),
        })
    }
}

fn store(keys: &[&str]) -> CredentialStore {
    CredentialStore::in_memory(keys.iter().map(|k| k.to_string()))
}

#[test]
fn no_credentials_fails_without_calling() {
    let mut creds = store(&[]);
    let mut called = false;
    let err = with_credential_retry(&mut creds, |_| {
        called = true;
        Ok(())
    })
    .unwrap_err();
    assert!(matches!(err, ThumbError::NoCredentials));
    assert!(!called);
}

#[test]
fn failure_rotates_and_retries_once() {
    let backend = ScriptedBackend::default().failing("k1", "quota exceeded");
    let mut studio = Studio::new(backend, store(&["k1", "k2"]));
    let titles = studio.short_titles("hello").unwrap();
    assert_eq!(titles[0].title, "hello");
    assert_eq!(studio.backend().calls(), ["k1", "k2"]);
    assert_eq!(studio.credentials().active(), Some("k2"));
}

#[test]
fn single_credential_surfaces_original_error() {
    let backend = ScriptedBackend::default().failing("only", "quota exceeded");
    let mut studio = Studio::new(backend, store(&["only"]));
    let err = studio.short_titles("x").unwrap_err();
    assert_eq!(err.to_string(), "backend error: quota exceeded");
    assert_eq!(studio.backend().calls(), ["only"]);
}

#[test]
fn content_policy_is_never_retried() {
    let backend = ScriptedBackend::default().failing("k1", "blocked by SAFETY filter");
    let mut studio = Studio::new(backend, store(&["k1", "k2"]));
    let err = studio.analyze("article", false).unwrap_err();
    assert!(matches!(err, ThumbError::ContentPolicy(_)));
    assert_eq!(studio.backend().calls(), ["k1"]);
    assert_eq!(studio.credentials().active(), Some("k1"));
}

#[test]
fn second_failure_is_surfaced() {
    let backend = ScriptedBackend::default()
        .failing("k1", "timeout")
        .failing("k2", "unavailable");
    let mut studio = Studio::new(backend, store(&["k1", "k2"]));
    let err = studio.highlight_keyword("some title").unwrap_err();
    assert_eq!(err.to_string(), "backend error: unavailable");
    assert_eq!(studio.backend().calls(), ["k1", "k2"]);
}

#[test]
fn backgrounds_are_capped_and_never_empty() {
    let backend = ScriptedBackend {
        images: 5,
        ..Default::default()
    };
    let mut studio = Studio::new(backend, store(&["k"]));
    let images = studio
        .generate_backgrounds("summary", ArtStyle::Cartoon)
        .unwrap();
    assert_eq!(images.len(), MAX_BACKGROUND_CANDIDATES);

}

#[test]
fn no_images_is_a_policy_failure_and_not_retried() {
    let mut studio = Studio::new(ScriptedBackend::default(), store(&["k1", "k2"]));
    let err = studio
        .generate_backgrounds("summary", ArtStyle::Realistic)
        .unwrap_err();
    assert!(matches!(err, ThumbError::ContentPolicy(_)));
    assert!(is_content_policy(&err));
    assert_eq!(studio.backend().calls(), ["k1"]);
    assert_eq!(studio.credentials().active(), Some("k1"));
}

#[test]
fn unsaved_rotation_still_retries_with_next_credential() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");
    let mut creds = CredentialStore::load(&path).unwrap();
    creds.add("k1").unwrap();
    creds.add("k2").unwrap();
    // A directory in place of the file makes every later save fail.
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();

    let backend = ScriptedBackend::default().failing("k1", "quota exceeded");
    let mut studio = Studio::new(backend, creds);
    let titles = studio.short_titles("hello").unwrap();
    assert_eq!(titles[0].title, "hello");
    assert_eq!(studio.backend().calls(), ["k1", "k2"]);
    assert_eq!(studio.credentials().active(), Some("k2"));
}

#[test]
fn unsaved_rotation_keeps_original_error_when_retry_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");
    let mut creds = CredentialStore::load(&path).unwrap();
    creds.add("only").unwrap();
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();

    let backend = ScriptedBackend::default().failing("only", "quota exceeded");
    let mut studio = Studio::new(backend, creds);
    let err = studio.short_titles("x").unwrap_err();
    assert_eq!(err.to_string(), "backend error: quota exceeded");
}

#[test]
fn input_checks_short_circuit() {
    let mut studio = Studio::new(ScriptedBackend::default(), store(&["k"]));
    assert_eq!(studio.highlight_keyword("   ").unwrap(), "");
    assert!(matches!(
        studio.analyze(" \n", true),
        Err(ThumbError::Validation(_))
    ));
    assert!(matches!(
        studio.script("t", &analysis(), 0),
        Err(ThumbError::Validation(_))
    ));
    assert!(studio.backend().calls().is_empty());

    let script = studio.script("title", &analysis(), 300).unwrap();
    assert_eq!(script.word_count, 300);
    assert_eq!(script.script, "title t");
}

#[test]
fn policy_detection_by_message() {
    assert!(is_content_policy(&ThumbError::backend("violates usage Policy")));
    assert!(is_content_policy(&ThumbError::content_policy("x")));
    assert!(!is_content_policy(&ThumbError::backend("rate limited")));
}
