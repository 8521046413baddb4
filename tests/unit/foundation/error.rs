use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ThumbError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ThumbError::asset("x").to_string().contains("asset error:"));
    assert!(ThumbError::render("x").to_string().contains("render error:"));
    assert!(ThumbError::encode("x").to_string().contains("encode error:"));
    assert!(ThumbError::store("x").to_string().contains("store error:"));
    assert!(
        ThumbError::backend("x")
            .to_string()
            .contains("backend error:")
    );
    assert!(
        ThumbError::content_policy("x")
            .to_string()
            .contains("content policy violation:")
    );
    assert!(ThumbError::parse("x").to_string().contains("parse error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ThumbError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
