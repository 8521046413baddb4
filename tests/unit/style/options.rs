use super::*;
use serde_json::json;

#[test]
fn defaults_match_editor_initial_state() {
    let o = TextOptions::default();
    assert!(o.text.is_empty());
    assert_eq!(o.anchor, Anchor::new(0.5, 0.5));
    assert_eq!(o.align, TextAlign::Center);
    assert_eq!(o.font, FontFamily::Cairo);
    assert_eq!(o.font_size, 72.0);
    assert_eq!(o.text_color, Color::WHITE);
    assert_eq!(o.stroke_color, Color::BLACK);
    assert_eq!(o.highlight_color, Color::YELLOW);
    assert_eq!(o.highlight_scale, 1.2);
    assert_eq!(o.line_height_scale, 1.2);
    o.validate().unwrap();
}

#[test]
fn deserializes_camel_case_with_position_alias() {
    let o: TextOptions = serde_json::from_value(json!({
        "text": "مرحبا",
        "position": {"x": 0.2, "y": 0.8},
        "align": "right",
        "font": "Reem Kufi",
        "fontSize": 96,
        "highlightedWords": ["مرحبا"],
        "highlightColor": "#FF0000"
    }))
    .unwrap();
    assert_eq!(o.anchor, Anchor::new(0.2, 0.8));
    assert_eq!(o.align, TextAlign::Right);
    assert_eq!(o.font, FontFamily::ReemKufi);
    assert_eq!(o.font_size, 96.0);
    assert_eq!(o.highlight_color, Color::rgb(255, 0, 0));
    // Unspecified fields fall back to defaults.
    assert_eq!(o.line_height_scale, 1.2);
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut o = TextOptions::default();
    o.font_size = 8.0;
    assert!(o.validate().is_err());

    let mut o = TextOptions::default();
    o.line_height_scale = f64::NAN;
    assert!(o.validate().is_err());

    let mut o = TextOptions::default();
    o.highlight_scale = 3.0;
    assert!(o.validate().is_err());

    let mut o = TextOptions::default();
    o.anchor = Anchor::new(1.5, 0.5);
    assert!(o.validate().is_err());
}

#[test]
fn alignment_flow_direction() {
    assert!(TextAlign::Right.flows_right_to_left());
    assert!(TextAlign::Center.flows_right_to_left());
    assert!(!TextAlign::Left.flows_right_to_left());
}

#[test]
fn toggle_highlight_adds_then_removes() {
    let o = TextOptions::with_text("سر الذكاء");
    let on = o.toggle_highlight("الذكاء");
    assert_eq!(on.highlighted_words, vec!["الذكاء".to_string()]);
    let off = on.toggle_highlight("الذكاء");
    assert!(off.highlighted_words.is_empty());
    // The original value is never mutated.
    assert!(o.highlighted_words.is_empty());
}

#[test]
fn with_title_resets_highlights() {
    let o = TextOptions::default().toggle_highlight("old");
    let t = o.with_title("new title", Some("  title "));
    assert_eq!(t.text, "new title");
    assert_eq!(t.highlighted_words, vec!["title".to_string()]);
    let t = o.with_title("x", Some("   "));
    assert!(t.highlighted_words.is_empty());
    let t = o.with_title("x", None);
    assert!(t.highlighted_words.is_empty());
}

#[test]
fn blank_text_detection() {
    assert!(TextOptions::with_text("").is_blank());
    assert!(TextOptions::with_text(" \n\t ").is_blank());
    assert!(!TextOptions::with_text("a").is_blank());
}

#[test]
fn highlight_candidates_dedupes_and_skips_short_tokens() {
    let c = highlight_candidates("the AI is the future\nof AI  tooling the");
    assert_eq!(c, vec!["the", "future", "tooling"]);
}

#[test]
fn with_anchor_clamps() {
    let o = TextOptions::default().with_anchor(Anchor::new(-1.0, 2.0));
    assert_eq!(o.anchor, Anchor::new(0.0, 1.0));
}

#[test]
fn font_family_names_and_stems() {
    assert_eq!(FontFamily::ReemKufi.name(), "Reem Kufi");
    assert_eq!(FontFamily::ReemKufi.file_stem(), "ReemKufi");
    assert_eq!(FontFamily::ALL.len(), 6);
}
