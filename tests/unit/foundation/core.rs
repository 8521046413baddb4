use super::*;

#[test]
fn thumbnail_canvas_is_16_by_9() {
    let c = Canvas::THUMBNAIL;
    assert_eq!((c.width, c.height), (1280, 720));
    assert_eq!(c.width * 9, c.height * 16);
    assert_eq!(Canvas::default(), c);
}

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(1, 1).is_ok());
}

#[test]
fn width_budget_is_ninety_percent() {
    assert!((Canvas::THUMBNAIL.width_budget() - 1152.0).abs() < 1e-9);
}

#[test]
fn anchor_resolves_to_absolute_pixels() {
    let p = Canvas::THUMBNAIL.resolve(Anchor::new(0.25, 0.5));
    assert_eq!(p, Point::new(320.0, 360.0));
}

#[test]
fn anchor_clamping() {
    assert!(Anchor::CENTER.is_normalized());
    assert!(!Anchor::new(1.2, 0.0).is_normalized());
    assert_eq!(Anchor::new(1.2, -3.0).clamped(), Anchor::new(1.0, 0.0));
    assert_eq!(Anchor::new(f64::NAN, 0.3).clamped(), Anchor::new(0.5, 0.3));
}

