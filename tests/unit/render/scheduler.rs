use super::*;
use crate::foundation::error::ThumbError;

const DEBOUNCE: Duration = Duration::from_millis(150);

fn bg() -> EncodedImage {
    EncodedImage::from_bytes(vec![1, 2, 3])
}

fn composite(tag: u8) -> EncodedImage {
    EncodedImage::from_bytes(vec![tag])
}

fn opts(text: &str) -> Arc<TextOptions> {
    Arc::new(TextOptions::with_text(text))
}

fn started(t: Transition) -> RenderJob {
    match t {
        Transition::Started(job) => job,
        other => panic!("expected a started render, got {other:?}"),
    }
}

#[test]
fn without_background_output_is_no_image() {
    let mut s = Scheduler::with_options(DEBOUNCE, TextOptions::with_text("hi"));
    assert!(matches!(s.set_background(None), Transition::Committed));
    assert_eq!(s.output(), &RenderOutput::NoImage);
    assert!(!s.is_rendering());
    assert_eq!(s.state(), SchedulerState::Idle);
}

#[test]
fn blank_text_shows_background_without_rendering() {
    for text in ["", "  \n\t "] {
        let mut s = Scheduler::with_options(DEBOUNCE, TextOptions::with_text(text));
        let image = bg();
        assert!(matches!(
            s.set_background(Some(image.clone())),
            Transition::Committed
        ));
        assert!(matches!(s.output(), RenderOutput::Background(b) if b.ptr_eq(&image)));
        assert!(!s.is_rendering());
    }
}

#[test]
fn background_change_starts_render_immediately_with_settled_options() {
    let mut s = Scheduler::with_options(DEBOUNCE, TextOptions::with_text("settled"));
    let t0 = Instant::now();
    s.set_options(opts("still typing"), t0);

    let job = started(s.set_background(Some(bg())));
    assert_eq!(job.options.text, "settled");
    assert_eq!(job.token, 1);
    assert!(s.is_rendering());
    assert_eq!(s.state(), SchedulerState::Rendering { token: 1 });
    // The pending edit is still waiting for its own deadline.
    assert_eq!(s.next_deadline(), Some(t0 + DEBOUNCE));
}

#[test]
fn option_edits_are_debounced_from_the_last_edit() {
    let mut s = Scheduler::new(DEBOUNCE);
    let _ = s.set_background(Some(bg()));
    let t0 = Instant::now();

    s.set_options(opts("a"), t0);
    s.set_options(opts("ab"), t0 + Duration::from_millis(100));
    assert_eq!(
        s.state(),
        SchedulerState::Pending {
            deadline: t0 + Duration::from_millis(250)
        }
    );

    assert!(matches!(
        s.poll(t0 + Duration::from_millis(200)),
        Transition::Unchanged
    ));
    let job = started(s.poll(t0 + Duration::from_millis(250)));
    assert_eq!(job.options.text, "ab");
    assert_eq!(s.next_deadline(), None);
}

#[test]
fn only_latest_render_commits() {
    let mut s = Scheduler::new(DEBOUNCE);
    let t0 = Instant::now();
    let _ = s.set_background(Some(bg()));

    s.set_options(opts("first"), t0);
    let r1 = started(s.poll(t0 + DEBOUNCE));
    s.set_options(opts("second"), t0 + DEBOUNCE);
    let r2 = started(s.poll(t0 + DEBOUNCE * 2));
    assert!(r2.token > r1.token);

    // R2 finishes first, then the stale R1 arrives.
    assert!(matches!(
        s.complete(r2.token, Ok(composite(2))),
        Transition::Finished
    ));
    assert!(matches!(
        s.complete(r1.token, Ok(composite(1))),
        Transition::Superseded { .. }
    ));
    assert_eq!(s.output(), &RenderOutput::Composite(composite(2)));
    assert!(!s.is_rendering());
}

#[test]
fn stale_completion_does_not_clear_rendering_flag() {
    let mut s = Scheduler::with_options(DEBOUNCE, TextOptions::with_text("x"));
    let r1 = started(s.set_background(Some(bg())));
    let r2 = started(s.set_background(Some(bg())));

    assert!(matches!(
        s.complete(r1.token, Ok(composite(1))),
        Transition::Superseded { .. }
    ));
    assert!(s.is_rendering());
    assert_eq!(s.output(), &RenderOutput::NoImage);

    let _ = s.complete(r2.token, Ok(composite(2)));
    assert!(!s.is_rendering());
}

#[test]
fn clearing_text_supersedes_in_flight_render() {
    let mut s = Scheduler::with_options(DEBOUNCE, TextOptions::with_text("x"));
    let t0 = Instant::now();
    let image = bg();
    let r1 = started(s.set_background(Some(image.clone())));

    s.set_options(opts(""), t0);
    assert!(matches!(s.poll(t0 + DEBOUNCE), Transition::Committed));
    assert!(!s.is_rendering());

    assert!(matches!(
        s.complete(r1.token, Ok(composite(1))),
        Transition::Superseded { .. }
    ));
    assert!(matches!(s.output(), RenderOutput::Background(b) if b.ptr_eq(&image)));
}

#[test]
fn failed_render_falls_back_to_background() {
    let mut s = Scheduler::with_options(DEBOUNCE, TextOptions::with_text("x"));
    let image = bg();
    let job = started(s.set_background(Some(image.clone())));
    let _ = s.complete(job.token, Err(ThumbError::asset("decode failed")));
    assert!(matches!(s.output(), RenderOutput::Background(b) if b.ptr_eq(&image)));
    assert!(!s.is_rendering());
}

#[test]
fn duplicate_completion_is_ignored() {
    let mut s = Scheduler::with_options(DEBOUNCE, TextOptions::with_text("x"));
    let job = started(s.set_background(Some(bg())));
    assert!(matches!(
        s.complete(job.token, Ok(composite(7))),
        Transition::Finished
    ));
    assert!(matches!(
        s.complete(job.token, Err(ThumbError::render("late"))),
        Transition::Superseded { .. }
    ));
    assert_eq!(s.output(), &RenderOutput::Composite(composite(7)));
}
