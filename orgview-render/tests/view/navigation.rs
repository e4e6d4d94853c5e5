//! Table of contents and the scroll spy

use crate::common::{session_for, FakeLayout};
use orgview_render::render_fragment;
use orgview_render::dom::{get_attribute, has_class};
use orgview_render::view::{ScrollRequest, SpyUpdate};

const OUTLINE: &str = "* Intro\ntext\n** Setup\nmore\n* Usage\nend\n";

fn heights() -> FakeLayout {
    FakeLayout::with_heights(&[("intro", 40.0), ("setup", 30.0), ("usage", 40.0)])
}

#[test]
fn test_toc_lists_every_heading_in_order() {
    let (session, _) = session_for(OUTLINE);
    let toc = session.toc().expect("toc");
    let entries: Vec<_> = toc
        .entries
        .iter()
        .map(|e| (e.id.as_str(), e.level, e.label.as_str()))
        .collect();
    assert_eq!(
        entries,
        vec![("intro", 1, "Intro"), ("setup", 2, "Setup"), ("usage", 1, "Usage")]
    );
    assert_eq!(
        get_attribute(&toc.entries[1].element, "data-target").as_deref(),
        Some("setup")
    );
    assert!(session.to_html().starts_with("<div class=\"org-view\"><nav class=\"org-toc\""));
}

#[test]
fn test_toc_click_requests_smooth_scroll() {
    let (session, generation) = session_for(OUTLINE);
    assert_eq!(
        session.toc_click(generation, 2),
        Some(ScrollRequest {
            id: "usage".to_string(),
            smooth: true
        })
    );
    assert_eq!(session.toc_click(generation, 9), None);
}

#[test]
fn test_first_entry_active_before_scrolling() {
    let (mut session, _) = session_for(OUTLINE);
    let layout = heights().scrolled_to(&[("intro", 120.0), ("setup", 400.0), ("usage", 900.0)]);
    let update = session.apply_layout(&layout).expect("spy ran");
    assert_eq!(update.active, Some(0));
    assert!(has_class(&session.toc().unwrap().entries[0].element, "active"));
}

#[test]
fn test_active_entry_follows_scroll() {
    let (mut session, generation) = session_for(OUTLINE);
    session.apply_layout(&heights());

    let ticket = session.on_scroll(generation).expect("frame scheduled");
    // Setup has reached its stacked offset below Intro, Usage has not.
    let layout = heights().scrolled_to(&[("intro", 0.0), ("setup", 44.0), ("usage", 300.0)]);
    let update = session.on_frame(ticket, &layout).expect("spy ran");
    assert_eq!(update.active, Some(1));

    let toc = session.toc().unwrap();
    let active: Vec<_> = toc
        .entries
        .iter()
        .filter(|e| has_class(&e.element, "active"))
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(active, vec!["setup"]);
    assert_eq!(toc.active, Some(1));
}

#[test]
fn test_scroll_events_are_throttled_to_one_frame() {
    let (mut session, generation) = session_for(OUTLINE);
    let ticket = session.on_scroll(generation).expect("first scroll schedules");
    assert_eq!(session.on_scroll(generation), None);
    assert_eq!(session.on_scroll(generation), None);

    session.on_frame(ticket, &heights());
    assert!(session.on_scroll(generation).is_some());
}

#[test]
fn test_stale_frames_are_dropped() {
    let (mut session, first) = session_for(OUTLINE);
    let ticket = session.on_scroll(first).expect("scheduled");
    let second = session.load(&render_fragment(OUTLINE));

    assert_eq!(session.on_frame(ticket, &heights()), None);
    assert!(session.on_scroll(second).is_some());
}

#[test]
fn test_active_entry_is_scrolled_into_view() {
    let (mut session, generation) = session_for(OUTLINE);
    let mut layout = heights().scrolled_to(&[("intro", -500.0), ("setup", -300.0), ("usage", 0.0)]);
    layout.toc_entries = vec![(0.0, 20.0), (20.0, 20.0), (40.0, 20.0)];
    layout.toc_viewport = 50.0;

    let ticket = session.on_scroll(generation).unwrap();
    let update = session.on_frame(ticket, &layout).unwrap();
    assert_eq!(
        update,
        SpyUpdate {
            active: Some(2),
            toc_scroll: Some(10.0)
        }
    );
}

#[test]
fn test_visible_active_entry_needs_no_toc_scroll() {
    let (mut session, _) = session_for(OUTLINE);
    let mut layout = heights().scrolled_to(&[("intro", 0.0)]);
    layout.toc_entries = vec![(0.0, 20.0)];
    layout.toc_viewport = 50.0;
    let update = session.apply_layout(&layout).unwrap();
    assert_eq!(
        update,
        SpyUpdate {
            active: Some(0),
            toc_scroll: None
        }
    );
}
