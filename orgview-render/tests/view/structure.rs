//! Flat headings become nested, collapsible sections

use crate::common::{session_for, FakeLayout};
use insta::assert_snapshot;
use orgview_render::render_fragment;
use orgview_render::dom::{has_class, heading_level, outer_html, tag_name, text_content};
use orgview_render::view::sticky::compute_offsets;
use orgview_render::view::{ClickOutcome, ViewOptions, ViewSession};
use proptest::prelude::*;

#[test]
fn test_two_top_level_sections() {
    let (session, _) = session_for("* A\n** B\n* C\n");
    let sections = session.sections();
    assert_eq!(sections.len(), 3);

    let top_level: Vec<_> = sections
        .iter()
        .filter(|s| s.parent.is_none())
        .map(|s| s.label.as_str())
        .collect();
    assert_eq!(top_level, vec!["A", "C"]);
    assert_eq!(sections[1].parent, Some(0));
    assert_eq!(sections[0].children, vec![1]);
}

#[test]
fn test_nested_markup() {
    let mut session = ViewSession::new(
        Vec::new(),
        ViewOptions {
            toc: false,
            ..Default::default()
        },
    );
    session.load(&render_fragment("* A\nintro\n** B\n"));
    assert_snapshot!(session.to_html(), @r#"<div class="org-view"><main class="org-content"><section class="org-section level-1"><h1 id="a" class="org-heading"><span class="section-toggle" aria-hidden="true">▾</span>A</h1><div class="section-body"><p>intro</p><section class="org-section level-2"><h2 id="b" class="org-heading"><span class="section-toggle" aria-hidden="true">▾</span>B</h2><div class="section-body"></div></section></div></section></main></div>"#);
}

#[test]
fn test_heading_glyphs_survive_in_labels() {
    let (session, _) = session_for("* Status ▸ done
");
    assert_eq!(session.sections()[0].label, "Status ▸ done");
    let toc = session.toc().expect("toc built");
    assert_eq!(toc.entries[0].label, "Status ▸ done");
}

#[test]
fn test_content_before_first_heading_stays_at_top() {
    let (session, _) = session_for("preamble\n* A\nbody\n");
    let document = session.document().expect("document loaded");
    let first = document.content.children.borrow()[0].clone();
    assert_eq!(tag_name(&first), Some("p"));
    assert_eq!(text_content(&first), "preamble");
    assert_eq!(text_content(&session.sections()[0].body), "body");
}

#[test]
fn test_skipped_levels_still_nest() {
    let (session, _) = session_for("* A\n*** Deep\n** B\n");
    let sections = session.sections();
    assert_eq!(sections[1].parent, Some(0));
    assert_eq!(sections[2].parent, Some(0));
}

#[test]
fn test_duplicate_headings_get_distinct_anchors() {
    let (session, _) = session_for("* Notes\n* Notes\n* Notes\n");
    let ids: Vec<_> = session.sections().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["notes", "notes-2", "notes-3"]);
}

#[test]
fn test_no_headings_means_no_sections_and_no_toc() {
    let (mut session, generation) = session_for("just text\n\n- a list\n");
    assert!(session.sections().is_empty());
    assert!(session.toc().is_none());
    assert_eq!(session.apply_layout(&FakeLayout::default()), None);
    assert_eq!(session.on_scroll(generation), None);
    assert!(session.to_html().contains("<p>just text</p>"));
}

#[test]
fn test_heading_click_collapses_and_expands() {
    let (mut session, generation) = session_for("* A\nbody\n");
    let heading = session.sections()[0].heading.clone();

    let outcome = session.click(generation, &heading).unwrap();
    assert_eq!(
        outcome,
        ClickOutcome::Toggled {
            section: 0,
            collapsed: true
        }
    );
    let section = &session.sections()[0];
    assert!(section.collapsed);
    assert!(has_class(&section.body, "collapsed"));
    assert_eq!(text_content(&section.toggle), "▸");

    let toggle = section.toggle.clone();
    let outcome = session.click(generation, &toggle).unwrap();
    assert_eq!(
        outcome,
        ClickOutcome::Toggled {
            section: 0,
            collapsed: false
        }
    );
    assert!(!has_class(&session.sections()[0].body, "collapsed"));
    assert_eq!(text_content(&session.sections()[0].toggle), "▾");
}

#[test]
fn test_click_in_body_does_nothing() {
    let (mut session, generation) = session_for("* A\nbody\n");
    let body = session.sections()[0].body.clone();
    assert_eq!(session.click(generation, &body).unwrap(), ClickOutcome::Ignored);
    assert!(!session.sections()[0].collapsed);
}

#[test]
fn test_links_inside_headings_do_not_toggle() {
    let (mut session, generation) = session_for("* See [[https://example.com][site]]\n");
    let heading = session.sections()[0].heading.clone();
    let link = heading
        .children
        .borrow()
        .iter()
        .find(|n| tag_name(n) == Some("a"))
        .cloned()
        .expect("link in heading");
    assert_eq!(session.click(generation, &link).unwrap(), ClickOutcome::Ignored);
    assert!(!session.sections()[0].collapsed);
}

#[test]
fn test_stale_clicks_are_ignored() {
    let (mut session, first) = session_for("* A\n");
    let old_heading = session.sections()[0].heading.clone();
    let second = session.load(&render_fragment("* A\n"));
    assert_ne!(first, second);

    assert_eq!(session.click(first, &old_heading).unwrap(), ClickOutcome::Ignored);
    assert!(!session.sections()[0].collapsed);
}

#[test]
fn test_sticky_offsets_stack_under_ancestors() {
    let (mut session, _) = session_for("* A\n** B\n*** C\n* D\n");
    let layout = FakeLayout::with_heights(&[("a", 40.0), ("b", 30.0), ("c", 20.0), ("d", 40.0)]);
    assert_eq!(
        compute_offsets(session.sections(), &layout),
        vec![0.0, 40.0, 70.0, 0.0]
    );

    session.apply_layout(&layout);
    let tops: Vec<f64> = session.sections().iter().map(|s| s.sticky_top).collect();
    assert_eq!(tops, vec![0.0, 40.0, 70.0, 0.0]);
    assert!(outer_html(&session.sections()[1].heading).contains("style=\"top: 40px\""));
}

#[test]
fn test_sticky_offset_for_child_is_parent_height() {
    let (mut session, _) = session_for("* A\n** B\n* C\n");
    session.apply_layout(&FakeLayout::with_heights(&[("a", 36.0), ("b", 28.0), ("c", 36.0)]));
    let tops: Vec<f64> = session.sections().iter().map(|s| s.sticky_top).collect();
    assert_eq!(tops, vec![0.0, 36.0, 0.0]);
}

fn org_outline() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        (1usize..7, "[a-z]{1,6}").prop_map(|(level, word)| format!("{} {word}", "*".repeat(level))),
        "[a-z]{1,8}( [a-z]{1,8}){0,3}",
        Just(String::new()),
    ];
    prop::collection::vec(line, 0..30).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn one_section_per_heading(source in org_outline()) {
        let html = render_fragment(&source);
        let headings = (1..=6).map(|n| html.matches(&format!("<h{n}>")).count()).sum::<usize>();

        let mut session = ViewSession::new(Vec::new(), ViewOptions::default());
        session.load(&html);
        let sections = session.sections();
        prop_assert_eq!(sections.len(), headings);

        for section in sections {
            let children = section.wrapper.children.borrow();
            prop_assert_eq!(children.len(), 2);
            prop_assert!(heading_level(&children[0]).is_some());
            prop_assert!(has_class(&children[1], "section-body"));
            if let Some(parent) = section.parent {
                prop_assert!(sections[parent].level < section.level);
            }
        }
        prop_assert_eq!(
            session.toc().map_or(0, |toc| toc.entries.len()),
            headings
        );
    }

    #[test]
    fn enhancing_is_deterministic(source in org_outline()) {
        let html = render_fragment(&source);
        let mut first = ViewSession::new(Vec::new(), ViewOptions::default());
        let mut second = ViewSession::new(Vec::new(), ViewOptions::default());
        first.load(&html);
        second.load(&html);
        prop_assert_eq!(first.to_html(), second.to_html());
    }
}
