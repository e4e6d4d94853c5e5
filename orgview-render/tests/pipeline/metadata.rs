//! Metadata survives rendering as visible, labelled content

use orgview_render::render_fragment;

#[test]
fn test_allowlisted_keywords_become_labelled_paragraphs() {
    let html = render_fragment("#+TITLE: Field Notes\n#+AUTHOR: Ada\n");
    assert_eq!(
        html,
        "<p><strong>Title:</strong> Field Notes</p><p><strong>Author:</strong> Ada</p>"
    );
}

#[test]
fn test_other_keywords_are_dropped() {
    let html = render_fragment("#+STARTUP: overview\nbody\n");
    assert_eq!(html, "<p>body</p>");
}

#[test]
fn test_planning_fields_in_fixed_order() {
    let html = render_fragment("* Task\nDEADLINE: <2024-03-01 Fri> SCHEDULED: <2024-02-20 Tue>\n");
    assert_eq!(
        html,
        "<h1>Task</h1><p><strong>SCHEDULED:</strong> <code>&lt;2024-02-20 Tue&gt;</code> \
         <strong>DEADLINE:</strong> <code>&lt;2024-03-01 Fri&gt;</code></p>"
    );
}

#[test]
fn test_property_drawer() {
    let html = render_fragment("* Task\n:PROPERTIES:\n:ID: abc\n:EFFORT: 1h\n:END:\n");
    assert_eq!(
        html,
        "<h1>Task</h1><p><strong>Properties</strong><br><code>ID: abc</code><br><code>EFFORT: 1h</code></p>"
    );
}

#[test]
fn test_empty_property_drawer_disappears() {
    let html = render_fragment("* Task\n:PROPERTIES:\n:END:\n");
    assert_eq!(html, "<h1>Task</h1>");
}

#[test]
fn test_logbook_drawer_with_clocks() {
    let html = render_fragment(
        "* Task\n:LOGBOOK:\nCLOCK: [2024-01-01 Mon 09:00]--[2024-01-01 Mon 10:30] =>  1:30\nCLOCK: [2024-01-02 Tue 09:00]\n:END:\n",
    );
    assert!(html.contains("<p><strong>LOGBOOK</strong></p>"));
    assert!(html.contains(
        "<p><strong>CLOCK:</strong> <code>[2024-01-01 Mon 09:00]--[2024-01-01 Mon 10:30]</code> =&gt; <code>1:30</code></p>"
    ));
    assert!(html.contains(
        "<p><strong>CLOCK:</strong> <code>[2024-01-02 Tue 09:00]</code> (running)</p>"
    ));
}

#[test]
fn test_unclosed_drawer_stays_visible_as_text() {
    let html = render_fragment(":NOTES:\nloose\n");
    assert!(html.contains(":NOTES:"));
    assert!(html.contains("loose"));
}

#[test]
fn test_comments_are_not_shown_as_text() {
    let html = render_fragment("# private\nvisible\n");
    assert!(!html.contains("<p># private"));
    assert!(html.contains("<p>visible</p>"));
}
