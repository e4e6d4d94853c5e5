//! End-to-end rendering tests for ordinary content

use insta::assert_snapshot;
use orgview_render::{render_document, render_fragment, try_render, RenderOptions};
use proptest::prelude::*;

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn test_heading_and_paragraph() {
    let html = render_fragment("* Heading\nSome *bold* text.\n");
    assert_eq!(html, "<h1>Heading</h1><p>Some <strong>bold</strong> text.</p>");
}

#[test]
fn test_headline_keyword_priority_and_tags() {
    let html = render_fragment("* TODO [#A] Ship it :work:urgent:\n** DONE Review\n");
    assert_snapshot!(html, @r#"<h1><span class="todo-keyword todo">TODO</span> <span class="priority">[#A]</span> Ship it <span class="tags"><span class="tag">work</span><span class="tag">urgent</span></span></h1><h2><span class="todo-keyword done">DONE</span> Review</h2>"#);
}

#[test]
fn test_deep_headings_clamp_to_h6() {
    let html = render_fragment("******** Deep\n");
    assert_eq!(html, "<h6>Deep</h6>");
}

#[test]
fn test_checkbox_glyphs() {
    let html = render_fragment("- [X] done\n- [ ] open\n- [-] partial\n");
    assert!(html.contains("class=\"checkbox checkbox-on\""));
    assert!(html.contains("class=\"checkbox checkbox-off\""));
    assert!(html.contains("class=\"checkbox checkbox-partial\""));
    assert!(html.contains("☑ done"));
    assert!(html.contains("☐ open"));
    assert!(html.contains("☒ partial"));
}

#[test]
fn test_plain_list_has_no_glyphs() {
    let html = render_fragment("- one\n- two\n");
    assert!(html.starts_with("<ul><li>"));
    assert!(!html.contains("checkbox"));
    assert!(!html.contains('☐'));
}

#[test]
fn test_display_and_inline_math() {
    let display = render_fragment("$$x^2$$\n");
    assert_eq!(
        display,
        "<p><span class=\"math math-display\">x^2</span></p>"
    );

    let inline = render_fragment("$x^2$\n");
    assert_eq!(inline, "<p><span class=\"math math-inline\">x^2</span></p>");
}

#[test]
fn test_bracket_math_is_display() {
    let html = render_fragment("\\[ a + b \\]\n");
    assert!(html.contains("<span class=\"math math-display\">a + b</span>"));
}

#[test]
fn test_unbraced_scripts_stay_literal() {
    let html = render_fragment("see file_name and x^2\n");
    assert_eq!(html, "<p>see file_name and x^2</p>");
}

#[test]
fn test_braced_scripts_render() {
    let html = render_fragment("H_{2}O and e^{x}\n");
    assert_eq!(html, "<p>H<sub>2</sub>O and e<sup>x</sup></p>");
}

#[test]
fn test_source_block() {
    let html = render_fragment("#+BEGIN_SRC rust\nfn main() {}\n#+END_SRC\n");
    assert!(html.contains("<pre class=\"src\" data-language=\"rust\"><code>fn main() {}"));
}

#[test]
fn test_unicode_indented_list_continuation() {
    let html = render_fragment(" - a\n\u{a0}\u{a0}b\n");
    assert!(!html.contains("render-error"));
    assert!(html.starts_with("<ul><li>"));
    assert!(html.contains("a\nb"));
}

#[test]
fn test_source_block_with_mixed_unicode_indentation() {
    let html = render_fragment("#+BEGIN_SRC text\n\u{3000}kept\n y\n#+END_SRC\n");
    assert!(html.contains("<code>kept\ny</code>"));
}

#[test]
fn test_links() {
    let html = render_fragment("[[https://example.com][site]] and [[*Intro][intro]]\n");
    assert!(html.contains("<a href=\"https://example.com/\">site</a>"));
    assert!(html.contains("<a href=\"#intro\">intro</a>"));
}

#[test]
fn test_text_is_escaped() {
    let html = render_fragment("a < b & c\n");
    assert_eq!(html, "<p>a &lt; b &amp; c</p>");
}

#[test]
fn test_special_block_keeps_content() {
    let html = render_fragment("#+BEGIN_NOTE\nkept\n#+END_NOTE\n");
    assert!(html.contains("kept"));
    assert!(!html.contains("render-error"));
}

#[test]
fn test_export_blocks() {
    let html = render_fragment(
        "#+BEGIN_EXPORT html\n<div class=\"raw\">x</div>\n#+END_EXPORT\n#+BEGIN_EXPORT latex\n\\LaTeX\n#+END_EXPORT\n",
    );
    assert!(html.contains("<div class=\"raw\">x</div>"));
    assert!(!html.contains("LaTeX"));
}

#[test]
fn test_empty_source() {
    assert_eq!(render_fragment(""), "");
    assert_eq!(try_render("").unwrap(), "");
}

#[test]
fn test_standalone_document() {
    let page = render_document("#+TITLE: Notes\n* Intro\n", &RenderOptions::default());
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("<title>Notes</title>"));
    assert!(page.contains(".org-section"));
    assert!(page.contains("<div class=\"org-document\">"));
    assert!(page.contains("<h1>Intro</h1>"));
}

#[test]
fn test_standalone_fallback_title_and_custom_css() {
    let options = RenderOptions::default().with_custom_css(".mine { color: red; }".to_string());
    let page = render_document("plain\n", &options);
    assert!(page.contains("<title>Org Document</title>"));
    assert!(page.contains(".mine { color: red; }"));
}

#[test]
fn test_fragment_mode_document() {
    let options = RenderOptions {
        standalone: false,
        ..Default::default()
    };
    assert_eq!(render_document("* A\n", &options), "<h1>A</h1>");
}

fn org_document() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        (1usize..8, "[a-z]{1,8}").prop_map(|(level, word)| format!("{} {word}", "*".repeat(level))),
        "[a-z]{1,8}( [a-z]{1,8}){0,4}",
        "- \\[[ X-]\\] [a-z]{1,8}",
        Just(String::new()),
    ];
    prop::collection::vec(line, 0..24).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn rendering_is_deterministic(source in org_document()) {
        prop_assert_eq!(render_fragment(&source), render_fragment(&source));
    }

    #[test]
    fn every_heading_line_renders_a_heading(source in org_document()) {
        let headings = source.lines().filter(|l| l.starts_with('*')).count();
        let html = render_fragment(&source);
        let rendered = (1..=6).map(|n| count(&html, &format!("<h{n}>"))).sum::<usize>();
        prop_assert_eq!(rendered, headings);
    }
}
