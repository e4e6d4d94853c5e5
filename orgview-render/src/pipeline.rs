//! The rendering pipeline and its outer boundary
//!
//! Stages, in order:
//!
//!     source ─ parse ─▶ syntax tree ─ normalize ─▶ ─ inject_checkboxes ─▶
//!         ─ to_render_tree ─▶ render tree ─ sanitize ─▶ ─ serialize ─▶ markup
//!
//! Every stage is a plain function over owned values, so an invocation shares nothing with
//! any other and re-running on the same text yields the same bytes. [`render_fragment`] is
//! the boundary: whatever goes wrong inside, the caller receives markup.

use crate::error::RenderError;
use crate::render::{serialize, to_render_tree, RenderNode};
use crate::syntax::{parse, Node, NodeKind};
use crate::transforms::{inject_checkboxes, normalize, sanitize};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Options for standalone document output
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Wrap the fragment in a complete page
    pub standalone: bool,
    /// Page title when the source has no `#+TITLE`
    pub title: String,
    /// Optional custom CSS appended after the view stylesheet
    pub custom_css: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            standalone: true,
            title: "Org Document".to_string(),
            custom_css: None,
        }
    }
}

impl RenderOptions {
    pub fn with_custom_css(mut self, css: String) -> Self {
        self.custom_css = Some(css);
        self
    }
}

/// Syntax tree after both syntax passes.
pub fn prepare(source: &str) -> Node {
    inject_checkboxes(normalize(parse(source)))
}

/// Sanitized render tree for `source`.
pub fn render_tree(source: &str) -> RenderNode {
    sanitize(to_render_tree(&prepare(source)))
}

/// Run every stage, surfacing the first error.
pub fn try_render(source: &str) -> Result<String, RenderError> {
    let syntax = parse(source);
    log::debug!("parsed {} top-level nodes", syntax.children.len());

    let syntax = inject_checkboxes(normalize(syntax));
    log::debug!("normalized to {} top-level nodes", syntax.children.len());

    let tree = sanitize(to_render_tree(&syntax));
    log::debug!("render tree has {} top-level nodes", tree.children().len());

    let html = serialize(&tree)?;
    log::debug!("serialized {} bytes", html.len());
    Ok(html)
}

/// Render `source` to a markup fragment; failures become a visible error fragment.
pub fn render_fragment(source: &str) -> String {
    let outcome = catch_unwind(AssertUnwindSafe(|| try_render(source)))
        .unwrap_or_else(|payload| Err(RenderError::Internal(panic_message(payload.as_ref()))));
    match outcome {
        Ok(html) => html,
        Err(err) => {
            log::warn!("render failed: {err}");
            error_fragment(&err)
        }
    }
}

/// Render `source` as a fragment or a standalone page, per `options`.
pub fn render_document(source: &str, options: &RenderOptions) -> String {
    let body = render_fragment(source);
    if !options.standalone {
        return body;
    }
    standalone_page(&body, source, options)
}

/// Wrap already rendered (or enhanced) markup for `source` in a complete page.
pub fn standalone_page(body_html: &str, source: &str, options: &RenderOptions) -> String {
    let title = document_title(source).unwrap_or_else(|| options.title.clone());
    wrap_in_document(body_html, &title, options)
}

/// The markup shown in place of a document that failed to render.
pub fn error_fragment(err: &RenderError) -> String {
    format!(
        "<h2 class=\"render-error\">Render error</h2><pre>{}</pre>",
        html_escape(&err.to_string())
    )
}

/// First `#+TITLE` value in the source.
pub fn document_title(source: &str) -> Option<String> {
    parse(source).children.into_iter().find_map(|node| match node.kind {
        NodeKind::Keyword { key, value } if key.eq_ignore_ascii_case("TITLE") && !value.is_empty() => {
            Some(value)
        }
        _ => None,
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "renderer panicked".to_string())
}

/// Wrap the content in a complete HTML document with embedded CSS
fn wrap_in_document(body_html: &str, title: &str, options: &RenderOptions) -> String {
    let view_css = crate::VIEW_CSS;
    let custom_css = options.custom_css.as_deref().unwrap_or("");
    let escaped_title = html_escape(title);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta name="generator" content="orgview">
  <title>{escaped_title}</title>
  <style>
{view_css}
{custom_css}
  </style>
</head>
<body>
<div class="org-document">
{body_html}
</div>
</body>
</html>"#
    )
}

/// Escape HTML special characters in text
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
