//! CLI-specific transforms
//!
//! This module defines the views of a document available to `orgview inspect`.
//! Each transform names a pipeline stage and an output format (e.g., "syntax-json").
//!
//! ## Transform Pipeline
//!
//! 1. **Parsing** - Raw text → syntax tree
//!    - `syntax-json`: the tree exactly as parsed, metadata kinds included
//!
//! 2. **Syntax passes** - normalizer, then checkbox injector
//!    - `normalized-json`: the tree the converter receives
//!
//! 3. **Conversion** - syntax tree → render tree
//!    - `render-json`: before the sanitizer, `other` nodes included
//!    - `sanitized-json`: what the serializer receives
//!
//! 4. **Serialization** - render tree → markup
//!    - `html`: the fragment, errors surfaced instead of rendered
//!
//! 5. **Enhancement** - markup → navigable view
//!    - `toc-json`: table of contents entries
//!    - `file-refs-json`: classified file references
//!
//! ## Extra Parameters
//!
//! - `compact`: When set to "true", JSON is written on a single line.
//!
//! Example: `orgview inspect notes.org toc-json --extra-compact`

use orgview_render::pipeline::{prepare, render_tree};
use orgview_render::render::to_render_tree;
use orgview_render::syntax::parse;
use orgview_render::view::EnhancedDocument;
use orgview_render::{render_fragment, try_render, ViewOptions};
use serde::Serialize;
use std::collections::HashMap;

/// All available CLI transforms (stage + format combinations)
pub const AVAILABLE_TRANSFORMS: &[&str] = &[
    "syntax-json",
    "normalized-json",
    "render-json",
    "sanitized-json",
    "html",
    "toc-json",
    "file-refs-json",
];

/// Execute a named transform on a source file with optional extra parameters
///
/// # Arguments
///
/// * `source` - The org source to transform
/// * `transform_name` - The transform to apply (e.g., "syntax-json", "toc-json")
/// * `view` - Enhancer options, used by the view stage transforms
/// * `extra_params` - Optional parameters for the transform
///
/// # Returns
///
/// The transformed output as a string, or an error message
pub fn execute_transform(
    source: &str,
    transform_name: &str,
    view: &ViewOptions,
    extra_params: &HashMap<String, String>,
) -> Result<String, String> {
    let compact = extra_params
        .get("compact")
        .is_some_and(|v| v.eq_ignore_ascii_case("true"));

    match transform_name {
        "syntax-json" => to_json(&parse(source), compact),
        "normalized-json" => to_json(&prepare(source), compact),
        "render-json" => to_json(&to_render_tree(&prepare(source)), compact),
        "sanitized-json" => to_json(&render_tree(source), compact),
        "html" => try_render(source).map_err(|e| format!("Transform failed: {e}")),
        "toc-json" => {
            let document = EnhancedDocument::build(&render_fragment(source), view);
            let entries = document
                .toc
                .as_ref()
                .map(|toc| toc.entries.as_slice())
                .unwrap_or_default();
            to_json(&entries, compact)
        }
        "file-refs-json" => {
            let document = EnhancedDocument::build(&render_fragment(source), view);
            to_json(&document.file_refs, compact)
        }
        _ => Err(format!("Unknown transform: {transform_name}")),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> Result<String, String> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    json.map(|mut out| {
        out.push('\n');
        out
    })
    .map_err(|e| format!("JSON serialization failed: {e}"))
}
