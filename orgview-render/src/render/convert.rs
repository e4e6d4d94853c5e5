//! Syntax tree → render tree conversion
//!
//! A generic converter: it maps the structural and inline kinds to HTML elements and has
//! no notion of org metadata. Keywords, planning lines, property drawers and clocks are
//! dropped, while drawers, special blocks and unknown kinds become `Other` nodes. The
//! normalizer runs first so that nothing worth showing reaches those branches.
//!
//! # Element Mapping
//!
//! | Syntax kind         | Render                                                   |
//! |---------------------|----------------------------------------------------------|
//! | Headline            | `<hN>` (clamped to 6), keyword/priority/tags as spans    |
//! | Paragraph           | `<p>`                                                    |
//! | List / ListItem     | `<ul>`/`<ol>` + `<li>`, description lists `<dl>` + dt/dd |
//! | Emphasis            | `<strong>`, `<em>`, `<span class="underline">`, `<del>`  |
//! | Code / Verbatim     | `<code>`                                                 |
//! | Link                | `<a href>`, or `<img>` for bare image links              |
//! | Math / DisplayMath  | `<span class="math math-inline">` / `math-display`       |
//! | Src / Example block | `<pre data-language><code>`                              |
//! | Quote block         | `<blockquote>`                                           |
//! | Export block (html) | raw markup                                               |
//! | Table               | `<table>` of `<tr>` with `<th>`/`<td>`                   |

use super::nodes::RenderNode;
use crate::slug::slugify;
use crate::syntax::{CheckboxState, Emphasis, Node, NodeKind};
use url::Url;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "bmp"];
const DONE_KEYWORDS: &[&str] = &["DONE", "CANCELLED"];

/// Convert a syntax tree into a render tree rooted at `Root`.
pub fn to_render_tree(document: &Node) -> RenderNode {
    RenderNode::Root {
        children: convert_all(&document.children),
    }
}

fn convert_all(nodes: &[Node]) -> Vec<RenderNode> {
    nodes.iter().flat_map(convert).collect()
}

fn convert(node: &Node) -> Vec<RenderNode> {
    let children = || convert_all(&node.children);
    let rendered = match &node.kind {
        NodeKind::Document => return children(),
        NodeKind::Headline {
            level,
            keyword,
            priority,
            tags,
        } => headline(*level, keyword.as_deref(), *priority, tags, children()),
        NodeKind::Paragraph => RenderNode::element("p", vec![], children()),
        NodeKind::List {
            ordered,
            description,
        } => list(*ordered, *description, &node.children),
        NodeKind::ListItem { checkbox } => list_item(*checkbox, children()),
        NodeKind::DescriptionTerm => RenderNode::element("dt", vec![], children()),
        NodeKind::Text { value } => RenderNode::text(value.clone()),
        NodeKind::Emphasis { style } => match style {
            Emphasis::Bold => RenderNode::element("strong", vec![], children()),
            Emphasis::Italic => RenderNode::element("em", vec![], children()),
            Emphasis::Underline => {
                RenderNode::element("span", vec![("class", "underline")], children())
            }
            Emphasis::Strike => RenderNode::element("del", vec![], children()),
        },
        NodeKind::Code { value } => {
            RenderNode::element("code", vec![], vec![RenderNode::text(value.clone())])
        }
        NodeKind::Verbatim { value } => RenderNode::element(
            "code",
            vec![("class", "verbatim")],
            vec![RenderNode::text(value.clone())],
        ),
        NodeKind::Link { path } => link(path, children()),
        NodeKind::Subscript { .. } => RenderNode::element("sub", vec![], children()),
        NodeKind::Superscript { .. } => RenderNode::element("sup", vec![], children()),
        NodeKind::Math { value, .. } => RenderNode::element(
            "span",
            vec![("class", "math math-inline")],
            vec![RenderNode::text(value.clone())],
        ),
        NodeKind::DisplayMath { value } => RenderNode::element(
            "span",
            vec![("class", "math math-display")],
            vec![RenderNode::text(value.clone())],
        ),
        NodeKind::LineBreak => RenderNode::element("br", vec![], vec![]),
        NodeKind::Keyword { .. }
        | NodeKind::Planning { .. }
        | NodeKind::PropertyDrawer { .. }
        | NodeKind::Clock { .. } => return Vec::new(),
        NodeKind::Drawer { name } => RenderNode::Other {
            kind: format!("drawer:{name}"),
            value: None,
            children: children(),
        },
        NodeKind::SrcBlock { language, value } => {
            preformatted("src", language.as_deref(), value)
        }
        NodeKind::ExampleBlock { value } => preformatted("example", None, value),
        NodeKind::QuoteBlock => RenderNode::element("blockquote", vec![], children()),
        NodeKind::ExportBlock { backend, value } => {
            if backend != "html" {
                return Vec::new();
            }
            RenderNode::Raw {
                value: value.clone(),
            }
        }
        NodeKind::SpecialBlock { name } => RenderNode::Other {
            kind: format!("special-block:{name}"),
            value: None,
            children: children(),
        },
        NodeKind::Table => RenderNode::element("table", vec![], children()),
        NodeKind::TableRow { header } => table_row(*header, &node.children),
        NodeKind::TableCell => RenderNode::element("td", vec![], children()),
        NodeKind::HorizontalRule => RenderNode::element("hr", vec![], vec![]),
        NodeKind::Comment { value } => RenderNode::Comment {
            value: value.clone(),
        },
        NodeKind::Unknown { kind, value } => RenderNode::Other {
            kind: kind.clone(),
            value: value.clone(),
            children: children(),
        },
    };
    vec![rendered]
}

fn headline(
    level: usize,
    keyword: Option<&str>,
    priority: Option<char>,
    tags: &[String],
    title: Vec<RenderNode>,
) -> RenderNode {
    let tag = format!("h{}", level.clamp(1, 6));
    let mut children = Vec::new();
    if let Some(keyword) = keyword {
        let state = if DONE_KEYWORDS.contains(&keyword) {
            "todo-keyword done"
        } else {
            "todo-keyword todo"
        };
        children.push(RenderNode::element(
            "span",
            vec![("class", state)],
            vec![RenderNode::text(keyword)],
        ));
        children.push(RenderNode::text(" "));
    }
    if let Some(priority) = priority {
        children.push(RenderNode::element(
            "span",
            vec![("class", "priority")],
            vec![RenderNode::text(format!("[#{priority}]"))],
        ));
        children.push(RenderNode::text(" "));
    }
    children.extend(title);
    if !tags.is_empty() {
        children.push(RenderNode::text(" "));
        let spans = tags
            .iter()
            .map(|t| {
                RenderNode::element("span", vec![("class", "tag")], vec![RenderNode::text(t.clone())])
            })
            .collect();
        children.push(RenderNode::element("span", vec![("class", "tags")], spans));
    }
    RenderNode::element(&tag, vec![], children)
}

fn list(ordered: bool, description: bool, items: &[Node]) -> RenderNode {
    if description {
        let children = items.iter().flat_map(description_item).collect();
        return RenderNode::element("dl", vec![], children);
    }
    let tag = if ordered { "ol" } else { "ul" };
    RenderNode::element(tag, vec![], convert_all(items))
}

fn list_item(checkbox: CheckboxState, children: Vec<RenderNode>) -> RenderNode {
    let class = match checkbox {
        CheckboxState::None => return RenderNode::element("li", vec![], children),
        CheckboxState::On => "checkbox checkbox-on",
        CheckboxState::Off => "checkbox checkbox-off",
        CheckboxState::Partial => "checkbox checkbox-partial",
    };
    RenderNode::element("li", vec![("class", class)], children)
}

/// One description item becomes a `<dt>` (when it has a term) followed by a `<dd>`.
fn description_item(item: &Node) -> Vec<RenderNode> {
    let (term, body) = match item.children.split_first() {
        Some((first, rest)) if first.kind == NodeKind::DescriptionTerm => (Some(first), rest),
        _ => (None, item.children.as_slice()),
    };
    let mut out = Vec::new();
    if let Some(term) = term {
        out.extend(convert(term));
    }
    out.push(RenderNode::element("dd", vec![], convert_all(body)));
    out
}

fn table_row(header: bool, cells: &[Node]) -> RenderNode {
    let cell_tag = if header { "th" } else { "td" };
    let children = cells
        .iter()
        .map(|cell| RenderNode::element(cell_tag, vec![], convert_all(&cell.children)))
        .collect();
    RenderNode::element("tr", vec![], children)
}

fn preformatted(class: &str, language: Option<&str>, value: &str) -> RenderNode {
    let mut attrs = vec![("class", class)];
    if let Some(language) = language {
        attrs.push(("data-language", language));
    }
    RenderNode::element(
        "pre",
        attrs,
        vec![RenderNode::element(
            "code",
            vec![],
            vec![RenderNode::text(value)],
        )],
    )
}

fn link(path: &str, description: Vec<RenderNode>) -> RenderNode {
    let href = link_target(path);
    if description.is_empty() && is_image(&href) {
        return RenderNode::element("img", vec![("src", href.as_str()), ("alt", href.as_str())], vec![]);
    }
    let label = if description.is_empty() {
        vec![RenderNode::text(path.strip_prefix("file:").unwrap_or(path))]
    } else {
        description
    };
    RenderNode::element("a", vec![("href", href.as_str())], label)
}

/// Absolute URLs keep their href; `file:` links and plain paths keep the path, and
/// `*Heading` / `#id` targets point at in-page anchors.
fn link_target(path: &str) -> String {
    if let Some(heading) = path.strip_prefix('*') {
        return format!("#{}", slugify(heading));
    }
    if path.starts_with('#') {
        return path.to_string();
    }
    if let Some(local) = path.strip_prefix("file:") {
        return local.to_string();
    }
    match Url::parse(path) {
        Ok(url) if !url.cannot_be_a_base() || url.scheme() == "mailto" => url.to_string(),
        _ => path.to_string(),
    }
}

fn is_image(href: &str) -> bool {
    href.rsplit_once('.')
        .map(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
