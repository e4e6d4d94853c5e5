//! Metadata normalizer
//!
//! A depth-first rewrite over the syntax tree. Each node is replaced by zero, one or many
//! nodes, so the converter (which does not understand metadata kinds) receives plain
//! paragraphs instead of keywords, planning lines, drawers and clocks.
//!
//! Every children list goes through two sub-passes: first each child is rewritten, then
//! the pass recurses into the rewritten children's own children. Nodes produced by a rule
//! are therefore walked into, but never matched against the rules a second time.
//!
//! | Kind              | Output                                                          |
//! |-------------------|-----------------------------------------------------------------|
//! | keyword           | `**Label:** value` paragraph when allow-listed, else unchanged  |
//! | planning          | one paragraph of `**KEY:** ~timestamp~`, or nothing             |
//! | property drawer   | `**Properties**` then one `~key: value~` per line, or nothing   |
//! | drawer            | `**NAME**` label, clocks and property drawers expanded in place |
//! | clock             | `**CLOCK:** ~range~ => ~duration~ (running)`                    |
//! | math              | display math when written with `$$` or `\[`, else unchanged     |
//! | unbraced sub/sup  | literal `_body` / `^body` text                                  |

use crate::syntax::{Node, NodeKind};

/// Keywords rendered as labelled paragraphs, with their display label.
const KEYWORD_LABELS: &[(&str, &str)] = &[
    ("TITLE", "Title"),
    ("AUTHOR", "Author"),
    ("DATE", "Date"),
    ("EMAIL", "Email"),
    ("DESCRIPTION", "Description"),
    ("CATEGORY", "Category"),
    ("FILETAGS", "File Tags"),
    ("LANGUAGE", "Language"),
];

/// Rewrite metadata kinds in the tree rooted at `root`.
pub fn normalize(mut root: Node) -> Node {
    root.children = normalize_children(std::mem::take(&mut root.children));
    root
}

fn normalize_children(children: Vec<Node>) -> Vec<Node> {
    let replaced: Vec<Node> = children.into_iter().flat_map(rewrite).collect();
    merge_text(replaced)
        .into_iter()
        .map(|mut node| {
            node.children = normalize_children(std::mem::take(&mut node.children));
            node
        })
        .collect()
}

fn rewrite(node: Node) -> Vec<Node> {
    match node.kind {
        NodeKind::Keyword { key, value } => match keyword_label(&key) {
            Some(label) => vec![labelled_paragraph(label, &value)],
            None => vec![Node::new(NodeKind::Keyword { key, value }, node.children)],
        },
        NodeKind::Planning {
            scheduled,
            deadline,
            closed,
        } => expand_planning(scheduled, deadline, closed),
        NodeKind::PropertyDrawer { properties } => expand_properties(&properties),
        NodeKind::Drawer { name } => expand_drawer(name, node.children),
        NodeKind::Clock {
            range,
            duration,
            running,
        } => vec![expand_clock(range, duration, running)],
        NodeKind::Math { raw, value } => vec![reclassify_math(raw, value)],
        NodeKind::Subscript { braced: false } => vec![literal_script('_', &node)],
        NodeKind::Superscript { braced: false } => vec![literal_script('^', &node)],
        _ => vec![node],
    }
}

fn keyword_label(key: &str) -> Option<&'static str> {
    KEYWORD_LABELS
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, label)| *label)
}

fn labelled_paragraph(label: &str, value: &str) -> Node {
    Node::paragraph(vec![
        Node::bold(vec![Node::text(format!("{label}:"))]),
        Node::text(format!(" {value}")),
    ])
}

fn expand_planning(
    scheduled: Option<String>,
    deadline: Option<String>,
    closed: Option<String>,
) -> Vec<Node> {
    let fields = [
        ("SCHEDULED:", scheduled),
        ("DEADLINE:", deadline),
        ("CLOSED:", closed),
    ];
    let mut children = Vec::new();
    for (label, stamp) in fields {
        let Some(stamp) = stamp else { continue };
        if !children.is_empty() {
            children.push(Node::text(" "));
        }
        children.push(Node::bold(vec![Node::text(label)]));
        children.push(Node::text(" "));
        children.push(Node::code(stamp));
    }
    if children.is_empty() {
        return Vec::new();
    }
    vec![Node::paragraph(children)]
}

fn expand_properties(properties: &[(String, String)]) -> Vec<Node> {
    if properties.is_empty() {
        return Vec::new();
    }
    let mut children = vec![Node::bold(vec![Node::text("Properties")])];
    for (key, value) in properties {
        children.push(Node::leaf(NodeKind::LineBreak));
        children.push(Node::code(format!("{key}: {value}")));
    }
    vec![Node::paragraph(children)]
}

/// Nested drawers are out of reach of the outer rewrite, so clocks and property drawers
/// directly inside are expanded here.
fn expand_drawer(name: String, children: Vec<Node>) -> Vec<Node> {
    let mut out = vec![Node::paragraph(vec![Node::bold(vec![Node::text(name)])])];
    for child in children {
        match child.kind {
            NodeKind::Clock {
                range,
                duration,
                running,
            } => out.push(expand_clock(range, duration, running)),
            NodeKind::PropertyDrawer { properties } => out.extend(expand_properties(&properties)),
            _ => out.push(child),
        }
    }
    out
}

fn expand_clock(range: String, duration: Option<String>, running: bool) -> Node {
    let mut children = vec![
        Node::bold(vec![Node::text("CLOCK:")]),
        Node::text(" "),
        Node::code(range),
    ];
    if let Some(duration) = duration {
        children.push(Node::text(" => "));
        children.push(Node::code(duration));
    }
    if running {
        children.push(Node::text(" (running)"));
    }
    Node::paragraph(children)
}

fn reclassify_math(raw: String, value: String) -> Node {
    let inner = raw
        .strip_prefix("$$")
        .and_then(|r| r.strip_suffix("$$"))
        .or_else(|| raw.strip_prefix("\\[").and_then(|r| r.strip_suffix("\\]")));
    match inner {
        Some(inner) => Node::leaf(NodeKind::DisplayMath {
            value: inner.trim().to_string(),
        }),
        None => Node::leaf(NodeKind::Math { raw, value }),
    }
}

fn literal_script(marker: char, node: &Node) -> Node {
    Node::text(format!("{marker}{}", node.text_content()))
}

/// Joins adjacent text nodes, which literal scripts leave behind.
fn merge_text(nodes: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let NodeKind::Text { value } = &node.kind {
            if let Some(NodeKind::Text { value: previous }) = out.last_mut().map(|n| &mut n.kind) {
                previous.push_str(value);
                continue;
            }
        }
        out.push(node);
    }
    out
}
