//! File-reference detection
//!
//! Scans text nodes for path-like tokens that end in a known extension, optionally followed
//! by `:line`. Text inside code, preformatted blocks, links and already tagged spans is left
//! alone. Each match is classified through a static extension table; only documentation
//! links are interactive, everything else becomes a styled, inert span.

use crate::dom::{
    append_child, create_element, create_text, has_class, parent_of, replace_with,
    tag_name, text_of,
};
use markup5ever_rcdom::{Handle, NodeData};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

pub const FILE_REF_CLASS: &str = "file-ref";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    DocLink,
    DocOther,
    Code,
    Config,
    Generic,
}

impl FileKind {
    pub fn class(self) -> &'static str {
        match self {
            FileKind::DocLink => "doc-link",
            FileKind::DocOther => "doc-other",
            FileKind::Code => "code",
            FileKind::Config => "config",
            FileKind::Generic => "generic",
        }
    }

    pub fn is_interactive(self) -> bool {
        self == FileKind::DocLink
    }
}

static FILE_KINDS: Lazy<HashMap<&'static str, FileKind>> = Lazy::new(|| {
    let groups: [(FileKind, &[&str]); 5] = [
        (FileKind::DocLink, &["org", "md", "markdown", "mdx"]),
        (
            FileKind::DocOther,
            &["txt", "rst", "adoc", "asciidoc", "pdf", "html", "htm", "tex"],
        ),
        (
            FileKind::Code,
            &[
                "rs", "ts", "tsx", "js", "jsx", "mjs", "py", "go", "java", "kt", "c", "h", "cc",
                "cpp", "hpp", "cs", "rb", "php", "swift", "sh", "bash", "zsh", "el", "lua", "css",
                "scss", "sql",
            ],
        ),
        (
            FileKind::Config,
            &[
                "json", "yaml", "yml", "toml", "ini", "cfg", "conf", "env", "xml", "lock",
            ],
        ),
        (
            FileKind::Generic,
            &["csv", "tsv", "log", "png", "jpg", "jpeg", "gif", "svg", "zip", "gz"],
        ),
    ];
    groups
        .into_iter()
        .flat_map(|(kind, extensions)| extensions.iter().map(move |ext| (*ext, kind)))
        .collect()
});

static FILE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\w~./-]*[\w-]\.([A-Za-z0-9]+)(?::(\d+))?").expect("file token pattern compiles")
});

const SKIPPED_TAGS: &[&str] = &["pre", "code", "a", "script", "style", "textarea"];

/// Classify a file extension, case-insensitively.
pub fn classify(extension: &str) -> Option<FileKind> {
    FILE_KINDS.get(extension.to_ascii_lowercase().as_str()).copied()
}

#[derive(Debug, Clone, Serialize)]
pub struct FileRef {
    /// Matched text, including any `:line` suffix
    pub text: String,
    pub path: String,
    pub line: Option<u32>,
    pub extension: String,
    pub kind: FileKind,
    #[serde(skip)]
    pub element: Handle,
}

struct Match {
    start: usize,
    end: usize,
    path: String,
    line: Option<u32>,
    extension: String,
    kind: FileKind,
}

fn find_matches(text: &str) -> Vec<Match> {
    FILE_TOKEN
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if !starts_token(text, whole.start()) {
                return None;
            }
            let extension = caps.get(1)?.as_str();
            let kind = classify(extension)?;
            let line = caps.get(2).and_then(|m| m.as_str().parse().ok());
            let path_end = caps.get(1)?.end();
            Some(Match {
                start: whole.start(),
                end: whole.end(),
                path: text[whole.start()..path_end].to_string(),
                line,
                extension: extension.to_ascii_lowercase(),
                kind,
            })
        })
        .collect()
}

/// A reference must start a token: not mid-word and not after the `@` of an address.
fn starts_token(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !(c.is_alphanumeric() || c == '_' || c == '@'))
}

fn is_skipped(handle: &Handle) -> bool {
    tag_name(handle).is_some_and(|tag| SKIPPED_TAGS.contains(&tag)) || has_class(handle, FILE_REF_CLASS)
}

/// Text nodes eligible for scanning, in document order.
fn candidate_text_nodes(root: &Handle) -> Vec<Handle> {
    let mut found = Vec::new();
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        match node.data {
            NodeData::Text { .. } => found.push(node.clone()),
            NodeData::Element { .. } if is_skipped(&node) => {}
            _ => stack.extend(node.children.borrow().iter().rev().cloned()),
        }
    }
    found
}

/// Wrap every file reference under `root` in a classified span.
pub fn linkify(root: &Handle) -> Vec<FileRef> {
    let mut refs = Vec::new();
    for text_node in candidate_text_nodes(root) {
        let Some(text) = text_of(&text_node) else {
            continue;
        };
        let matches = find_matches(&text);
        if matches.is_empty() || parent_of(&text_node).is_none() {
            continue;
        }

        let mut pieces = Vec::with_capacity(matches.len() * 2 + 1);
        let mut cursor = 0;
        for m in matches {
            if m.start > cursor {
                pieces.push(create_text(&text[cursor..m.start]));
            }
            let matched = &text[m.start..m.end];
            let element = file_ref_element(matched, &m);
            pieces.push(element.clone());
            refs.push(FileRef {
                text: matched.to_string(),
                path: m.path,
                line: m.line,
                extension: m.extension,
                kind: m.kind,
                element,
            });
            cursor = m.end;
        }
        if cursor < text.len() {
            pieces.push(create_text(&text[cursor..]));
        }
        replace_with(&text_node, pieces);
    }
    log::debug!("linked {} file references", refs.len());
    refs
}

fn file_ref_element(matched: &str, m: &Match) -> Handle {
    let class = format!("{FILE_REF_CLASS} {}", m.kind.class());
    let line = m.line.map(|l| l.to_string());
    let mut attrs = vec![
        ("class", class.as_str()),
        ("data-path", m.path.as_str()),
        ("data-kind", m.kind.class()),
    ];
    if let Some(line) = &line {
        attrs.push(("data-line", line.as_str()));
    }
    if m.kind.is_interactive() {
        attrs.push(("role", "link"));
        attrs.push(("tabindex", "0"));
        attrs.push(("title", "Open file"));
    }
    let span = create_element("span", &attrs);
    append_child(&span, create_text(matched));
    span
}

/// The file reference element `target` sits in, if any.
pub fn enclosing_file_ref(target: &Handle) -> Option<Handle> {
    crate::dom::ancestors(target).find(|node| has_class(node, FILE_REF_CLASS))
}
