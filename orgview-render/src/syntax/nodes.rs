//! Core data structures for the org syntax tree.
//!
//! Every node is a [`NodeKind`] tag plus an ordered list of children. Leaf payloads
//! (text, timestamps, drawer pairs) live on the kind; structural content lives in
//! `children`, so tree rewrites can replace one node with zero, one or many nodes
//! without caring about the payload shape.

use serde::Serialize;

/// A single node of the syntax tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

/// Checkbox state carried by list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CheckboxState {
    #[default]
    None,
    On,
    Off,
    Partial,
}

/// Emphasis wrapper styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    Bold,
    Italic,
    Underline,
    Strike,
}

/// The closed set of node kinds produced by the parser and the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeKind {
    Document,
    Headline {
        level: usize,
        keyword: Option<String>,
        priority: Option<char>,
        tags: Vec<String>,
    },
    Paragraph,
    List {
        ordered: bool,
        description: bool,
    },
    ListItem {
        checkbox: CheckboxState,
    },
    DescriptionTerm,
    Text {
        value: String,
    },
    Emphasis {
        style: Emphasis,
    },
    Code {
        value: String,
    },
    Verbatim {
        value: String,
    },
    Link {
        path: String,
    },
    Subscript {
        braced: bool,
    },
    Superscript {
        braced: bool,
    },
    /// Math exactly as written; `raw` keeps its delimiters.
    Math {
        raw: String,
        value: String,
    },
    DisplayMath {
        value: String,
    },
    LineBreak,
    Keyword {
        key: String,
        value: String,
    },
    Planning {
        scheduled: Option<String>,
        deadline: Option<String>,
        closed: Option<String>,
    },
    PropertyDrawer {
        properties: Vec<(String, String)>,
    },
    Drawer {
        name: String,
    },
    Clock {
        range: String,
        duration: Option<String>,
        running: bool,
    },
    SrcBlock {
        language: Option<String>,
        value: String,
    },
    ExampleBlock {
        value: String,
    },
    QuoteBlock,
    ExportBlock {
        backend: String,
        value: String,
    },
    SpecialBlock {
        name: String,
    },
    Table,
    TableRow {
        header: bool,
    },
    TableCell,
    HorizontalRule,
    Comment {
        value: String,
    },
    /// Anything the grammar recognizes but does not model (footnotes, etc.).
    Unknown {
        kind: String,
        value: Option<String>,
    },
}

impl Node {
    pub fn new(kind: NodeKind, children: Vec<Node>) -> Self {
        Self { kind, children }
    }

    pub fn leaf(kind: NodeKind) -> Self {
        Self::new(kind, Vec::new())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Text {
            value: value.into(),
        })
    }

    pub fn code(value: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Code {
            value: value.into(),
        })
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Paragraph, children)
    }

    pub fn bold(children: Vec<Node>) -> Self {
        Self::new(
            NodeKind::Emphasis {
                style: Emphasis::Bold,
            },
            children,
        )
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &Node, out: &mut String) {
    match &node.kind {
        NodeKind::Text { value } | NodeKind::Code { value } | NodeKind::Verbatim { value } => {
            out.push_str(value)
        }
        NodeKind::Math { value, .. } | NodeKind::DisplayMath { value } => out.push_str(value),
        _ => {}
    }
    for child in &node.children {
        collect_text(child, out);
    }
}
