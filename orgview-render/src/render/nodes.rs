//! Render tree: the intermediate shape between the syntax tree and markup
//!
//! The serializer understands `Root`, `Element`, `Text`, `Comment` and `Raw`. `Other`
//! carries constructs the converter could not map; it must be gone before serialization.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RenderNode {
    Root {
        children: Vec<RenderNode>,
    },
    Element {
        tag: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        attrs: Vec<(String, String)>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<RenderNode>,
    },
    Text {
        value: String,
    },
    Comment {
        value: String,
    },
    /// Markup passed through verbatim (html export blocks)
    Raw {
        value: String,
    },
    Other {
        kind: String,
        value: Option<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<RenderNode>,
    },
}

impl RenderNode {
    pub fn element(tag: &str, attrs: Vec<(&str, &str)>, children: Vec<RenderNode>) -> Self {
        RenderNode::Element {
            tag: tag.to_string(),
            attrs: attrs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            children,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        RenderNode::Text {
            value: value.into(),
        }
    }

    pub fn children(&self) -> &[RenderNode] {
        match self {
            RenderNode::Root { children }
            | RenderNode::Element { children, .. }
            | RenderNode::Other { children, .. } => children,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<RenderNode>> {
        match self {
            RenderNode::Root { children }
            | RenderNode::Element { children, .. }
            | RenderNode::Other { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Whether the serializer can write this node kind.
    pub fn is_serializable(&self) -> bool {
        !matches!(self, RenderNode::Other { .. })
    }
}
