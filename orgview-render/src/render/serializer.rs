//! Render tree → markup string
//!
//! Pipeline: RenderNode → RcDom (HTML DOM tree) → html5ever serialization.
//! Raw nodes are parsed as HTML fragments and grafted in, so malformed export blocks are
//! repaired by the parser instead of leaking into the page.

use super::nodes::RenderNode;
use crate::dom::{
    append_child, create_comment, create_element, create_text, parse_fragment, take_children,
};
use crate::error::RenderError;
use html5ever::serialize::{serialize as serialize_node, SerializeOpts, TraversalScope};
use markup5ever_rcdom::{Handle, RcDom, SerializableHandle};

/// Serialize a sanitized render tree into a markup fragment.
pub fn serialize(tree: &RenderNode) -> Result<String, RenderError> {
    let dom = build_dom(tree)?;
    serialize_dom(&dom)
}

fn build_dom(tree: &RenderNode) -> Result<RcDom, RenderError> {
    let dom = RcDom::default();
    let container = create_element("div", &[]);
    match tree {
        RenderNode::Root { children } => append_all(&container, children)?,
        other => append(&container, other)?,
    }
    append_child(&dom.document, container);
    Ok(dom)
}

fn append_all(parent: &Handle, nodes: &[RenderNode]) -> Result<(), RenderError> {
    for node in nodes {
        append(parent, node)?;
    }
    Ok(())
}

fn append(parent: &Handle, node: &RenderNode) -> Result<(), RenderError> {
    match node {
        RenderNode::Root { children } => append_all(parent, children)?,
        RenderNode::Element {
            tag,
            attrs,
            children,
        } => {
            let attrs: Vec<(&str, &str)> =
                attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            let element = create_element(tag, &attrs);
            append_all(&element, children)?;
            append_child(parent, element);
        }
        RenderNode::Text { value } => append_child(parent, create_text(value)),
        RenderNode::Comment { value } => append_child(parent, create_comment(value)),
        RenderNode::Raw { value } => {
            let (_dom, body) = parse_fragment(value);
            for node in take_children(&body) {
                append_child(parent, node);
            }
        }
        RenderNode::Other { kind, .. } => {
            return Err(RenderError::SerializationError(format!(
                "cannot serialize node of kind '{kind}'"
            )))
        }
    }
    Ok(())
}

/// Serialize the children of the container (the container itself is not emitted)
fn serialize_dom(dom: &RcDom) -> Result<String, RenderError> {
    let mut output = Vec::new();

    let container = dom
        .document
        .children
        .borrow()
        .first()
        .ok_or_else(|| RenderError::SerializationError("Empty document".to_string()))?
        .clone();

    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    for child in container.children.borrow().iter() {
        let serializable = SerializableHandle::from(child.clone());
        serialize_node(&mut output, &serializable, opts.clone()).map_err(|e| {
            RenderError::SerializationError(format!("HTML serialization failed: {e}"))
        })?;
    }

    String::from_utf8(output)
        .map_err(|e| RenderError::SerializationError(format!("UTF-8 conversion failed: {e}")))
}
