//! Unknown-node sanitizer
//!
//! Structural cleanup of the render tree before serialization. Each child the serializer
//! cannot write is replaced by its text payload, replaced by its own (cleaned) children,
//! or dropped, in that order of preference. Never fails.

use crate::render::RenderNode;

/// Remove every node kind the serializer does not understand.
pub fn sanitize(mut root: RenderNode) -> RenderNode {
    if let Some(children) = root.children_mut() {
        *children = sanitize_children(std::mem::take(children));
    }
    root
}

fn sanitize_children(children: Vec<RenderNode>) -> Vec<RenderNode> {
    let mut out = Vec::with_capacity(children.len());
    for child in children {
        match child {
            RenderNode::Other {
                kind,
                value: Some(value),
                ..
            } => {
                log::trace!("sanitizer: replacing {kind} with its text");
                out.push(RenderNode::text(value));
            }
            RenderNode::Other {
                kind, children, ..
            } => {
                if !children.is_empty() {
                    log::trace!("sanitizer: splicing children of {kind}");
                }
                out.extend(sanitize_children(children));
            }
            other => out.push(sanitize(other)),
        }
    }
    out
}
