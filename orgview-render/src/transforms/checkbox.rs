//! Checkbox injector
//!
//! Runs after [`super::normalize`]: list items keep their checkbox state as data, and the
//! converter never renders it, so a glyph is written into the item's content instead.
//! Exactly one glyph goes into each checkboxed item; items without a checkbox are left alone.

use crate::syntax::{CheckboxState, Node, NodeKind};

fn glyph(state: CheckboxState) -> Option<&'static str> {
    match state {
        CheckboxState::On => Some("☑"),
        CheckboxState::Off => Some("☐"),
        CheckboxState::Partial => Some("☒"),
        CheckboxState::None => None,
    }
}

/// Insert checkbox glyphs into every list item of the tree.
pub fn inject_checkboxes(mut node: Node) -> Node {
    if let NodeKind::ListItem { checkbox } = node.kind {
        if let Some(glyph) = glyph(checkbox) {
            insert_glyph(&mut node.children, glyph);
        }
    }
    node.children = std::mem::take(&mut node.children)
        .into_iter()
        .map(inject_checkboxes)
        .collect();
    node
}

fn insert_glyph(children: &mut Vec<Node>, glyph: &str) {
    let leading = children.first_mut().filter(|first| {
        !first.children.is_empty()
            && matches!(first.kind, NodeKind::Paragraph | NodeKind::DescriptionTerm)
    });
    match leading {
        Some(first) => first.children.insert(0, Node::text(format!("{glyph} "))),
        None => children.insert(0, Node::paragraph(vec![Node::text(glyph)])),
    }
}
