//! Small DOM toolkit over `markup5ever_rcdom`
//!
//! Shared by the serializer, which builds a fresh tree from the render tree, and by the
//! view, which edits the live tree parsed back from the markup. Structural edits keep
//! parent pointers in step, since click handling walks ancestors through them.

use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{ns, parse_document, Attribute, LocalName, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Parse a markup fragment; returns the document and its `<body>`.
pub fn parse_fragment(html: &str) -> (RcDom, Handle) {
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");
    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .one(wrapped.as_bytes());
    let body = find_first_element(&dom.document, "body").unwrap_or_else(|| dom.document.clone());
    (dom, body)
}

/// Create a detached element
pub fn create_element(tag: &str, attrs: &[(&str, &str)]) -> Handle {
    let attributes = attrs
        .iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(*name)),
            value: (*value).into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: QualName::new(None, ns!(html), LocalName::from(tag)),
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a detached comment node
pub fn create_comment(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Comment {
            contents: text.into(),
        },
    })
}

/// Create a detached text node
pub fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.into()),
        },
    })
}

pub fn tag_name(handle: &Handle) -> Option<&str> {
    match handle.data {
        NodeData::Element { ref name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

pub fn text_of(handle: &Handle) -> Option<String> {
    match handle.data {
        NodeData::Text { ref contents } => Some(contents.borrow().to_string()),
        _ => None,
    }
}

/// Get text content from a node (ignoring tags)
pub fn text_content(handle: &Handle) -> String {
    let mut text = String::new();
    collect_text(handle, &mut text);
    text
}

fn collect_text(handle: &Handle, text: &mut String) {
    match handle.data {
        NodeData::Text { ref contents } => text.push_str(&contents.borrow()),
        NodeData::Element { .. } | NodeData::Document => {
            for child in handle.children.borrow().iter() {
                collect_text(child, text);
            }
        }
        _ => {}
    }
}

pub fn set_text(handle: &Handle, text: &str) {
    if let NodeData::Text { ref contents } = handle.data {
        *contents.borrow_mut() = text.into();
    } else {
        let node = create_text(text);
        for child in handle.children.borrow_mut().drain(..) {
            child.parent.set(None);
        }
        append_child(handle, node);
    }
}

/// Get an attribute value from an element
pub fn get_attribute(handle: &Handle, attr_name: &str) -> Option<String> {
    if let NodeData::Element { ref attrs, .. } = handle.data {
        return attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.as_ref() == attr_name)
            .map(|attr| attr.value.to_string());
    }
    None
}

/// Set an attribute on an element, replacing any previous value
pub fn set_attribute(handle: &Handle, attr_name: &str, value: &str) {
    if let NodeData::Element { ref attrs, .. } = handle.data {
        let mut attrs = attrs.borrow_mut();
        if let Some(attr) = attrs
            .iter_mut()
            .find(|attr| attr.name.local.as_ref() == attr_name)
        {
            attr.value = value.into();
            return;
        }
        attrs.push(Attribute {
            name: QualName::new(None, ns!(), LocalName::from(attr_name)),
            value: value.into(),
        });
    }
}

pub fn has_class(handle: &Handle, class: &str) -> bool {
    get_attribute(handle, "class")
        .map(|classes| classes.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

pub fn add_class(handle: &Handle, class: &str) {
    if has_class(handle, class) {
        return;
    }
    let classes = match get_attribute(handle, "class") {
        Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
        _ => class.to_string(),
    };
    set_attribute(handle, "class", &classes);
}

pub fn remove_class(handle: &Handle, class: &str) {
    if let Some(existing) = get_attribute(handle, "class") {
        let kept: Vec<&str> = existing.split_whitespace().filter(|c| *c != class).collect();
        set_attribute(handle, "class", &kept.join(" "));
    }
}

pub fn parent_of(handle: &Handle) -> Option<Handle> {
    let weak = handle.parent.take()?;
    let parent = weak.upgrade();
    handle.parent.set(Some(weak));
    parent
}

/// The node itself, then each ancestor up to the document.
pub fn ancestors(handle: &Handle) -> impl Iterator<Item = Handle> {
    std::iter::successors(Some(handle.clone()), parent_of)
}

pub fn append_child(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

pub fn prepend_child(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().insert(0, child);
}

/// Detach and return all children of `parent`.
pub fn take_children(parent: &Handle) -> Vec<Handle> {
    let children = std::mem::take(&mut *parent.children.borrow_mut());
    for child in &children {
        child.parent.set(None);
    }
    children
}

/// Replace `old` inside its parent with `replacements`, in order.
pub fn replace_with(old: &Handle, replacements: Vec<Handle>) {
    let Some(parent) = parent_of(old) else { return };
    let mut children = parent.children.borrow_mut();
    let Some(index) = children.iter().position(|c| Rc::ptr_eq(c, old)) else {
        return;
    };
    for node in &replacements {
        node.parent.set(Some(Rc::downgrade(&parent)));
    }
    children.splice(index..=index, replacements);
    old.parent.set(None);
}

/// Get the first element with the given local name
pub fn find_first_element(handle: &Handle, name: &str) -> Option<Handle> {
    if tag_name(handle) == Some(name) {
        return Some(handle.clone());
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_first_element(child, name))
}

pub fn heading_level(handle: &Handle) -> Option<usize> {
    let tag = tag_name(handle)?;
    let digit = tag.strip_prefix('h')?;
    match digit.parse::<usize>() {
        Ok(level @ 1..=6) => Some(level),
        _ => None,
    }
}

/// Serialize the children of `handle` (the node itself is not emitted).
pub fn inner_html(handle: &Handle) -> String {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    for child in handle.children.borrow().iter() {
        let serializable = SerializableHandle::from(child.clone());
        if let Err(err) = serialize(&mut output, &serializable, opts.clone()) {
            log::warn!("failed to serialize view node: {err}");
        }
    }
    String::from_utf8_lossy(&output).into_owned()
}

/// Serialize `handle` including its own tag.
pub fn outer_html(handle: &Handle) -> String {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    let serializable = SerializableHandle::from(handle.clone());
    if let Err(err) = serialize(&mut output, &serializable, opts) {
        log::warn!("failed to serialize view node: {err}");
    }
    String::from_utf8_lossy(&output).into_owned()
}
