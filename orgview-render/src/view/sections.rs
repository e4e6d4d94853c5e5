//! Flat-to-nested section construction
//!
//! The rendered markup is flat: headings and their content are siblings. This rebuilds the
//! hierarchy in one left-to-right pass over the top-level nodes with an explicit stack of
//! open sections (no recursion, so depth is bounded by heading levels, not input size).
//!
//! For a heading of level L, every open section of level >= L is closed first: a heading
//! never nests under one of the same or a shallower level. The heading and a fresh body
//! container become a new section, attached to the body of whatever is left on top of the
//! stack (or the root). Anything that is not a heading goes into the top section's body.
//!
//! Input `h1 A, h2 B, h1 C` therefore yields two top-level sections, with B inside A.

use crate::dom::{
    add_class, append_child, create_element, create_text, has_class, heading_level, prepend_child,
    remove_class, set_attribute, set_text, take_children, text_content,
};
use crate::slug::SlugRegistry;
use markup5ever_rcdom::Handle;
use serde::Serialize;

/// Index of a section in the arena, in document order.
pub type SectionId = usize;

pub const SECTION_CLASS: &str = "org-section";
pub const BODY_CLASS: &str = "section-body";
pub const TOGGLE_CLASS: &str = "section-toggle";
pub const COLLAPSED_CLASS: &str = "collapsed";

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub level: usize,
    /// Anchor id written onto the heading
    pub id: String,
    /// Heading text as written, read before the toggle is inserted
    pub label: String,
    pub parent: Option<SectionId>,
    pub children: Vec<SectionId>,
    pub collapsed: bool,
    /// Pinned offset once layout has been applied
    pub sticky_top: f64,
    #[serde(skip)]
    pub heading: Handle,
    #[serde(skip)]
    pub body: Handle,
    #[serde(skip)]
    pub wrapper: Handle,
    #[serde(skip)]
    pub toggle: Handle,
}

impl Section {
    /// Strict ancestors, nearest first.
    pub fn ancestors<'a>(&self, arena: &'a [Section]) -> impl Iterator<Item = &'a Section> {
        std::iter::successors(self.parent.map(|p| &arena[p]), move |s| {
            s.parent.map(|p| &arena[p])
        })
    }
}

/// Glyphs shown in the heading toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleGlyphs {
    pub expanded: String,
    pub collapsed: String,
}

impl Default for ToggleGlyphs {
    fn default() -> Self {
        Self {
            expanded: "▾".to_string(),
            collapsed: "▸".to_string(),
        }
    }
}

/// Nest the children of `root` into sections; returns the arena in document order.
pub fn build_sections(root: &Handle, glyphs: &ToggleGlyphs) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut stack: Vec<(usize, SectionId)> = Vec::new();
    let mut slugs = SlugRegistry::default();

    for node in take_children(root) {
        let Some(level) = heading_level(&node) else {
            let container = stack
                .last()
                .map_or_else(|| root.clone(), |&(_, id)| sections[id].body.clone());
            append_child(&container, node);
            continue;
        };

        while stack.last().is_some_and(|&(open, _)| open >= level) {
            stack.pop();
        }
        let parent = stack.last().map(|&(_, id)| id);
        let id = sections.len();

        let level_class = format!("{SECTION_CLASS} level-{level}");
        let wrapper = create_element("section", &[("class", level_class.as_str())]);
        let body = create_element("div", &[("class", BODY_CLASS)]);

        let label = text_content(&node).trim().to_string();
        let anchor = slugs.unique(&label);
        set_attribute(&node, "id", &anchor);
        add_class(&node, "org-heading");
        let toggle = create_element("span", &[("class", TOGGLE_CLASS), ("aria-hidden", "true")]);
        append_child(&toggle, create_text(&glyphs.expanded));
        prepend_child(&node, toggle.clone());

        append_child(&wrapper, node.clone());
        append_child(&wrapper, body.clone());
        let container = parent.map_or_else(|| root.clone(), |p| sections[p].body.clone());
        append_child(&container, wrapper.clone());

        if let Some(p) = parent {
            sections[p].children.push(id);
        }
        sections.push(Section {
            level,
            id: anchor,
            label,
            parent,
            children: Vec::new(),
            collapsed: false,
            sticky_top: 0.0,
            heading: node,
            body,
            wrapper,
            toggle,
        });
        stack.push((level, id));
    }

    log::debug!("built {} sections", sections.len());
    sections
}

/// Flip a section between expanded and collapsed; returns the new collapsed state.
pub fn toggle_section(section: &mut Section, glyphs: &ToggleGlyphs) -> bool {
    section.collapsed = !section.collapsed;
    if section.collapsed {
        add_class(&section.body, COLLAPSED_CLASS);
        set_text(&section.toggle, &glyphs.collapsed);
    } else {
        remove_class(&section.body, COLLAPSED_CLASS);
        set_text(&section.toggle, &glyphs.expanded);
    }
    debug_assert_eq!(has_class(&section.body, COLLAPSED_CLASS), section.collapsed);
    section.collapsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{inner_html, parse_fragment, tag_name};

    fn build(html: &str) -> (markup5ever_rcdom::RcDom, Handle, Vec<Section>) {
        let (dom, body) = parse_fragment(html);
        let sections = build_sections(&body, &ToggleGlyphs::default());
        (dom, body, sections)
    }

    #[test]
    fn same_level_heading_closes_previous() {
        let (_dom, body, sections) = build("<h1>A</h1><h2>B</h2><h1>C</h1>");
        assert_eq!(sections.len(), 3);
        assert_eq!(body.children.borrow().len(), 2);
        assert_eq!(sections[1].parent, Some(0));
        assert_eq!(sections[2].parent, None);
        assert_eq!(sections[0].children, vec![1]);
    }

    #[test]
    fn content_goes_to_the_innermost_open_section() {
        let (_dom, body, sections) = build("<p>intro</p><h1>A</h1><p>a</p><h3>Deep</h3><p>d</p>");
        let top: Vec<_> = body
            .children
            .borrow()
            .iter()
            .filter_map(|h| tag_name(h).map(str::to_string))
            .collect();
        assert_eq!(top, vec!["p", "section"]);
        assert_eq!(inner_html(&sections[1].body), "<p>d</p>");
        assert!(inner_html(&sections[0].body).starts_with("<p>a</p><section"));
    }

    #[test]
    fn wrapper_holds_heading_and_one_body() {
        let (_dom, _body, sections) = build("<h2>Only</h2><p>x</p>");
        let section = &sections[0];
        let kids = section.wrapper.children.borrow();
        assert_eq!(kids.len(), 2);
        assert_eq!(tag_name(&kids[0]), Some("h2"));
        assert!(has_class(&kids[1], BODY_CLASS));
        assert_eq!(section.label, "Only");
        assert_eq!(section.id, "only");
    }

    #[test]
    fn label_keeps_glyphs_written_in_the_heading() {
        let (_dom, _body, sections) = build("<h1>Status ▸ done</h1>");
        assert_eq!(sections[0].label, "Status ▸ done");
        assert!(text_content(&sections[0].heading).starts_with("▾Status ▸ done"));
    }

    #[test]
    fn duplicate_headings_get_unique_ids() {
        let (_dom, _body, sections) = build("<h1>Notes</h1><h1>Notes</h1>");
        assert_eq!(sections[0].id, "notes");
        assert_eq!(sections[1].id, "notes-2");
    }

    #[test]
    fn toggling_flips_class_and_glyph() {
        let glyphs = ToggleGlyphs::default();
        let (_dom, _body, mut sections) = build("<h1>A</h1><p>x</p>");
        assert!(toggle_section(&mut sections[0], &glyphs));
        assert!(has_class(&sections[0].body, COLLAPSED_CLASS));
        assert_eq!(text_content(&sections[0].toggle), "▸");
        assert!(!toggle_section(&mut sections[0], &glyphs));
        assert_eq!(text_content(&sections[0].toggle), "▾");
    }

    #[test]
    fn ancestors_walk_the_whole_chain() {
        let (_dom, _body, sections) = build("<h1>A</h1><h2>B</h2><h4>C</h4>");
        let chain: Vec<usize> = sections[2].ancestors(&sections).map(|s| s.level).collect();
        assert_eq!(chain, vec![2, 1]);
    }
}
