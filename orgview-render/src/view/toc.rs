//! Table of contents
//!
//! One entry per heading, in document order, labelled with the heading text as written
//! and tagged with its level. A document without headings has no TOC at all.

use crate::dom::{add_class, append_child, create_element, create_text, remove_class};
use super::sections::Section;
use markup5ever_rcdom::Handle;
use serde::Serialize;

pub const ACTIVE_CLASS: &str = "active";

#[derive(Debug, Clone, Serialize)]
pub struct TocEntry {
    /// Anchor id of the heading this entry scrolls to
    pub id: String,
    pub level: usize,
    pub label: String,
    #[serde(skip)]
    pub element: Handle,
}

#[derive(Debug, Clone, Serialize)]
pub struct Toc {
    pub entries: Vec<TocEntry>,
    pub active: Option<usize>,
    #[serde(skip)]
    pub panel: Handle,
}

impl Toc {
    /// Build the TOC panel; `None` when there are no sections.
    pub fn build(sections: &[Section]) -> Option<Toc> {
        if sections.is_empty() {
            return None;
        }
        let panel = create_element("nav", &[("class", "org-toc"), ("aria-label", "Contents")]);
        let list = create_element("ul", &[]);
        append_child(&panel, list.clone());

        let entries = sections
            .iter()
            .map(|section| {
                let class = format!("toc-entry toc-level-{}", section.level);
                let href = format!("#{}", section.id);
                let item = create_element(
                    "li",
                    &[("class", class.as_str()), ("data-target", section.id.as_str())],
                );
                let link = create_element("a", &[("href", href.as_str())]);
                append_child(&link, create_text(&section.label));
                append_child(&item, link);
                append_child(&list, item.clone());
                TocEntry {
                    id: section.id.clone(),
                    level: section.level,
                    label: section.label.clone(),
                    element: item,
                }
            })
            .collect();

        Some(Toc {
            entries,
            active: None,
            panel,
        })
    }

    /// Mark one entry active and clear every other.
    pub fn set_active(&mut self, index: Option<usize>) {
        for (i, entry) in self.entries.iter().enumerate() {
            if Some(i) == index {
                add_class(&entry.element, ACTIVE_CLASS);
            } else {
                remove_class(&entry.element, ACTIVE_CLASS);
            }
        }
        self.active = index;
    }
}

/// New TOC scroll position that brings `(top, height)` into a viewport, if it is not
/// fully visible already.
pub fn ensure_visible(entry: (f64, f64), scroll_top: f64, viewport_height: f64) -> Option<f64> {
    let (top, height) = entry;
    if top < scroll_top {
        Some(top)
    } else if top + height > scroll_top + viewport_height {
        Some((top + height - viewport_height).max(0.0))
    } else {
        None
    }
}
