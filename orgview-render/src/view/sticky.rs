//! Stacked sticky offsets and the host geometry seam
//!
//! Nested sticky headings must stack below their ancestors. A heading's pinned offset is
//! the sum of the rendered heights of every strict ancestor's heading, so top-level
//! headings always sit at 0.

use crate::dom::set_attribute;
use super::sections::Section;

/// Geometry supplied by the surface that actually lays the document out.
///
/// Headings are addressed by their anchor id. TOC entries are addressed by index and
/// measured relative to the scrollable TOC content.
pub trait Layout {
    /// Rendered height of a heading
    fn heading_height(&self, id: &str) -> f64;
    /// Current top of a heading relative to the viewport
    fn heading_top(&self, id: &str) -> f64;
    /// `(top, height)` of a TOC entry inside the TOC content
    fn toc_entry_span(&self, index: usize) -> (f64, f64) {
        let _ = index;
        (0.0, 0.0)
    }
    /// Current scroll position of the TOC panel
    fn toc_scroll_top(&self) -> f64 {
        0.0
    }
    /// Visible height of the TOC panel
    fn toc_viewport_height(&self) -> f64 {
        f64::INFINITY
    }
}

/// Offsets for every section, in arena order.
pub fn compute_offsets(sections: &[Section], layout: &dyn Layout) -> Vec<f64> {
    sections
        .iter()
        .map(|section| {
            section
                .ancestors(sections)
                .map(|ancestor| layout.heading_height(&ancestor.id))
                .sum::<f64>()
        })
        .collect()
}

/// Compute offsets and pin each heading at its offset.
pub fn apply_offsets(sections: &mut [Section], layout: &dyn Layout) {
    if sections.is_empty() {
        return;
    }
    let offsets = compute_offsets(sections, layout);
    for (section, top) in sections.iter_mut().zip(offsets) {
        section.sticky_top = top;
        set_attribute(&section.heading, "style", &format!("top: {top}px"));
    }
}
