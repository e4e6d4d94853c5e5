//! Shared fixtures for the integration tests

use orgview_render::view::{Layout, ViewRequest};
use orgview_render::{render_fragment, ViewOptions, ViewSession};
use std::collections::HashMap;

/// Render `source` and load it into a fresh session that records host requests.
pub fn session_for(source: &str) -> (ViewSession<Vec<ViewRequest>>, u64) {
    let mut session = ViewSession::new(Vec::new(), ViewOptions::default());
    let generation = session.load(&render_fragment(source));
    (session, generation)
}

/// Fixed geometry keyed by heading id.
#[derive(Default)]
pub struct FakeLayout {
    pub heights: HashMap<String, f64>,
    pub tops: HashMap<String, f64>,
    pub toc_entries: Vec<(f64, f64)>,
    pub toc_scroll_top: f64,
    pub toc_viewport: f64,
}

impl FakeLayout {
    pub fn with_heights(heights: &[(&str, f64)]) -> Self {
        Self {
            heights: heights
                .iter()
                .map(|(id, h)| (id.to_string(), *h))
                .collect(),
            toc_viewport: f64::INFINITY,
            ..Default::default()
        }
    }

    pub fn scrolled_to(mut self, tops: &[(&str, f64)]) -> Self {
        self.tops = tops.iter().map(|(id, t)| (id.to_string(), *t)).collect();
        self
    }
}

impl Layout for FakeLayout {
    fn heading_height(&self, id: &str) -> f64 {
        self.heights.get(id).copied().unwrap_or(0.0)
    }

    fn heading_top(&self, id: &str) -> f64 {
        self.tops.get(id).copied().unwrap_or(f64::INFINITY)
    }

    fn toc_entry_span(&self, index: usize) -> (f64, f64) {
        self.toc_entries.get(index).copied().unwrap_or((0.0, 0.0))
    }

    fn toc_scroll_top(&self) -> f64 {
        self.toc_scroll_top
    }

    fn toc_viewport_height(&self) -> f64 {
        self.toc_viewport
    }
}
