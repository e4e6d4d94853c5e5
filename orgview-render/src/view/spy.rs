//! Scroll spy
//!
//! Scroll events may arrive far faster than frames. At most one measurement is pending at
//! a time: the first scroll schedules a frame, later ones are absorbed until it runs.

use super::sections::Section;
use super::sticky::Layout;

/// Proof that a frame was scheduled for a given render generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicket {
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct ScrollSpy {
    scheduled: bool,
    tolerance: f64,
}

impl ScrollSpy {
    pub fn new(tolerance: f64) -> Self {
        Self {
            scheduled: false,
            tolerance,
        }
    }

    /// Request a measurement; `None` while one is already pending.
    pub fn schedule(&mut self, generation: u64) -> Option<FrameTicket> {
        if self.scheduled {
            return None;
        }
        self.scheduled = true;
        Some(FrameTicket { generation })
    }

    /// Called when the scheduled frame runs.
    pub fn complete(&mut self) {
        self.scheduled = false;
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// The last section whose heading has reached its sticky offset (within tolerance).
    /// Falls back to the first section when none has.
    pub fn pick_active(&self, sections: &[Section], layout: &dyn Layout) -> Option<usize> {
        if sections.is_empty() {
            return None;
        }
        let reached = sections
            .iter()
            .enumerate()
            .filter(|(_, s)| layout.heading_top(&s.id) <= s.sticky_top + self.tolerance)
            .map(|(i, _)| i)
            .last();
        reached.or(Some(0))
    }
}
