//! Structural enhancer and view session
//!
//!     The rendered markup is flat. The view parses it into a live tree and reworks it into
//!     a navigable document: nested collapsible sections, stacked sticky headings, a table
//!     of contents synchronized by a scroll spy, and file references the user can open.
//!
//!     All geometry comes from the host through the [`Layout`] trait, and everything the
//!     view asks of the host goes through a [`HostChannel`]. The session itself is plain,
//!     single-threaded state.
//!
//! Generations
//!
//!     Every [`ViewSession::load`] replaces the whole enhanced document and bumps a render
//!     generation. Callbacks carry the generation they were issued for; anything stale is
//!     ignored, so a late click or frame can never touch a document that has been replaced.
//!
//! Missing structure
//!
//!     A document with no headings has no sections, no TOC and nothing to spy on. Each of
//!     those steps returns early instead of failing.

pub mod file_refs;
pub mod panels;
pub mod protocol;
pub mod sections;
pub mod spy;
pub mod sticky;
pub mod toc;

pub use file_refs::{FileKind, FileRef};
pub use panels::{CopyFeedback, DocMap, TemplatePanel};
pub use protocol::{DocFile, HostChannel, HostMessage, JsonLines, ViewRequest};
pub use sections::{Section, SectionId, ToggleGlyphs};
pub use spy::{FrameTicket, ScrollSpy};
pub use sticky::Layout;
pub use toc::{Toc, TocEntry};

use crate::error::ViewError;
use crate::dom::{
    self, append_child, create_element, get_attribute, outer_html, parse_fragment, take_children,
};
use markup5ever_rcdom::{Handle, RcDom};
use std::rc::Rc;

/// Knobs for the enhancer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    pub glyphs: ToggleGlyphs,
    /// Slack, in pixels, when deciding whether a heading has reached its sticky offset
    pub spy_tolerance: f64,
    pub link_file_references: bool,
    pub toc: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            glyphs: ToggleGlyphs::default(),
            spy_tolerance: 8.0,
            link_file_references: true,
            toc: true,
        }
    }
}

/// What a click did.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    Toggled { section: SectionId, collapsed: bool },
    OpenFile { path: String },
    Ignored,
}

/// Ask the host to bring a heading into view.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollRequest {
    pub id: String,
    pub smooth: bool,
}

/// Result of one scroll-spy pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SpyUpdate {
    /// Active TOC entry
    pub active: Option<usize>,
    /// New TOC scroll position, when the active entry was out of view
    pub toc_scroll: Option<f64>,
}

/// The document as rebuilt by the enhancer.
pub struct EnhancedDocument {
    _dom: RcDom,
    /// `<div class="org-view">` holding the TOC and the content
    pub root: Handle,
    /// `<main class="org-content">` holding the sections
    pub content: Handle,
    pub sections: Vec<Section>,
    pub toc: Option<Toc>,
    pub file_refs: Vec<FileRef>,
}

impl EnhancedDocument {
    /// Parse rendered markup and apply every structural step that needs no geometry.
    pub fn build(html: &str, options: &ViewOptions) -> Self {
        let (dom, body) = parse_fragment(html);
        let root = create_element("div", &[("class", "org-view")]);
        let content = create_element("main", &[("class", "org-content")]);
        for node in take_children(&body) {
            append_child(&content, node);
        }

        let sections = sections::build_sections(&content, &options.glyphs);
        let toc = if options.toc {
            Toc::build(&sections)
        } else {
            None
        };
        let file_refs = if options.link_file_references {
            file_refs::linkify(&content)
        } else {
            Vec::new()
        };

        if let Some(toc) = &toc {
            append_child(&root, toc.panel.clone());
        }
        append_child(&root, content.clone());
        append_child(&body, root.clone());

        Self {
            _dom: dom,
            root,
            content,
            sections,
            toc,
            file_refs,
        }
    }

    pub fn to_html(&self) -> String {
        outer_html(&self.root)
    }

    fn section_for_heading(&self, node: &Handle) -> Option<SectionId> {
        self.sections
            .iter()
            .position(|s| Rc::ptr_eq(&s.heading, node))
    }
}

/// A live view: the current enhanced document plus everything the user interacts with.
pub struct ViewSession<C: HostChannel> {
    channel: C,
    options: ViewOptions,
    generation: u64,
    document: Option<EnhancedDocument>,
    spy: ScrollSpy,
    doc_map: DocMap,
    template: Option<TemplatePanel>,
    copy_feedback: CopyFeedback,
}

impl<C: HostChannel> ViewSession<C> {
    pub fn new(channel: C, options: ViewOptions) -> Self {
        let spy = ScrollSpy::new(options.spy_tolerance);
        Self {
            channel,
            options,
            generation: 0,
            document: None,
            spy,
            doc_map: DocMap::default(),
            template: None,
            copy_feedback: CopyFeedback::default(),
        }
    }

    /// Replace the document with freshly rendered markup; returns the new generation.
    pub fn load(&mut self, html: &str) -> u64 {
        self.generation += 1;
        self.spy = ScrollSpy::new(self.options.spy_tolerance);
        let document = EnhancedDocument::build(html, &self.options);
        log::debug!(
            "generation {}: {} sections, {} file references",
            self.generation,
            document.sections.len(),
            document.file_refs.len()
        );
        self.document = Some(document);
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn document(&self) -> Option<&EnhancedDocument> {
        self.document.as_ref()
    }

    pub fn sections(&self) -> &[Section] {
        match &self.document {
            Some(document) => document.sections.as_slice(),
            None => &[],
        }
    }

    pub fn toc(&self) -> Option<&Toc> {
        self.document.as_ref().and_then(|d| d.toc.as_ref())
    }

    pub fn file_refs(&self) -> &[FileRef] {
        match &self.document {
            Some(document) => document.file_refs.as_slice(),
            None => &[],
        }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn to_html(&self) -> String {
        self.document
            .as_ref()
            .map(EnhancedDocument::to_html)
            .unwrap_or_default()
    }

    fn is_current(&self, generation: u64, what: &str) -> bool {
        if generation != self.generation {
            log::warn!(
                "ignoring stale {what} for generation {generation} (current {})",
                self.generation
            );
            return false;
        }
        true
    }

    /// Pin sticky headings using measured heights, then run an initial spy pass.
    pub fn apply_layout(&mut self, layout: &dyn Layout) -> Option<SpyUpdate> {
        let document = self.document.as_mut()?;
        if document.sections.is_empty() {
            return None;
        }
        sticky::apply_offsets(&mut document.sections, layout);
        self.run_spy(layout)
    }

    /// Handle a click on `target`.
    ///
    /// File references win over headings: a doc link asks the host to open it, any other
    /// file reference or an ordinary link is left alone. Otherwise a click anywhere inside
    /// a heading toggles its section.
    pub fn click(&mut self, generation: u64, target: &Handle) -> Result<ClickOutcome, ViewError> {
        if !self.is_current(generation, "click") {
            return Ok(ClickOutcome::Ignored);
        }
        let Some(document) = self.document.as_mut() else {
            return Ok(ClickOutcome::Ignored);
        };

        if let Some(file_ref) = file_refs::enclosing_file_ref(target) {
            let interactive = dom::has_class(&file_ref, FileKind::DocLink.class());
            return match get_attribute(&file_ref, "data-path") {
                Some(path) if interactive => {
                    self.channel.post(&ViewRequest::OpenFile { path: path.clone() })?;
                    Ok(ClickOutcome::OpenFile { path })
                }
                _ => Ok(ClickOutcome::Ignored),
            };
        }

        for node in dom::ancestors(target) {
            if dom::tag_name(&node) == Some("a") {
                return Ok(ClickOutcome::Ignored);
            }
            if let Some(section) = document.section_for_heading(&node) {
                let collapsed =
                    sections::toggle_section(&mut document.sections[section], &self.options.glyphs);
                return Ok(ClickOutcome::Toggled { section, collapsed });
            }
            if Rc::ptr_eq(&node, &document.root) {
                break;
            }
        }
        Ok(ClickOutcome::Ignored)
    }

    /// Handle a click on the TOC entry at `index`.
    pub fn toc_click(&self, generation: u64, index: usize) -> Option<ScrollRequest> {
        if !self.is_current(generation, "toc click") {
            return None;
        }
        let entry = self.toc()?.entries.get(index)?;
        Some(ScrollRequest {
            id: entry.id.clone(),
            smooth: true,
        })
    }

    /// A scroll event; returns a ticket when a frame should be scheduled.
    pub fn on_scroll(&mut self, generation: u64) -> Option<FrameTicket> {
        if !self.is_current(generation, "scroll") || self.sections().is_empty() {
            return None;
        }
        self.spy.schedule(generation)
    }

    /// The scheduled frame: measure and update the active TOC entry.
    pub fn on_frame(&mut self, ticket: FrameTicket, layout: &dyn Layout) -> Option<SpyUpdate> {
        if !self.is_current(ticket.generation, "frame") {
            return None;
        }
        self.spy.complete();
        self.run_spy(layout)
    }

    fn run_spy(&mut self, layout: &dyn Layout) -> Option<SpyUpdate> {
        let document = self.document.as_mut()?;
        let active = self.spy.pick_active(&document.sections, layout);
        let toc = document.toc.as_mut()?;
        toc.set_active(active);
        let toc_scroll = active.and_then(|index| {
            toc::ensure_visible(
                layout.toc_entry_span(index),
                layout.toc_scroll_top(),
                layout.toc_viewport_height(),
            )
        });
        Some(SpyUpdate { active, toc_scroll })
    }

    /// Single inbound dispatcher for host messages.
    pub fn handle_message(&mut self, json: &str) -> Result<(), ViewError> {
        match HostMessage::from_json(json)? {
            HostMessage::DocFileMap { files } => {
                self.doc_map = DocMap::from_files(files);
                log::debug!("doc map updated: {} files", self.doc_map.len());
            }
            HostMessage::TemplateData { raw, html } => {
                self.template = Some(TemplatePanel { raw, html });
            }
            HostMessage::ClipboardCopied => self.copy_feedback = CopyFeedback::Copied,
        }
        Ok(())
    }

    pub fn request_doc_map(&mut self) -> Result<(), ViewError> {
        self.channel.post(&ViewRequest::ScanDocFiles)
    }

    pub fn request_template(&mut self) -> Result<(), ViewError> {
        self.channel.post(&ViewRequest::GetTemplate)
    }

    /// Open a file listed in the doc map.
    pub fn open_doc_file(&mut self, path: &str) -> Result<bool, ViewError> {
        if !self.doc_map.contains(path) {
            return Ok(false);
        }
        self.channel.post(&ViewRequest::OpenFile {
            path: path.to_string(),
        })?;
        Ok(true)
    }

    /// Copy the raw template; `false` when no template has arrived yet.
    pub fn copy_template(&mut self) -> Result<bool, ViewError> {
        let Some(template) = &self.template else {
            return Ok(false);
        };
        let request = ViewRequest::CopyToClipboard {
            text: template.raw.clone(),
        };
        self.channel.post(&request)?;
        Ok(true)
    }

    pub fn reset_copy_feedback(&mut self) {
        self.copy_feedback = CopyFeedback::Idle;
    }

    pub fn doc_map(&self) -> &DocMap {
        &self.doc_map
    }

    pub fn template(&self) -> Option<&TemplatePanel> {
        self.template.as_ref()
    }

    pub fn copy_feedback(&self) -> CopyFeedback {
        self.copy_feedback
    }
}
