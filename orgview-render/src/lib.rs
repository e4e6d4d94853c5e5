//! Org markup rendering and navigable document views
//!
//!     This crate turns org source into markup and then into an interactive, navigable
//!     document view. It powers the orgview-cli but is shell agnostic: no code here prints,
//!     reads env vars or touches the file system.
//!
//! Architecture
//!
//!     Two halves, joined by a string of markup:
//!
//!     1. The rendering pipeline (./pipeline.rs). The source parser, converter and serializer
//!        are generic; they know org grammar and HTML respectively, but not what org metadata
//!        means. The passes in ./transforms sit around them: the normalizer and checkbox
//!        injector rewrite the syntax tree so keywords, planning lines, drawers, clocks,
//!        checkboxes and display math survive, and the sanitizer strips render nodes the
//!        serializer cannot write.
//!
//!     2. The structural enhancer (./view). It parses the rendered markup back into a live
//!        tree and rebuilds it as nested collapsible sections with sticky headings, a table
//!        of contents, a scroll spy and clickable file references.
//!
//!     The file structure :
//!     .
//!     ├── dom.rs                  # Shared rcdom helpers
//!     ├── error.rs
//!     ├── slug.rs                 # Heading anchors
//!     ├── syntax                  # Source parser and syntax tree
//!     ├── transforms              # normalize, inject_checkboxes, sanitize
//!     ├── render                  # Render tree, converter, html5ever serializer
//!     ├── pipeline.rs             # Stage wiring and the never-failing boundary
//!     └── view                    # Structural enhancer, host protocol, panels
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── pipeline
//!     └── view
//!
//!     Note that rust does not by default discover tests in subdirectories, so these are
//!     included as modules from tests/lib.rs.
//!
//! Core Algorithms
//!
//!     The two pieces worth reading closely are the normalizer's replace-then-recurse rewrite
//!     (./transforms/normalize.rs) and the stack-based flat-to-nested section builder
//!     (./view/sections.rs). Both are iterative over siblings and keep all state local to a
//!     single call, so re-rendering the same text always yields the same bytes.

pub mod dom;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod slug;
pub mod syntax;
pub mod transforms;
pub mod view;

pub use error::{RenderError, ViewError};
pub use pipeline::{render_document, render_fragment, standalone_page, try_render, RenderOptions};
pub use view::{ViewOptions, ViewSession};

/// Stylesheet for documents and views
pub const VIEW_CSS: &str = include_str!("../css/view.css");
