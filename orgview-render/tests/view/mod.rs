//! View tests
//!
//! Rendered markup loaded into a [`ViewSession`](orgview_render::ViewSession) and driven
//! the way a host surface would drive it.

mod file_refs;
mod navigation;
mod protocol;
mod structure;
