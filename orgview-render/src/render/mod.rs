//! Render tree, converter and serializer
//!
//! The converter and serializer are deliberately plain: they know HTML, not org. The
//! passes in [`crate::transforms`] are what make metadata survive the trip.

pub mod convert;
pub mod nodes;
pub mod serializer;

pub use convert::to_render_tree;
pub use nodes::RenderNode;
pub use serializer::serialize;
