//! Tree passes wrapped around the converter
//!
//! `normalize` and `inject_checkboxes` run on the syntax tree, in that order; `sanitize`
//! runs on the render tree right before serialization.

pub mod checkbox;
pub mod normalize;
pub mod sanitize;

pub use checkbox::inject_checkboxes;
pub use normalize::normalize;
pub use sanitize::sanitize;
