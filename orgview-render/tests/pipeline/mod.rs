//! Pipeline tests
//!
//! Org source in, markup out, checked end to end through the public entry points.

mod metadata;
mod render;
