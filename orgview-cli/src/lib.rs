//! Library half of the orgview binary, so the transforms can be tested directly.

pub mod transforms;
