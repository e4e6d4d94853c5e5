//! Org source grammar: syntax tree types and parsers

pub mod inline;
pub mod nodes;
pub mod parser;

pub use nodes::{CheckboxState, Emphasis, Node, NodeKind};
pub use parser::parse;
