//! Abstract syntax tree for STIX patterns

pub mod nodes;

pub use nodes::*;
