//! Grammar definitions for STIX patterning

pub mod ast;
pub mod builders;
pub mod keywords;

// Re-export AST types
pub use ast::nodes::*;

pub use keywords::Keyword;

pub use builders::{parse_pattern, Parser};
