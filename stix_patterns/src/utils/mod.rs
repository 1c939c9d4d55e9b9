//! Shared source-location types used by every stage of the validator.

pub mod span;

pub use span::{Position, SourceMap, Span, Spanned};
