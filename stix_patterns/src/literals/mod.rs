//! Literal validation
//!
//! Runs inside the semantic walk so that literal diagnostics are reported in
//! the same pass, in source order, alongside semantic ones.

pub mod validator;

pub use validator::{
    parse_timestamp, validate, validate_list, validate_list_shape, validate_literal, LiteralError,
};
