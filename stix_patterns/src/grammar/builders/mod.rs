//! Builder functions for STIX pattern grammar productions

pub mod atomic;
pub mod expressions;
pub mod helpers;
pub mod observations;

pub use atomic::{
    literal_kind, operator_for, parse_literal, parse_object_path, parse_operand, parse_operator,
    parse_qualifier, parse_qualifiers, parse_time_unit, Parser,
};

pub use expressions::{parse_comparison, parse_property_test};

pub use helpers::{expect_closing, expect_keyword, expect_token, nested, unexpected_token_error};

pub use observations::{parse_observation_expressions, parse_pattern};
