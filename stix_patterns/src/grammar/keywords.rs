//! STIX patterning reserved words
//!
//! Keywords are matched case-sensitively: `AND` is a keyword, `and` is an
//! identifier. `true` and `false` are boolean literals, not keywords.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    // === BOOLEAN CONNECTIVES ===
    And,
    Or,
    Not,

    // === WORD OPERATORS ===
    Like,
    Matches,
    In,
    IsSubset,
    IsSuperset,

    // === OBSERVATION OPERATORS AND QUALIFIERS ===
    FollowedBy,
    Within,
    Repeats,
    Times,
    Start,
    Stop,

    // === TIME UNITS ===
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
    Months,
    Years,
}

impl Keyword {
    /// Exact spelling as it appears in a pattern
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Like => "LIKE",
            Self::Matches => "MATCHES",
            Self::In => "IN",
            Self::IsSubset => "ISSUBSET",
            Self::IsSuperset => "ISSUPERSET",
            Self::FollowedBy => "FOLLOWEDBY",
            Self::Within => "WITHIN",
            Self::Repeats => "REPEATS",
            Self::Times => "TIMES",
            Self::Start => "START",
            Self::Stop => "STOP",
            Self::Milliseconds => "MILLISECONDS",
            Self::Seconds => "SECONDS",
            Self::Minutes => "MINUTES",
            Self::Hours => "HOURS",
            Self::Days => "DAYS",
            Self::Months => "MONTHS",
            Self::Years => "YEARS",
        }
    }

    /// Exact-case lookup
    pub fn from_str(s: &str) -> Option<Self> {
        let keyword = match s {
            "AND" => Self::And,
            "OR" => Self::Or,
            "NOT" => Self::Not,
            "LIKE" => Self::Like,
            "MATCHES" => Self::Matches,
            "IN" => Self::In,
            "ISSUBSET" => Self::IsSubset,
            "ISSUPERSET" => Self::IsSuperset,
            "FOLLOWEDBY" => Self::FollowedBy,
            "WITHIN" => Self::Within,
            "REPEATS" => Self::Repeats,
            "TIMES" => Self::Times,
            "START" => Self::Start,
            "STOP" => Self::Stop,
            "MILLISECONDS" => Self::Milliseconds,
            "SECONDS" => Self::Seconds,
            "MINUTES" => Self::Minutes,
            "HOURS" => Self::Hours,
            "DAYS" => Self::Days,
            "MONTHS" => Self::Months,
            "YEARS" => Self::Years,
            _ => return None,
        };
        Some(keyword)
    }

    /// Operators written as words (`NOT` excluded; it only prefixes an operator)
    pub const fn is_word_operator(self) -> bool {
        matches!(
            self,
            Self::Like | Self::Matches | Self::In | Self::IsSubset | Self::IsSuperset
        )
    }

    pub const fn is_time_unit(self) -> bool {
        matches!(
            self,
            Self::Milliseconds
                | Self::Seconds
                | Self::Minutes
                | Self::Hours
                | Self::Days
                | Self::Months
                | Self::Years
        )
    }

    /// Words that open a qualifier clause
    pub const fn is_qualifier_start(self) -> bool {
        matches!(self, Self::Within | Self::Repeats | Self::Start)
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
