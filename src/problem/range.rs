use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::ladder::LadderError;

pub const START_PARAM: &str = "startRating";
pub const END_PARAM: &str = "endRating";

/// Half-open rating window `[start, end)`.
///
/// `start < end` is expected but not enforced: an inverted window simply
/// matches no problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RatingRange {
    pub start: i64,
    pub end: i64,
}

impl RatingRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Validate the two raw request parameters.
    ///
    /// Absent or empty values are missing; anything else, whitespace-only
    /// included, must parse as a decimal integer once trimmed.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, LadderError> {
        let start = require(START_PARAM, start)?;
        let end = require(END_PARAM, end)?;

        Ok(Self {
            start: parse_rating(START_PARAM, start)?,
            end: parse_rating(END_PARAM, end)?,
        })
    }

    pub fn contains(&self, rating: i64) -> bool {
        self.start <= rating && rating < self.end
    }
}

impl fmt::Display for RatingRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

fn require<'a>(parameter: &'static str, raw: Option<&'a str>) -> Result<&'a str, LadderError> {
    match raw {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(LadderError::MissingParameter(parameter)),
    }
}

fn parse_rating(parameter: &'static str, value: &str) -> Result<i64, LadderError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| LadderError::InvalidParameter {
            parameter,
            value: value.to_string(),
        })
}
