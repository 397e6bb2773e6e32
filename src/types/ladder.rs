use serde::{Deserialize, Serialize};

use crate::problem::{Problem, RatingRange};
use crate::types::identifiers::LadderDigest;

/// Ordered, de-duplicated and bounded ladder for one rating window.
/// This is also the value memoized in the result cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LadderResult {
    pub problems: Vec<Problem>,
}

impl LadderResult {
    pub fn new(problems: Vec<Problem>) -> Self {
        Self { problems }
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Hash of the canonical JSON encoding.
    pub fn digest(&self) -> Result<LadderDigest, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        Ok(LadderDigest::from_content(&bytes))
    }
}

/// How the result cache took part in serving a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    /// Served from a stored entry, no assembly.
    Hit,
    /// Eligible window, assembled and stored.
    Miss,
    /// Window not eligible for caching.
    Bypass,
}

/// Counters describing one assembly run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyStats {
    pub candidates_fetched: usize,
    pub candidates_scanned: usize,
    pub duplicates_suppressed: usize,
}

/// What the service hands back to the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LadderResponse {
    pub range: RatingRange,
    pub ladder: LadderResult,
    pub cache: CacheStatus,
    /// Absent on a cache hit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<AssemblyStats>,
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Problem store unavailable: {0}")]
    Unavailable(String),

    #[error("Problem query failed: {0}")]
    Query(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LadderError {
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid parameter {parameter}: {value:?}")]
    InvalidParameter {
        parameter: &'static str,
        value: String,
    },

    #[error("Data access failure: {0}")]
    DataAccess(#[from] SourceError),
}

impl LadderError {
    /// HTTP-style status class for the transport layer.
    pub fn status_code(&self) -> u16 {
        match self {
            LadderError::MissingParameter(_) | LadderError::InvalidParameter { .. } => 400,
            LadderError::DataAccess(_) => 500,
        }
    }

    /// Caller-facing message. Data access details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            LadderError::MissingParameter(_) => "missing parameters",
            LadderError::InvalidParameter { .. } => "invalid parameters",
            LadderError::DataAccess(_) => "internal failure",
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
