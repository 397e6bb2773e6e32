use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Duplicate-detection key for a problem: `(contest_id, name)`.
///
/// Never stored; derived on the fly while scanning candidates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProblemIdentity {
    contest_id: i64,
    name: String,
}

impl ProblemIdentity {
    pub fn new(contest_id: i64, name: impl Into<String>) -> Self {
        Self {
            contest_id,
            name: name.into(),
        }
    }

    pub fn contest_id(&self) -> i64 {
        self.contest_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identities of the same name at contest ids `+1`, `0`, `-1`, in that order.
    /// Neighbours that would overflow `i64` do not exist and are skipped.
    pub fn neighbours(&self) -> impl Iterator<Item = ProblemIdentity> + '_ {
        [1i64, 0, -1].into_iter().filter_map(move |delta| {
            self.contest_id
                .checked_add(delta)
                .map(|cid| ProblemIdentity::new(cid, self.name.as_str()))
        })
    }
}

impl fmt::Display for ProblemIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.contest_id, self.name)
    }
}

/// Result-cache key for one rating window, rendered `ladder:<start>:<end>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub(crate) fn for_range(start: i64, end: i64) -> Self {
        CacheKey(format!("ladder:{start}:{end}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content hash of a serialized ladder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LadderDigest(String);

impl LadderDigest {
    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);

        let hash = hasher.finalize();
        let hex = hex::encode(hash);

        LadderDigest(format!("sha256:{hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hex portion without the `sha256:` prefix, if well formed.
    pub fn hex(&self) -> Option<&str> {
        self.0.strip_prefix("sha256:")
    }
}
