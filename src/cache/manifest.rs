use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::identifiers::{CacheKey, LadderDigest};

pub const SNAPSHOT_FORMAT_VERSION: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub key: CacheKey,
    pub digest: LadderDigest,
    /// Path of the ladder file, relative to the snapshot root.
    pub file: String,
    pub stored_at: DateTime<Utc>,
    pub problem_count: usize,
}

/// `manifest.json` of a result-cache snapshot. Entries are sorted by key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotManifest {
    pub snapshot_version: String,
    pub created_at: DateTime<Utc>, // informational only
    pub entry_count: usize,
    pub entries: Vec<SnapshotEntry>,
}
