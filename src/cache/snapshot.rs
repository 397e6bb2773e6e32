//! On-disk snapshots of the result cache, for warm restarts.
//!
//! Layout:
//!
//! ```text
//! <root>/manifest.json
//! <root>/ladders/<digest-prefix>.json
//! ```
//!
//! Ladder files are content addressed, so windows with identical ladders
//! share one file. Loading re-hashes every file against the manifest.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info};

use crate::cache::manifest::{SnapshotEntry, SnapshotManifest, SNAPSHOT_FORMAT_VERSION};
use crate::cache::store::{InMemoryResultCache, StoredLadder};
use crate::types::identifiers::{CacheKey, LadderDigest};
use crate::types::ladder::LadderResult;

const FILE_STEM_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Output directory already exists: {0}")]
    OutputExists(PathBuf),
    #[error("Filename collision detected for hash fragment: {0}")]
    FilenameCollision(String),
    #[error("Invalid digest format: {0}")]
    InvalidDigestFormat(String),
    #[error("Non-finite frequency for {contest_id}:{name} under {key}")]
    NonFiniteFrequency {
        key: String,
        contest_id: i64,
        name: String,
    },
    #[error("Duplicate cache key: {0}")]
    DuplicateKey(String),
    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(String),
    #[error("Digest mismatch for {key}: manifest says {expected}, content hashes to {actual}")]
    DigestMismatch {
        key: String,
        expected: String,
        actual: String,
    },
}

/// Writes snapshots. Single-threaded and non-reentrant.
#[derive(Debug, Default)]
pub struct SnapshotWriter;

impl SnapshotWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(
        &self,
        entries: Vec<(CacheKey, StoredLadder)>,
        output_dir: &Path,
    ) -> Result<CacheSnapshot, SnapshotError> {
        if output_dir.exists() {
            return Err(SnapshotError::OutputExists(output_dir.to_path_buf()));
        }

        let mut sorted = entries;
        sorted.sort_by(|a, b| a.0.cmp(&b.0));

        for pair in sorted.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(SnapshotError::DuplicateKey(pair[0].0.as_str().to_string()));
            }
        }

        // stem -> (digest, encoded ladder); identical ladders collapse to one file
        let mut files: BTreeMap<String, (LadderDigest, Vec<u8>)> = BTreeMap::new();
        let mut manifest_entries = Vec::with_capacity(sorted.len());
        let mut snapshot_hasher = Sha256::new();

        for (key, stored) in &sorted {
            // JSON has no NaN or infinity; they would come back as null
            if let Some(p) = stored.ladder.problems.iter().find(|p| !p.frequency.is_finite()) {
                return Err(SnapshotError::NonFiniteFrequency {
                    key: key.as_str().to_string(),
                    contest_id: p.contest_id,
                    name: p.name.clone(),
                });
            }

            let bytes = serde_json::to_vec(&stored.ladder)?;
            let digest = LadderDigest::from_content(&bytes);
            let stem = file_stem(&digest)?;

            match files.entry(stem.clone()) {
                Entry::Occupied(existing) => {
                    if existing.get().0 != digest {
                        return Err(SnapshotError::FilenameCollision(stem));
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert((digest.clone(), bytes));
                }
            }

            snapshot_hasher.update(format!("{}:{}", key.as_str(), digest.as_str()).as_bytes());

            manifest_entries.push(SnapshotEntry {
                key: key.clone(),
                digest,
                file: format!("ladders/{stem}.json"),
                stored_at: stored.stored_at,
                problem_count: stored.ladder.len(),
            });
        }

        let manifest = SnapshotManifest {
            snapshot_version: SNAPSHOT_FORMAT_VERSION.to_string(),
            created_at: Utc::now(),
            entry_count: manifest_entries.len(),
            entries: manifest_entries,
        };

        // Write into a sibling temp dir, then rename into place
        let snapshot_hash = hex::encode(snapshot_hasher.finalize());
        let temp_suffix = format!("tmp.{}", &snapshot_hash[..FILE_STEM_LEN]);
        let temp_dir = output_dir.with_extension(temp_suffix);
        if temp_dir.exists() {
            fs::remove_dir_all(&temp_dir)?;
        }
        fs::create_dir_all(temp_dir.join("ladders"))?;

        for (stem, (_, bytes)) in &files {
            let path = temp_dir.join("ladders").join(format!("{stem}.json"));
            fs::write(&path, bytes)?;
        }

        let manifest_file = fs::File::create(temp_dir.join("manifest.json"))?;
        serde_json::to_writer_pretty(&manifest_file, &manifest)?;
        manifest_file.sync_all()?;

        fs::rename(&temp_dir, output_dir)?;

        info!(
            path = %output_dir.display(),
            entries = manifest.entry_count,
            files = files.len(),
            "wrote result cache snapshot"
        );

        Ok(CacheSnapshot {
            root: output_dir.to_path_buf(),
            manifest,
        })
    }

    /// Snapshot every live entry of `cache`.
    pub fn write_cache(
        &self,
        cache: &InMemoryResultCache,
        output_dir: &Path,
    ) -> Result<CacheSnapshot, SnapshotError> {
        self.write(cache.entries(), output_dir)
    }
}

/// A snapshot on disk. Read-only.
#[derive(Debug)]
pub struct CacheSnapshot {
    pub root: PathBuf,
    pub manifest: SnapshotManifest,
}

impl CacheSnapshot {
    pub fn open(root: &Path) -> Result<Self, SnapshotError> {
        let f = fs::File::open(root.join("manifest.json"))?;
        let manifest: SnapshotManifest = serde_json::from_reader(f)?;
        if manifest.snapshot_version != SNAPSHOT_FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(manifest.snapshot_version));
        }
        Ok(Self {
            root: root.to_path_buf(),
            manifest,
        })
    }

    /// Read every entry back, verifying content against the manifest digest.
    pub fn load_entries(&self) -> Result<Vec<(CacheKey, StoredLadder)>, SnapshotError> {
        let mut loaded = Vec::with_capacity(self.manifest.entries.len());
        for entry in &self.manifest.entries {
            let bytes = fs::read(self.root.join(&entry.file))?;

            let actual = LadderDigest::from_content(&bytes);
            if actual != entry.digest {
                return Err(SnapshotError::DigestMismatch {
                    key: entry.key.as_str().to_string(),
                    expected: entry.digest.as_str().to_string(),
                    actual: actual.as_str().to_string(),
                });
            }

            let ladder: LadderResult = serde_json::from_slice(&bytes)?;
            loaded.push((
                entry.key.clone(),
                StoredLadder {
                    ladder,
                    stored_at: entry.stored_at,
                },
            ));
        }
        Ok(loaded)
    }

    /// Load every entry into `cache`. Returns how many were restored.
    pub fn restore_into(&self, cache: &InMemoryResultCache) -> Result<usize, SnapshotError> {
        let entries = self.load_entries()?;
        let count = entries.len();
        cache.restore(entries);
        debug!(path = %self.root.display(), count, "restored result cache snapshot");
        Ok(count)
    }
}

fn file_stem(digest: &LadderDigest) -> Result<String, SnapshotError> {
    let hex = digest
        .hex()
        .filter(|h| h.len() >= FILE_STEM_LEN)
        .ok_or_else(|| SnapshotError::InvalidDigestFormat(digest.as_str().to_string()))?;
    Ok(hex[..FILE_STEM_LEN].to_string())
}
