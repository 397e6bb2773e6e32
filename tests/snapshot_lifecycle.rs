use std::fs;

use chrono::{Duration, Utc};
use ladder_core::cache::{
    CachePolicy, CacheSnapshot, InMemoryResultCache, ResultCache, SnapshotError, SnapshotWriter,
    StoredLadder,
};
use ladder_core::problem::Problem;
use ladder_core::types::LadderResult;
use tempfile::tempdir;

fn populated_cache() -> InMemoryResultCache {
    let cache = InMemoryResultCache::new();
    let policy = CachePolicy::default();
    cache.set(
        policy.key(1200, 1300),
        LadderResult::new(vec![
            Problem::new(1, "A", 1200, 10.0),
            Problem::new(5, "B", 1250, 8.5),
        ]),
    );
    cache.set(
        policy.key(1300, 1400),
        LadderResult::new(vec![Problem::new(9, "C", 1350, 4.0)]),
    );
    cache.set(policy.key(3500, 3600), LadderResult::default());
    cache.set(policy.key(3600, 3700), LadderResult::default());
    cache
}

/// Frequencies with full-precision mantissas, spread over many magnitudes.
fn noisy_ladder(len: usize) -> LadderResult {
    let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
    let problems = (0..len)
        .map(|i| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let unit = (seed >> 11) as f64 / (1u64 << 53) as f64;
            let scale = 10f64.powi((seed % 12) as i32 - 4);
            Problem::new(i as i64 * 3, format!("N{i}"), 1700, unit * scale)
        })
        .collect();
    LadderResult::new(problems)
}

#[test]
fn snapshot_round_trip_restores_every_entry() {
    let dir = tempdir().unwrap();
    let snapshot_dir = dir.path().join("ladder_snapshot");

    let original = populated_cache();
    original.set(CachePolicy::default().key(1700, 1800), noisy_ladder(5000));
    let written = SnapshotWriter::new().write_cache(&original, &snapshot_dir).unwrap();
    assert_eq!(written.manifest.entry_count, 5);

    let reopened = CacheSnapshot::open(&snapshot_dir).unwrap();
    let restored = InMemoryResultCache::new();
    let count = reopened.restore_into(&restored).unwrap();

    assert_eq!(count, 5);
    assert_eq!(restored.entries(), original.entries());

    let key = CachePolicy::default().key(1700, 1800);
    let before = original.get(&key).unwrap();
    let after = restored.get(&key).unwrap();
    for (a, b) in before.problems.iter().zip(&after.problems) {
        assert_eq!(a.frequency.to_bits(), b.frequency.to_bits(), "{}", a.name);
    }
}

#[test]
fn non_finite_frequencies_are_refused_at_write() {
    let dir = tempdir().unwrap();
    let snapshot_dir = dir.path().join("ladder_snapshot_nan");
    let cache = populated_cache();
    cache.set(
        CachePolicy::default().key(1900, 2000),
        LadderResult::new(vec![
            Problem::new(4, "Fine", 1900, 2.0),
            Problem::new(6, "Broken", 1950, f64::NAN),
        ]),
    );

    match SnapshotWriter::new().write_cache(&cache, &snapshot_dir) {
        Err(SnapshotError::NonFiniteFrequency { key, contest_id, name }) => {
            assert_eq!(key, "ladder:1900:2000");
            assert_eq!(contest_id, 6);
            assert_eq!(name, "Broken");
        }
        other => panic!("expected non-finite frequency error, got {other:?}"),
    }
    assert!(!snapshot_dir.exists(), "no snapshot is written");

    let infinite = LadderResult::new(vec![Problem::new(1, "Inf", 1900, f64::INFINITY)]);
    let stored = StoredLadder {
        ladder: infinite,
        stored_at: Utc::now(),
    };
    let result = SnapshotWriter::new().write(
        vec![(CachePolicy::default().key(1900, 2000), stored)],
        &snapshot_dir,
    );
    assert!(matches!(result, Err(SnapshotError::NonFiniteFrequency { .. })));
}

#[test]
fn manifest_is_sorted_and_identical_ladders_share_a_file() {
    let dir = tempdir().unwrap();
    let snapshot_dir = dir.path().join("ladder_snapshot_shared");

    let snapshot = SnapshotWriter::new()
        .write_cache(&populated_cache(), &snapshot_dir)
        .unwrap();

    let keys: Vec<&str> = snapshot.manifest.entries.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["ladder:1200:1300", "ladder:1300:1400", "ladder:3500:3600", "ladder:3600:3700"]
    );

    let empty_files: Vec<&str> = snapshot.manifest.entries[2..]
        .iter()
        .map(|e| e.file.as_str())
        .collect();
    assert_eq!(empty_files[0], empty_files[1]);

    let files = fs::read_dir(snapshot_dir.join("ladders")).unwrap().count();
    assert_eq!(files, 3);
    assert!(snapshot_dir.join("manifest.json").exists());
}

#[test]
fn digests_match_ladder_content() {
    let dir = tempdir().unwrap();
    let snapshot_dir = dir.path().join("ladder_snapshot_digest");
    let cache = populated_cache();

    let snapshot = SnapshotWriter::new().write_cache(&cache, &snapshot_dir).unwrap();

    for entry in &snapshot.manifest.entries {
        let ladder = cache.get(&entry.key).unwrap();
        assert_eq!(entry.digest, ladder.digest().unwrap());
        assert_eq!(entry.problem_count, ladder.len());
        assert!(entry.digest.as_str().starts_with("sha256:"));
    }
}

#[test]
fn existing_output_directory_is_refused() {
    let dir = tempdir().unwrap();
    let snapshot_dir = dir.path().join("occupied");
    fs::create_dir(&snapshot_dir).unwrap();

    let result = SnapshotWriter::new().write_cache(&populated_cache(), &snapshot_dir);

    match result {
        Err(SnapshotError::OutputExists(path)) => assert_eq!(path, snapshot_dir),
        other => panic!("expected output exists error, got {other:?}"),
    }
}

#[test]
fn duplicate_keys_are_rejected() {
    let dir = tempdir().unwrap();
    let key = CachePolicy::default().key(1200, 1300);
    let stored = StoredLadder {
        ladder: LadderResult::default(),
        stored_at: Utc::now(),
    };

    let result = SnapshotWriter::new().write(
        vec![(key.clone(), stored.clone()), (key, stored)],
        &dir.path().join("dupes"),
    );

    assert!(matches!(result, Err(SnapshotError::DuplicateKey(_))));
    assert!(!dir.path().join("dupes").exists(), "nothing is written on failure");
}

#[test]
fn tampered_ladder_file_fails_verification() {
    let dir = tempdir().unwrap();
    let snapshot_dir = dir.path().join("ladder_snapshot_tampered");
    let snapshot = SnapshotWriter::new()
        .write_cache(&populated_cache(), &snapshot_dir)
        .unwrap();

    let target = snapshot_dir.join(&snapshot.manifest.entries[0].file);
    fs::write(&target, b"[]").unwrap();

    let reopened = CacheSnapshot::open(&snapshot_dir).unwrap();
    match reopened.load_entries() {
        Err(SnapshotError::DigestMismatch { key, .. }) => assert_eq!(key, "ladder:1200:1300"),
        other => panic!("expected digest mismatch, got {other:?}"),
    }
}

#[test]
fn restored_timestamps_keep_ttl_semantics() {
    let dir = tempdir().unwrap();
    let snapshot_dir = dir.path().join("ladder_snapshot_ttl");
    let key = CachePolicy::default().key(1200, 1300);

    let snapshot = SnapshotWriter::new()
        .write(
            vec![(
                key.clone(),
                StoredLadder {
                    ladder: LadderResult::new(vec![Problem::new(1, "A", 1200, 1.0)]),
                    stored_at: Utc::now() - Duration::hours(2),
                },
            )],
            &snapshot_dir,
        )
        .unwrap();

    let cache = InMemoryResultCache::with_config(&ladder_core::config::ResultCacheConfig {
        ttl_seconds: Some(3600),
        max_entries: 8,
    })
    .unwrap();
    snapshot.restore_into(&cache).unwrap();

    assert_eq!(cache.len(), 1);
    assert!(cache.get(&key).is_none(), "an entry older than the TTL stays expired");
}

#[test]
fn unsupported_snapshot_version_is_rejected() {
    let dir = tempdir().unwrap();
    let snapshot_dir = dir.path().join("ladder_snapshot_version");
    SnapshotWriter::new()
        .write_cache(&populated_cache(), &snapshot_dir)
        .unwrap();

    let manifest_path = snapshot_dir.join("manifest.json");
    let mut manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&manifest_path).unwrap()).unwrap();
    manifest["snapshot_version"] = serde_json::Value::String("99".into());
    fs::write(&manifest_path, serde_json::to_vec(&manifest).unwrap()).unwrap();

    assert!(matches!(
        CacheSnapshot::open(&snapshot_dir),
        Err(SnapshotError::UnsupportedVersion(v)) if v == "99"
    ));
}
