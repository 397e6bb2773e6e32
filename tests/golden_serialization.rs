use ladder_core::config::{ConfigError, LadderConfig, ResultCacheConfig};
use ladder_core::problem::{Problem, RatingRange};
use ladder_core::types::{AssemblyStats, CacheStatus, LadderResponse, LadderResult};
use serde_json::Value;

#[test]
fn golden_problem_wire_format() {
    let problem = Problem::new(1520, "Cool Slogans", 1300, 42.5);

    let json = serde_json::to_string(&problem).unwrap();

    assert_eq!(
        json,
        r#"{"contestId":1520,"name":"Cool Slogans","rating":1300,"frequency":42.5}"#
    );

    let parsed: Problem = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, problem);
}

#[test]
fn golden_ladder_response_shape() {
    let response = LadderResponse {
        range: RatingRange::new(1200, 1300),
        ladder: LadderResult::new(vec![
            Problem::new(1, "A", 1200, 10.0),
            Problem::new(5, "B", 1250, 8.0),
        ]),
        cache: CacheStatus::Miss,
        stats: Some(AssemblyStats {
            candidates_fetched: 3,
            candidates_scanned: 3,
            duplicates_suppressed: 1,
        }),
    };

    let value: Value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["range"]["start"], 1200);
    assert_eq!(value["range"]["end"], 1300);
    assert_eq!(value["cache"], "miss");
    assert_eq!(value["stats"]["duplicates_suppressed"], 1);

    // The ladder serializes as a bare array of problems.
    let ladder = value["ladder"].as_array().expect("ladder must be an array");
    assert_eq!(ladder.len(), 2);
    assert_eq!(ladder[0]["contestId"], 1);
    assert_eq!(ladder[1]["name"], "B");
}

#[test]
fn cache_hit_response_omits_stats() {
    let response = LadderResponse {
        range: RatingRange::new(1200, 1300),
        ladder: LadderResult::default(),
        cache: CacheStatus::Hit,
        stats: None,
    };

    let json = serde_json::to_string(&response).unwrap();

    assert!(!json.contains("stats"));
    assert!(json.contains(r#""cache":"hit""#));
}

#[test]
fn ladder_digest_is_stable() {
    let a = LadderResult::new(vec![Problem::new(1, "A", 1200, 10.0)]);
    let b = LadderResult::new(vec![Problem::new(1, "A", 1200, 10.0)]);
    let c = LadderResult::new(vec![Problem::new(2, "A", 1200, 10.0)]);

    assert_eq!(a.digest().unwrap(), b.digest().unwrap());
    assert_ne!(a.digest().unwrap(), c.digest().unwrap());
    assert_eq!(a.digest().unwrap().hex().map(str::len), Some(64));
}

#[test]
fn config_defaults() {
    let config = LadderConfig::v0();
    assert_eq!(config.output_bound, 100);
    assert_eq!(config.fetch_quota, 120);
    assert_eq!(config.bucket_width, 100);
    assert_eq!(config, LadderConfig::default());
    assert!(config.validate().is_ok());
}

#[test]
fn partial_config_fills_defaults() {
    let config: LadderConfig = serde_json::from_str(r#"{"fetch_quota": 200}"#).unwrap();
    assert_eq!(config.fetch_quota, 200);
    assert_eq!(config.output_bound, 100);

    let cache: ResultCacheConfig = serde_json::from_str(r#"{"ttl_seconds": 300}"#).unwrap();
    assert_eq!(cache.ttl_seconds, Some(300));
    assert_eq!(cache.max_entries, 1024);
}

#[test]
fn invalid_configs_are_rejected() {
    let mut config = LadderConfig::v0();
    config.fetch_quota = 100;
    assert_eq!(
        config.validate(),
        Err(ConfigError::FetchQuotaTooSmall {
            fetch_quota: 100,
            output_bound: 100
        })
    );

    let config = LadderConfig {
        output_bound: 0,
        ..LadderConfig::v0()
    };
    assert_eq!(config.validate(), Err(ConfigError::ZeroOutputBound));

    let config = LadderConfig {
        bucket_width: 0,
        ..LadderConfig::v0()
    };
    assert_eq!(config.validate(), Err(ConfigError::InvalidBucketWidth(0)));

    let cache = ResultCacheConfig {
        ttl_seconds: None,
        max_entries: 0,
    };
    assert_eq!(cache.validate(), Err(ConfigError::ZeroCacheCapacity));
}
