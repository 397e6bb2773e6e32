use crate::types::identifiers::CacheKey;

/// Decides which rating windows may be memoized, and under which key.
///
/// Only canonical buckets qualify: both bounds aligned to the bucket width
/// and exactly one bucket wide (e.g. 1200..1300). This keeps the key space
/// small and bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    bucket_width: i64,
}

impl CachePolicy {
    pub fn new(bucket_width: i64) -> Self {
        Self { bucket_width }
    }

    pub fn bucket_width(&self) -> i64 {
        self.bucket_width
    }

    pub fn is_eligible(&self, start: i64, end: i64) -> bool {
        let width = self.bucket_width;
        width > 0
            && start % width == 0
            && end % width == 0
            && end.checked_sub(start) == Some(width)
    }

    pub fn key(&self, start: i64, end: i64) -> CacheKey {
        CacheKey::for_range(start, end)
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(100)
    }
}
