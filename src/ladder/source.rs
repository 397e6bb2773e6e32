use crate::problem::{Problem, RatingRange};
pub use crate::types::ladder::SourceError;

/// The problem store as seen by the ladder engine: range filter, sort by
/// popularity, limit.
pub trait ProblemSource: Send + Sync {
    /// Problems with `rating` in `range`, ordered by `frequency` descending,
    /// at most `limit` of them. Tie order is up to the store but must be
    /// deterministic.
    fn fetch(&self, range: &RatingRange, limit: usize) -> Result<Vec<Problem>, SourceError>;
}

impl<S: ProblemSource + ?Sized> ProblemSource for &S {
    fn fetch(&self, range: &RatingRange, limit: usize) -> Result<Vec<Problem>, SourceError> {
        (**self).fetch(range, limit)
    }
}

impl<S: ProblemSource + ?Sized> ProblemSource for std::sync::Arc<S> {
    fn fetch(&self, range: &RatingRange, limit: usize) -> Result<Vec<Problem>, SourceError> {
        (**self).fetch(range, limit)
    }
}

/// Problem store held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProblemSource {
    problems: Vec<Problem>,
}

impl InMemoryProblemSource {
    pub fn new(problems: Vec<Problem>) -> Self {
        Self { problems }
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

impl ProblemSource for InMemoryProblemSource {
    fn fetch(&self, range: &RatingRange, limit: usize) -> Result<Vec<Problem>, SourceError> {
        let mut matching: Vec<&Problem> = self
            .problems
            .iter()
            .filter(|p| range.contains(p.rating))
            .collect();

        // Sort by (frequency desc, contest_id asc, name asc); total_cmp puts NaN first
        matching.sort_by(|a, b| {
            b.frequency
                .total_cmp(&a.frequency)
                .then_with(|| a.contest_id.cmp(&b.contest_id))
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(matching.into_iter().take(limit).cloned().collect())
    }
}
