use tracing::debug;

use crate::config::{ConfigError, LadderConfig};
use crate::ladder::dedup::DedupWindow;
use crate::ladder::source::{ProblemSource, SourceError};
use crate::problem::RatingRange;
use crate::types::ladder::{AssemblyStats, LadderResult};

/// A freshly assembled ladder together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub ladder: LadderResult,
    pub stats: AssemblyStats,
}

/// Fetch, de-duplicate, bound.
pub struct LadderAssembler<P> {
    source: P,
    window: DedupWindow,
    fetch_quota: usize,
}

impl<P: ProblemSource> LadderAssembler<P> {
    /// Fails unless the fetch quota exceeds the output bound.
    pub fn new(source: P, config: &LadderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            source,
            window: DedupWindow::new(config.output_bound),
            fetch_quota: config.fetch_quota,
        })
    }

    pub fn window(&self) -> &DedupWindow {
        &self.window
    }

    pub fn fetch_quota(&self) -> usize {
        self.fetch_quota
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    /// Build the ladder for `range`.
    ///
    /// Does not re-fetch when duplicates leave fewer than the output bound;
    /// a short ladder is a valid result.
    pub fn assemble(&self, range: &RatingRange) -> Result<Assembly, SourceError> {
        let candidates = self.source.fetch(range, self.fetch_quota)?;
        let candidates_fetched = candidates.len();

        let outcome = self.window.filter(candidates);
        let stats = AssemblyStats {
            candidates_fetched,
            candidates_scanned: outcome.scanned,
            duplicates_suppressed: outcome.suppressed.len(),
        };

        debug!(
            %range,
            fetched = stats.candidates_fetched,
            scanned = stats.candidates_scanned,
            suppressed = stats.duplicates_suppressed,
            kept = outcome.kept.len(),
            "assembled ladder"
        );

        Ok(Assembly {
            ladder: LadderResult::new(outcome.kept),
            stats,
        })
    }
}
