use tracing::{debug, instrument, warn};

use crate::cache::{CachePolicy, ResultCache};
use crate::config::{ConfigError, LadderConfig};
use crate::ladder::assembler::LadderAssembler;
use crate::ladder::source::ProblemSource;
use crate::problem::RatingRange;
use crate::types::ladder::{CacheStatus, LadderError, LadderResponse};

/// Request boundary: validate, consult the cache, assemble, store.
///
/// Holds no mutable state of its own; the injected cache is the only shared
/// resource, so one service can serve concurrent requests.
pub struct LadderService<P, C> {
    assembler: LadderAssembler<P>,
    cache: C,
    policy: CachePolicy,
}

impl<P, C> LadderService<P, C>
where
    P: ProblemSource,
    C: ResultCache,
{
    pub fn new(source: P, cache: C, config: &LadderConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            assembler: LadderAssembler::new(source, config)?,
            cache,
            policy: CachePolicy::new(config.bucket_width),
        })
    }

    pub fn assembler(&self) -> &LadderAssembler<P> {
        &self.assembler
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Serve a request from its raw `startRating` / `endRating` parameters.
    pub fn handle(
        &self,
        start_rating: Option<&str>,
        end_rating: Option<&str>,
    ) -> Result<LadderResponse, LadderError> {
        let range = RatingRange::parse(start_rating, end_rating).map_err(|err| {
            debug!(error = %err, "rejected ladder request");
            err
        })?;
        self.ladder(range)
    }

    /// Serve an already validated window.
    ///
    /// The response always carries the de-duplicated, bounded ladder, which
    /// is also exactly what gets cached.
    #[instrument(skip(self))]
    pub fn ladder(&self, range: RatingRange) -> Result<LadderResponse, LadderError> {
        let key = self
            .policy
            .is_eligible(range.start, range.end)
            .then(|| self.policy.key(range.start, range.end));

        if let Some(key) = &key {
            if let Some(ladder) = self.cache.get(key) {
                debug!(%key, problems = ladder.len(), "ladder cache hit");
                return Ok(LadderResponse {
                    range,
                    ladder,
                    cache: CacheStatus::Hit,
                    stats: None,
                });
            }
            debug!(%key, "ladder cache miss");
        }

        let assembly = self.assembler.assemble(&range).map_err(|err| {
            warn!(error = %err, "problem fetch failed");
            LadderError::DataAccess(err)
        })?;

        let cache = match key {
            Some(key) => {
                self.cache.set(key, assembly.ladder.clone());
                CacheStatus::Miss
            }
            None => CacheStatus::Bypass,
        };

        Ok(LadderResponse {
            range,
            ladder: assembly.ladder,
            cache,
            stats: Some(assembly.stats),
        })
    }
}
