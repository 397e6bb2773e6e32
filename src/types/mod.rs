pub mod identifiers;
pub mod ladder;

pub use identifiers::{CacheKey, LadderDigest, ProblemIdentity};
pub use ladder::{
    AssemblyStats, CacheStatus, LadderError, LadderResponse, LadderResult, SourceError,
};
