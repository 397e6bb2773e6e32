pub mod assembler;
pub mod dedup;
pub mod service;
pub mod source;

pub use assembler::{Assembly, LadderAssembler};
pub use dedup::{DedupOutcome, DedupWindow};
pub use service::LadderService;
pub use source::{InMemoryProblemSource, ProblemSource, SourceError};
