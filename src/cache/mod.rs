pub mod manifest;
pub mod policy;
pub mod snapshot;
pub mod store;

pub use manifest::{SnapshotEntry, SnapshotManifest, SNAPSHOT_FORMAT_VERSION};
pub use policy::CachePolicy;
pub use snapshot::{CacheSnapshot, SnapshotError, SnapshotWriter};
pub use store::{InMemoryResultCache, ResultCache, StoredLadder};
