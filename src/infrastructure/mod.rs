//! Infrastructure layer: reading snapshots from disk

pub mod error;
pub mod snapshot;

pub use error::{InfraError, InfraResult};
pub use snapshot::{parse_snapshot, read_snapshot, SnapshotFormat};
