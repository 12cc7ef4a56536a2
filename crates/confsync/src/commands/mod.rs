//! CLI command implementations.

mod sync;

pub(crate) use sync::SyncArgs;
