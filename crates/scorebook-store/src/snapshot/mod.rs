//! Last-synced snapshot per user

mod persist;
mod query;

pub use persist::persist_snapshot;
pub use query::load_snapshot;
