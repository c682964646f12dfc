//! SQLite-backed metadata store
//!
//! The `filters` table lists every author and source title in the corpus.
//! Reads go through a small round-robin connection pool; changes are
//! detected by polling `PRAGMA data_version` on a dedicated connection.

mod pool;
mod store;

pub use pool::ConnectionPool;
pub use store::SqliteMetadataStore;
