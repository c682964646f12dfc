//! Fixed-size pool of read-only SQLite connections.

use rusqlite::{Connection, OpenFlags};
use scholia_application::MetadataStoreError;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

const MAX_POOL_SIZE: usize = 8;

pub struct ConnectionPool {
    connections: Vec<Mutex<Connection>>,
    next: AtomicUsize,
}

impl ConnectionPool {
    /// Open `pool_size` connections (clamped to 1..=8) to an existing database.
    pub fn open(path: &Path, pool_size: usize) -> Result<Self, MetadataStoreError> {
        let size = pool_size.clamp(1, MAX_POOL_SIZE);
        let connections = (0..size)
            .map(|_| open_read_only(path).map(Mutex::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            connections,
            next: AtomicUsize::new(0),
        })
    }

    /// Run `f` on the next connection in round-robin order.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, MetadataStoreError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.connections.len();
        let guard = self.connections[idx]
            .lock()
            .map_err(|e| MetadataStoreError::Connection(format!("pool lock poisoned: {e}")))?;
        f(&guard).map_err(|e| MetadataStoreError::Query(e.to_string()))
    }

    pub fn size(&self) -> usize {
        self.connections.len()
    }
}

pub(crate) fn open_read_only(path: &Path) -> Result<Connection, MetadataStoreError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| MetadataStoreError::Connection(format!("{}: {e}", path.display())))?;
    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(|e| MetadataStoreError::Connection(e.to_string()))?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_pool_size_is_clamped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("filters.db");
        Connection::open(&path).unwrap();

        assert_eq!(ConnectionPool::open(&path, 0).unwrap().size(), 1);
        assert_eq!(ConnectionPool::open(&path, 3).unwrap().size(), 3);
        assert_eq!(ConnectionPool::open(&path, 50).unwrap().size(), MAX_POOL_SIZE);
    }

    #[test]
    fn test_missing_database_is_a_connection_error() {
        let dir = TempDir::new().unwrap();
        let result = ConnectionPool::open(&dir.path().join("absent.db"), 2);
        assert!(matches!(result, Err(MetadataStoreError::Connection(_))));
    }

    #[test]
    fn test_round_robin_checkout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("filters.db");
        Connection::open(&path).unwrap();
        let pool = ConnectionPool::open(&path, 2).unwrap();

        for _ in 0..4 {
            let one: i64 = pool
                .with_conn(|conn| conn.query_row("SELECT 1", [], |row| row.get(0)))
                .unwrap();
            assert_eq!(one, 1);
        }
        assert_eq!(pool.next.load(Ordering::Relaxed), 4);
    }
}
