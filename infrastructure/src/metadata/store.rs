//! `MetadataStore` over a SQLite `filters(authors, sources)` table.

use super::pool::{ConnectionPool, open_read_only};
use async_trait::async_trait;
use rusqlite::Connection;
use scholia_application::{MetadataStore, MetadataStoreError};
use scholia_domain::MetadataField;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub struct SqliteMetadataStore {
    pool: Arc<ConnectionPool>,
    path: PathBuf,
    poll_interval: Duration,
}

impl SqliteMetadataStore {
    pub fn open(
        path: &Path,
        pool_size: usize,
        poll_interval: Duration,
    ) -> Result<Self, MetadataStoreError> {
        let pool = ConnectionPool::open(path, pool_size)?;
        info!(
            "Opened metadata store {} ({} connections)",
            path.display(),
            pool.size()
        );
        Ok(Self {
            pool: Arc::new(pool),
            path: path.to_path_buf(),
            poll_interval,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn distinct_values(conn: &Connection, field: MetadataField) -> rusqlite::Result<Vec<String>> {
    let column = field.column();
    let sql = format!(
        "SELECT DISTINCT {column} FROM filters WHERE {column} IS NOT NULL ORDER BY {column}"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect()
}

fn data_version(conn: &Mutex<Connection>) -> Result<i64, MetadataStoreError> {
    let guard = conn
        .lock()
        .map_err(|e| MetadataStoreError::Connection(format!("watcher lock poisoned: {e}")))?;
    guard
        .pragma_query_value(None, "data_version", |row| row.get(0))
        .map_err(|e| MetadataStoreError::Query(e.to_string()))
}

async fn poll_version(conn: &Arc<Mutex<Connection>>) -> Result<i64, MetadataStoreError> {
    let conn = Arc::clone(conn);
    tokio::task::spawn_blocking(move || data_version(&conn))
        .await
        .map_err(|e| MetadataStoreError::Query(format!("watcher task failed: {e}")))?
}

#[async_trait]
impl MetadataStore for SqliteMetadataStore {
    async fn list_distinct(&self, field: MetadataField) -> Result<Vec<String>, MetadataStoreError> {
        let pool = Arc::clone(&self.pool);
        let values = tokio::task::spawn_blocking(move || {
            pool.with_conn(|conn| distinct_values(conn, field))
        })
        .await
        .map_err(|e| MetadataStoreError::Query(format!("query task failed: {e}")))??;
        debug!("{} distinct {} values", values.len(), field);
        Ok(values)
    }

    /// Notify once per observed change to the database.
    ///
    /// Polls on a dedicated connection, since `data_version` only moves
    /// for commits made by other connections. The task stops when the
    /// receiver is dropped.
    async fn subscribe_changes(&self) -> Result<mpsc::Receiver<()>, MetadataStoreError> {
        let watcher = Arc::new(Mutex::new(open_read_only(&self.path)?));
        let mut last = poll_version(&watcher).await?;
        let (tx, rx) = mpsc::channel(1);
        let period = self.poll_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    break;
                }
                match poll_version(&watcher).await {
                    Ok(version) if version != last => {
                        last = version;
                        debug!("Metadata store changed (data_version {})", version);
                        if tx.send(()).await.is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Metadata change poll failed: {}", e),
                }
            }
            debug!("Metadata change watcher stopped");
        });

        Ok(rx)
    }
}
