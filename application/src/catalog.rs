//! Metadata catalog
//!
//! Read-mostly set of known authors and source titles. Readers take the
//! current [`CatalogSnapshot`] without locking; a refresh publishes a whole
//! new snapshot, so a reader only ever sees a complete (possibly stale) one.

use crate::ports::metadata_store::{MetadataStore, MetadataStoreError};
use scholia_domain::{CatalogSnapshot, MetadataField};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub struct MetadataCatalog {
    current: watch::Sender<Arc<CatalogSnapshot>>,
}

impl MetadataCatalog {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        let (current, _) = watch::channel(Arc::new(snapshot));
        Self { current }
    }

    /// Build a catalog from the store. A failure here is fatal to startup:
    /// there is no fallback catalog.
    pub async fn load(store: &dyn MetadataStore) -> Result<Self, MetadataStoreError> {
        let snapshot = Self::read_snapshot(store).await?;
        info!(
            "Loaded metadata catalog: {} authors, {} sources",
            snapshot.authors().len(),
            snapshot.sources().len()
        );
        Ok(Self::new(snapshot))
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current.borrow().clone()
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<CatalogSnapshot>> {
        self.current.subscribe()
    }

    /// Re-read the store and publish the result. On error the previous
    /// snapshot stays in place.
    pub async fn refresh(&self, store: &dyn MetadataStore) -> Result<(), MetadataStoreError> {
        let snapshot = Self::read_snapshot(store).await?;
        debug!(
            "Refreshed metadata catalog: {} authors, {} sources",
            snapshot.authors().len(),
            snapshot.sources().len()
        );
        self.current.send_replace(Arc::new(snapshot));
        Ok(())
    }

    /// Refresh on every change notification from `store` until the store
    /// closes its channel.
    pub fn spawn_refresh_listener(
        self: &Arc<Self>,
        store: Arc<dyn MetadataStore>,
    ) -> JoinHandle<()> {
        let catalog = Arc::clone(self);
        tokio::spawn(async move {
            let mut changes = match store.subscribe_changes().await {
                Ok(rx) => rx,
                Err(e) => {
                    warn!("Catalog change subscription failed: {}", e);
                    return;
                }
            };

            while changes.recv().await.is_some() {
                if let Err(e) = catalog.refresh(store.as_ref()).await {
                    warn!("Catalog refresh failed, keeping previous snapshot: {}", e);
                }
            }
            debug!("Catalog change channel closed");
        })
    }

    async fn read_snapshot(store: &dyn MetadataStore) -> Result<CatalogSnapshot, MetadataStoreError> {
        let authors = store.list_distinct(MetadataField::Author).await?;
        let sources = store.list_distinct(MetadataField::Source).await?;
        Ok(CatalogSnapshot::new(authors, sources))
    }
}

impl Default for MetadataCatalog {
    fn default() -> Self {
        Self::new(CatalogSnapshot::default())
    }
}
