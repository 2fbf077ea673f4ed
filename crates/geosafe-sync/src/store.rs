//! In-memory report collection with write-through persistence.
//!
//! Writers serialize on a mutex and persist while holding it, so the cached
//! blob always matches the latest published snapshot. Blob reads and writes
//! run on the blocking pool. Readers never take the mutex: they clone the
//! current [`Snapshot`] out of a watch channel.

use crate::storage::BlobStore;
use geosafe_model::Report;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

/// Blob name holding the cached collection.
pub const SNAPSHOT_BLOB: &str = "reports:snapshot";

/// Immutable point-in-time view of the collection.
pub type Snapshot = Arc<[Report]>;

/// The session's authoritative report collection.
pub struct ReportStore {
    reports: Mutex<Vec<Report>>,
    published: watch::Sender<Snapshot>,
    persistence: Arc<dyn BlobStore>,
}

impl ReportStore {
    /// Create an empty store backed by `persistence`.
    pub fn new(persistence: Arc<dyn BlobStore>) -> Self {
        let (published, _) = watch::channel(Snapshot::from(Vec::new()));
        Self {
            reports: Mutex::new(Vec::new()),
            published,
            persistence,
        }
    }

    /// Seed the collection from the cached blob. Returns the number of
    /// reports loaded. A missing or unreadable cache leaves the store empty.
    pub async fn load_from_persistence(&self) -> usize {
        let persistence = Arc::clone(&self.persistence);
        let read = tokio::task::spawn_blocking(move || persistence.get_blob(SNAPSHOT_BLOB)).await;
        let cached = match read {
            Ok(Ok(Some(data))) => data,
            Ok(Ok(None)) => return 0,
            Ok(Err(e)) => {
                warn!("Failed to read report cache: {}", e);
                return 0;
            }
            Err(e) => {
                warn!("Report cache read task failed: {}", e);
                return 0;
            }
        };

        let loaded: Vec<Report> = match serde_json::from_slice(&cached) {
            Ok(reports) => reports,
            Err(e) => {
                warn!("Ignoring corrupt report cache: {}", e);
                return 0;
            }
        };

        let mut reports = self.reports.lock().await;
        *reports = loaded;
        self.published.send_replace(Snapshot::from(reports.as_slice()));
        debug!("Loaded {} cached reports", reports.len());
        reports.len()
    }

    /// Replace the whole collection with a server snapshot.
    pub async fn replace_all(&self, snapshot: Vec<Report>) {
        let mut reports = self.reports.lock().await;
        *reports = snapshot;
        self.commit(&reports).await;
    }

    /// Insert a report, or replace the one with the same id in place.
    pub async fn upsert(&self, report: Report) {
        let mut reports = self.reports.lock().await;
        match reports.iter_mut().find(|r| r.id == report.id) {
            Some(existing) => *existing = report,
            None => reports.push(report),
        }
        self.commit(&reports).await;
    }

    /// Remove a report by id. Returns whether anything was removed; an
    /// absent id is not an error.
    pub async fn remove(&self, id: &str) -> bool {
        let mut reports = self.reports.lock().await;
        let before = reports.len();
        reports.retain(|r| r.id != id);
        let removed = reports.len() != before;
        self.commit(&reports).await;
        removed
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.published.borrow().clone()
    }

    /// Look up a report in the current snapshot.
    pub fn get(&self, id: &str) -> Option<Report> {
        self.published.borrow().iter().find(|r| r.id == id).cloned()
    }

    /// Receiver notified on every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.published.subscribe()
    }

    /// Persist and publish. Must be called with the writer lock held.
    async fn commit(&self, reports: &[Report]) {
        match serde_json::to_vec(reports) {
            Ok(data) => {
                let persistence = Arc::clone(&self.persistence);
                let write =
                    tokio::task::spawn_blocking(move || persistence.put_blob(SNAPSHOT_BLOB, &data));
                match write.await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => warn!("Failed to persist {} reports: {}", reports.len(), e),
                    Err(e) => warn!("Report cache write task failed: {}", e),
                }
            }
            Err(e) => warn!("Failed to encode report cache: {}", e),
        }
        self.published.send_replace(Snapshot::from(reports));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::storage::Storage;
    use geosafe_model::{Category, Location, ReportStatus};
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    /// Blob store whose writes block the calling thread.
    struct SlowBlobs(Duration);

    impl BlobStore for SlowBlobs {
        fn get_blob(&self, _name: &str) -> Result<Option<Vec<u8>>> {
            Ok(None)
        }

        fn put_blob(&self, _name: &str, _data: &[u8]) -> Result<()> {
            std::thread::sleep(self.0);
            Ok(())
        }
    }

    fn report(id: &str) -> Report {
        Report {
            id: id.into(),
            location: Location::new(1.0, 2.0),
            title: format!("title {}", id),
            description: "desc".into(),
            reported_by: "alice".into(),
            category: Category::Theft,
            status: ReportStatus::Pending,
            approvers: vec![],
        }
    }

    fn ids(snapshot: &Snapshot) -> Vec<String> {
        snapshot.iter().map(|r| r.id.clone()).collect()
    }

    #[tokio::test]
    async fn replace_all_is_exact() {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(Arc::new(Storage::open(dir.path()).unwrap()));

        store.upsert(report("local")).await;
        store.replace_all(vec![report("a"), report("b")]).await;

        assert_eq!(ids(&store.snapshot()), ["a", "b"]);
    }

    #[tokio::test]
    async fn upsert_replaces_in_place() {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(Arc::new(Storage::open(dir.path()).unwrap()));
        store.replace_all(vec![report("a"), report("b"), report("c")]).await;

        let mut updated = report("b");
        updated.status = ReportStatus::Approved;
        updated.approvers = vec!["bob".into()];
        store.upsert(updated.clone()).await;
        store.upsert(report("d")).await;

        let snapshot = store.snapshot();
        assert_eq!(ids(&snapshot), ["a", "b", "c", "d"]);
        assert_eq!(snapshot[1], updated);
    }

    #[tokio::test]
    async fn remove_absent_is_noop() {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(Arc::new(Storage::open(dir.path()).unwrap()));
        store.replace_all(vec![report("a")]).await;

        assert!(!store.remove("missing").await);
        assert!(store.remove("a").await);
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn snapshot_is_isolated_from_later_writes() {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(Arc::new(Storage::open(dir.path()).unwrap()));
        store.replace_all(vec![report("a")]).await;

        let before = store.snapshot();
        store.upsert(report("b")).await;

        assert_eq!(before.len(), 1);
        assert_eq!(store.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn writes_survive_restart() {
        let dir = tempdir().unwrap();
        {
            let store = ReportStore::new(Arc::new(Storage::open(dir.path()).unwrap()));
            store.replace_all(vec![report("a"), report("b")]).await;
            store.remove("a").await;
            store.upsert(report("c")).await;
        }

        let store = ReportStore::new(Arc::new(Storage::open(dir.path()).unwrap()));
        assert!(store.snapshot().is_empty());
        assert_eq!(store.load_from_persistence().await, 2);
        assert_eq!(ids(&store.snapshot()), ["b", "c"]);
    }

    #[tokio::test]
    async fn corrupt_cache_is_ignored() {
        let dir = tempdir().unwrap();
        let storage = Arc::new(Storage::open(dir.path()).unwrap());
        storage.put_blob(SNAPSHOT_BLOB, b"{not json").unwrap();

        let store = ReportStore::new(storage);
        assert_eq!(store.load_from_persistence().await, 0);
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn subscribers_see_new_snapshots() {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(Arc::new(Storage::open(dir.path()).unwrap()));
        let mut rx = store.subscribe();

        store.upsert(report("a")).await;
        rx.changed().await.unwrap();
        assert_eq!(ids(&rx.borrow_and_update()), ["a"]);
    }

    #[tokio::test]
    async fn get_finds_by_id() {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(Arc::new(Storage::open(dir.path()).unwrap()));
        store.replace_all(vec![report("a"), report("b")]).await;

        assert_eq!(store.get("b").map(|r| r.id), Some("b".to_string()));
        assert!(store.get("z").is_none());
    }

    #[tokio::test]
    async fn slow_persistence_leaves_runtime_free() {
        let store = Arc::new(ReportStore::new(Arc::new(SlowBlobs(Duration::from_millis(300)))));
        let writer = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.upsert(report("a")).await })
        };

        // Single-threaded runtime: this timer only fires on time if the
        // blob write is off the runtime thread
        let started = Instant::now();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(started.elapsed() < Duration::from_millis(200));
        assert!(!writer.is_finished());

        writer.await.unwrap();
        assert_eq!(ids(&store.snapshot()), ["a"]);
    }
}
