//! Sync node - the long-running client process.
//!
//! Architecture:
//! - RocksDB report cache in the data directory, loaded on startup
//! - One poller keeping the cache in step with the remote service
//! - Every new snapshot is summarized into density tiers and logged

use crate::config::SyncConfig;
use crate::engine::SyncEngine;
use crate::error::Result;
use crate::remote::{HttpReportService, ReportService};
use crate::storage::Storage;
use crate::store::ReportStore;
use geosafe_geo::{heatmap, TierSummary};
use std::sync::Arc;

/// A sync node instance.
pub struct SyncNode {
    engine: Arc<SyncEngine>,
    config: SyncConfig,
}

impl SyncNode {
    /// Open the node against the HTTP service at `config.api_url`.
    pub async fn open(config: SyncConfig) -> Result<Self> {
        let service = Arc::new(HttpReportService::new(&config)?);
        Self::with_service(config, service).await
    }

    /// Open the node against any report service.
    pub async fn with_service(
        config: SyncConfig,
        service: Arc<dyn ReportService>,
    ) -> Result<Self> {
        // Ensure data directory exists
        std::fs::create_dir_all(&config.data_dir)?;

        let storage = Arc::new(Storage::open(&config.data_dir)?);
        let store = Arc::new(ReportStore::new(storage));

        let cached = store.load_from_persistence().await;
        tracing::info!("Loaded {} cached reports from {:?}", cached, config.data_dir);

        let engine = Arc::new(SyncEngine::new(service, store, &config));
        Ok(Self { engine, config })
    }

    /// Get the engine (for issuing actions).
    pub fn engine(&self) -> Arc<SyncEngine> {
        Arc::clone(&self.engine)
    }

    /// Run until Ctrl-C: poll, log every snapshot's tier summary, and log
    /// banner changes.
    pub async fn run(self) -> Result<()> {
        tracing::info!("GeoSafe sync node starting");
        tracing::info!("  API: {}", self.config.api_url);
        tracing::info!("  Data: {:?}", self.config.data_dir);
        tracing::info!("  Poll interval: {:?}", self.config.poll_interval);

        let mut snapshots = self.engine.store().subscribe();
        let mut notices = self.engine.notices();
        let poller = self.engine.spawn_poller();

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                signal = &mut shutdown => {
                    if let Err(e) = signal {
                        tracing::error!("Failed to listen for Ctrl-C: {}", e);
                    }
                    break;
                }
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = snapshots.borrow_and_update().clone();
                    let cells = heatmap(snapshot.iter(), &snapshot);
                    let summary = TierSummary::from_cells(&cells);
                    tracing::info!(
                        "{} reports: {} low, {} medium, {} high",
                        summary.total(),
                        summary.low,
                        summary.medium,
                        summary.high
                    );
                }
                changed = notices.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let notice = notices.borrow_and_update().clone();
                    if let Some(error) = notice.error {
                        tracing::warn!("Banner: {}", error);
                    }
                }
            }
        }

        tracing::info!("Shutting down");
        poller.shutdown().await;
        Ok(())
    }
}
