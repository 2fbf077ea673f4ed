//! Sync engine: polling reconciliation and server-confirmed actions.
//!
//! Architecture:
//! - One long-lived poller replaces the store with each server snapshot
//! - Actions (submit, approve, delete) round-trip through the service and
//!   only touch the store after a successful response
//! - Every remote call is bounded by the request timeout
//!
//! Concurrent actions on the same report resolve last-write-wins by
//! response arrival; the next poll is authoritative over all of them.

use crate::config::SyncConfig;
use crate::error::{Error, Result};
use crate::notice::{Notice, NoticeBoard};
use crate::remote::ReportService;
use crate::store::{ReportStore, Snapshot};
use geosafe_consensus::ApprovalPolicy;
use geosafe_model::{Identity, Report, ReportDraft};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// How a delete request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The server deleted the report and the store followed
    Removed,
    /// The server call failed; the report was hidden locally only and
    /// may reappear on the next successful poll
    LocalOnly,
}

/// Handle to a running poller. Dropping it also stops the poller.
pub struct PollerHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop polling and wait for the loop to exit. An attempt in flight is
    /// abandoned.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            warn!("Poller task ended abnormally: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Mediates between the report store and the remote report service.
pub struct SyncEngine {
    service: Arc<dyn ReportService>,
    store: Arc<ReportStore>,
    notices: Arc<NoticeBoard>,
    policy: ApprovalPolicy,
    poll_interval: Duration,
    request_timeout: Duration,
}

impl SyncEngine {
    /// Create an engine over an existing store.
    pub fn new(
        service: Arc<dyn ReportService>,
        store: Arc<ReportStore>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            service,
            store,
            notices: NoticeBoard::new(config.success_display),
            policy: ApprovalPolicy::default(),
            poll_interval: config.poll_interval,
            request_timeout: config.request_timeout,
        }
    }

    /// Use a non-default approval policy for local pre-checks.
    pub fn with_policy(mut self, policy: ApprovalPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &Arc<ReportStore> {
        &self.store
    }

    pub fn policy(&self) -> ApprovalPolicy {
        self.policy
    }

    /// Current report snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    /// Receiver for banner updates.
    pub fn notices(&self) -> watch::Receiver<Notice> {
        self.notices.subscribe()
    }

    /// Current banner state.
    pub fn notice(&self) -> Notice {
        self.notices.current()
    }

    // --- Polling ---

    /// Run one poll attempt. On success the store holds exactly the server
    /// snapshot; on failure it is left untouched and an error banner is
    /// raised.
    pub async fn poll_once(&self) -> Result<usize> {
        match self.remote(self.service.list_reports()).await {
            Ok(reports) => {
                let count = reports.len();
                self.store.replace_all(reports).await;
                self.notices.clear_error();
                debug!("Synced {} reports", count);
                Ok(count)
            }
            Err(e) => {
                warn!("Report poll failed: {}", e);
                self.notices.raise_error(poll_error_message(&e));
                Err(e)
            }
        }
    }

    /// Spawn the polling loop on the current runtime.
    pub fn spawn_poller(self: &Arc<Self>) -> PollerHandle {
        let (shutdown, shutdown_rx) = oneshot::channel();
        let engine = Arc::clone(self);
        let task = tokio::spawn(async move {
            engine.run_poller(shutdown_rx).await;
        });
        PollerHandle { shutdown, task }
    }

    async fn run_poller(&self, mut shutdown: oneshot::Receiver<()>) {
        info!("Polling reports every {:?}", self.poll_interval);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                // Failures are logged and surfaced by poll_once
                _ = self.poll_once() => {}
            }
            // The wait starts after the attempt, success or failure
            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
        info!("Report poller stopped");
    }

    // --- Actions ---

    /// Submit a new report. The store only changes once the server returns
    /// its canonical copy.
    pub async fn submit(&self, draft: ReportDraft, actor: &Identity) -> Result<Report> {
        draft.validate()?;

        match self.remote(self.service.create_report(&draft, actor)).await {
            Ok(created) => {
                info!("Report {} created by {}", created.id, actor.username);
                self.store.upsert(created.clone()).await;
                self.notices.announce_success("Report submitted successfully!");
                Ok(created)
            }
            Err(e) => {
                warn!("Failed to submit report: {}", e);
                self.notices.raise_error("Failed to submit report");
                Err(e)
            }
        }
    }

    /// Approve a report. If the report is known locally and the approval
    /// cannot succeed, no request is sent. The server's returned report is
    /// stored verbatim.
    pub async fn approve(&self, report_id: &str, actor: &Identity) -> Result<Report> {
        if let Some(report) = self.store.get(report_id) {
            self.policy.check(&report, actor)?;
        }

        match self.remote(self.service.approve_report(report_id, actor)).await {
            Ok(updated) => {
                info!(
                    "Report {} approved by {} (status {:?}, {} approvers)",
                    updated.id,
                    actor.username,
                    updated.status,
                    updated.approvers.len()
                );
                self.store.upsert(updated.clone()).await;
                self.notices.announce_success("Report approved successfully!");
                Ok(updated)
            }
            Err(e) => {
                warn!("Failed to approve report {}: {}", report_id, e);
                self.notices.raise_error("Failed to approve report");
                Err(e)
            }
        }
    }

    /// Delete a report. Admin only; non-admins are refused without a
    /// request.
    pub async fn delete(&self, report_id: &str, actor: &Identity) -> Result<()> {
        if !actor.is_admin {
            return Err(Error::Forbidden(format!(
                "{} is not allowed to delete reports",
                actor.username
            )));
        }

        match self.remote(self.service.delete_report(report_id, actor)).await {
            Ok(()) => {
                info!("Report {} deleted by {}", report_id, actor.username);
                self.store.remove(report_id).await;
                self.notices.announce_success("Report deleted");
                Ok(())
            }
            Err(e) => {
                warn!("Failed to delete report {}: {}", report_id, e);
                self.notices.raise_error("Failed to delete report");
                Err(e)
            }
        }
    }

    /// Delete a report, hiding it locally if the server call fails. The
    /// local removal is not authoritative: the next successful poll restores
    /// the report if the server still has it.
    pub async fn delete_with_fallback(
        &self,
        report_id: &str,
        actor: &Identity,
    ) -> Result<DeleteOutcome> {
        match self.delete(report_id, actor).await {
            Ok(()) => Ok(DeleteOutcome::Removed),
            Err(Error::Forbidden(reason)) => Err(Error::Forbidden(reason)),
            Err(e) => {
                warn!("Removing report {} locally only after: {}", report_id, e);
                self.store.remove(report_id).await;
                Ok(DeleteOutcome::LocalOnly)
            }
        }
    }

    /// Run an action on the runtime without blocking the caller or the
    /// poller.
    pub fn dispatch<F, Fut, T>(self: &Arc<Self>, action: F) -> JoinHandle<Result<T>>
    where
        F: FnOnce(Arc<Self>) -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        tokio::spawn(action(Arc::clone(self)))
    }

    async fn remote<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(self.request_timeout)),
        }
    }
}

fn poll_error_message(error: &Error) -> String {
    match error {
        Error::Rejected { status, .. } => format!("Error: {}", status),
        other => other.to_string(),
    }
}
