//! Transient status banners.
//!
//! Poll and action failures raise an error banner that stays until the next
//! successful poll. Action successes raise a success banner that clears
//! itself after a display window.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Banner state for the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notice {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Publishes [`Notice`] updates.
pub struct NoticeBoard {
    tx: watch::Sender<Notice>,
    success_generation: AtomicU64,
    success_display: Duration,
}

impl NoticeBoard {
    pub fn new(success_display: Duration) -> Arc<Self> {
        let (tx, _) = watch::channel(Notice::default());
        Arc::new(Self {
            tx,
            success_generation: AtomicU64::new(0),
            success_display,
        })
    }

    pub fn current(&self) -> Notice {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Notice> {
        self.tx.subscribe()
    }

    pub fn raise_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.tx.send_if_modified(|n| {
            if n.error.as_deref() == Some(message.as_str()) {
                return false;
            }
            n.error = Some(message);
            true
        });
    }

    pub fn clear_error(&self) {
        self.tx.send_if_modified(|n| n.error.take().is_some());
    }

    /// Show a success banner and clear it after the display window, unless a
    /// newer success replaced it first. Must be called within a tokio
    /// runtime.
    pub fn announce_success(self: &Arc<Self>, message: impl Into<String>) {
        let generation = self.success_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let message = message.into();
        self.tx.send_modify(|n| n.success = Some(message));

        let board = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(board.success_display).await;
            if board.success_generation.load(Ordering::SeqCst) == generation {
                board.tx.send_if_modified(|n| n.success.take().is_some());
            }
        });
    }
}
