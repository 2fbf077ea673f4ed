//! GeoSafe Sync - Report Store and Sync Engine
//!
//! Keeps a client's local report collection in step with the remote report
//! service, and carries user actions (submit, approve, delete) to it.
//!
//! # Architecture
//!
//! - **Storage**: RocksDB-backed blob cache that survives restarts
//! - **Store**: The session's report collection, published as immutable
//!   snapshots
//! - **Remote**: The report service seam and its HTTP client
//! - **Engine**: Polling reconciliation and server-confirmed actions
//! - **Notice**: Error and success banners for the presentation layer
//! - **Node**: The long-running process wiring it all together
//!
//! # Example
//!
//! ```no_run
//! use geosafe_sync::{SyncConfig, SyncNode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SyncConfig::from_env()?;
//!     let node = SyncNode::open(config).await?;
//!     node.run().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod node;
pub mod notice;
pub mod remote;
pub mod storage;
pub mod store;

pub use config::{identity_from_env, SyncConfig};
pub use engine::{DeleteOutcome, PollerHandle, SyncEngine};
pub use error::{Error, Result};
pub use node::SyncNode;
pub use notice::{Notice, NoticeBoard};
pub use remote::{HttpReportService, ReportService};
pub use storage::{BlobStore, Storage};
pub use store::{ReportStore, Snapshot, SNAPSHOT_BLOB};
