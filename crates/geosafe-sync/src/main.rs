//! GeoSafe sync node binary
//!
//! Keeps a local report cache in step with the report service and logs
//! the density tiers of every snapshot.

use geosafe_sync::{SyncConfig, SyncNode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geosafe_node=info,geosafe_sync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting GeoSafe sync node");

    let config = SyncConfig::from_env()?;

    let node = SyncNode::open(config).await?;
    node.run().await?;

    Ok(())
}
