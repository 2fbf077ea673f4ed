//! GeoSafe Geo Aggregation
//!
//! Classifies how crowded the neighborhood of each report is, for heatmap
//! rendering.
//!
//! # Model
//!
//! Distances are great-circle (haversine) on a sphere of radius 6 378 137 m.
//! A report's density is the number of snapshot reports, itself included,
//! within 2 km. Densities map to three tiers:
//! - ≤ 1 → LOW
//! - 2..=5 → MEDIUM
//! - > 5 → HIGH
//!
//! # Scale
//!
//! The reference index is a linear scan, O(n²) over a snapshot. The
//! [`DensityIndex`] trait is the seam for a spatial index.

mod density;
mod distance;
mod heatmap;

pub use density::{
    density, risk_tier, DensityIndex, LinearScan, RiskTier, DENSITY_RADIUS_M, LOW_MAX, MEDIUM_MAX,
};
pub use distance::{distance_m, offset_north, within, EARTH_RADIUS_M};
pub use heatmap::{heatmap, heatmap_with, HeatCell, TierSummary};
