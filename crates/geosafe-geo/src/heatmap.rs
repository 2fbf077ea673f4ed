//! Heatmap cells for a (possibly filtered) set of reports.
//!
//! Targets are usually a category-filtered view, but density is always
//! counted against the full snapshot so that filtering never hides nearby
//! risk.

use crate::density::{DensityIndex, LinearScan, RiskTier, DENSITY_RADIUS_M};
use geosafe_model::{Location, Report};

/// One heatmap circle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HeatCell {
    pub report_id: String,
    pub center: Location,
    pub radius_m: f64,
    pub density: usize,
    pub tier: RiskTier,
}

/// Classify each target against the snapshot, in target order.
pub fn heatmap<'a, I>(targets: I, snapshot: &[Report]) -> Vec<HeatCell>
where
    I: IntoIterator<Item = &'a Report>,
{
    heatmap_with(targets, &LinearScan::new(snapshot))
}

/// [`heatmap`] over a caller-supplied index.
pub fn heatmap_with<'a, I, D>(targets: I, index: &D) -> Vec<HeatCell>
where
    I: IntoIterator<Item = &'a Report>,
    D: DensityIndex + ?Sized,
{
    targets
        .into_iter()
        .map(|report| {
            let density = index.density_at(report.location);
            HeatCell {
                report_id: report.id.clone(),
                center: report.location,
                radius_m: DENSITY_RADIUS_M,
                density,
                tier: RiskTier::from_density(density),
            }
        })
        .collect()
}

/// Number of cells per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TierSummary {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl TierSummary {
    pub fn from_cells(cells: &[HeatCell]) -> Self {
        cells.iter().fold(Self::default(), |mut acc, cell| {
            match cell.tier {
                RiskTier::Low => acc.low += 1,
                RiskTier::Medium => acc.medium += 1,
                RiskTier::High => acc.high += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}
