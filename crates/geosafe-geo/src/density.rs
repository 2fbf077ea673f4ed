//! Neighbor density and risk tiers.
//!
//! density(target) counts every report in the snapshot (the target
//! included) within [`DENSITY_RADIUS_M`] of the target's location:
//!
//! | density | tier   |
//! |---------|--------|
//! | ≤ 1     | LOW    |
//! | 2..=5   | MEDIUM |
//! | > 5     | HIGH   |

use crate::distance::within;
use geosafe_model::{Location, Report};

/// Radius of the density neighborhood, in meters.
pub const DENSITY_RADIUS_M: f64 = 2000.0;

/// Highest density still classified LOW.
pub const LOW_MAX: usize = 1;

/// Highest density still classified MEDIUM.
pub const MEDIUM_MAX: usize = 5;

/// Coarse risk classification for heatmap rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Tier for a density count.
    pub const fn from_density(density: usize) -> Self {
        if density <= LOW_MAX {
            RiskTier::Low
        } else if density <= MEDIUM_MAX {
            RiskTier::Medium
        } else {
            RiskTier::High
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
        }
    }
}

/// Radius queries over a set of reports.
///
/// [`LinearScan`] is the reference implementation. A grid or R-tree can
/// stand in for larger datasets as long as it returns the same counts.
pub trait DensityIndex {
    /// Count reports within `radius_m` of `center` (inclusive).
    fn count_within(&self, center: Location, radius_m: f64) -> usize;

    /// Density around a location using [`DENSITY_RADIUS_M`].
    fn density_at(&self, center: Location) -> usize {
        self.count_within(center, DENSITY_RADIUS_M)
    }

    /// Tier around a location.
    fn tier_at(&self, center: Location) -> RiskTier {
        RiskTier::from_density(self.density_at(center))
    }
}

/// O(n) scan per query over a borrowed snapshot.
#[derive(Debug, Clone, Copy)]
pub struct LinearScan<'a> {
    reports: &'a [Report],
}

impl<'a> LinearScan<'a> {
    pub fn new(reports: &'a [Report]) -> Self {
        Self { reports }
    }
}

impl DensityIndex for LinearScan<'_> {
    fn count_within(&self, center: Location, radius_m: f64) -> usize {
        self.reports
            .iter()
            .filter(|r| within(center, r.location, radius_m))
            .count()
    }
}

/// Density around `target` within `snapshot`.
pub fn density(snapshot: &[Report], target: &Report) -> usize {
    LinearScan::new(snapshot).density_at(target.location)
}

/// Risk tier of `target` within `snapshot`.
pub fn risk_tier(snapshot: &[Report], target: &Report) -> RiskTier {
    RiskTier::from_density(density(snapshot, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::offset_north;
    use geosafe_model::{Category, ReportStatus};

    fn report_at(id: &str, location: Location) -> Report {
        Report {
            id: id.into(),
            location,
            title: id.into(),
            description: String::new(),
            reported_by: "tester".into(),
            category: Category::Theft,
            status: ReportStatus::Pending,
            approvers: vec![],
        }
    }

    /// Target at the origin plus `near` reports inside the radius and
    /// `far` reports outside it.
    fn cluster(near: usize, far: usize) -> Vec<Report> {
        let origin = Location::new(14.5995, 120.9842);
        let mut reports = vec![report_at("target", origin)];
        for i in 0..near {
            let meters = 100.0 + 150.0 * i as f64;
            reports.push(report_at(&format!("near{}", i), offset_north(origin, meters)));
        }
        for i in 0..far {
            let meters = 2100.0 + 500.0 * i as f64;
            reports.push(report_at(&format!("far{}", i), offset_north(origin, meters)));
        }
        reports
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(RiskTier::from_density(0), RiskTier::Low);
        assert_eq!(RiskTier::from_density(1), RiskTier::Low);
        assert_eq!(RiskTier::from_density(2), RiskTier::Medium);
        assert_eq!(RiskTier::from_density(5), RiskTier::Medium);
        assert_eq!(RiskTier::from_density(6), RiskTier::High);
        assert_eq!(RiskTier::from_density(100), RiskTier::High);
    }

    #[test]
    fn isolated_report_is_low() {
        let reports = cluster(0, 3);
        assert_eq!(density(&reports, &reports[0]), 1);
        assert_eq!(risk_tier(&reports, &reports[0]), RiskTier::Low);
    }

    #[test]
    fn three_neighbors_is_medium() {
        let reports = cluster(3, 2);
        assert_eq!(density(&reports, &reports[0]), 4);
        assert_eq!(risk_tier(&reports, &reports[0]), RiskTier::Medium);
    }

    #[test]
    fn six_neighbors_is_high() {
        let reports = cluster(6, 1);
        assert_eq!(density(&reports, &reports[0]), 7);
        assert_eq!(risk_tier(&reports, &reports[0]), RiskTier::High);
    }

    #[test]
    fn radius_is_inclusive_just_inside() {
        let origin = Location::new(0.0, 0.0);
        let reports = vec![
            report_at("a", origin),
            report_at("b", offset_north(origin, 1999.9)),
            report_at("c", offset_north(origin, 2000.1)),
        ];
        assert_eq!(density(&reports, &reports[0]), 2);
    }

    #[test]
    fn density_counts_snapshot_members_only() {
        // density is computed from the snapshot only
        let origin = Location::new(0.0, 0.0);
        let snapshot = vec![report_at("a", offset_north(origin, 10.0))];
        let outsider = report_at("x", origin);
        assert_eq!(density(&snapshot, &outsider), 1);
    }

    #[test]
    fn pure_same_inputs_same_tier() {
        let reports = cluster(4, 4);
        let first = risk_tier(&reports, &reports[2]);
        for _ in 0..10 {
            assert_eq!(risk_tier(&reports, &reports[2]), first);
        }
    }
}
