//! GeoSafe Report Model
//!
//! Data shapes shared by every GeoSafe component.
//!
//! # Core Types
//!
//! - [`Report`] - A geolocated incident record subject to moderation
//! - [`ReportDraft`] - User input for a report not yet accepted by the server
//! - [`Category`] - Fixed incident classification
//! - [`ReportStatus`] - `PENDING` or `APPROVED`
//! - [`Identity`] - Acting user as resolved by the identity provider
//!
//! # Views
//!
//! The [`view`] module holds pure projections over a report collection
//! (category tabs, "my reports").
//!
//! # Wire Format
//!
//! Reports serialize to the remote service's JSON shape:
//!
//! ```json
//! {"id": "r1", "latitude": 1.0, "longitude": 2.0, "title": "...",
//!  "snippet": "...", "reportedBy": "alice", "crimeType": "THEFT",
//!  "status": "PENDING", "approvers": []}
//! ```

mod category;
mod error;
mod identity;
mod report;
pub mod view;

pub use category::Category;
pub use error::{Error, Result};
pub use identity::{Identity, USER_INFO_HEADER};
pub use report::{Location, Report, ReportDraft, ReportStatus};
pub use view::{filter_by_category, visible_to, CategoryTab};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_decodes_remote_shape() {
        let json = r#"{
            "id": "r1",
            "latitude": 14.5995,
            "longitude": 120.9842,
            "title": "Phone snatched",
            "snippet": "Near the jeepney stop",
            "reportedBy": "alice",
            "crimeType": "THEFT",
            "status": "PENDING",
            "approvers": ["bob"]
        }"#;

        let report: Report = serde_json::from_str(json).unwrap();
        assert_eq!(report.id, "r1");
        assert_eq!(report.location, Location::new(14.5995, 120.9842));
        assert_eq!(report.description, "Near the jeepney stop");
        assert_eq!(report.category, Category::Theft);
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.approvers, vec!["bob".to_string()]);
    }
}
