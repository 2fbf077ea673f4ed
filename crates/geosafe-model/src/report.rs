//! Report entity and draft.

use crate::category::Category;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A point on the earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude within [-90, 90] and longitude within [-180, 180].
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Moderation status. `Pending -> Approved` is the only legal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    #[default]
    Pending,
    Approved,
}

impl ReportStatus {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Approved)
    }
}

/// A geolocated incident record.
///
/// Everything except `status` and `approvers` is immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Unique identifier within a collection
    pub id: String,

    /// Where the incident happened
    #[serde(flatten)]
    pub location: Location,

    /// Short headline
    pub title: String,

    /// Free-text details
    #[serde(rename = "snippet")]
    pub description: String,

    /// Username of the creator; never an approver
    pub reported_by: String,

    /// Incident classification
    #[serde(rename = "crimeType", default)]
    pub category: Category,

    /// Moderation status
    #[serde(default)]
    pub status: ReportStatus,

    /// Users who endorsed the report, in approval order
    #[serde(default)]
    pub approvers: Vec<String>,
}

impl Report {
    /// Whether `username` already endorsed this report.
    pub fn is_approved_by(&self, username: &str) -> bool {
        self.approvers.iter().any(|a| a == username)
    }

    /// Whether `username` created this report.
    pub fn is_reported_by(&self, username: &str) -> bool {
        self.reported_by == username
    }
}

/// User input for a new report. Serializes to the create-report request
/// body: `{latitude, longitude, title, snippet, crimeType}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDraft {
    #[serde(flatten)]
    pub location: Location,

    pub title: String,

    #[serde(rename = "snippet")]
    pub description: String,

    #[serde(rename = "crimeType", default)]
    pub category: Category,
}

impl ReportDraft {
    pub fn new(
        location: Location,
        title: impl Into<String>,
        description: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            location,
            title: title.into(),
            description: description.into(),
            category,
        }
    }

    /// Reject blank text and out-of-range coordinates.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("title must not be blank".into()));
        }
        if self.description.trim().is_empty() {
            return Err(Error::InvalidInput("description must not be blank".into()));
        }
        if !self.location.is_valid() {
            return Err(Error::InvalidInput(format!(
                "location out of range: ({}, {})",
                self.location.latitude, self.location.longitude
            )));
        }
        Ok(())
    }

    /// Materialize the draft as a report with the given server-side fields.
    pub fn into_report(
        self,
        id: impl Into<String>,
        reported_by: impl Into<String>,
        status: ReportStatus,
        approvers: Vec<String>,
    ) -> Report {
        Report {
            id: id.into(),
            location: self.location,
            title: self.title,
            description: self.description,
            reported_by: reported_by.into(),
            category: self.category,
            status,
            approvers,
        }
    }
}
