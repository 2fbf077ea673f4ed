//! Incident categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed classification of a reported incident.
///
/// Unknown wire values decode as [`Category::Other`], which is also the
/// default when the field is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum Category {
    Theft,
    HitAndRun,
    Murder,
    #[default]
    Other,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 4] = [
        Category::Theft,
        Category::HitAndRun,
        Category::Murder,
        Category::Other,
    ];

    /// Wire name (`HIT_AND_RUN`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Theft => "THEFT",
            Category::HitAndRun => "HIT_AND_RUN",
            Category::Murder => "MURDER",
            Category::Other => "OTHER",
        }
    }

    /// Display label with underscores replaced by spaces (`HIT AND RUN`).
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Parse a wire name or display label, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        Self::ALL.into_iter().find(|c| c.as_str() == normalized)
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self::parse(&value).unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_roundtrip() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
            let back: Category = serde_json::from_str(&json).unwrap();
            assert_eq!(back, category);
        }
    }

    #[test]
    fn unknown_value_is_other() {
        let category: Category = serde_json::from_str("\"ARSON\"").unwrap();
        assert_eq!(category, Category::Other);
    }

    #[test]
    fn labels_and_lenient_parse() {
        assert_eq!(Category::HitAndRun.label(), "HIT AND RUN");
        assert_eq!(Category::parse("hit and run"), Some(Category::HitAndRun));
        assert_eq!(Category::parse("murder"), Some(Category::Murder));
        assert_eq!(Category::parse("jaywalking"), None);
    }
}
