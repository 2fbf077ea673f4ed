//! Read-side projections of a report collection.
//!
//! Every function here is pure and preserves the input order.

use crate::category::Category;
use crate::identity::Identity;
use crate::report::Report;

/// Reports matching `category`, or every report when `None`.
pub fn filter_by_category(reports: &[Report], category: Option<Category>) -> Vec<&Report> {
    reports
        .iter()
        .filter(|r| category.map_or(true, |c| r.category == c))
        .collect()
}

/// Reports an identity may manage: admins see everything, regular users
/// only what they reported.
pub fn visible_to<'a>(reports: &'a [Report], identity: &Identity) -> Vec<&'a Report> {
    if identity.is_admin {
        return reports.iter().collect();
    }
    reports
        .iter()
        .filter(|r| r.is_reported_by(&identity.username))
        .collect()
}

/// A category tab: `All` followed by one tab per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryTab {
    #[default]
    All,
    Only(Category),
}

impl CategoryTab {
    /// Tabs in display order.
    pub fn all() -> Vec<Self> {
        std::iter::once(CategoryTab::All)
            .chain(Category::ALL.into_iter().map(CategoryTab::Only))
            .collect()
    }

    /// Tab at a display index.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(CategoryTab::All),
            n => Category::ALL.get(n - 1).copied().map(CategoryTab::Only),
        }
    }

    pub fn label(&self) -> String {
        match self {
            CategoryTab::All => "All".to_string(),
            CategoryTab::Only(c) => c.label(),
        }
    }

    /// Category selector for [`filter_by_category`].
    pub fn category(&self) -> Option<Category> {
        match self {
            CategoryTab::All => None,
            CategoryTab::Only(c) => Some(*c),
        }
    }

    pub fn apply<'a>(&self, reports: &'a [Report]) -> Vec<&'a Report> {
        filter_by_category(reports, self.category())
    }
}
