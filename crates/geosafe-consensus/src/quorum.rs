//! Approval quorum.
//!
//! A pending report is promoted once:
//! - any admin approves it, or
//! - `quorum` distinct non-reporter users approve it.

/// Distinct approvals that promote a report without an admin.
pub const APPROVAL_QUORUM: usize = 2;

/// Quorum configuration for the approval state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalPolicy {
    /// Distinct approvals required when no admin is involved
    pub quorum: usize,
}

impl Default for ApprovalPolicy {
    fn default() -> Self {
        Self {
            quorum: APPROVAL_QUORUM,
        }
    }
}

impl ApprovalPolicy {
    /// Policy with a custom quorum. A quorum of zero is treated as one.
    pub const fn with_quorum(quorum: usize) -> Self {
        Self {
            quorum: if quorum == 0 { 1 } else { quorum },
        }
    }

    /// Check if an approval count (after an approval by a non-admin) meets
    /// the quorum.
    pub const fn meets_quorum(&self, approvals: usize) -> bool {
        approvals >= self.quorum
    }

    /// How many more approvals are needed to reach quorum.
    pub const fn approvals_needed(&self, approvals: usize) -> usize {
        if approvals >= self.quorum {
            0
        } else {
            self.quorum - approvals
        }
    }
}
