//! Status transitions driven by approval events.
//!
//! ```text
//!            approve (non-admin, below quorum)
//!              ┌─────┐
//!              ▼     │
//!          ┌─────────┴┐  approve (admin, or quorum reached)  ┌──────────┐
//! create ─►│ PENDING  ├─────────────────────────────────────►│ APPROVED │
//!          └──────────┘                                      └──────────┘
//! ```
//!
//! APPROVED is terminal. Rejected events leave the report unchanged.

use crate::quorum::ApprovalPolicy;
use geosafe_model::{Identity, Report, ReportDraft, ReportStatus};
use thiserror::Error;

/// Why an approval event was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApprovalRejection {
    /// The report is already approved
    #[error("report {0} is already approved")]
    AlreadyApproved(String),

    /// The reporter tried to approve their own report
    #[error("{0} cannot approve their own report")]
    SelfApproval(String),

    /// The user already approved this report
    #[error("{0} has already approved this report")]
    DuplicateApproval(String),
}

/// Resulting state after an accepted approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalOutcome {
    pub status: ReportStatus,
    pub approvers: Vec<String>,
}

impl ApprovalOutcome {
    /// Whether this approval flipped the report to APPROVED.
    pub fn is_approved(&self) -> bool {
        self.status == ReportStatus::Approved
    }
}

impl ApprovalPolicy {
    /// Check the approval preconditions without computing a transition.
    pub fn check(&self, report: &Report, actor: &Identity) -> Result<(), ApprovalRejection> {
        if report.status.is_terminal() {
            return Err(ApprovalRejection::AlreadyApproved(report.id.clone()));
        }
        if report.is_reported_by(&actor.username) {
            return Err(ApprovalRejection::SelfApproval(actor.username.clone()));
        }
        if report.is_approved_by(&actor.username) {
            return Err(ApprovalRejection::DuplicateApproval(actor.username.clone()));
        }
        Ok(())
    }

    /// Compute the next `(status, approvers)` for an approval by `actor`.
    pub fn approve(
        &self,
        report: &Report,
        actor: &Identity,
    ) -> Result<ApprovalOutcome, ApprovalRejection> {
        self.check(report, actor)?;

        let mut approvers = report.approvers.clone();
        approvers.push(actor.username.clone());

        let status = if actor.is_admin || self.meets_quorum(approvers.len()) {
            ReportStatus::Approved
        } else {
            ReportStatus::Pending
        };

        Ok(ApprovalOutcome { status, approvers })
    }

    /// Apply an approval, returning the updated report.
    pub fn apply(&self, report: &Report, actor: &Identity) -> Result<Report, ApprovalRejection> {
        let outcome = self.approve(report, actor)?;
        Ok(Report {
            status: outcome.status,
            approvers: outcome.approvers,
            ..report.clone()
        })
    }

    /// Remaining non-admin approvals before the report is promoted.
    pub fn remaining(&self, report: &Report) -> usize {
        if report.status.is_terminal() {
            0
        } else {
            self.approvals_needed(report.approvers.len())
        }
    }
}

/// Whether `actor` may approve `report`: it is pending, they did not report
/// it, and they have not approved it yet.
pub fn can_approve(report: &Report, actor: &Identity) -> bool {
    ApprovalPolicy::default().check(report, actor).is_ok()
}

/// Approve under the default quorum.
pub fn approve(report: &Report, actor: &Identity) -> Result<ApprovalOutcome, ApprovalRejection> {
    ApprovalPolicy::default().approve(report, actor)
}

/// Remaining non-admin approvals under the default quorum; zero once
/// approved.
pub fn approvals_needed(report: &Report) -> usize {
    ApprovalPolicy::default().remaining(report)
}

/// Status and approvers of a freshly created report. Admin-created reports
/// start approved with the creator as sole approver.
pub fn initial_state(creator: &Identity) -> (ReportStatus, Vec<String>) {
    if creator.is_admin {
        (ReportStatus::Approved, vec![creator.username.clone()])
    } else {
        (ReportStatus::Pending, Vec::new())
    }
}

/// Create a report from a draft on behalf of `creator`.
pub fn open_report(id: impl Into<String>, draft: ReportDraft, creator: &Identity) -> Report {
    let (status, approvers) = initial_state(creator);
    draft.into_report(id, creator.username.clone(), status, approvers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geosafe_model::{Category, Location};
    use proptest::prelude::*;

    fn pending(reporter: &str) -> Report {
        let draft = ReportDraft::new(
            Location::new(0.0, 0.0),
            "Hit and run",
            "Grey sedan",
            Category::HitAndRun,
        );
        open_report("r1", draft, &Identity::user(reporter))
    }

    #[test]
    fn quorum_of_two_distinct_users() {
        let policy = ApprovalPolicy::default();
        let report = pending("carol");

        let after_a = policy.apply(&report, &Identity::user("alice")).unwrap();
        assert_eq!(after_a.status, ReportStatus::Pending);
        assert_eq!(after_a.approvers, vec!["alice"]);

        let after_b = policy.apply(&after_a, &Identity::user("bob")).unwrap();
        assert_eq!(after_b.status, ReportStatus::Approved);
        assert_eq!(after_b.approvers, vec!["alice", "bob"]);
    }

    #[test]
    fn approvals_needed_counts_down() {
        let report = pending("carol");
        assert_eq!(approvals_needed(&report), 2);

        let once = approve(&report, &Identity::user("alice")).map(|o| Report {
            status: o.status,
            approvers: o.approvers,
            ..report.clone()
        });
        assert_eq!(approvals_needed(&once.unwrap()), 1);

        let approved = ApprovalPolicy::default()
            .apply(&report, &Identity::admin("Admin"))
            .unwrap();
        assert_eq!(approvals_needed(&approved), 0);
    }

    #[test]
    fn single_admin_approval_is_enough() {
        let report = pending("carol");
        let outcome = approve(&report, &Identity::admin("Admin")).unwrap();
        assert!(outcome.is_approved());
        assert_eq!(outcome.approvers, vec!["Admin"]);
    }

    #[test]
    fn admin_after_prior_approver() {
        let policy = ApprovalPolicy::with_quorum(3);
        let report = policy.apply(&pending("carol"), &Identity::user("alice")).unwrap();
        let approved = policy.apply(&report, &Identity::admin("Admin")).unwrap();
        assert_eq!(approved.status, ReportStatus::Approved);
        assert_eq!(approved.approvers, vec!["alice", "Admin"]);
    }

    #[test]
    fn reporter_cannot_self_approve() {
        let report = pending("carol");
        assert_eq!(
            approve(&report, &Identity::user("carol")),
            Err(ApprovalRejection::SelfApproval("carol".into()))
        );
        assert!(!can_approve(&report, &Identity::admin("carol")));
    }

    #[test]
    fn duplicate_approval_rejected() {
        let policy = ApprovalPolicy::default();
        let report = policy.apply(&pending("carol"), &Identity::user("alice")).unwrap();
        assert_eq!(
            policy.approve(&report, &Identity::user("alice")),
            Err(ApprovalRejection::DuplicateApproval("alice".into()))
        );
    }

    #[test]
    fn approved_is_terminal() {
        let report = ApprovalPolicy::default()
            .apply(&pending("carol"), &Identity::admin("Admin"))
            .unwrap();
        assert!(matches!(
            approve(&report, &Identity::user("dave")),
            Err(ApprovalRejection::AlreadyApproved(_))
        ));
    }

    #[test]
    fn initial_state_by_role() {
        assert_eq!(
            initial_state(&Identity::admin("Admin")),
            (ReportStatus::Approved, vec!["Admin".to_string()])
        );
        assert_eq!(
            initial_state(&Identity::user("alice")),
            (ReportStatus::Pending, vec![])
        );
    }

    #[test]
    fn remaining_approvals() {
        let policy = ApprovalPolicy::default();
        let report = pending("carol");
        assert_eq!(policy.remaining(&report), 2);
        let report = policy.apply(&report, &Identity::user("alice")).unwrap();
        assert_eq!(policy.remaining(&report), 1);
        let report = policy.apply(&report, &Identity::user("bob")).unwrap();
        assert_eq!(policy.remaining(&report), 0);
    }

    fn actor() -> impl Strategy<Value = Identity> {
        (prop::sample::select(vec!["carol", "alice", "bob", "dave", "erin"]), any::<bool>())
            .prop_map(|(name, is_admin)| Identity {
                username: name.to_string(),
                is_admin,
            })
    }

    proptest! {
        #[test]
        fn invariants_hold_under_any_sequence(
            actors in prop::collection::vec(actor(), 0..12),
            quorum in 1usize..4,
        ) {
            let policy = ApprovalPolicy::with_quorum(quorum);
            let mut report = pending("carol");
            let mut was_approved = false;

            for actor in &actors {
                if let Ok(next) = policy.apply(&report, actor) {
                    report = next;
                }

                // Reporter never approves
                prop_assert!(!report.is_approved_by("carol"));

                // No duplicate approvers
                let mut seen = report.approvers.clone();
                seen.sort();
                seen.dedup();
                prop_assert_eq!(seen.len(), report.approvers.len());

                // Monotonic status
                if was_approved {
                    prop_assert_eq!(report.status, ReportStatus::Approved);
                }
                was_approved = report.status == ReportStatus::Approved;
            }
        }

        #[test]
        fn approving_twice_equals_approving_once(actor in actor()) {
            let policy = ApprovalPolicy::default();
            let report = pending("carol");
            let once = policy.apply(&report, &actor).unwrap_or_else(|_| report.clone());
            let twice = policy.apply(&once, &actor).unwrap_or_else(|_| once.clone());
            prop_assert_eq!(once.approvers, twice.approvers);
        }
    }
}
