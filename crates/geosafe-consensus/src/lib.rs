//! Quorum Approval for GeoSafe Reports
//!
//! A report starts unverified and becomes verified once enough of the
//! community vouches for it. Nobody vouches for their own report, and
//! nobody vouches twice.
//!
//! # Transition Rule
//!
//! An approval by `actor` on a PENDING report appends `actor` to the
//! approvers. The report becomes APPROVED when:
//! - `actor` is an admin (single admin approval suffices), or
//! - the approver count reaches the quorum (2 by default).
//!
//! # Authority
//!
//! The remote service runs this state machine. Clients use it only to
//! decide whether to offer an approval and to reject hopeless requests
//! before sending them; they never recompute status from a server response.

mod quorum;
mod transition;

pub use quorum::{ApprovalPolicy, APPROVAL_QUORUM};
pub use transition::{
    approvals_needed, approve, can_approve, initial_state, open_report, ApprovalOutcome,
    ApprovalRejection,
};
