//! Lifecycle states shared by every adjustment record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four-state lifecycle used by bonus, penalty, pay raise, transport
/// allowance and award/profit records and their lines.
///
/// `Draft → Confirm → Done`, with `Cancel` reachable from draft or confirm
/// and `Draft` reachable again through a reset.
///
/// # Example
///
/// ```
/// use payroll_adjustments::models::RecordState;
///
/// assert!(RecordState::Done.is_locked());
/// assert!(!RecordState::Draft.is_locked());
/// assert_eq!(RecordState::Confirm.to_string(), "confirmed");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordState {
    /// Freshly created, lines are editable.
    #[default]
    Draft,
    /// Approved and eligible for payslip pickup.
    Confirm,
    /// Consumed by a finalized payslip.
    Done,
    /// Abandoned; can only be reset to draft.
    Cancel,
}

impl RecordState {
    /// Returns true when derived values of the record are frozen.
    pub fn is_locked(self) -> bool {
        matches!(self, RecordState::Confirm | RecordState::Done | RecordState::Cancel)
    }
}

impl fmt::Display for RecordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordState::Draft => "draft",
            RecordState::Confirm => "confirmed",
            RecordState::Done => "done",
            RecordState::Cancel => "cancelled",
        };
        f.write_str(label)
    }
}

/// Payslip lifecycle as seen by the aggregation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayslipState {
    /// Being prepared.
    #[default]
    Draft,
    /// Waiting for validation.
    Verify,
    /// Finalized.
    Done,
    /// Rejected.
    Cancel,
}
