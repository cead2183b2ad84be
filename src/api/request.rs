//! Request types for the payroll adjustments API.
//!
//! Creation endpoints accept the service input types directly
//! ([`NewBonus`](crate::services::bonus::NewBonus) and friends); this
//! module holds the bodies and path segments that exist only at the HTTP
//! boundary.

use serde::{Deserialize, Serialize};

use crate::models::{RecordId, RecordState};

/// A lifecycle transition named in the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    /// Approve the record.
    Confirm,
    /// Abandon the record.
    Cancel,
    /// Put the record back to draft.
    Reset,
}

impl LifecycleAction {
    /// The state the action moves a record to.
    pub fn target_state(self) -> RecordState {
        match self {
            LifecycleAction::Confirm => RecordState::Confirm,
            LifecycleAction::Cancel => RecordState::Cancel,
            LifecycleAction::Reset => RecordState::Draft,
        }
    }
}

/// Request body for `POST /payslips/finalize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeRequest {
    /// The batch to finalize.
    pub payslip_ids: Vec<RecordId>,
}

/// Response body for `POST /payslips/finalize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeResponse {
    /// The finalized payslips.
    pub finalized: Vec<RecordId>,
}
