//! Pay raise records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{RecordId, RecordState};

/// How a pay raise is expressed. The two header fields are mutually
/// exclusive: computing lines zeroes the one that is not in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaiseType {
    /// A fixed amount added to the wage.
    Amount,
    /// A percentage of the current wage.
    Percentage,
}

/// A pay raise header applied to a set of contracts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayRaiseHeader {
    /// Record identifier.
    pub id: RecordId,
    /// Effective date.
    pub date: NaiveDate,
    /// Label of the raise.
    pub name: String,
    /// Contract type the raise targets.
    pub contract_type_id: Option<RecordId>,
    /// Amount or percentage.
    pub raise_type: RaiseType,
    /// Raise percentage, zero unless `raise_type` is percentage.
    pub percentage: Decimal,
    /// Raise amount, zero unless `raise_type` is amount.
    pub amount: Decimal,
    /// Lifecycle state; lines share it.
    pub state: RecordState,
    /// One line per contract.
    #[serde(default)]
    pub lines: Vec<PayRaiseLine>,
}

/// The computed raise for one contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayRaiseLine {
    /// Record identifier.
    pub id: RecordId,
    /// Owning header.
    pub raise_id: RecordId,
    /// Contract being raised.
    pub contract_id: Option<RecordId>,
    /// Contract employee.
    pub employee_id: Option<RecordId>,
    /// Current contract wage.
    pub basic_salary: Decimal,
    /// Clamped raise amount.
    pub raise_amount: Decimal,
    /// Wage before the raise.
    pub old_salary: Decimal,
    /// Wage after the raise.
    pub new_salary: Decimal,
}
