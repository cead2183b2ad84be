//! Transportation allowance and award/profit records.
//!
//! Both are confirmed per header like bonuses and are picked up by payslips
//! using the same date-window query.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{RecordId, RecordState};

/// A transportation allowance header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportAllowanceHeader {
    /// Record identifier.
    pub id: RecordId,
    /// Header name.
    pub name: String,
    /// Allowance date; also the date of every line.
    pub date: NaiveDate,
    /// Lifecycle state.
    pub state: RecordState,
    /// Allowance lines.
    #[serde(default)]
    pub lines: Vec<TransportAllowanceLine>,
}

/// A single employee's transportation allowance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportAllowanceLine {
    /// Record identifier.
    pub id: RecordId,
    /// Owning header.
    pub allowance_id: RecordId,
    /// Payslip this line is attached to, if any.
    pub payslip_id: Option<RecordId>,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// The employee.
    pub employee_id: RecordId,
    /// Internal transportation amount.
    pub int_amount: Decimal,
    /// External transportation amount.
    pub ext_amount: Decimal,
    /// Mirror of the header state.
    pub state: RecordState,
}

/// Whether an award/profit header pays an award or a profit share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraType {
    /// Award payment.
    Award,
    /// Profit share.
    Profit,
}

/// An award or profit-share header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardProfitHeader {
    /// Record identifier.
    pub id: RecordId,
    /// Header name.
    pub name: String,
    /// Payment date; also the date of every line.
    pub date: NaiveDate,
    /// Award or profit.
    pub extra_type: ExtraType,
    /// Lifecycle state.
    pub state: RecordState,
    /// Award/profit lines.
    #[serde(default)]
    pub lines: Vec<AwardProfitLine>,
}

/// A single employee's award or profit share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardProfitLine {
    /// Record identifier.
    pub id: RecordId,
    /// Owning header.
    pub award_profit_id: RecordId,
    /// Payslip this line is attached to, if any.
    pub payslip_id: Option<RecordId>,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// The employee.
    pub employee_id: RecordId,
    /// Amount paid.
    pub amount: Decimal,
    /// Mirror of the header state.
    pub state: RecordState,
}
