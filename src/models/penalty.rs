//! Penalty records: categories, types, headers, lines and grouped totals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{RecordId, RecordState};

/// A grouping of penalty types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyCategory {
    /// Record identifier.
    pub id: RecordId,
    /// Unique category name.
    pub name: String,
}

/// A kind of penalty with a unique name and code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyType {
    /// Record identifier.
    pub id: RecordId,
    /// Unique type name.
    pub name: String,
    /// The category this type belongs to.
    pub category_id: RecordId,
    /// Unique short code.
    pub code: String,
}

/// A penalty header owning its lines and the derived totals.
///
/// A penalty covers `date..=date_to`. Unless `fixed_amount` is set the
/// penalty is a single day and `date_to` follows `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyHeader {
    /// Record identifier.
    pub id: RecordId,
    /// Header name.
    pub name: String,
    /// Optional penalty category.
    pub category_id: Option<RecordId>,
    /// First day of the penalty.
    pub date: NaiveDate,
    /// Last day of the penalty.
    pub date_to: Option<NaiveDate>,
    /// Whether the penalty spans an explicit date range.
    #[serde(default)]
    pub fixed_amount: bool,
    /// Month label.
    pub period_month: String,
    /// Lifecycle state.
    pub state: RecordState,
    /// The penalty lines.
    #[serde(default)]
    pub lines: Vec<PenaltyLine>,
    /// Totals grouped by type.
    #[serde(default)]
    pub totals: Vec<PenaltyTotal>,
}

/// A single employee's penalty within a header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyLine {
    /// Record identifier.
    pub id: RecordId,
    /// Owning header.
    pub penalty_id: RecordId,
    /// Payslip this line is attached to, if any.
    pub payslip_id: Option<RecordId>,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// The penalized employee.
    pub employee_id: RecordId,
    /// The penalty type.
    pub penalty_type_id: RecordId,
    /// Penalty amount.
    pub amount: Decimal,
    /// Mirror of the header's `date`.
    pub date: NaiveDate,
    /// Mirror of the header's `date_to`.
    pub date_to: Option<NaiveDate>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Mirror of the header state.
    pub state: RecordState,
}

/// A grouped penalty aggregate, either per header or per payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyTotal {
    /// Display name.
    pub name: String,
    /// Source header.
    pub penalty_id: Option<RecordId>,
    /// Payslip the total belongs to, for payslip totals.
    pub payslip_id: Option<RecordId>,
    /// Grouped penalty type.
    pub penalty_type_id: RecordId,
    /// Sum of the grouped amounts.
    pub total: Decimal,
}
