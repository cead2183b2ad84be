//! Bonus records: categories, types, headers, lines and grouped totals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{RecordId, RecordState};

/// Whether a bonus is paid on gross or net salary.
///
/// Ordered `Gross < Net`, which drives the ordering of grouped totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusMethod {
    /// Added to gross salary.
    #[default]
    Gross,
    /// Added to net salary.
    Net,
}

/// A grouping of bonus types (e.g. "Performance").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusCategory {
    /// Record identifier.
    pub id: RecordId,
    /// Unique category name.
    pub name: String,
}

/// A kind of bonus with a unique name and code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusType {
    /// Record identifier.
    pub id: RecordId,
    /// Unique type name.
    pub name: String,
    /// The category this type belongs to.
    pub category_id: RecordId,
    /// Unique short code used on payslip rules.
    pub code: String,
}

/// A bonus header owning its lines and the derived totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusHeader {
    /// Record identifier.
    pub id: RecordId,
    /// Header name, copied into line names on every state change.
    pub name: String,
    /// Optional bonus category.
    pub category_id: Option<RecordId>,
    /// Bonus date; also the date of every line.
    pub date: NaiveDate,
    /// Month label (e.g. "January").
    pub period_month: String,
    /// Lifecycle state.
    pub state: RecordState,
    /// The bonus lines.
    #[serde(default)]
    pub lines: Vec<BonusLine>,
    /// Totals grouped by (type, method), recomputed after every line change.
    #[serde(default)]
    pub totals: Vec<BonusTotal>,
}

/// A single employee's bonus within a header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusLine {
    /// Record identifier.
    pub id: RecordId,
    /// Owning header.
    pub bonus_id: RecordId,
    /// Payslip this line is attached to, if any.
    pub payslip_id: Option<RecordId>,
    /// Display name, set from the header on state changes.
    #[serde(default)]
    pub name: String,
    /// The employee receiving the bonus.
    pub employee_id: RecordId,
    /// The bonus type.
    pub bonus_type_id: RecordId,
    /// Gross or net.
    pub method: BonusMethod,
    /// Bonus amount.
    pub amount: Decimal,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Mirror of the header state.
    pub state: RecordState,
}

/// A grouped bonus aggregate, either per header or per payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusTotal {
    /// Display name.
    pub name: String,
    /// Source header (always set for payslip totals as well).
    pub bonus_id: Option<RecordId>,
    /// Payslip the total belongs to, for payslip totals.
    pub payslip_id: Option<RecordId>,
    /// Grouped bonus type.
    pub bonus_type_id: RecordId,
    /// Grouped method.
    pub method: BonusMethod,
    /// Sum of the grouped amounts.
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_ordering_puts_gross_first() {
        assert!(BonusMethod::Gross < BonusMethod::Net);
    }

    #[test]
    fn test_deserialize_bonus_line_defaults() {
        let json = r#"{
            "id": 7,
            "bonus_id": 3,
            "payslip_id": null,
            "employee_id": 1,
            "bonus_type_id": 2,
            "method": "net",
            "amount": "150.00",
            "state": "draft"
        }"#;

        let line: BonusLine = serde_json::from_str(json).unwrap();
        assert_eq!(line.method, BonusMethod::Net);
        assert_eq!(line.amount, Decimal::new(15000, 2));
        assert!(line.name.is_empty());
        assert!(line.notes.is_none());
    }
}
