//! Payslip, salary rule and payslip run models.
//!
//! Only the parts of a payslip that the adjustment aggregation and report
//! shaping touch are modeled; salary rule evaluation happens elsewhere.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BonusMethod, BonusTotal, PayslipState, PenaltyTotal, RecordId};

/// A computed payslip line produced by a salary rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipLine {
    /// The rule that produced this line.
    pub salary_rule_id: RecordId,
    /// Computed amount.
    pub total: Decimal,
}

/// A payslip for one employee over a pay window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payslip {
    /// Record identifier.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// The paid employee.
    pub employee_id: RecordId,
    /// The contract being paid.
    #[serde(default)]
    pub contract_id: Option<RecordId>,
    /// Salary structure.
    #[serde(default)]
    pub structure_id: Option<RecordId>,
    /// Batch this payslip was generated in.
    #[serde(default)]
    pub run_id: Option<RecordId>,
    /// First day of the pay window (inclusive).
    pub date_from: Option<NaiveDate>,
    /// Last day of the pay window (inclusive).
    pub date_to: Option<NaiveDate>,
    /// Gross or net.
    #[serde(default)]
    pub method: BonusMethod,
    /// Lifecycle state.
    #[serde(default)]
    pub state: PayslipState,
    /// Computed salary rule lines.
    #[serde(default)]
    pub lines: Vec<PayslipLine>,
    /// Bonus totals grouped by (header, type, method).
    #[serde(default)]
    pub bonus_totals: Vec<BonusTotal>,
    /// Penalty totals grouped by (header, type).
    #[serde(default)]
    pub penalty_totals: Vec<PenaltyTotal>,
}

/// A salary rule as far as report grouping is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRule {
    /// Record identifier.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// Ordering key.
    pub sequence: i32,
    /// Report grouping parent.
    #[serde(default)]
    pub parent_id: Option<RecordId>,
    /// Whether lines of this rule are shown on the payslip.
    #[serde(default = "default_appears_on_payslip")]
    pub appears_on_payslip: bool,
}

fn default_appears_on_payslip() -> bool {
    true
}

/// A named grouping of salary rules for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRuleParent {
    /// Record identifier.
    pub id: RecordId,
    /// Display name.
    pub name: String,
}

/// The state of a payslip batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayslipRunState {
    /// Open for generation.
    #[default]
    Draft,
    /// Closed after validation.
    Close,
}

/// A batch of payslips with the filters used to pick contracts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayslipRun {
    /// Record identifier.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// Batch state.
    #[serde(default)]
    pub state: PayslipRunState,
    /// Restrict to the run's company.
    #[serde(default)]
    pub all_employees: bool,
    /// Work location filter.
    #[serde(default)]
    pub work_location_id: Option<RecordId>,
    /// Company filter, applied when `all_employees` is set.
    #[serde(default)]
    pub company_id: Option<RecordId>,
    /// Department filter.
    #[serde(default)]
    pub department_id: Option<RecordId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salary_rule_appears_on_payslip_by_default() {
        let json = r#"{"id": 1, "name": "Basic", "sequence": 1}"#;
        let rule: SalaryRule = serde_json::from_str(json).unwrap();
        assert!(rule.appears_on_payslip);
        assert!(rule.parent_id.is_none());
    }

    #[test]
    fn test_deserialize_minimal_payslip() {
        let json = r#"{
            "id": 1,
            "name": "Salary Slip - January",
            "employee_id": 4,
            "date_from": "2024-01-01",
            "date_to": null
        }"#;

        let payslip: Payslip = serde_json::from_str(json).unwrap();
        assert_eq!(payslip.state, PayslipState::Draft);
        assert_eq!(payslip.method, BonusMethod::Gross);
        assert!(payslip.date_to.is_none());
        assert!(payslip.bonus_totals.is_empty());
    }
}
