//! Calculation logic for payroll adjustments.
//!
//! This module contains the pure business rules the services apply:
//! grouped bonus and penalty totals, penalty date overlap against a payslip
//! window, clamped pay raises, award/profit sums, and the salary rule
//! grouping used to shape payslip reports.

mod award_profit;
mod overlap;
mod raise;
mod salary_rules;
mod totals;

pub use award_profit::{AwardProfitTotals, sum_award_profit};
pub use overlap::{overlap_days, penalty_overlaps};
pub use raise::{RaiseCalculation, calculate_raise, clamp_raise};
pub use salary_rules::{
    PayslipReport, ReportEntry, RuleAssignment, RuleBook, RuleGroup, RuleNames,
    assign_parents_and_free_rules, get_free_rule_amount, get_parent_amount, get_salary_rules,
    rule_parents_and_free_names,
};
pub use totals::{
    BONUS_TOTAL_PREFIX, PAYSLIP_BONUS_TOTAL_PREFIX, PAYSLIP_PENALTY_TOTAL_PREFIX,
    PENALTY_TOTAL_PREFIX, bonus_header_totals, payslip_bonus_totals, payslip_penalty_totals,
    penalty_header_totals,
};
