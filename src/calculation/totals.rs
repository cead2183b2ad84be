//! Grouped total computation.
//!
//! Totals are never patched: each function reads the source lines and
//! returns the complete replacement collection.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::{
    BonusHeader, BonusLine, BonusMethod, BonusTotal, Payslip, PenaltyHeader, PenaltyLine,
    PenaltyTotal, RecordId,
};

/// Prefix of the name of every bonus header total.
pub const BONUS_TOTAL_PREFIX: &str = "Total Bonus: ";

/// Prefix of the name of every penalty header total.
pub const PENALTY_TOTAL_PREFIX: &str = "Total Penalty: ";

/// Prefix of the name of every payslip bonus total.
pub const PAYSLIP_BONUS_TOTAL_PREFIX: &str = "Payslip Total Bonus for: ";

/// Prefix of the name of every payslip penalty total.
pub const PAYSLIP_PENALTY_TOTAL_PREFIX: &str = "Payslip Total Penalty for: ";

/// Computes the totals of a bonus header grouped by (type, method).
///
/// Groups are ordered by type descending, then method descending. A header
/// without lines has no totals.
///
/// # Examples
///
/// ```
/// use payroll_adjustments::calculation::bonus_header_totals;
/// use payroll_adjustments::models::{BonusHeader, BonusLine, BonusMethod, RecordState};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let line = |id, amount| BonusLine {
///     id,
///     bonus_id: 1,
///     payslip_id: None,
///     name: String::new(),
///     employee_id: 9,
///     bonus_type_id: 4,
///     method: BonusMethod::Gross,
///     amount: Decimal::new(amount, 0),
///     notes: None,
///     state: RecordState::Draft,
/// };
/// let header = BonusHeader {
///     id: 1,
///     name: "Q1".to_string(),
///     category_id: None,
///     date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
///     period_month: "March".to_string(),
///     state: RecordState::Draft,
///     lines: vec![line(2, 100), line(3, 250)],
///     totals: vec![],
/// };
///
/// let totals = bonus_header_totals(&header);
/// assert_eq!(totals.len(), 1);
/// assert_eq!(totals[0].total, Decimal::new(350, 0));
/// assert_eq!(totals[0].name, "Total Bonus: Q1");
/// ```
pub fn bonus_header_totals(header: &BonusHeader) -> Vec<BonusTotal> {
    let mut groups: BTreeMap<(RecordId, BonusMethod), Decimal> = BTreeMap::new();
    for line in &header.lines {
        *groups.entry((line.bonus_type_id, line.method)).or_default() += line.amount;
    }

    groups
        .into_iter()
        .rev()
        .map(|((bonus_type_id, method), total)| BonusTotal {
            name: format!("{}{}", BONUS_TOTAL_PREFIX, header.name),
            bonus_id: Some(header.id),
            payslip_id: None,
            bonus_type_id,
            method,
            total,
        })
        .collect()
}

/// Computes the totals of a penalty header grouped by type, ascending.
pub fn penalty_header_totals(header: &PenaltyHeader) -> Vec<PenaltyTotal> {
    let mut groups: BTreeMap<RecordId, Decimal> = BTreeMap::new();
    for line in &header.lines {
        *groups.entry(line.penalty_type_id).or_default() += line.amount;
    }

    groups
        .into_iter()
        .map(|(penalty_type_id, total)| PenaltyTotal {
            name: format!("{}{}", PENALTY_TOTAL_PREFIX, header.name),
            penalty_id: Some(header.id),
            payslip_id: None,
            penalty_type_id,
            total,
        })
        .collect()
}

/// Computes the bonus totals of a payslip from its attached lines.
///
/// Lines are grouped by (header, type, method) and ordered by type, then
/// method, then header.
pub fn payslip_bonus_totals(payslip: &Payslip, lines: &[&BonusLine]) -> Vec<BonusTotal> {
    let mut groups: BTreeMap<(RecordId, BonusMethod, RecordId), Decimal> = BTreeMap::new();
    for line in lines {
        *groups
            .entry((line.bonus_type_id, line.method, line.bonus_id))
            .or_default() += line.amount;
    }

    groups
        .into_iter()
        .map(|((bonus_type_id, method, bonus_id), total)| BonusTotal {
            name: format!("{}{}", PAYSLIP_BONUS_TOTAL_PREFIX, payslip.name),
            bonus_id: Some(bonus_id),
            payslip_id: Some(payslip.id),
            bonus_type_id,
            method,
            total,
        })
        .collect()
}

/// Computes the penalty totals of a payslip grouped by (header, type),
/// ordered by type then header.
pub fn payslip_penalty_totals(payslip: &Payslip, lines: &[&PenaltyLine]) -> Vec<PenaltyTotal> {
    let mut groups: BTreeMap<(RecordId, RecordId), Decimal> = BTreeMap::new();
    for line in lines {
        *groups
            .entry((line.penalty_type_id, line.penalty_id))
            .or_default() += line.amount;
    }

    groups
        .into_iter()
        .map(|((penalty_type_id, penalty_id), total)| PenaltyTotal {
            name: format!("{}{}", PAYSLIP_PENALTY_TOTAL_PREFIX, payslip.name),
            penalty_id: Some(penalty_id),
            payslip_id: Some(payslip.id),
            penalty_type_id,
            total,
        })
        .collect()
}
