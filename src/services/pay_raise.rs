//! Pay raise management.
//!
//! Raise lines are recomputed from the header terms and the contract wage
//! while the raise is a draft. Once the raise is confirmed, done or
//! cancelled the lines are frozen. Confirming applies the new wages to the
//! contracts and posts one audit message listing every change.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculation::{RaiseCalculation, calculate_raise};
use crate::config::RaiseLimits;
use crate::error::{AdjustmentError, AdjustmentResult};
use crate::models::{HeaderRef, PayRaiseHeader, PayRaiseLine, RaiseType, RecordId, RecordState};
use crate::store::RecordStore;

use super::lifecycle::{change_state, ensure_deletable, ensure_draft};

/// How a raise is expressed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RaiseTerms {
    /// Amount or percentage.
    pub raise_type: RaiseType,
    /// Raise percentage.
    #[serde(default)]
    pub percentage: Decimal,
    /// Raise amount.
    #[serde(default)]
    pub amount: Decimal,
}

/// A pay raise to create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayRaise {
    /// Label of the raise.
    pub name: String,
    /// Effective date.
    pub date: NaiveDate,
    /// Contract type the raise targets.
    #[serde(default)]
    pub contract_type_id: Option<RecordId>,
    /// Raise terms.
    #[serde(flatten)]
    pub terms: RaiseTerms,
    /// Contracts to raise, one line each.
    #[serde(default)]
    pub contract_ids: Vec<RecordId>,
}

/// Creates a draft pay raise with one computed line per contract.
pub fn create_pay_raise(
    store: &mut RecordStore,
    new: NewPayRaise,
    limits: &RaiseLimits,
) -> AdjustmentResult<RecordId> {
    let id = store.allocate_id();
    store.insert_pay_raise(PayRaiseHeader {
        id,
        date: new.date,
        name: new.name,
        contract_type_id: new.contract_type_id,
        raise_type: new.terms.raise_type,
        percentage: new.terms.percentage,
        amount: new.terms.amount,
        state: RecordState::Draft,
        lines: Vec::new(),
    });

    for contract_id in new.contract_ids {
        add_pay_raise_line(store, id, contract_id, limits)?;
    }
    recompute_pay_raise_lines(store, id, limits)?;

    info!(raise_id = id, "Created pay raise");
    Ok(id)
}

/// Adds a contract to a draft pay raise.
pub fn add_pay_raise_line(
    store: &mut RecordStore,
    raise_id: RecordId,
    contract_id: RecordId,
    limits: &RaiseLimits,
) -> AdjustmentResult<RecordId> {
    ensure_draft(store, HeaderRef::PayRaise(raise_id), "add lines to")?;
    let contract = store.contract(contract_id)?;
    let (employee_id, wage) = (contract.employee_id, contract.wage);

    let id = store.allocate_id();
    store.pay_raise_mut(raise_id)?.lines.push(PayRaiseLine {
        id,
        raise_id,
        contract_id: Some(contract_id),
        employee_id: Some(employee_id),
        basic_salary: wage,
        raise_amount: Decimal::ZERO,
        old_salary: Decimal::ZERO,
        new_salary: Decimal::ZERO,
    });

    recompute_pay_raise_lines(store, raise_id, limits)?;
    Ok(id)
}

/// Changes the raise terms and recomputes the lines.
///
/// The terms can be changed in any state; lines of a locked raise keep
/// their computed values.
pub fn update_pay_raise(
    store: &mut RecordStore,
    raise_id: RecordId,
    terms: RaiseTerms,
    limits: &RaiseLimits,
) -> AdjustmentResult<()> {
    let header = store.pay_raise_mut(raise_id)?;
    header.raise_type = terms.raise_type;
    header.percentage = terms.percentage;
    header.amount = terms.amount;

    recompute_pay_raise_lines(store, raise_id, limits)
}

/// Recomputes every line of a pay raise from its contract's wage.
pub fn recompute_pay_raise_lines(
    store: &mut RecordStore,
    raise_id: RecordId,
    limits: &RaiseLimits,
) -> AdjustmentResult<()> {
    let mut wages = Vec::new();
    for line in &store.pay_raise(raise_id)?.lines {
        if let Some(contract_id) = line.contract_id {
            wages.push((line.id, store.contract(contract_id)?.wage));
        }
    }

    let header = store.pay_raise_mut(raise_id)?;
    for (line_id, wage) in wages {
        if let Some(calculation) = compute_line_raise(header, line_id, wage, limits)? {
            debug!(raise_id, line_id, reasoning = %calculation.reasoning, "Computed line raise");
        }
    }
    Ok(())
}

/// Computes one line's raise from the header terms and a wage.
///
/// Returns `None` without touching anything when the line has no contract
/// or the raise is locked. Otherwise the unused header term is zeroed and
/// the line receives the clamped raise and the old and new salaries.
pub fn compute_line_raise(
    header: &mut PayRaiseHeader,
    line_id: RecordId,
    wage: Decimal,
    limits: &RaiseLimits,
) -> AdjustmentResult<Option<RaiseCalculation>> {
    let index = header
        .lines
        .iter()
        .position(|line| line.id == line_id)
        .ok_or_else(|| AdjustmentError::not_found("pay raise line", line_id))?;

    if header.state.is_locked() || header.lines[index].contract_id.is_none() {
        return Ok(None);
    }

    match header.raise_type {
        RaiseType::Amount => header.percentage = Decimal::ZERO,
        RaiseType::Percentage => header.amount = Decimal::ZERO,
    }

    let calculation = calculate_raise(
        header.raise_type,
        header.amount,
        header.percentage,
        wage,
        limits,
    );

    let line = &mut header.lines[index];
    line.basic_salary = wage;
    line.raise_amount = calculation.raise_amount;
    line.old_salary = calculation.old_salary;
    line.new_salary = calculation.new_salary;

    Ok(Some(calculation))
}

/// Applies the raise to every contract and confirms it.
///
/// Each contract whose wage changes records the old wage on its employee.
/// One audit message lists all changes.
pub fn confirm_pay_raise(store: &mut RecordStore, raise_id: RecordId) -> AdjustmentResult<()> {
    let raises: Vec<(RecordId, Decimal)> = store
        .pay_raise(raise_id)?
        .lines
        .iter()
        .filter_map(|line| line.contract_id.map(|id| (id, line.raise_amount)))
        .collect();

    let mut messages = Vec::new();
    for (contract_id, raise_amount) in raises {
        let contract = store.contract(contract_id)?;
        let (employee_id, old_wage) = (contract.employee_id, contract.wage);
        let new_wage = old_wage + raise_amount;
        if new_wage == old_wage {
            continue;
        }

        let employee = store.employee_mut(employee_id)?;
        messages.push(format!(
            "- Employee [{}] Basic Salary [{}] updated to [{}]",
            employee.name, old_wage, new_wage
        ));
        employee.previous_wage = Some(old_wage);
        store.contract_mut(contract_id)?.wage = new_wage;
    }

    let updated = messages.len();
    if !messages.is_empty() {
        store.post_message(HeaderRef::PayRaise(raise_id), messages.join("\n"));
    }
    change_state(store, HeaderRef::PayRaise(raise_id), RecordState::Confirm)?;

    info!(raise_id, contracts_updated = updated, "Confirmed pay raise");
    Ok(())
}

/// Cancels a pay raise. Contract wages are left as they are.
pub fn cancel_pay_raise(store: &mut RecordStore, raise_id: RecordId) -> AdjustmentResult<()> {
    change_state(store, HeaderRef::PayRaise(raise_id), RecordState::Cancel)
}

/// Resets a pay raise to draft.
pub fn reset_pay_raise(store: &mut RecordStore, raise_id: RecordId) -> AdjustmentResult<()> {
    change_state(store, HeaderRef::PayRaise(raise_id), RecordState::Draft)
}

/// Deletes a pay raise unless it is confirmed.
pub fn delete_pay_raise(
    store: &mut RecordStore,
    raise_id: RecordId,
) -> AdjustmentResult<PayRaiseHeader> {
    ensure_deletable(store, HeaderRef::PayRaise(raise_id))?;
    let removed = store.remove_pay_raise(raise_id)?;

    info!(raise_id, "Deleted pay raise");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{contract, date, employee};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn limits() -> RaiseLimits {
        RaiseLimits::new(dec("100"), dec("500"))
    }

    fn amount_terms(amount: &str) -> RaiseTerms {
        RaiseTerms {
            raise_type: RaiseType::Amount,
            percentage: dec("7"),
            amount: dec(amount),
        }
    }

    fn percentage_terms(percentage: &str) -> RaiseTerms {
        RaiseTerms {
            raise_type: RaiseType::Percentage,
            percentage: dec(percentage),
            amount: dec("250"),
        }
    }

    fn create(store: &mut RecordStore, terms: RaiseTerms, contract_ids: Vec<RecordId>) -> RecordId {
        create_pay_raise(
            store,
            NewPayRaise {
                name: "2024 Annual Raise".to_string(),
                date: date(2024, 1, 1),
                contract_type_id: None,
                terms,
                contract_ids,
            },
            &limits(),
        )
        .unwrap()
    }

    #[test]
    fn test_amount_raise_zeroes_percentage() {
        let mut store = RecordStore::new();
        let emp = employee(&mut store, "Hany Fawzy");
        let c = contract(&mut store, emp, dec("4000"));

        let id = create(&mut store, amount_terms("200"), vec![c]);

        let header = store.pay_raise(id).unwrap();
        assert_eq!(header.percentage, Decimal::ZERO);
        assert_eq!(header.amount, dec("200"));
        let line = &header.lines[0];
        assert_eq!(line.employee_id, Some(emp));
        assert_eq!(line.raise_amount, dec("200"));
        assert_eq!(line.old_salary, dec("4000"));
        assert_eq!(line.new_salary, dec("4200"));
    }

    #[test]
    fn test_percentage_raise_zeroes_amount() {
        let mut store = RecordStore::new();
        let emp = employee(&mut store, "Hany Fawzy");
        let c = contract(&mut store, emp, dec("6000"));

        let id = create(&mut store, percentage_terms("5"), vec![c]);

        let header = store.pay_raise(id).unwrap();
        assert_eq!(header.amount, Decimal::ZERO);
        assert_eq!(header.lines[0].raise_amount, dec("300"));
        assert_eq!(header.lines[0].new_salary, dec("6300"));
    }

    #[test]
    fn test_raises_are_clamped_into_limits() {
        let mut store = RecordStore::new();
        let emp = employee(&mut store, "Hany Fawzy");
        let low = contract(&mut store, emp, dec("1000"));
        let mid = contract(&mut store, emp, dec("6000"));
        let high = contract(&mut store, emp, dec("18000"));

        let id = create(&mut store, percentage_terms("5"), vec![low, mid, high]);

        let raises: Vec<_> = store
            .pay_raise(id)
            .unwrap()
            .lines
            .iter()
            .map(|line| line.raise_amount)
            .collect();
        assert_eq!(raises, vec![dec("100"), dec("300"), dec("500")]);
    }

    #[test]
    fn test_update_switches_terms() {
        let mut store = RecordStore::new();
        let emp = employee(&mut store, "Hany Fawzy");
        let c = contract(&mut store, emp, dec("6000"));
        let id = create(&mut store, percentage_terms("5"), vec![c]);

        update_pay_raise(&mut store, id, amount_terms("450"), &limits()).unwrap();

        let header = store.pay_raise(id).unwrap();
        assert_eq!(header.percentage, Decimal::ZERO);
        assert_eq!(header.lines[0].raise_amount, dec("450"));
    }

    #[test]
    fn test_locked_lines_are_frozen() {
        let mut store = RecordStore::new();
        let emp = employee(&mut store, "Hany Fawzy");
        let c = contract(&mut store, emp, dec("6000"));
        let id = create(&mut store, percentage_terms("5"), vec![c]);
        store.pay_raise_mut(id).unwrap().state = RecordState::Done;

        update_pay_raise(&mut store, id, amount_terms("450"), &limits()).unwrap();

        let header = store.pay_raise(id).unwrap();
        assert_eq!(header.lines[0].raise_amount, dec("300"));
        assert_eq!(header.lines[0].new_salary, dec("6300"));
        assert_eq!(header.percentage, dec("7"));
    }

    #[test]
    fn test_line_without_contract_is_skipped() {
        let mut header = PayRaiseHeader {
            id: 1,
            date: date(2024, 1, 1),
            name: "Manual".to_string(),
            contract_type_id: None,
            raise_type: RaiseType::Amount,
            percentage: dec("5"),
            amount: dec("200"),
            state: RecordState::Draft,
            lines: vec![PayRaiseLine {
                id: 2,
                raise_id: 1,
                contract_id: None,
                employee_id: None,
                basic_salary: Decimal::ZERO,
                raise_amount: Decimal::ZERO,
                old_salary: Decimal::ZERO,
                new_salary: Decimal::ZERO,
            }],
        };

        let result = compute_line_raise(&mut header, 2, dec("5000"), &limits()).unwrap();

        assert!(result.is_none());
        assert_eq!(header.percentage, dec("5"));
        assert_eq!(header.lines[0].raise_amount, Decimal::ZERO);
    }

    #[test]
    fn test_confirm_updates_wages_and_posts_message() {
        let mut store = RecordStore::new();
        let emp = employee(&mut store, "Hany Fawzy");
        let c = contract(&mut store, emp, dec("4000"));
        let id = create(&mut store, amount_terms("200"), vec![c]);

        confirm_pay_raise(&mut store, id).unwrap();

        assert_eq!(store.pay_raise(id).unwrap().state, RecordState::Confirm);
        assert_eq!(store.contract(c).unwrap().wage, dec("4200"));
        assert_eq!(store.employee(emp).unwrap().previous_wage, Some(dec("4000")));

        let messages = store.messages_for(HeaderRef::PayRaise(id));
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0].body,
            "- Employee [Hany Fawzy] Basic Salary [4000] updated to [4200]"
        );
    }

    #[test]
    fn test_confirm_without_changes_posts_nothing() {
        let mut store = RecordStore::new();
        let id = create(&mut store, amount_terms("200"), vec![]);

        confirm_pay_raise(&mut store, id).unwrap();

        assert!(store.messages_for(HeaderRef::PayRaise(id)).is_empty());
        assert_eq!(store.pay_raise(id).unwrap().state, RecordState::Confirm);
    }

    #[test]
    fn test_delete_fails_only_when_confirmed() {
        let mut store = RecordStore::new();
        let id = create(&mut store, amount_terms("200"), vec![]);
        confirm_pay_raise(&mut store, id).unwrap();

        assert!(matches!(
            delete_pay_raise(&mut store, id),
            Err(AdjustmentError::StateConflict { .. })
        ));

        cancel_pay_raise(&mut store, id).unwrap();
        reset_pay_raise(&mut store, id).unwrap();
        assert!(delete_pay_raise(&mut store, id).is_ok());
    }
}
