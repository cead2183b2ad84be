//! Bonus header and line management.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculation::bonus_header_totals;
use crate::error::{AdjustmentError, AdjustmentResult};
use crate::models::{BonusHeader, BonusLine, BonusMethod, HeaderRef, RecordId, RecordState};
use crate::store::RecordStore;

use super::lifecycle::{change_state, ensure_deletable, ensure_draft};
use super::period_month;

/// A bonus header to create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBonus {
    /// Header name.
    pub name: String,
    /// Optional bonus category.
    #[serde(default)]
    pub category_id: Option<RecordId>,
    /// Bonus date.
    pub date: NaiveDate,
    /// Initial lines.
    #[serde(default)]
    pub lines: Vec<NewBonusLine>,
}

/// The editable fields of a bonus line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBonusLine {
    /// The employee receiving the bonus.
    pub employee_id: RecordId,
    /// The bonus type.
    pub bonus_type_id: RecordId,
    /// Gross or net.
    #[serde(default)]
    pub method: BonusMethod,
    /// Bonus amount.
    pub amount: Decimal,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Creates a draft bonus with its lines and totals.
pub fn create_bonus(store: &mut RecordStore, new: NewBonus) -> AdjustmentResult<RecordId> {
    if let Some(category_id) = new.category_id {
        store.bonus_category(category_id)?;
    }

    let id = store.allocate_id();
    store.insert_bonus(BonusHeader {
        id,
        name: new.name,
        category_id: new.category_id,
        date: new.date,
        period_month: period_month(new.date),
        state: RecordState::Draft,
        lines: Vec::new(),
        totals: Vec::new(),
    });

    for line in new.lines {
        add_bonus_line(store, id, line)?;
    }
    recompute_bonus_totals(store, id)?;

    info!(bonus_id = id, "Created bonus");
    Ok(id)
}

/// Adds a line to a draft bonus.
pub fn add_bonus_line(
    store: &mut RecordStore,
    bonus_id: RecordId,
    line: NewBonusLine,
) -> AdjustmentResult<RecordId> {
    ensure_draft(store, HeaderRef::Bonus(bonus_id), "add lines to")?;
    validate_line(store, &line)?;

    let id = store.allocate_id();
    let header = store.bonus_mut(bonus_id)?;
    header.lines.push(BonusLine {
        id,
        bonus_id,
        payslip_id: None,
        name: String::new(),
        employee_id: line.employee_id,
        bonus_type_id: line.bonus_type_id,
        method: line.method,
        amount: line.amount,
        notes: line.notes,
        state: header.state,
    });

    recompute_bonus_totals(store, bonus_id)?;
    Ok(id)
}

/// Replaces the editable fields of a line of a draft bonus.
pub fn update_bonus_line(
    store: &mut RecordStore,
    bonus_id: RecordId,
    line_id: RecordId,
    changes: NewBonusLine,
) -> AdjustmentResult<()> {
    ensure_draft(store, HeaderRef::Bonus(bonus_id), "edit lines of")?;
    validate_line(store, &changes)?;

    let line = store
        .bonus_mut(bonus_id)?
        .lines
        .iter_mut()
        .find(|line| line.id == line_id)
        .ok_or_else(|| AdjustmentError::not_found("bonus line", line_id))?;
    line.employee_id = changes.employee_id;
    line.bonus_type_id = changes.bonus_type_id;
    line.method = changes.method;
    line.amount = changes.amount;
    line.notes = changes.notes;

    recompute_bonus_totals(store, bonus_id)
}

/// Removes a line from a draft bonus.
pub fn remove_bonus_line(
    store: &mut RecordStore,
    bonus_id: RecordId,
    line_id: RecordId,
) -> AdjustmentResult<BonusLine> {
    ensure_draft(store, HeaderRef::Bonus(bonus_id), "remove lines from")?;

    let lines = &mut store.bonus_mut(bonus_id)?.lines;
    let index = lines
        .iter()
        .position(|line| line.id == line_id)
        .ok_or_else(|| AdjustmentError::not_found("bonus line", line_id))?;
    let removed = lines.remove(index);

    recompute_bonus_totals(store, bonus_id)?;
    Ok(removed)
}

/// Replaces the bonus totals with fresh ones computed from its lines.
pub fn recompute_bonus_totals(store: &mut RecordStore, bonus_id: RecordId) -> AdjustmentResult<()> {
    let header = store.bonus_mut(bonus_id)?;
    header.totals = bonus_header_totals(header);

    debug!(
        bonus_id,
        lines = header.lines.len(),
        totals = header.totals.len(),
        "Recomputed bonus totals"
    );
    Ok(())
}

/// Confirms a bonus and its lines.
pub fn confirm_bonus(store: &mut RecordStore, bonus_id: RecordId) -> AdjustmentResult<()> {
    change_state(store, HeaderRef::Bonus(bonus_id), RecordState::Confirm)
}

/// Cancels a bonus and its lines.
pub fn cancel_bonus(store: &mut RecordStore, bonus_id: RecordId) -> AdjustmentResult<()> {
    change_state(store, HeaderRef::Bonus(bonus_id), RecordState::Cancel)
}

/// Resets a bonus and its lines to draft.
pub fn reset_bonus(store: &mut RecordStore, bonus_id: RecordId) -> AdjustmentResult<()> {
    change_state(store, HeaderRef::Bonus(bonus_id), RecordState::Draft)
}

/// Deletes a bonus unless it is confirmed.
pub fn delete_bonus(store: &mut RecordStore, bonus_id: RecordId) -> AdjustmentResult<BonusHeader> {
    ensure_deletable(store, HeaderRef::Bonus(bonus_id))?;
    let removed = store.remove_bonus(bonus_id)?;

    info!(bonus_id, "Deleted bonus");
    Ok(removed)
}

fn validate_line(store: &RecordStore, line: &NewBonusLine) -> AdjustmentResult<()> {
    store.employee(line.employee_id)?;
    store.bonus_type(line.bonus_type_id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{bonus_type, date, employee};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    struct Setup {
        store: RecordStore,
        employee_id: RecordId,
        annual: RecordId,
        target: RecordId,
    }

    fn setup() -> Setup {
        let mut store = RecordStore::new();
        let employee_id = employee(&mut store, "Mona Adel");
        let annual = bonus_type(&mut store, "BON_ANNUAL");
        let target = bonus_type(&mut store, "BON_TARGET");
        Setup {
            store,
            employee_id,
            annual,
            target,
        }
    }

    fn line(employee_id: RecordId, bonus_type_id: RecordId, amount: &str) -> NewBonusLine {
        NewBonusLine {
            employee_id,
            bonus_type_id,
            method: BonusMethod::Gross,
            amount: dec(amount),
            notes: None,
        }
    }

    fn create(store: &mut RecordStore, lines: Vec<NewBonusLine>) -> RecordId {
        create_bonus(
            store,
            NewBonus {
                name: "Q1 Bonus".to_string(),
                category_id: None,
                date: date(2024, 3, 20),
                lines,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_create_bonus_computes_totals_and_month() {
        let mut s = setup();
        let lines = vec![
            line(s.employee_id, s.annual, "100"),
            line(s.employee_id, s.annual, "50"),
            line(s.employee_id, s.target, "80"),
        ];
        let id = create(&mut s.store, lines);

        let header = s.store.bonus(id).unwrap();
        assert_eq!(header.state, RecordState::Draft);
        assert_eq!(header.period_month, "March");
        assert_eq!(header.lines.len(), 3);
        assert!(header.lines.iter().all(|l| l.state == RecordState::Draft));
        assert_eq!(header.totals.len(), 2);
        let annual_total = header
            .totals
            .iter()
            .find(|t| t.bonus_type_id == s.annual)
            .unwrap();
        assert_eq!(annual_total.total, dec("150"));
    }

    #[test]
    fn test_line_edits_recompute_totals() {
        let mut s = setup();
        let id = create(&mut s.store, vec![line(s.employee_id, s.annual, "100")]);
        let second = add_bonus_line(&mut s.store, id, line(s.employee_id, s.annual, "25")).unwrap();
        assert_eq!(s.store.bonus(id).unwrap().totals[0].total, dec("125"));

        update_bonus_line(&mut s.store, id, second, line(s.employee_id, s.annual, "40")).unwrap();
        assert_eq!(s.store.bonus(id).unwrap().totals[0].total, dec("140"));

        let first = s.store.bonus(id).unwrap().lines[0].id;
        remove_bonus_line(&mut s.store, id, first).unwrap();
        assert_eq!(s.store.bonus(id).unwrap().totals[0].total, dec("40"));

        remove_bonus_line(&mut s.store, id, second).unwrap();
        assert!(s.store.bonus(id).unwrap().totals.is_empty());
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut s = setup();
        let lines = vec![
            line(s.employee_id, s.annual, "100"),
            line(s.employee_id, s.target, "80"),
        ];
        let id = create(&mut s.store, lines);
        let before = s.store.bonus(id).unwrap().totals.clone();

        recompute_bonus_totals(&mut s.store, id).unwrap();
        recompute_bonus_totals(&mut s.store, id).unwrap();

        assert_eq!(s.store.bonus(id).unwrap().totals, before);
    }

    #[test]
    fn test_confirm_cascades_to_lines() {
        let mut s = setup();
        let lines = vec![
            line(s.employee_id, s.annual, "100"),
            line(s.employee_id, s.target, "80"),
        ];
        let id = create(&mut s.store, lines);

        confirm_bonus(&mut s.store, id).unwrap();

        let header = s.store.bonus(id).unwrap();
        assert_eq!(header.state, RecordState::Confirm);
        for line in &header.lines {
            assert_eq!(line.state, RecordState::Confirm);
            assert_eq!(line.name, "Bonus Line: Q1 Bonus");
            assert!(line.name.contains(&header.name));
        }
    }

    #[test]
    fn test_cancel_and_reset_cascade() {
        let mut s = setup();
        let id = create(&mut s.store, vec![line(s.employee_id, s.annual, "100")]);

        cancel_bonus(&mut s.store, id).unwrap();
        assert_eq!(s.store.bonus(id).unwrap().lines[0].state, RecordState::Cancel);

        reset_bonus(&mut s.store, id).unwrap();
        let header = s.store.bonus(id).unwrap();
        assert_eq!(header.state, RecordState::Draft);
        assert_eq!(header.lines[0].state, RecordState::Draft);
    }

    #[test]
    fn test_lines_are_frozen_outside_draft() {
        let mut s = setup();
        let id = create(&mut s.store, vec![line(s.employee_id, s.annual, "100")]);
        confirm_bonus(&mut s.store, id).unwrap();

        let result = add_bonus_line(&mut s.store, id, line(s.employee_id, s.annual, "10"));
        assert!(matches!(result, Err(AdjustmentError::StateConflict { .. })));
    }

    #[test]
    fn test_unknown_bonus_type_is_rejected() {
        let mut s = setup();
        let id = create(&mut s.store, vec![]);

        let result = add_bonus_line(&mut s.store, id, line(s.employee_id, 9999, "10"));
        assert!(matches!(result, Err(AdjustmentError::RecordNotFound { .. })));
    }

    #[test]
    fn test_delete_fails_only_when_confirmed() {
        let mut s = setup();

        let draft = create(&mut s.store, vec![]);
        assert!(delete_bonus(&mut s.store, draft).is_ok());

        let confirmed = create(&mut s.store, vec![line(s.employee_id, s.annual, "100")]);
        confirm_bonus(&mut s.store, confirmed).unwrap();
        assert!(matches!(
            delete_bonus(&mut s.store, confirmed),
            Err(AdjustmentError::StateConflict { .. })
        ));
        assert!(s.store.bonus(confirmed).is_ok());

        let done = create(&mut s.store, vec![]);
        s.store.bonus_mut(done).unwrap().state = RecordState::Done;
        assert!(delete_bonus(&mut s.store, done).is_ok());
    }
}
