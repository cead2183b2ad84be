//! Penalty header and line management.
//!
//! A penalty without a fixed amount covers a single day: recomputing sets
//! its end date to its start date. Lines always mirror the header dates so
//! the payslip overlap check can read them directly.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculation::penalty_header_totals;
use crate::error::{AdjustmentError, AdjustmentResult};
use crate::models::{HeaderRef, PenaltyHeader, PenaltyLine, RecordId, RecordState};
use crate::store::RecordStore;

use super::lifecycle::{change_state, ensure_deletable, ensure_draft};
use super::period_month;

/// A penalty header to create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPenalty {
    /// Header name.
    pub name: String,
    /// Optional penalty category.
    #[serde(default)]
    pub category_id: Option<RecordId>,
    /// First day of the penalty.
    pub date: NaiveDate,
    /// Last day, used when `fixed_amount` is set.
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
    /// Whether the penalty spans an explicit date range.
    #[serde(default)]
    pub fixed_amount: bool,
    /// Initial lines.
    #[serde(default)]
    pub lines: Vec<NewPenaltyLine>,
}

/// The editable fields of a penalty line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPenaltyLine {
    /// The penalized employee.
    pub employee_id: RecordId,
    /// The penalty type.
    pub penalty_type_id: RecordId,
    /// Penalty amount.
    pub amount: Decimal,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Creates a draft penalty with its lines and totals.
pub fn create_penalty(store: &mut RecordStore, new: NewPenalty) -> AdjustmentResult<RecordId> {
    if let Some(category_id) = new.category_id {
        store.penalty_category(category_id)?;
    }
    if let Some(date_to) = new.date_to.filter(|_| new.fixed_amount) {
        if date_to < new.date {
            return Err(AdjustmentError::Validation {
                message: format!(
                    "Penalty '{}' ends on {} before it starts on {}",
                    new.name, date_to, new.date
                ),
            });
        }
    }

    let id = store.allocate_id();
    store.insert_penalty(PenaltyHeader {
        id,
        name: new.name,
        category_id: new.category_id,
        date: new.date,
        date_to: new.date_to,
        fixed_amount: new.fixed_amount,
        period_month: period_month(new.date),
        state: RecordState::Draft,
        lines: Vec::new(),
        totals: Vec::new(),
    });

    for line in new.lines {
        add_penalty_line(store, id, line)?;
    }
    recompute_penalty_totals(store, id)?;

    info!(penalty_id = id, "Created penalty");
    Ok(id)
}

/// Adds a line to a draft penalty.
pub fn add_penalty_line(
    store: &mut RecordStore,
    penalty_id: RecordId,
    line: NewPenaltyLine,
) -> AdjustmentResult<RecordId> {
    ensure_draft(store, HeaderRef::Penalty(penalty_id), "add lines to")?;
    validate_line(store, &line)?;

    let id = store.allocate_id();
    let header = store.penalty_mut(penalty_id)?;
    header.lines.push(PenaltyLine {
        id,
        penalty_id,
        payslip_id: None,
        name: String::new(),
        employee_id: line.employee_id,
        penalty_type_id: line.penalty_type_id,
        amount: line.amount,
        date: header.date,
        date_to: header.date_to,
        notes: line.notes,
        state: header.state,
    });

    recompute_penalty_totals(store, penalty_id)?;
    Ok(id)
}

/// Replaces the editable fields of a line of a draft penalty.
pub fn update_penalty_line(
    store: &mut RecordStore,
    penalty_id: RecordId,
    line_id: RecordId,
    changes: NewPenaltyLine,
) -> AdjustmentResult<()> {
    ensure_draft(store, HeaderRef::Penalty(penalty_id), "edit lines of")?;
    validate_line(store, &changes)?;

    let line = store
        .penalty_mut(penalty_id)?
        .lines
        .iter_mut()
        .find(|line| line.id == line_id)
        .ok_or_else(|| AdjustmentError::not_found("penalty line", line_id))?;
    line.employee_id = changes.employee_id;
    line.penalty_type_id = changes.penalty_type_id;
    line.amount = changes.amount;
    line.notes = changes.notes;

    recompute_penalty_totals(store, penalty_id)
}

/// Removes a line from a draft penalty.
pub fn remove_penalty_line(
    store: &mut RecordStore,
    penalty_id: RecordId,
    line_id: RecordId,
) -> AdjustmentResult<PenaltyLine> {
    ensure_draft(store, HeaderRef::Penalty(penalty_id), "remove lines from")?;

    let lines = &mut store.penalty_mut(penalty_id)?.lines;
    let index = lines
        .iter()
        .position(|line| line.id == line_id)
        .ok_or_else(|| AdjustmentError::not_found("penalty line", line_id))?;
    let removed = lines.remove(index);

    recompute_penalty_totals(store, penalty_id)?;
    Ok(removed)
}

/// Normalizes the penalty dates and replaces its totals.
pub fn recompute_penalty_totals(
    store: &mut RecordStore,
    penalty_id: RecordId,
) -> AdjustmentResult<()> {
    let header = store.penalty_mut(penalty_id)?;
    if !header.fixed_amount {
        header.date_to = Some(header.date);
    }
    let (date, date_to) = (header.date, header.date_to);
    for line in &mut header.lines {
        line.date = date;
        line.date_to = date_to;
    }
    header.totals = penalty_header_totals(header);

    debug!(
        penalty_id,
        lines = header.lines.len(),
        totals = header.totals.len(),
        "Recomputed penalty totals"
    );
    Ok(())
}

/// Confirms a penalty and its lines.
pub fn confirm_penalty(store: &mut RecordStore, penalty_id: RecordId) -> AdjustmentResult<()> {
    change_state(store, HeaderRef::Penalty(penalty_id), RecordState::Confirm)
}

/// Cancels a penalty and its lines.
pub fn cancel_penalty(store: &mut RecordStore, penalty_id: RecordId) -> AdjustmentResult<()> {
    change_state(store, HeaderRef::Penalty(penalty_id), RecordState::Cancel)
}

/// Resets a penalty and its lines to draft.
pub fn reset_penalty(store: &mut RecordStore, penalty_id: RecordId) -> AdjustmentResult<()> {
    change_state(store, HeaderRef::Penalty(penalty_id), RecordState::Draft)
}

/// Deletes a penalty unless it is confirmed.
pub fn delete_penalty(
    store: &mut RecordStore,
    penalty_id: RecordId,
) -> AdjustmentResult<PenaltyHeader> {
    ensure_deletable(store, HeaderRef::Penalty(penalty_id))?;
    let removed = store.remove_penalty(penalty_id)?;

    info!(penalty_id, "Deleted penalty");
    Ok(removed)
}

fn validate_line(store: &RecordStore, line: &NewPenaltyLine) -> AdjustmentResult<()> {
    store.employee(line.employee_id)?;
    store.penalty_type(line.penalty_type_id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{date, employee, penalty_type};

    struct Setup {
        store: RecordStore,
        employee_id: RecordId,
        late: RecordId,
        absence: RecordId,
    }

    fn setup() -> Setup {
        let mut store = RecordStore::new();
        let employee_id = employee(&mut store, "Karim Nabil");
        let late = penalty_type(&mut store, "PEN_LATE");
        let absence = penalty_type(&mut store, "PEN_ABSENCE");
        Setup {
            store,
            employee_id,
            late,
            absence,
        }
    }

    fn line(employee_id: RecordId, penalty_type_id: RecordId, amount: i64) -> NewPenaltyLine {
        NewPenaltyLine {
            employee_id,
            penalty_type_id,
            amount: Decimal::new(amount, 0),
            notes: None,
        }
    }

    fn new_penalty(
        fixed_amount: bool,
        date_to: Option<NaiveDate>,
        lines: Vec<NewPenaltyLine>,
    ) -> NewPenalty {
        NewPenalty {
            name: "January lateness".to_string(),
            category_id: None,
            date: date(2024, 1, 10),
            date_to,
            fixed_amount,
            lines,
        }
    }

    #[test]
    fn test_single_day_penalty_ends_on_its_start() {
        let mut s = setup();
        let new = new_penalty(
            false,
            Some(date(2024, 1, 20)),
            vec![line(s.employee_id, s.late, 50)],
        );
        let id = create_penalty(&mut s.store, new).unwrap();

        let header = s.store.penalty(id).unwrap();
        assert_eq!(header.date_to, Some(date(2024, 1, 10)));
        assert_eq!(header.lines[0].date, date(2024, 1, 10));
        assert_eq!(header.lines[0].date_to, Some(date(2024, 1, 10)));
    }

    #[test]
    fn test_fixed_amount_penalty_keeps_its_range() {
        let mut s = setup();
        let new = new_penalty(true, Some(date(2024, 1, 20)), vec![line(s.employee_id, s.late, 50)]);
        let id = create_penalty(&mut s.store, new).unwrap();

        let header = s.store.penalty(id).unwrap();
        assert_eq!(header.date_to, Some(date(2024, 1, 20)));
        assert_eq!(header.lines[0].date_to, Some(date(2024, 1, 20)));
    }

    #[test]
    fn test_range_ending_before_start_is_rejected() {
        let mut s = setup();
        let new = new_penalty(true, Some(date(2024, 1, 5)), vec![]);

        let result = create_penalty(&mut s.store, new);
        assert!(matches!(result, Err(AdjustmentError::Validation { .. })));
    }

    #[test]
    fn test_totals_group_by_type() {
        let mut s = setup();
        let lines = vec![
            line(s.employee_id, s.late, 30),
            line(s.employee_id, s.absence, 100),
            line(s.employee_id, s.late, 20),
        ];
        let id = create_penalty(&mut s.store, new_penalty(false, None, lines)).unwrap();

        let totals = &s.store.penalty(id).unwrap().totals;
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].penalty_type_id, s.late);
        assert_eq!(totals[0].total, Decimal::new(50, 0));
        assert_eq!(totals[1].total, Decimal::new(100, 0));
        assert_eq!(totals[0].name, "Total Penalty: January lateness");
    }

    #[test]
    fn test_line_edits_recompute_totals() {
        let mut s = setup();
        let id = create_penalty(
            &mut s.store,
            new_penalty(false, None, vec![line(s.employee_id, s.late, 30)]),
        )
        .unwrap();
        let line_id = s.store.penalty(id).unwrap().lines[0].id;

        update_penalty_line(&mut s.store, id, line_id, line(s.employee_id, s.late, 45)).unwrap();
        assert_eq!(s.store.penalty(id).unwrap().totals[0].total, Decimal::new(45, 0));

        remove_penalty_line(&mut s.store, id, line_id).unwrap();
        assert!(s.store.penalty(id).unwrap().totals.is_empty());
    }

    #[test]
    fn test_confirm_renames_lines() {
        let mut s = setup();
        let id = create_penalty(
            &mut s.store,
            new_penalty(false, None, vec![line(s.employee_id, s.late, 30)]),
        )
        .unwrap();

        confirm_penalty(&mut s.store, id).unwrap();

        let header = s.store.penalty(id).unwrap();
        assert_eq!(header.lines[0].state, RecordState::Confirm);
        assert_eq!(header.lines[0].name, "Penalty Line: January lateness");
    }

    #[test]
    fn test_delete_fails_only_when_confirmed() {
        let mut s = setup();
        let id = create_penalty(&mut s.store, new_penalty(false, None, vec![])).unwrap();

        confirm_penalty(&mut s.store, id).unwrap();
        assert!(matches!(
            delete_penalty(&mut s.store, id),
            Err(AdjustmentError::StateConflict { .. })
        ));

        cancel_penalty(&mut s.store, id).unwrap();
        assert!(delete_penalty(&mut s.store, id).is_ok());
        assert!(s.store.penalty(id).is_err());
    }

    #[test]
    fn test_reset_makes_lines_editable_again() {
        let mut s = setup();
        let id = create_penalty(
            &mut s.store,
            new_penalty(false, None, vec![line(s.employee_id, s.late, 30)]),
        )
        .unwrap();
        cancel_penalty(&mut s.store, id).unwrap();
        assert!(add_penalty_line(&mut s.store, id, line(s.employee_id, s.late, 5)).is_err());

        reset_penalty(&mut s.store, id).unwrap();
        assert!(add_penalty_line(&mut s.store, id, line(s.employee_id, s.late, 5)).is_ok());
    }
}
