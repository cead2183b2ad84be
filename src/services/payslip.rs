//! Payslip aggregation.
//!
//! Computing a payslip attaches the confirmed adjustment lines of its
//! employee that fall inside the pay window and rebuilds the payslip totals
//! from them. Finalizing a batch marks the attached lines done, closes the
//! headers whose lines are all done, and closes the payslips' run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculation::{
    AwardProfitTotals, PayslipReport, RuleBook, payslip_bonus_totals, payslip_penalty_totals,
    penalty_overlaps, sum_award_profit,
};
use crate::error::{AdjustmentError, AdjustmentResult};
use crate::models::{
    AdjustmentLine, BonusMethod, LineRef, Payslip, PayslipLine, PayslipRunState, PayslipState,
    RecordId, RecordState,
};
use crate::store::{DateWindow, LineQuery, RecordStore};

/// A payslip to create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayslip {
    /// Display name.
    pub name: String,
    /// The paid employee.
    pub employee_id: RecordId,
    /// The contract being paid.
    #[serde(default)]
    pub contract_id: Option<RecordId>,
    /// Salary structure; defaults to the contract's.
    #[serde(default)]
    pub structure_id: Option<RecordId>,
    /// Batch the payslip belongs to.
    #[serde(default)]
    pub run_id: Option<RecordId>,
    /// First day of the pay window.
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    /// Last day of the pay window.
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
    /// Gross or net.
    #[serde(default)]
    pub method: BonusMethod,
    /// Salary rule lines computed for this payslip.
    #[serde(default)]
    pub lines: Vec<PayslipLine>,
}

/// The pay window of a payslip.
pub fn payslip_window(payslip: &Payslip) -> DateWindow {
    DateWindow::new(payslip.date_from, payslip.date_to)
}

/// Creates a draft payslip and computes its sheet.
pub fn create_payslip(store: &mut RecordStore, new: NewPayslip) -> AdjustmentResult<RecordId> {
    store.employee(new.employee_id)?;
    let structure_id = match (new.structure_id, new.contract_id) {
        (Some(structure_id), _) => Some(structure_id),
        (None, Some(contract_id)) => store.contract(contract_id)?.structure_id,
        (None, None) => None,
    };
    if let Some(run_id) = new.run_id {
        store.payslip_run(run_id)?;
    }

    let id = store.allocate_id();
    store.insert_payslip(Payslip {
        id,
        name: new.name,
        employee_id: new.employee_id,
        contract_id: new.contract_id,
        structure_id,
        run_id: new.run_id,
        date_from: new.date_from,
        date_to: new.date_to,
        method: new.method,
        state: PayslipState::Draft,
        lines: new.lines,
        bonus_totals: Vec::new(),
        penalty_totals: Vec::new(),
    });

    compute_sheet(store, id)?;
    info!(payslip_id = id, employee_id = new.employee_id, "Created payslip");
    Ok(id)
}

/// Changes the employee or the pay window and recomputes when either
/// actually changed.
pub fn update_payslip(
    store: &mut RecordStore,
    payslip_id: RecordId,
    employee_id: RecordId,
    window: DateWindow,
) -> AdjustmentResult<()> {
    store.employee(employee_id)?;
    ensure_open(store.payslip(payslip_id)?)?;
    let payslip = store.payslip_mut(payslip_id)?;
    let changed = payslip.employee_id != employee_id || payslip_window(payslip) != window;

    payslip.employee_id = employee_id;
    payslip.date_from = window.date_from;
    payslip.date_to = window.date_to;

    if changed {
        compute_sheet(store, payslip_id)?;
    }
    Ok(())
}

/// Attaches every kind of adjustment line and rebuilds the totals.
///
/// Done and cancelled payslips keep what they hold.
pub fn compute_sheet(store: &mut RecordStore, payslip_id: RecordId) -> AdjustmentResult<()> {
    ensure_open(store.payslip(payslip_id)?)?;

    let bonus = collect_bonus_lines(store, payslip_id)?;
    let penalty = collect_penalty_lines(store, payslip_id)?;
    let allowance = collect_allowance_lines(store, payslip_id)?;
    let award_profit = collect_award_profit_lines(store, payslip_id)?;

    debug!(
        payslip_id,
        bonus,
        penalty,
        allowance,
        award_profit,
        "Computed payslip sheet"
    );
    Ok(())
}

/// Attaches confirmed bonus lines dated inside the window and rebuilds the
/// payslip bonus totals. Returns the number of attached lines.
pub fn collect_bonus_lines(
    store: &mut RecordStore,
    payslip_id: RecordId,
) -> AdjustmentResult<usize> {
    let query = pickup_query(store.payslip(payslip_id)?);
    let found = refs(store.search_bonus_lines(&query));
    let previous = refs(store.attached_bonus_lines(payslip_id));
    reattach(store, payslip_id, &previous, &found)?;

    let totals = payslip_bonus_totals(
        store.payslip(payslip_id)?,
        &store.attached_bonus_lines(payslip_id),
    );
    store.payslip_mut(payslip_id)?.bonus_totals = totals;
    Ok(found.len())
}

/// Attaches confirmed penalty lines that share at least one day with the
/// window and rebuilds the payslip penalty totals.
pub fn collect_penalty_lines(
    store: &mut RecordStore,
    payslip_id: RecordId,
) -> AdjustmentResult<usize> {
    let payslip = store.payslip(payslip_id)?;
    let window = payslip_window(payslip);
    let query = LineQuery::confirmed_any_date(payslip.employee_id);

    let found = refs(
        store
            .search_penalty_lines(&query)
            .into_iter()
            .filter(|line| penalty_overlaps(line, &window)),
    );
    let previous = refs(store.attached_penalty_lines(payslip_id));
    reattach(store, payslip_id, &previous, &found)?;

    let totals = payslip_penalty_totals(
        store.payslip(payslip_id)?,
        &store.attached_penalty_lines(payslip_id),
    );
    store.payslip_mut(payslip_id)?.penalty_totals = totals;
    Ok(found.len())
}

/// Attaches confirmed transportation allowance lines dated inside the window.
pub fn collect_allowance_lines(
    store: &mut RecordStore,
    payslip_id: RecordId,
) -> AdjustmentResult<usize> {
    let query = pickup_query(store.payslip(payslip_id)?);
    let found = refs(store.search_transport_allowance_lines(&query));
    let previous = refs(store.attached_transport_allowance_lines(payslip_id));
    reattach(store, payslip_id, &previous, &found)?;
    Ok(found.len())
}

/// Attaches confirmed award/profit lines dated inside the window.
pub fn collect_award_profit_lines(
    store: &mut RecordStore,
    payslip_id: RecordId,
) -> AdjustmentResult<usize> {
    let query = pickup_query(store.payslip(payslip_id)?);
    let found = refs(store.search_award_profit_lines(&query));
    let previous = refs(store.attached_award_profit_lines(payslip_id));
    reattach(store, payslip_id, &previous, &found)?;
    Ok(found.len())
}

/// Finalizes a batch of payslips.
///
/// Only confirmed lines are closed. Fails without changing anything when
/// any payslip is cancelled.
pub fn finalize_payslips(
    store: &mut RecordStore,
    payslip_ids: &[RecordId],
) -> AdjustmentResult<()> {
    store.transaction(|store| {
        for &id in payslip_ids {
            if store.payslip(id)?.state == PayslipState::Cancel {
                return Err(AdjustmentError::Validation {
                    message: "You can't validate a cancelled payslip.".to_string(),
                });
            }
        }

        for &id in payslip_ids {
            let mut closed = 0;
            for line in store.attached_lines(id) {
                let attached = store.line_mut(line)?;
                if attached.state() != RecordState::Confirm {
                    continue;
                }
                attached.set_state(RecordState::Done);
                closed += 1;

                let header = line.header();
                if store.lines_done(header)? {
                    store.set_header_state(header, RecordState::Done)?;
                }
            }

            let payslip = store.payslip_mut(id)?;
            payslip.state = PayslipState::Done;
            let run_id = payslip.run_id;
            if let Some(run_id) = run_id {
                store.payslip_run_mut(run_id)?.state = PayslipRunState::Close;
            }

            info!(payslip_id = id, lines = closed, "Finalized payslip");
        }
        Ok(())
    })
}

/// Award and profit sums of the lines attached to a payslip.
pub fn award_profit_totals(
    store: &RecordStore,
    payslip_id: RecordId,
) -> AdjustmentResult<AwardProfitTotals> {
    let mut amounts = Vec::new();
    for line in store.attached_award_profit_lines(payslip_id) {
        let header = store.award_profit(line.award_profit_id)?;
        amounts.push((header.extra_type, line.amount));
    }
    Ok(sum_award_profit(amounts))
}

/// Shapes the salary rule lines of the given payslips into a report.
pub fn payslip_report(
    store: &RecordStore,
    payslip_ids: &[RecordId],
) -> AdjustmentResult<PayslipReport> {
    let payslips = payslip_ids
        .iter()
        .map(|&id| store.payslip(id))
        .collect::<AdjustmentResult<Vec<_>>>()?;
    let book = RuleBook::new(store.salary_rules(), store.salary_rule_parents());

    PayslipReport::build(&payslips, &book)
}

fn ensure_open(payslip: &Payslip) -> AdjustmentResult<()> {
    let message = match payslip.state {
        PayslipState::Draft | PayslipState::Verify => return Ok(()),
        PayslipState::Done => "You can't recompute a finalized payslip.",
        PayslipState::Cancel => "You can't recompute a cancelled payslip.",
    };
    Err(AdjustmentError::Validation {
        message: message.to_string(),
    })
}

fn pickup_query(payslip: &Payslip) -> LineQuery {
    LineQuery::confirmed_within(payslip.employee_id, payslip_window(payslip))
}

fn refs<'a, L: AdjustmentLine + 'a>(lines: impl IntoIterator<Item = &'a L>) -> Vec<LineRef> {
    lines.into_iter().map(|line| line.line_ref()).collect()
}

fn reattach(
    store: &mut RecordStore,
    payslip_id: RecordId,
    previous: &[LineRef],
    found: &[LineRef],
) -> AdjustmentResult<()> {
    for line in previous {
        store.line_mut(*line)?.set_payslip_id(None);
    }
    for line in found {
        store.line_mut(*line)?.set_payslip_id(Some(payslip_id));
    }
    Ok(())
}
