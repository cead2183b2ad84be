//! State changes shared by every header kind.
//!
//! Confirm, cancel and reset write the new state on the header and cascade
//! it to each line, renaming the line after the header. Pay raise lines
//! carry no state of their own, so only the header is written.
//!
//! Cancelling or resetting a header releases its lines from the open
//! payslips holding them, and those payslips are recomputed.

use tracing::info;

use crate::error::{AdjustmentError, AdjustmentResult};
use crate::models::{
    AdjustmentHeader, AdjustmentLine, HeaderRef, PayslipState, RecordId, RecordState,
};
use crate::services::payslip::compute_sheet;
use crate::store::RecordStore;

/// Writes a state on a header and every one of its lines.
pub fn cascade<H: AdjustmentHeader>(header: &mut H, state: RecordState) {
    header.set_state(state);
    let line_name = format!("{}{}", H::LINE_NAME_PREFIX, header.name());
    for line in header.lines_mut() {
        line.set_state(state);
        line.set_name(line_name.clone());
    }
}

/// Moves a header and its lines to a new state.
///
/// Any state is accepted as the starting point. Moving to draft or cancel
/// recomputes the open payslips that held the header's lines.
pub fn change_state(
    store: &mut RecordStore,
    header: HeaderRef,
    state: RecordState,
) -> AdjustmentResult<()> {
    let holders = match header {
        HeaderRef::Bonus(id) => holding_payslips(store.bonus(id)?),
        HeaderRef::Penalty(id) => holding_payslips(store.penalty(id)?),
        HeaderRef::TransportAllowance(id) => holding_payslips(store.transport_allowance(id)?),
        HeaderRef::AwardProfit(id) => holding_payslips(store.award_profit(id)?),
        HeaderRef::PayRaise(_) => Vec::new(),
    };

    match header {
        HeaderRef::Bonus(id) => cascade(store.bonus_mut(id)?, state),
        HeaderRef::Penalty(id) => cascade(store.penalty_mut(id)?, state),
        HeaderRef::TransportAllowance(id) => cascade(store.transport_allowance_mut(id)?, state),
        HeaderRef::AwardProfit(id) => cascade(store.award_profit_mut(id)?, state),
        HeaderRef::PayRaise(id) => store.pay_raise_mut(id)?.state = state,
    }

    if matches!(state, RecordState::Draft | RecordState::Cancel) {
        for payslip_id in holders {
            let open = matches!(
                store.payslip(payslip_id)?.state,
                PayslipState::Draft | PayslipState::Verify
            );
            if open {
                compute_sheet(store, payslip_id)?;
            }
        }
    }

    info!(record = %header, state = %state, "Changed record state");
    Ok(())
}

fn holding_payslips<H: AdjustmentHeader>(header: &H) -> Vec<RecordId> {
    let mut ids: Vec<RecordId> = header
        .lines()
        .iter()
        .filter_map(|line| line.payslip_id())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Fails when the header is confirmed.
///
/// Draft, done and cancelled headers may all be deleted.
pub fn ensure_deletable(store: &RecordStore, header: HeaderRef) -> AdjustmentResult<()> {
    let state = store.header_state(header)?;
    if state == RecordState::Confirm {
        return Err(AdjustmentError::state_conflict(
            "delete",
            header.to_string(),
            state,
        ));
    }
    Ok(())
}

/// Fails unless the header is still a draft.
pub fn ensure_draft(store: &RecordStore, header: HeaderRef, action: &str) -> AdjustmentResult<()> {
    let state = store.header_state(header)?;
    if state != RecordState::Draft {
        return Err(AdjustmentError::state_conflict(action, header.to_string(), state));
    }
    Ok(())
}
