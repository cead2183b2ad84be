//! Transportation allowance and award/profit management.
//!
//! Both kinds follow the bonus lifecycle without any derived totals of
//! their own; payslips pick their confirmed lines up by header date.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AdjustmentResult;
use crate::models::{
    AwardProfitHeader, AwardProfitLine, ExtraType, HeaderRef, RecordId, RecordState,
    TransportAllowanceHeader, TransportAllowanceLine,
};
use crate::store::RecordStore;

use super::lifecycle::{change_state, ensure_deletable};

/// A transportation allowance to create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransportAllowance {
    /// Header name.
    pub name: String,
    /// Allowance date.
    pub date: NaiveDate,
    /// Lines to create.
    #[serde(default)]
    pub lines: Vec<NewTransportAllowanceLine>,
}

/// One employee's transportation amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransportAllowanceLine {
    /// The employee.
    pub employee_id: RecordId,
    /// Internal transportation amount.
    #[serde(default)]
    pub int_amount: Decimal,
    /// External transportation amount.
    #[serde(default)]
    pub ext_amount: Decimal,
}

/// An award or profit share to create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAwardProfit {
    /// Header name.
    pub name: String,
    /// Payment date.
    pub date: NaiveDate,
    /// Award or profit.
    pub extra_type: ExtraType,
    /// Lines to create.
    #[serde(default)]
    pub lines: Vec<NewAwardProfitLine>,
}

/// One employee's award or profit amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAwardProfitLine {
    /// The employee.
    pub employee_id: RecordId,
    /// Amount paid.
    pub amount: Decimal,
}

/// Creates a draft transportation allowance.
pub fn create_transport_allowance(
    store: &mut RecordStore,
    new: NewTransportAllowance,
) -> AdjustmentResult<RecordId> {
    let id = store.allocate_id();
    let mut lines = Vec::with_capacity(new.lines.len());
    for line in new.lines {
        store.employee(line.employee_id)?;
        lines.push(TransportAllowanceLine {
            id: store.allocate_id(),
            allowance_id: id,
            payslip_id: None,
            name: String::new(),
            employee_id: line.employee_id,
            int_amount: line.int_amount,
            ext_amount: line.ext_amount,
            state: RecordState::Draft,
        });
    }

    store.insert_transport_allowance(TransportAllowanceHeader {
        id,
        name: new.name,
        date: new.date,
        state: RecordState::Draft,
        lines,
    });

    info!(allowance_id = id, "Created transportation allowance");
    Ok(id)
}

/// Confirms a transportation allowance and its lines.
pub fn confirm_transport_allowance(store: &mut RecordStore, id: RecordId) -> AdjustmentResult<()> {
    change_state(store, HeaderRef::TransportAllowance(id), RecordState::Confirm)
}

/// Cancels a transportation allowance and its lines.
pub fn cancel_transport_allowance(store: &mut RecordStore, id: RecordId) -> AdjustmentResult<()> {
    change_state(store, HeaderRef::TransportAllowance(id), RecordState::Cancel)
}

/// Resets a transportation allowance and its lines to draft.
pub fn reset_transport_allowance(store: &mut RecordStore, id: RecordId) -> AdjustmentResult<()> {
    change_state(store, HeaderRef::TransportAllowance(id), RecordState::Draft)
}

/// Deletes a transportation allowance unless it is confirmed.
pub fn delete_transport_allowance(
    store: &mut RecordStore,
    id: RecordId,
) -> AdjustmentResult<TransportAllowanceHeader> {
    ensure_deletable(store, HeaderRef::TransportAllowance(id))?;
    let removed = store.remove_transport_allowance(id)?;

    info!(allowance_id = id, "Deleted transportation allowance");
    Ok(removed)
}

/// Creates a draft award or profit share.
pub fn create_award_profit(
    store: &mut RecordStore,
    new: NewAwardProfit,
) -> AdjustmentResult<RecordId> {
    let id = store.allocate_id();
    let mut lines = Vec::with_capacity(new.lines.len());
    for line in new.lines {
        store.employee(line.employee_id)?;
        lines.push(AwardProfitLine {
            id: store.allocate_id(),
            award_profit_id: id,
            payslip_id: None,
            name: String::new(),
            employee_id: line.employee_id,
            amount: line.amount,
            state: RecordState::Draft,
        });
    }

    store.insert_award_profit(AwardProfitHeader {
        id,
        name: new.name,
        date: new.date,
        extra_type: new.extra_type,
        state: RecordState::Draft,
        lines,
    });

    info!(award_profit_id = id, extra_type = ?new.extra_type, "Created award/profit");
    Ok(id)
}

/// Confirms an award/profit and its lines.
pub fn confirm_award_profit(store: &mut RecordStore, id: RecordId) -> AdjustmentResult<()> {
    change_state(store, HeaderRef::AwardProfit(id), RecordState::Confirm)
}

/// Cancels an award/profit and its lines.
pub fn cancel_award_profit(store: &mut RecordStore, id: RecordId) -> AdjustmentResult<()> {
    change_state(store, HeaderRef::AwardProfit(id), RecordState::Cancel)
}

/// Resets an award/profit and its lines to draft.
pub fn reset_award_profit(store: &mut RecordStore, id: RecordId) -> AdjustmentResult<()> {
    change_state(store, HeaderRef::AwardProfit(id), RecordState::Draft)
}

/// Deletes an award/profit unless it is confirmed.
pub fn delete_award_profit(
    store: &mut RecordStore,
    id: RecordId,
) -> AdjustmentResult<AwardProfitHeader> {
    ensure_deletable(store, HeaderRef::AwardProfit(id))?;
    let removed = store.remove_award_profit(id)?;

    info!(award_profit_id = id, "Deleted award/profit");
    Ok(removed)
}
