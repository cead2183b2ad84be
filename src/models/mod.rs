//! Core data models for payroll adjustments.
//!
//! This module contains all the domain records the store persists and the
//! services operate on.

mod adjustment;
mod allowance;
mod bonus;
mod employee;
mod pay_raise;
mod payslip;
mod penalty;
mod reference;
mod state;

/// Identifier of a stored record, allocated by the record store.
pub type RecordId = u64;

pub use adjustment::{AdjustmentHeader, AdjustmentLine};
pub use allowance::{
    AwardProfitHeader, AwardProfitLine, ExtraType, TransportAllowanceHeader,
    TransportAllowanceLine,
};
pub use bonus::{BonusCategory, BonusHeader, BonusLine, BonusMethod, BonusTotal, BonusType};
pub use employee::{Contract, ContractState, Employee};
pub use pay_raise::{PayRaiseHeader, PayRaiseLine, RaiseType};
pub use payslip::{
    Payslip, PayslipLine, PayslipRun, PayslipRunState, SalaryRule, SalaryRuleParent,
};
pub use penalty::{PenaltyCategory, PenaltyHeader, PenaltyLine, PenaltyTotal, PenaltyType};
pub use reference::{AuditMessage, HeaderRef, LineRef};
pub use state::{PayslipState, RecordState};
