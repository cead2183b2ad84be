//! Payroll adjustments for payslip computation
//!
//! This crate manages bonus, penalty, pay raise, transportation allowance
//! and award/profit records through a draft/confirm/done/cancel lifecycle,
//! aggregates their confirmed lines into payslips, and shapes salary rule
//! lines into report totals.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
