//! Business services.
//!
//! Services orchestrate the adjustment operations: they read records from
//! the [`RecordStore`](crate::store::RecordStore), apply the rules in
//! [`calculation`](crate::calculation) and write the results back. Every
//! service that changes lines also recomputes the totals derived from them
//! before returning.

pub mod allowance;
pub mod bonus;
pub mod lifecycle;
pub mod pay_raise;
pub mod payslip;
pub mod payslip_run;
pub mod penalty;

use chrono::NaiveDate;

/// Month label stored on bonus and penalty headers.
pub(crate) fn period_month(date: NaiveDate) -> String {
    date.format("%B").to_string()
}
