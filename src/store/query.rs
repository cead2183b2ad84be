//! Typed line queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{AdjustmentHeader, AdjustmentLine, RecordId, RecordState};

/// An inclusive date range where either bound may be open.
///
/// # Example
///
/// ```
/// use payroll_adjustments::store::DateWindow;
/// use chrono::NaiveDate;
///
/// let window = DateWindow::new(
///     Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
///     Some(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()),
/// );
/// assert!(window.contains(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
/// assert!(!window.contains(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateWindow {
    /// First day, inclusive. `None` means no lower bound.
    pub date_from: Option<NaiveDate>,
    /// Last day, inclusive. `None` means no upper bound.
    pub date_to: Option<NaiveDate>,
}

impl DateWindow {
    /// Creates a window from optional bounds.
    pub fn new(date_from: Option<NaiveDate>, date_to: Option<NaiveDate>) -> Self {
        Self { date_from, date_to }
    }

    /// Returns true if the date falls inside every bound that is set.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.date_from.is_none_or(|from| date >= from) && self.date_to.is_none_or(|to| date <= to)
    }
}

/// How a line query restricts dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    /// The header date must fall inside the window.
    Within(DateWindow),
    /// Any dated line matches; callers filter by date themselves.
    Unrestricted,
}

/// Candidate selection for payslip pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineQuery {
    /// The employee whose lines are wanted.
    pub employee_id: RecordId,
    /// Required line state.
    pub state: RecordState,
    /// Date restriction.
    pub dates: DateFilter,
}

impl LineQuery {
    /// Confirmed lines of an employee dated inside a window.
    pub fn confirmed_within(employee_id: RecordId, window: DateWindow) -> Self {
        Self {
            employee_id,
            state: RecordState::Confirm,
            dates: DateFilter::Within(window),
        }
    }

    /// Confirmed lines of an employee regardless of date.
    pub fn confirmed_any_date(employee_id: RecordId) -> Self {
        Self {
            employee_id,
            state: RecordState::Confirm,
            dates: DateFilter::Unrestricted,
        }
    }

    /// Returns true if the line of the given header satisfies the query.
    pub fn matches<H: AdjustmentHeader>(&self, header: &H, line: &H::Line) -> bool {
        line.employee_id() == self.employee_id
            && line.state() == self.state
            && match self.dates {
                DateFilter::Within(window) => window.contains(header.date()),
                DateFilter::Unrestricted => true,
            }
    }
}
