//! Date-range overlap between penalty lines and a payslip window.

use chrono::NaiveDate;

use crate::models::PenaltyLine;
use crate::store::DateWindow;

/// Counts the days two inclusive ranges share.
///
/// Open window bounds take the line's own bound, so an unbounded window
/// covers the whole line.
///
/// # Examples
///
/// ```
/// use payroll_adjustments::calculation::overlap_days;
/// use payroll_adjustments::store::DateWindow;
/// use chrono::NaiveDate;
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
/// let window = DateWindow::new(Some(d(1, 15)), Some(d(1, 31)));
///
/// assert_eq!(overlap_days(d(1, 10), d(1, 20), &window), 6);
/// assert_eq!(overlap_days(d(2, 1), d(2, 5), &window), 0);
/// ```
pub fn overlap_days(start: NaiveDate, end: NaiveDate, window: &DateWindow) -> i64 {
    let latest_start = window.date_from.map_or(start, |from| start.max(from));
    let earliest_end = window.date_to.map_or(end, |to| end.min(to));

    ((earliest_end - latest_start).num_days() + 1).max(0)
}

/// Returns true if a penalty line shares at least one day with the window.
///
/// A line without an end date never matches.
pub fn penalty_overlaps(line: &PenaltyLine, window: &DateWindow) -> bool {
    line.date_to
        .is_some_and(|date_to| overlap_days(line.date, date_to, window) > 0)
}
