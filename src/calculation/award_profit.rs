//! Award/profit sums for a payslip.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::ExtraType;

/// Award and profit amounts attached to a payslip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AwardProfitTotals {
    /// Sum of every line.
    pub total: Decimal,
    /// Sum of lines whose header pays an award.
    pub award: Decimal,
    /// Sum of lines whose header pays a profit share.
    pub profit: Decimal,
}

/// Sums award/profit amounts, split by the kind of their header.
///
/// # Examples
///
/// ```
/// use payroll_adjustments::calculation::sum_award_profit;
/// use payroll_adjustments::models::ExtraType;
/// use rust_decimal::Decimal;
///
/// let totals = sum_award_profit([
///     (ExtraType::Award, Decimal::new(200, 0)),
///     (ExtraType::Profit, Decimal::new(75, 0)),
/// ]);
/// assert_eq!(totals.total, Decimal::new(275, 0));
/// assert_eq!(totals.profit, Decimal::new(75, 0));
/// ```
pub fn sum_award_profit<I>(amounts: I) -> AwardProfitTotals
where
    I: IntoIterator<Item = (ExtraType, Decimal)>,
{
    amounts
        .into_iter()
        .fold(AwardProfitTotals::default(), |mut totals, (kind, amount)| {
            totals.total += amount;
            match kind {
                ExtraType::Award => totals.award += amount,
                ExtraType::Profit => totals.profit += amount,
            }
            totals
        })
}
