//! Pay raise calculation.
//!
//! A raise is either a fixed amount or a percentage of the basic salary,
//! clamped into the configured limits when both are positive.

use rust_decimal::Decimal;

use crate::config::RaiseLimits;
use crate::models::RaiseType;

/// The result of calculating one contract's raise.
#[derive(Debug, Clone, PartialEq)]
pub struct RaiseCalculation {
    /// The raise before clamping.
    pub raw_raise: Decimal,
    /// The raise actually granted.
    pub raise_amount: Decimal,
    /// Salary before the raise.
    pub old_salary: Decimal,
    /// Salary after the raise.
    pub new_salary: Decimal,
    /// Whether the limits changed the raw raise.
    pub clamped: bool,
    /// Human-readable explanation of the calculation.
    pub reasoning: String,
}

/// Clamps a raise into the limits when they are active.
///
/// A raise below the minimum is lifted to it; otherwise a raise above the
/// maximum is lowered to it.
///
/// # Examples
///
/// ```
/// use payroll_adjustments::calculation::clamp_raise;
/// use payroll_adjustments::config::RaiseLimits;
/// use rust_decimal::Decimal;
///
/// let limits = RaiseLimits::new(Decimal::new(100, 0), Decimal::new(500, 0));
///
/// assert_eq!(clamp_raise(Decimal::new(50, 0), &limits), Decimal::new(100, 0));
/// assert_eq!(clamp_raise(Decimal::new(900, 0), &limits), Decimal::new(500, 0));
/// assert_eq!(clamp_raise(Decimal::new(300, 0), &limits), Decimal::new(300, 0));
/// ```
pub fn clamp_raise(raw: Decimal, limits: &RaiseLimits) -> Decimal {
    if !limits.is_active() {
        return raw;
    }

    if raw < limits.min_raise {
        limits.min_raise
    } else if raw > limits.max_raise {
        limits.max_raise
    } else {
        raw
    }
}

/// Calculates the raise for a basic salary.
///
/// # Arguments
///
/// * `raise_type` - Whether `amount` or `percentage` applies
/// * `amount` - Fixed raise, used for [`RaiseType::Amount`]
/// * `percentage` - Percentage of the salary, used for [`RaiseType::Percentage`]
/// * `basic_salary` - The contract's current wage
/// * `limits` - Configured raise bounds
pub fn calculate_raise(
    raise_type: RaiseType,
    amount: Decimal,
    percentage: Decimal,
    basic_salary: Decimal,
    limits: &RaiseLimits,
) -> RaiseCalculation {
    let raw_raise = match raise_type {
        RaiseType::Amount => amount,
        RaiseType::Percentage => basic_salary * percentage / Decimal::ONE_HUNDRED,
    };

    let raise_amount = clamp_raise(raw_raise, limits);
    let clamped = raise_amount != raw_raise;
    let new_salary = basic_salary + raise_amount;

    let basis = match raise_type {
        RaiseType::Amount => format!("Fixed raise ${}", raw_raise.normalize()),
        RaiseType::Percentage => format!(
            "${} × {}% = ${}",
            basic_salary.normalize(),
            percentage.normalize(),
            raw_raise.normalize()
        ),
    };
    let reasoning = if clamped {
        format!(
            "{} (clamped to ${} within [${}, ${}]); ${} → ${}",
            basis,
            raise_amount.normalize(),
            limits.min_raise.normalize(),
            limits.max_raise.normalize(),
            basic_salary.normalize(),
            new_salary.normalize()
        )
    } else {
        format!(
            "{}; ${} → ${}",
            basis,
            basic_salary.normalize(),
            new_salary.normalize()
        )
    };

    RaiseCalculation {
        raw_raise,
        raise_amount,
        old_salary: basic_salary,
        new_salary,
        clamped,
        reasoning,
    }
}
