//! Behavior shared by the header/line adjustment kinds.
//!
//! Bonuses, penalties, transportation allowances and awards/profits all
//! follow the same shape: a header with a lifecycle state owning lines that
//! mirror that state and can be attached to one payslip.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{
    AwardProfitHeader, AwardProfitLine, BonusHeader, BonusLine, LineRef, PenaltyHeader,
    PenaltyLine, RecordId, RecordState, TransportAllowanceHeader, TransportAllowanceLine,
};

/// A line that a payslip can pick up.
pub trait AdjustmentLine {
    /// Line identifier.
    fn id(&self) -> RecordId;
    /// Typed reference to this line and its header.
    fn line_ref(&self) -> LineRef;
    /// The employee the line applies to.
    fn employee_id(&self) -> RecordId;
    /// Current state.
    fn state(&self) -> RecordState;
    /// Overwrites the state.
    fn set_state(&mut self, state: RecordState);
    /// Overwrites the display name.
    fn set_name(&mut self, name: String);
    /// Payslip the line is attached to.
    fn payslip_id(&self) -> Option<RecordId>;
    /// Attaches the line to a payslip, or detaches it.
    fn set_payslip_id(&mut self, payslip_id: Option<RecordId>);
    /// Monetary amount of the line.
    fn amount(&self) -> Decimal;
}

/// A header owning adjustment lines.
pub trait AdjustmentHeader {
    /// The line type.
    type Line: AdjustmentLine;

    /// Prefix of the name given to lines on every state change.
    const LINE_NAME_PREFIX: &'static str;

    /// Header identifier.
    fn id(&self) -> RecordId;
    /// Header name.
    fn name(&self) -> &str;
    /// Date shared by every line.
    fn date(&self) -> NaiveDate;
    /// Current state.
    fn state(&self) -> RecordState;
    /// Overwrites the header state only.
    fn set_state(&mut self, state: RecordState);
    /// The lines.
    fn lines(&self) -> &[Self::Line];
    /// The lines, for mutation.
    fn lines_mut(&mut self) -> &mut [Self::Line];

    /// Finds a line by id for mutation.
    fn line_mut(&mut self, line_id: RecordId) -> Option<&mut Self::Line> {
        self.lines_mut().iter_mut().find(|line| line.id() == line_id)
    }

    /// Returns true when every line is done.
    fn all_lines_done(&self) -> bool {
        self.lines()
            .iter()
            .all(|line| line.state() == RecordState::Done)
    }
}

macro_rules! impl_adjustment_line {
    ($line:ty, $variant:ident, $header_field:ident, |$this:ident| $amount:expr) => {
        impl AdjustmentLine for $line {
            fn id(&self) -> RecordId {
                self.id
            }

            fn line_ref(&self) -> LineRef {
                LineRef::$variant {
                    header_id: self.$header_field,
                    line_id: self.id,
                }
            }

            fn employee_id(&self) -> RecordId {
                self.employee_id
            }

            fn state(&self) -> RecordState {
                self.state
            }

            fn set_state(&mut self, state: RecordState) {
                self.state = state;
            }

            fn set_name(&mut self, name: String) {
                self.name = name;
            }

            fn payslip_id(&self) -> Option<RecordId> {
                self.payslip_id
            }

            fn set_payslip_id(&mut self, payslip_id: Option<RecordId>) {
                self.payslip_id = payslip_id;
            }

            fn amount(&self) -> Decimal {
                let $this = self;
                $amount
            }
        }
    };
}

impl_adjustment_line!(BonusLine, Bonus, bonus_id, |line| line.amount);
impl_adjustment_line!(PenaltyLine, Penalty, penalty_id, |line| line.amount);
impl_adjustment_line!(TransportAllowanceLine, TransportAllowance, allowance_id, |line| {
    line.int_amount + line.ext_amount
});
impl_adjustment_line!(AwardProfitLine, AwardProfit, award_profit_id, |line| line.amount);

macro_rules! impl_adjustment_header {
    ($header:ty, $line:ty, $prefix:literal) => {
        impl AdjustmentHeader for $header {
            type Line = $line;

            const LINE_NAME_PREFIX: &'static str = $prefix;

            fn id(&self) -> RecordId {
                self.id
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn date(&self) -> NaiveDate {
                self.date
            }

            fn state(&self) -> RecordState {
                self.state
            }

            fn set_state(&mut self, state: RecordState) {
                self.state = state;
            }

            fn lines(&self) -> &[$line] {
                &self.lines
            }

            fn lines_mut(&mut self) -> &mut [$line] {
                &mut self.lines
            }
        }
    };
}

impl_adjustment_header!(BonusHeader, BonusLine, "Bonus Line: ");
impl_adjustment_header!(PenaltyHeader, PenaltyLine, "Penalty Line: ");
impl_adjustment_header!(
    TransportAllowanceHeader,
    TransportAllowanceLine,
    "Transportation Allowance Line: "
);
impl_adjustment_header!(AwardProfitHeader, AwardProfitLine, "Award/Profit Line: ");
