//! Typed references to headers and lines across the adjustment kinds.
//!
//! Payslip finalization and lifecycle cascades work on any adjustment kind;
//! these tagged references let them dispatch with a `match` instead of
//! looking fields up by name.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// A reference to a header record of any adjustment kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum HeaderRef {
    /// A bonus header.
    Bonus(RecordId),
    /// A penalty header.
    Penalty(RecordId),
    /// A transportation allowance header.
    TransportAllowance(RecordId),
    /// An award/profit header.
    AwardProfit(RecordId),
    /// A pay raise header.
    PayRaise(RecordId),
}

impl HeaderRef {
    /// The header identifier.
    pub fn id(self) -> RecordId {
        match self {
            HeaderRef::Bonus(id)
            | HeaderRef::Penalty(id)
            | HeaderRef::TransportAllowance(id)
            | HeaderRef::AwardProfit(id)
            | HeaderRef::PayRaise(id) => id,
        }
    }

    /// The record kind as used in messages and errors.
    pub fn kind(self) -> &'static str {
        match self {
            HeaderRef::Bonus(_) => "bonus",
            HeaderRef::Penalty(_) => "penalty",
            HeaderRef::TransportAllowance(_) => "transportation allowance",
            HeaderRef::AwardProfit(_) => "award/profit",
            HeaderRef::PayRaise(_) => "pay raise",
        }
    }
}

impl fmt::Display for HeaderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

/// A reference to an adjustment line that a payslip can pick up.
///
/// Each variant carries the line id and the id of its owning header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineRef {
    /// A bonus line.
    Bonus {
        /// Owning bonus header.
        header_id: RecordId,
        /// The line.
        line_id: RecordId,
    },
    /// A penalty line.
    Penalty {
        /// Owning penalty header.
        header_id: RecordId,
        /// The line.
        line_id: RecordId,
    },
    /// A transportation allowance line.
    TransportAllowance {
        /// Owning allowance header.
        header_id: RecordId,
        /// The line.
        line_id: RecordId,
    },
    /// An award/profit line.
    AwardProfit {
        /// Owning award/profit header.
        header_id: RecordId,
        /// The line.
        line_id: RecordId,
    },
}

impl LineRef {
    /// The owning header.
    pub fn header(self) -> HeaderRef {
        match self {
            LineRef::Bonus { header_id, .. } => HeaderRef::Bonus(header_id),
            LineRef::Penalty { header_id, .. } => HeaderRef::Penalty(header_id),
            LineRef::TransportAllowance { header_id, .. } => {
                HeaderRef::TransportAllowance(header_id)
            }
            LineRef::AwardProfit { header_id, .. } => HeaderRef::AwardProfit(header_id),
        }
    }

    /// The line identifier.
    pub fn line_id(self) -> RecordId {
        match self {
            LineRef::Bonus { line_id, .. }
            | LineRef::Penalty { line_id, .. }
            | LineRef::TransportAllowance { line_id, .. }
            | LineRef::AwardProfit { line_id, .. } => line_id,
        }
    }
}

/// A free-text log entry posted against a header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditMessage {
    /// The header the message is about.
    pub record: HeaderRef,
    /// Message body.
    pub body: String,
    /// When the message was posted.
    pub posted_at: DateTime<Utc>,
}
