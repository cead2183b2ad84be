//! Employee and contract models.
//!
//! Contracts carry the wage that pay raises update; the employee keeps the
//! wage it had before the latest raise.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::RecordId;

/// Represents an employee receiving adjustments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Record identifier.
    pub id: RecordId,
    /// Display name, used in raise messages.
    pub name: String,
    /// Wage before the most recent confirmed raise.
    #[serde(default)]
    pub previous_wage: Option<Decimal>,
}

/// The state of an employment contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractState {
    /// Not yet running.
    #[default]
    Draft,
    /// Running; eligible for payslip runs.
    Open,
    /// Expired or terminated.
    Close,
}

/// An employment contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Record identifier.
    pub id: RecordId,
    /// The contracted employee.
    pub employee_id: RecordId,
    /// Current basic wage.
    pub wage: Decimal,
    /// Contract state.
    #[serde(default)]
    pub state: ContractState,
    /// Contract type.
    #[serde(default)]
    pub contract_type_id: Option<RecordId>,
    /// Default salary structure for payslips of this contract.
    #[serde(default)]
    pub structure_id: Option<RecordId>,
    /// Work location.
    #[serde(default)]
    pub work_location_id: Option<RecordId>,
    /// Employing company.
    #[serde(default)]
    pub company_id: Option<RecordId>,
    /// Department.
    #[serde(default)]
    pub department_id: Option<RecordId>,
}

impl Contract {
    /// Returns true if the contract is running.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_adjustments::models::{Contract, ContractState};
    /// use rust_decimal::Decimal;
    ///
    /// let contract = Contract {
    ///     id: 1,
    ///     employee_id: 1,
    ///     wage: Decimal::new(5000, 0),
    ///     state: ContractState::Open,
    ///     contract_type_id: None,
    ///     structure_id: None,
    ///     work_location_id: None,
    ///     company_id: None,
    ///     department_id: None,
    /// };
    /// assert!(contract.is_open());
    /// ```
    pub fn is_open(&self) -> bool {
        self.state == ContractState::Open
    }
}
