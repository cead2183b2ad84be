//! In-memory record store.
//!
//! The store holds every record in typed tables keyed by [`RecordId`] and
//! answers the typed queries the services need. Operations that must be
//! atomic run through [`RecordStore::transaction`], which commits a working
//! copy only when the operation succeeds.

mod query;

use std::collections::BTreeMap;

use chrono::Utc;

use crate::error::{AdjustmentError, AdjustmentResult};
use crate::models::{
    AdjustmentHeader, AdjustmentLine, AuditMessage, AwardProfitHeader, AwardProfitLine,
    BonusCategory, BonusHeader, BonusLine, BonusType, Contract, Employee, HeaderRef, LineRef,
    PayRaiseHeader, Payslip, PayslipRun, PenaltyCategory, PenaltyHeader, PenaltyLine,
    PenaltyType, RecordId, RecordState, SalaryRule, SalaryRuleParent, TransportAllowanceHeader,
    TransportAllowanceLine,
};

pub use query::{DateFilter, DateWindow, LineQuery};

/// Typed tables for every record the adjustment services touch.
///
/// # Example
///
/// ```
/// use payroll_adjustments::models::Employee;
/// use payroll_adjustments::store::RecordStore;
///
/// let mut store = RecordStore::new();
/// let id = store.allocate_id();
/// store.insert_employee(Employee { id, name: "Omar".into(), previous_wage: None });
///
/// assert_eq!(store.employee(id).unwrap().name, "Omar");
/// assert!(store.employee(id + 1).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    next_id: RecordId,
    bonus_categories: BTreeMap<RecordId, BonusCategory>,
    bonus_types: BTreeMap<RecordId, BonusType>,
    bonuses: BTreeMap<RecordId, BonusHeader>,
    penalty_categories: BTreeMap<RecordId, PenaltyCategory>,
    penalty_types: BTreeMap<RecordId, PenaltyType>,
    penalties: BTreeMap<RecordId, PenaltyHeader>,
    transport_allowances: BTreeMap<RecordId, TransportAllowanceHeader>,
    award_profits: BTreeMap<RecordId, AwardProfitHeader>,
    pay_raises: BTreeMap<RecordId, PayRaiseHeader>,
    employees: BTreeMap<RecordId, Employee>,
    contracts: BTreeMap<RecordId, Contract>,
    salary_rules: BTreeMap<RecordId, SalaryRule>,
    salary_rule_parents: BTreeMap<RecordId, SalaryRuleParent>,
    payslips: BTreeMap<RecordId, Payslip>,
    payslip_runs: BTreeMap<RecordId, PayslipRun>,
    messages: Vec<AuditMessage>,
}

macro_rules! table {
    ($table:ident, $record:ty, $kind:literal, $get:ident, $get_mut:ident, $insert:ident, $remove:ident) => {
        #[doc = concat!("Returns the ", $kind, " with the given id.")]
        pub fn $get(&self, id: RecordId) -> AdjustmentResult<&$record> {
            self.$table
                .get(&id)
                .ok_or_else(|| AdjustmentError::not_found($kind, id))
        }

        #[doc = concat!("Returns the ", $kind, " with the given id for mutation.")]
        pub fn $get_mut(&mut self, id: RecordId) -> AdjustmentResult<&mut $record> {
            self.$table
                .get_mut(&id)
                .ok_or_else(|| AdjustmentError::not_found($kind, id))
        }

        #[doc = concat!("Stores a ", $kind, ", replacing any record with the same id.")]
        pub fn $insert(&mut self, record: $record) -> RecordId {
            let id = record.id;
            self.reserve(id);
            self.$table.insert(id, record);
            id
        }

        #[doc = concat!("Removes a ", $kind, " and returns it.")]
        pub fn $remove(&mut self, id: RecordId) -> AdjustmentResult<$record> {
            self.$table
                .remove(&id)
                .ok_or_else(|| AdjustmentError::not_found($kind, id))
        }

        #[doc = concat!("Iterates over every ", $kind, " in id order.")]
        pub fn $table(&self) -> impl Iterator<Item = &$record> {
            self.$table.values()
        }
    };
}

impl RecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out a fresh identifier. Headers and lines share one sequence.
    pub fn allocate_id(&mut self) -> RecordId {
        self.next_id += 1;
        self.next_id
    }

    fn reserve(&mut self, id: RecordId) {
        self.next_id = self.next_id.max(id);
    }

    /// Runs an operation against a working copy of the store.
    ///
    /// The copy replaces the store only when the operation returns `Ok`;
    /// on error the store is left exactly as it was.
    pub fn transaction<T, F>(&mut self, operation: F) -> AdjustmentResult<T>
    where
        F: FnOnce(&mut RecordStore) -> AdjustmentResult<T>,
    {
        let mut working = self.clone();
        let value = operation(&mut working)?;
        *self = working;
        Ok(value)
    }

    table!(bonus_categories, BonusCategory, "bonus category", bonus_category, bonus_category_mut, insert_bonus_category_record, remove_bonus_category);
    table!(bonus_types, BonusType, "bonus type", bonus_type, bonus_type_mut, insert_bonus_type_record, remove_bonus_type);
    table!(bonuses, BonusHeader, "bonus", bonus, bonus_mut, insert_bonus, remove_bonus);
    table!(penalty_categories, PenaltyCategory, "penalty category", penalty_category, penalty_category_mut, insert_penalty_category_record, remove_penalty_category);
    table!(penalty_types, PenaltyType, "penalty type", penalty_type, penalty_type_mut, insert_penalty_type_record, remove_penalty_type);
    table!(penalties, PenaltyHeader, "penalty", penalty, penalty_mut, insert_penalty, remove_penalty);
    table!(transport_allowances, TransportAllowanceHeader, "transportation allowance", transport_allowance, transport_allowance_mut, insert_transport_allowance, remove_transport_allowance);
    table!(award_profits, AwardProfitHeader, "award/profit", award_profit, award_profit_mut, insert_award_profit, remove_award_profit);
    table!(pay_raises, PayRaiseHeader, "pay raise", pay_raise, pay_raise_mut, insert_pay_raise, remove_pay_raise);
    table!(employees, Employee, "employee", employee, employee_mut, insert_employee, remove_employee);
    table!(contracts, Contract, "contract", contract, contract_mut, insert_contract, remove_contract);
    table!(salary_rules, SalaryRule, "salary rule", salary_rule, salary_rule_mut, insert_salary_rule, remove_salary_rule);
    table!(salary_rule_parents, SalaryRuleParent, "salary rule parent", salary_rule_parent, salary_rule_parent_mut, insert_salary_rule_parent, remove_salary_rule_parent);
    table!(payslips, Payslip, "payslip", payslip, payslip_mut, insert_payslip, remove_payslip);
    table!(payslip_runs, PayslipRun, "payslip run", payslip_run, payslip_run_mut, insert_payslip_run, remove_payslip_run);

    // Catalog

    /// Registers a bonus category with a unique name.
    pub fn insert_bonus_category(&mut self, name: &str) -> AdjustmentResult<RecordId> {
        if self.bonus_category_by_name(name).is_some() {
            return Err(duplicate("bonus category", "name", name));
        }
        let id = self.allocate_id();
        self.bonus_categories.insert(
            id,
            BonusCategory {
                id,
                name: name.to_string(),
            },
        );
        Ok(id)
    }

    /// Looks a bonus category up by name.
    pub fn bonus_category_by_name(&self, name: &str) -> Option<RecordId> {
        self.bonus_categories
            .values()
            .find(|category| category.name == name)
            .map(|category| category.id)
    }

    /// Registers a bonus type. Both name and code must be unique.
    pub fn insert_bonus_type(
        &mut self,
        name: &str,
        code: &str,
        category_id: RecordId,
    ) -> AdjustmentResult<RecordId> {
        self.bonus_category(category_id)?;
        if self.bonus_types.values().any(|t| t.name == name) {
            return Err(duplicate("bonus type", "name", name));
        }
        if self.bonus_type_by_code(code).is_some() {
            return Err(duplicate("bonus type", "code", code));
        }
        let id = self.allocate_id();
        self.bonus_types.insert(
            id,
            BonusType {
                id,
                name: name.to_string(),
                category_id,
                code: code.to_string(),
            },
        );
        Ok(id)
    }

    /// Looks a bonus type up by code.
    pub fn bonus_type_by_code(&self, code: &str) -> Option<&BonusType> {
        self.bonus_types.values().find(|t| t.code == code)
    }

    /// Registers a penalty category with a unique name.
    pub fn insert_penalty_category(&mut self, name: &str) -> AdjustmentResult<RecordId> {
        if self.penalty_category_by_name(name).is_some() {
            return Err(duplicate("penalty category", "name", name));
        }
        let id = self.allocate_id();
        self.penalty_categories.insert(
            id,
            PenaltyCategory {
                id,
                name: name.to_string(),
            },
        );
        Ok(id)
    }

    /// Looks a penalty category up by name.
    pub fn penalty_category_by_name(&self, name: &str) -> Option<RecordId> {
        self.penalty_categories
            .values()
            .find(|category| category.name == name)
            .map(|category| category.id)
    }

    /// Registers a penalty type. Both name and code must be unique.
    pub fn insert_penalty_type(
        &mut self,
        name: &str,
        code: &str,
        category_id: RecordId,
    ) -> AdjustmentResult<RecordId> {
        self.penalty_category(category_id)?;
        if self.penalty_types.values().any(|t| t.name == name) {
            return Err(duplicate("penalty type", "name", name));
        }
        if self.penalty_type_by_code(code).is_some() {
            return Err(duplicate("penalty type", "code", code));
        }
        let id = self.allocate_id();
        self.penalty_types.insert(
            id,
            PenaltyType {
                id,
                name: name.to_string(),
                category_id,
                code: code.to_string(),
            },
        );
        Ok(id)
    }

    /// Looks a penalty type up by code.
    pub fn penalty_type_by_code(&self, code: &str) -> Option<&PenaltyType> {
        self.penalty_types.values().find(|t| t.code == code)
    }

    // Line queries

    /// Bonus lines matching a query, in header then line order.
    pub fn search_bonus_lines(&self, query: &LineQuery) -> Vec<&BonusLine> {
        search(self.bonuses.values(), query)
    }

    /// Penalty lines matching a query.
    pub fn search_penalty_lines(&self, query: &LineQuery) -> Vec<&PenaltyLine> {
        search(self.penalties.values(), query)
    }

    /// Transportation allowance lines matching a query.
    pub fn search_transport_allowance_lines(
        &self,
        query: &LineQuery,
    ) -> Vec<&TransportAllowanceLine> {
        search(self.transport_allowances.values(), query)
    }

    /// Award/profit lines matching a query.
    pub fn search_award_profit_lines(&self, query: &LineQuery) -> Vec<&AwardProfitLine> {
        search(self.award_profits.values(), query)
    }

    /// Bonus lines attached to a payslip.
    pub fn attached_bonus_lines(&self, payslip_id: RecordId) -> Vec<&BonusLine> {
        attached(self.bonuses.values(), payslip_id)
    }

    /// Penalty lines attached to a payslip.
    pub fn attached_penalty_lines(&self, payslip_id: RecordId) -> Vec<&PenaltyLine> {
        attached(self.penalties.values(), payslip_id)
    }

    /// Transportation allowance lines attached to a payslip.
    pub fn attached_transport_allowance_lines(
        &self,
        payslip_id: RecordId,
    ) -> Vec<&TransportAllowanceLine> {
        attached(self.transport_allowances.values(), payslip_id)
    }

    /// Award/profit lines attached to a payslip.
    pub fn attached_award_profit_lines(&self, payslip_id: RecordId) -> Vec<&AwardProfitLine> {
        attached(self.award_profits.values(), payslip_id)
    }

    /// References to every line of every kind attached to a payslip.
    pub fn attached_lines(&self, payslip_id: RecordId) -> Vec<LineRef> {
        let bonus = self.attached_bonus_lines(payslip_id).into_iter().map(|l| l.line_ref());
        let penalty = self.attached_penalty_lines(payslip_id).into_iter().map(|l| l.line_ref());
        let transport = self
            .attached_transport_allowance_lines(payslip_id)
            .into_iter()
            .map(|l| l.line_ref());
        let award_profit = self
            .attached_award_profit_lines(payslip_id)
            .into_iter()
            .map(|l| l.line_ref());

        bonus.chain(penalty).chain(transport).chain(award_profit).collect()
    }

    /// Resolves a line reference for mutation.
    pub fn line_mut(&mut self, line: LineRef) -> AdjustmentResult<&mut dyn AdjustmentLine> {
        match line {
            LineRef::Bonus { header_id, line_id } => {
                let found = self
                    .bonus_mut(header_id)?
                    .line_mut(line_id)
                    .ok_or_else(|| AdjustmentError::not_found("bonus line", line_id))?;
                Ok(found)
            }
            LineRef::Penalty { header_id, line_id } => {
                let found = self
                    .penalty_mut(header_id)?
                    .line_mut(line_id)
                    .ok_or_else(|| AdjustmentError::not_found("penalty line", line_id))?;
                Ok(found)
            }
            LineRef::TransportAllowance { header_id, line_id } => {
                let found = self
                    .transport_allowance_mut(header_id)?
                    .line_mut(line_id)
                    .ok_or_else(|| {
                        AdjustmentError::not_found("transportation allowance line", line_id)
                    })?;
                Ok(found)
            }
            LineRef::AwardProfit { header_id, line_id } => {
                let found = self
                    .award_profit_mut(header_id)?
                    .line_mut(line_id)
                    .ok_or_else(|| AdjustmentError::not_found("award/profit line", line_id))?;
                Ok(found)
            }
        }
    }

    // Headers by reference

    /// The state of any header.
    pub fn header_state(&self, header: HeaderRef) -> AdjustmentResult<RecordState> {
        Ok(match header {
            HeaderRef::Bonus(id) => self.bonus(id)?.state,
            HeaderRef::Penalty(id) => self.penalty(id)?.state,
            HeaderRef::TransportAllowance(id) => self.transport_allowance(id)?.state,
            HeaderRef::AwardProfit(id) => self.award_profit(id)?.state,
            HeaderRef::PayRaise(id) => self.pay_raise(id)?.state,
        })
    }

    /// Writes the state of a header without touching its lines.
    pub fn set_header_state(
        &mut self,
        header: HeaderRef,
        state: RecordState,
    ) -> AdjustmentResult<()> {
        match header {
            HeaderRef::Bonus(id) => self.bonus_mut(id)?.state = state,
            HeaderRef::Penalty(id) => self.penalty_mut(id)?.state = state,
            HeaderRef::TransportAllowance(id) => self.transport_allowance_mut(id)?.state = state,
            HeaderRef::AwardProfit(id) => self.award_profit_mut(id)?.state = state,
            HeaderRef::PayRaise(id) => self.pay_raise_mut(id)?.state = state,
        }
        Ok(())
    }

    /// Returns true when every line of the header is done.
    ///
    /// Pay raise lines share their header's state, so a pay raise counts as
    /// done when the header is.
    pub fn lines_done(&self, header: HeaderRef) -> AdjustmentResult<bool> {
        Ok(match header {
            HeaderRef::Bonus(id) => self.bonus(id)?.all_lines_done(),
            HeaderRef::Penalty(id) => self.penalty(id)?.all_lines_done(),
            HeaderRef::TransportAllowance(id) => self.transport_allowance(id)?.all_lines_done(),
            HeaderRef::AwardProfit(id) => self.award_profit(id)?.all_lines_done(),
            HeaderRef::PayRaise(id) => self.pay_raise(id)?.state == RecordState::Done,
        })
    }

    // Audit trail

    /// Posts a free-text message against a header.
    pub fn post_message(&mut self, record: HeaderRef, body: impl Into<String>) {
        self.messages.push(AuditMessage {
            record,
            body: body.into(),
            posted_at: Utc::now(),
        });
    }

    /// Messages posted against a header, oldest first.
    pub fn messages_for(&self, record: HeaderRef) -> Vec<&AuditMessage> {
        self.messages
            .iter()
            .filter(|message| message.record == record)
            .collect()
    }
}

fn duplicate(kind: &str, field: &str, value: &str) -> AdjustmentError {
    AdjustmentError::DuplicateKey {
        kind: kind.to_string(),
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn search<'a, H>(headers: impl Iterator<Item = &'a H>, query: &LineQuery) -> Vec<&'a H::Line>
where
    H: AdjustmentHeader + 'a,
{
    headers
        .flat_map(|header| {
            header
                .lines()
                .iter()
                .filter(move |line| query.matches(header, line))
        })
        .collect()
}

fn attached<'a, H>(headers: impl Iterator<Item = &'a H>, payslip_id: RecordId) -> Vec<&'a H::Line>
where
    H: AdjustmentHeader + 'a,
{
    headers
        .flat_map(|header| header.lines().iter())
        .filter(|line| line.payslip_id() == Some(payslip_id))
        .collect()
}
