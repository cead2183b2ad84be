//! Salary rule grouping for payslip reports.
//!
//! Computed payslip lines are partitioned by their rule's parent: rules with
//! a parent are bucketed under it, rules without one are listed on their
//! own. Amounts are summed per bucket across every payslip in the report.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{AdjustmentError, AdjustmentResult};
use crate::models::{Payslip, RecordId, SalaryRule, SalaryRuleParent};

/// Lookup of salary rules and their parents.
#[derive(Debug, Clone, Default)]
pub struct RuleBook<'a> {
    rules: BTreeMap<RecordId, &'a SalaryRule>,
    parents: BTreeMap<RecordId, &'a SalaryRuleParent>,
}

impl<'a> RuleBook<'a> {
    /// Indexes rules and parents by id.
    pub fn new(
        rules: impl IntoIterator<Item = &'a SalaryRule>,
        parents: impl IntoIterator<Item = &'a SalaryRuleParent>,
    ) -> Self {
        Self {
            rules: rules.into_iter().map(|rule| (rule.id, rule)).collect(),
            parents: parents.into_iter().map(|parent| (parent.id, parent)).collect(),
        }
    }

    /// Looks a rule up.
    pub fn rule(&self, id: RecordId) -> Option<&'a SalaryRule> {
        self.rules.get(&id).copied()
    }

    /// Looks a parent up.
    pub fn parent(&self, id: RecordId) -> Option<&'a SalaryRuleParent> {
        self.parents.get(&id).copied()
    }
}

/// Rules bucketed under one parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleGroup {
    /// The parent.
    pub parent_id: RecordId,
    /// Rules under it, by sequence.
    pub rule_ids: Vec<RecordId>,
}

/// The partition of a report's rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleAssignment {
    /// Parent buckets in the order their first rule appears by sequence.
    pub parents: Vec<RuleGroup>,
    /// Rules without a parent, by sequence.
    pub free_rules: Vec<RecordId>,
}

/// Display names for a [`RuleAssignment`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleNames {
    /// Parent names, aligned with `RuleAssignment::parents`.
    pub parents: Vec<String>,
    /// Free rule names, aligned with `RuleAssignment::free_rules`.
    pub free_rules: Vec<String>,
}

/// A named amount in a payslip report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    /// Parent or rule name.
    pub name: String,
    /// Summed amount, rounded to cents.
    pub amount: Decimal,
}

/// The report shape for a set of payslips.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PayslipReport {
    /// One entry per parent bucket.
    pub parents: Vec<ReportEntry>,
    /// One entry per rule without a parent.
    pub free_rules: Vec<ReportEntry>,
}

impl PayslipReport {
    /// Builds the report for the given payslips.
    pub fn build(payslips: &[&Payslip], book: &RuleBook<'_>) -> AdjustmentResult<Self> {
        let assignment = assign_parents_and_free_rules(payslips, book);
        let names = rule_parents_and_free_names(&assignment, book)?;

        let parents = names
            .parents
            .into_iter()
            .zip(get_parent_amount(payslips, &assignment))
            .map(|(name, amount)| ReportEntry { name, amount })
            .collect();
        let free_rules = names
            .free_rules
            .into_iter()
            .zip(get_free_rule_amount(payslips, &assignment))
            .map(|(name, amount)| ReportEntry { name, amount })
            .collect();

        Ok(Self {
            parents,
            free_rules,
        })
    }
}

/// Rules with a non-zero line shown on any of the payslips, unique, in the
/// order they are first met.
pub fn get_salary_rules(payslips: &[&Payslip], book: &RuleBook<'_>) -> Vec<RecordId> {
    let mut rule_ids = Vec::new();
    for line in payslips.iter().flat_map(|payslip| &payslip.lines) {
        let visible = book
            .rule(line.salary_rule_id)
            .is_some_and(|rule| rule.appears_on_payslip);
        if !line.total.is_zero() && visible && !rule_ids.contains(&line.salary_rule_id) {
            rule_ids.push(line.salary_rule_id);
        }
    }
    rule_ids
}

/// Partitions the report's rules into parent buckets and free rules.
pub fn assign_parents_and_free_rules(
    payslips: &[&Payslip],
    book: &RuleBook<'_>,
) -> RuleAssignment {
    let mut rules: Vec<&SalaryRule> = get_salary_rules(payslips, book)
        .into_iter()
        .filter_map(|id| book.rule(id))
        .collect();
    rules.sort_by_key(|rule| rule.sequence);

    let mut assignment = RuleAssignment::default();
    for rule in rules {
        match rule.parent_id {
            Some(parent_id) => {
                match assignment
                    .parents
                    .iter_mut()
                    .find(|group| group.parent_id == parent_id)
                {
                    Some(group) => group.rule_ids.push(rule.id),
                    None => assignment.parents.push(RuleGroup {
                        parent_id,
                        rule_ids: vec![rule.id],
                    }),
                }
            }
            None => assignment.free_rules.push(rule.id),
        }
    }
    assignment
}

/// Resolves the names of an assignment's parents and free rules.
pub fn rule_parents_and_free_names(
    assignment: &RuleAssignment,
    book: &RuleBook<'_>,
) -> AdjustmentResult<RuleNames> {
    let parents = assignment
        .parents
        .iter()
        .map(|group| {
            book.parent(group.parent_id)
                .map(|parent| parent.name.clone())
                .ok_or_else(|| AdjustmentError::not_found("salary rule parent", group.parent_id))
        })
        .collect::<AdjustmentResult<Vec<_>>>()?;
    let free_rules = assignment
        .free_rules
        .iter()
        .map(|&id| {
            book.rule(id)
                .map(|rule| rule.name.clone())
                .ok_or_else(|| AdjustmentError::not_found("salary rule", id))
        })
        .collect::<AdjustmentResult<Vec<_>>>()?;

    Ok(RuleNames {
        parents,
        free_rules,
    })
}

/// Sums each parent bucket across the payslips, rounded to cents.
pub fn get_parent_amount(payslips: &[&Payslip], assignment: &RuleAssignment) -> Vec<Decimal> {
    assignment
        .parents
        .iter()
        .map(|group| sum_rules(payslips, &group.rule_ids))
        .collect()
}

/// Sums each free rule across the payslips, rounded to cents.
pub fn get_free_rule_amount(payslips: &[&Payslip], assignment: &RuleAssignment) -> Vec<Decimal> {
    assignment
        .free_rules
        .iter()
        .map(|&id| sum_rules(payslips, &[id]))
        .collect()
}

fn sum_rules(payslips: &[&Payslip], rule_ids: &[RecordId]) -> Decimal {
    payslips
        .iter()
        .flat_map(|payslip| &payslip.lines)
        .filter(|line| rule_ids.contains(&line.salary_rule_id))
        .map(|line| line.total)
        .sum::<Decimal>()
        .round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BonusMethod, PayslipLine, PayslipState};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn rule(id: RecordId, name: &str, sequence: i32, parent_id: Option<RecordId>) -> SalaryRule {
        SalaryRule {
            id,
            name: name.to_string(),
            sequence,
            parent_id,
            appears_on_payslip: true,
        }
    }

    fn payslip(id: RecordId, lines: &[(RecordId, &str)]) -> Payslip {
        Payslip {
            id,
            name: format!("Slip {id}"),
            employee_id: 1,
            contract_id: None,
            structure_id: None,
            run_id: None,
            date_from: None,
            date_to: None,
            method: BonusMethod::Gross,
            state: PayslipState::Done,
            lines: lines
                .iter()
                .map(|(rule_id, total)| PayslipLine {
                    salary_rule_id: *rule_id,
                    total: dec(total),
                })
                .collect(),
            bonus_totals: vec![],
            penalty_totals: vec![],
        }
    }

    struct Fixture {
        rules: Vec<SalaryRule>,
        parents: Vec<SalaryRuleParent>,
    }

    impl Fixture {
        fn new() -> Self {
            let mut hidden = rule(5, "Employer Insurance", 2, None);
            hidden.appears_on_payslip = false;
            Self {
                rules: vec![
                    rule(1, "Basic", 1, None),
                    rule(2, "Housing", 10, Some(100)),
                    rule(3, "Transport", 5, Some(100)),
                    rule(4, "Tax", 20, Some(200)),
                    hidden,
                    rule(6, "Overtime", 3, None),
                ],
                parents: vec![
                    SalaryRuleParent {
                        id: 100,
                        name: "Allowances".to_string(),
                    },
                    SalaryRuleParent {
                        id: 200,
                        name: "Deductions".to_string(),
                    },
                ],
            }
        }

        fn book(&self) -> RuleBook<'_> {
            RuleBook::new(&self.rules, &self.parents)
        }
    }

    #[test]
    fn test_salary_rules_skip_zero_and_hidden_lines() {
        let fixture = Fixture::new();
        let slip = payslip(1, &[(2, "300"), (1, "5000"), (6, "0"), (5, "120"), (2, "10")]);

        assert_eq!(get_salary_rules(&[&slip], &fixture.book()), vec![2, 1]);
    }

    #[test]
    fn test_rules_are_partitioned_by_parent_in_sequence_order() {
        let fixture = Fixture::new();
        let slip = payslip(1, &[(4, "-200"), (2, "300"), (1, "5000"), (3, "150"), (6, "80")]);

        let assignment = assign_parents_and_free_rules(&[&slip], &fixture.book());

        assert_eq!(
            assignment.parents,
            vec![
                RuleGroup {
                    parent_id: 100,
                    rule_ids: vec![3, 2],
                },
                RuleGroup {
                    parent_id: 200,
                    rule_ids: vec![4],
                },
            ]
        );
        assert_eq!(assignment.free_rules, vec![1, 6]);
    }

    #[test]
    fn test_amounts_are_summed_across_payslips_and_rounded() {
        let fixture = Fixture::new();
        let first = payslip(1, &[(2, "300.125"), (3, "150"), (1, "5000")]);
        let second = payslip(2, &[(2, "100"), (1, "4000.004")]);
        let slips = [&first, &second];

        let assignment = assign_parents_and_free_rules(&slips, &fixture.book());

        assert_eq!(get_parent_amount(&slips, &assignment), vec![dec("550.12")]);
        assert_eq!(get_free_rule_amount(&slips, &assignment), vec![dec("9000.00")]);
    }

    #[test]
    fn test_report_pairs_names_with_amounts() {
        let fixture = Fixture::new();
        let slip = payslip(1, &[(1, "5000"), (2, "300"), (4, "-250")]);

        let report = PayslipReport::build(&[&slip], &fixture.book()).unwrap();

        assert_eq!(
            report.parents,
            vec![
                ReportEntry {
                    name: "Allowances".to_string(),
                    amount: dec("300"),
                },
                ReportEntry {
                    name: "Deductions".to_string(),
                    amount: dec("-250"),
                },
            ]
        );
        assert_eq!(
            report.free_rules,
            vec![ReportEntry {
                name: "Basic".to_string(),
                amount: dec("5000"),
            }]
        );
    }

    #[test]
    fn test_unknown_parent_is_reported() {
        let rules = vec![rule(1, "Bonus", 1, Some(999))];
        let book = RuleBook::new(&rules, std::iter::empty());
        let slip = payslip(1, &[(1, "100")]);

        let assignment = assign_parents_and_free_rules(&[&slip], &book);
        let result = rule_parents_and_free_names(&assignment, &book);

        assert!(matches!(result, Err(AdjustmentError::RecordNotFound { .. })));
    }
}
