//! Payslip batches.
//!
//! A run picks open contracts through its filters and generates one
//! payslip per contract over a shared pay window.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AdjustmentResult;
use crate::models::{BonusMethod, Contract, PayslipRun, PayslipRunState, RecordId};
use crate::store::{DateWindow, RecordStore};

use super::payslip::{NewPayslip, create_payslip};

/// A payslip run to create.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPayslipRun {
    /// Display name.
    pub name: String,
    /// Restrict to the run's company.
    #[serde(default)]
    pub all_employees: bool,
    /// Work location filter.
    #[serde(default)]
    pub work_location_id: Option<RecordId>,
    /// Company filter.
    #[serde(default)]
    pub company_id: Option<RecordId>,
    /// Department filter.
    #[serde(default)]
    pub department_id: Option<RecordId>,
}

/// Creates an open payslip run.
pub fn create_payslip_run(store: &mut RecordStore, new: NewPayslipRun) -> RecordId {
    let id = store.allocate_id();
    store.insert_payslip_run(PayslipRun {
        id,
        name: new.name,
        state: PayslipRunState::Draft,
        all_employees: new.all_employees,
        work_location_id: new.work_location_id,
        company_id: new.company_id,
        department_id: new.department_id,
    })
}

/// Open contracts that pass the run's filters, in id order.
pub fn available_contracts(
    store: &RecordStore,
    run_id: RecordId,
) -> AdjustmentResult<Vec<RecordId>> {
    let run = store.payslip_run(run_id)?;
    Ok(store
        .contracts()
        .filter(|contract| contract.is_open() && passes_filters(run, contract))
        .map(|contract| contract.id)
        .collect())
}

fn passes_filters(run: &PayslipRun, contract: &Contract) -> bool {
    let matches = |filter: Option<RecordId>, value: Option<RecordId>| {
        filter.is_none_or(|wanted| value == Some(wanted))
    };

    matches(run.work_location_id, contract.work_location_id)
        && (!run.all_employees || contract.company_id == run.company_id)
        && matches(run.department_id, contract.department_id)
}

/// Generates one payslip per available contract over the window.
///
/// `structure_id` overrides the contracts' own structures when given.
pub fn generate_payslips(
    store: &mut RecordStore,
    run_id: RecordId,
    window: DateWindow,
    structure_id: Option<RecordId>,
) -> AdjustmentResult<Vec<RecordId>> {
    let run_name = store.payslip_run(run_id)?.name.clone();
    let mut created = Vec::new();

    for contract_id in available_contracts(store, run_id)? {
        let employee_id = store.contract(contract_id)?.employee_id;
        let employee_name = store.employee(employee_id)?.name.clone();
        let id = create_payslip(
            store,
            NewPayslip {
                name: format!("{} - {}", run_name, employee_name),
                employee_id,
                contract_id: Some(contract_id),
                structure_id,
                run_id: Some(run_id),
                date_from: window.date_from,
                date_to: window.date_to,
                method: BonusMethod::default(),
                lines: Vec::new(),
            },
        )?;
        created.push(id);
    }

    info!(run_id, payslips = created.len(), "Generated payslips");
    Ok(created)
}
