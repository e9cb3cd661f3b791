use std::path::Path;

use roster_core::reporting::{SelectionAction, SelectionEvent, SelectionPhase};
use roster_core::{EmployeeId, InMemoryEmployeeDirectory, ReportingResolver, RoleSelection};
use serde::Serialize;

use crate::commands::{block_on, load_employee_file, load_runtime, CommandResult};

#[derive(Debug, Serialize)]
struct SelectionReport {
    phase: SelectionPhase,
    role: Option<String>,
    parent_code: Option<String>,
    parent_description: Option<String>,
    reporting_person: Option<String>,
    employee_id: Option<String>,
    actions: Vec<SelectionAction>,
}

pub fn run(role: &str, employees: &Path, choose: Option<&str>) -> CommandResult {
    let runtime = match load_runtime("reporting") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };
    let directory = match load_employee_file(employees) {
        Ok(records) => InMemoryEmployeeDirectory::new(records),
        Err(message) => return CommandResult::failure("reporting", "employee_file", message, 4),
    };

    let mut selection = RoleSelection::new(ReportingResolver::new(runtime.catalog));
    let entered = match block_on("reporting", selection.enter_role_with(role, &directory)) {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(error)) => {
            return CommandResult::application_failure("reporting", "selection", error)
        }
        Err(failure) => return failure,
    };

    if let Some(unknown) = entered.actions.iter().find_map(|action| match action {
        SelectionAction::RejectUnknownRole(code) => Some(code),
        _ => None,
    }) {
        return CommandResult::failure(
            "reporting",
            "unknown_role",
            format!("role `{unknown}` is not registered in the hierarchy catalog"),
            4,
        );
    }

    let mut actions = entered.actions;
    if let Some(employee_id) = choose {
        let event = SelectionEvent::CandidateChosen(EmployeeId(employee_id.trim().to_string()));
        match selection.apply(event) {
            Ok(chosen) => actions.extend(chosen.actions),
            Err(error) => {
                return CommandResult::application_failure("reporting", "selection", error)
            }
        }
    }

    let report = SelectionReport {
        phase: selection.phase(),
        role: selection.role().map(ToString::to_string),
        parent_code: selection.parent().map(|parent| parent.parent_code.to_string()),
        parent_description: selection.parent().map(|parent| parent.parent_description.clone()),
        reporting_person: selection.reporting_person().map(str::to_string),
        employee_id: selection.selected_employee().map(|id| id.0.clone()),
        actions,
    };
    let message = match (&report.reporting_person, report.phase) {
        (Some(person), _) => format!("reporting person: {person}"),
        (None, SelectionPhase::CandidatesLoaded) => {
            "choose a reporting person with --choose".to_string()
        }
        (None, _) => "no reporting person selected".to_string(),
    };

    CommandResult::success("reporting", message, report)
}
