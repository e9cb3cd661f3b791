use std::path::PathBuf;

use roster_core::reporting::{current_role_state, DirectoryError};
use roster_core::{
    EmployeeId, InMemoryEmployeeDirectory, RoleCode, TransitionRequest, TransitionValidator,
};
use tracing::info;

use crate::commands::{block_on, load_employee_file, load_runtime, CommandResult};

#[derive(Debug, Clone, Default)]
pub struct ValidateArgs {
    pub proposed: String,
    pub current: Option<String>,
    pub editing: bool,
    /// Looks up the current role in `employees` when `current` is not given.
    pub employee: Option<String>,
    pub employees: Option<PathBuf>,
}

pub fn run(args: ValidateArgs) -> CommandResult {
    let runtime = match load_runtime("validate") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let current_role = match resolve_current_role(&args) {
        Ok(current_role) => current_role,
        Err(failure) => return failure,
    };
    let Ok(proposed_role) = RoleCode::new(&args.proposed) else {
        let message = "proposed role must not be blank";
        return CommandResult::failure("validate", "bad_input", message, 4);
    };

    let request = TransitionRequest { current_role, proposed_role, editing: args.editing };
    let validator = TransitionValidator::new(runtime.catalog)
        .with_unknown_role_policy(runtime.config.validation.unknown_roles);
    let result = validator.evaluate(&request);

    info!(
        event_name = "cli.validate.completed",
        proposed_role = %request.proposed_role,
        allowed = result.allowed,
        reason = ?result.reason,
        "transition evaluated"
    );

    if result.allowed {
        let message = format!("transition allowed ({:?})", result.reason);
        CommandResult::success("validate", message, result)
    } else {
        let message = result.message.clone().unwrap_or_else(|| "transition rejected".to_string());
        CommandResult::rejected("validate", message, result)
    }
}

fn resolve_current_role(args: &ValidateArgs) -> Result<Option<RoleCode>, CommandResult> {
    if args.current.is_some() {
        return Ok(RoleCode::parse_optional(args.current.as_deref()));
    }
    let (Some(employee), Some(path)) = (args.employee.as_deref(), args.employees.as_deref()) else {
        return Ok(None);
    };

    let employees = load_employee_file(path)
        .map_err(|message| CommandResult::failure("validate", "employee_file", message, 4))?;
    let directory = InMemoryEmployeeDirectory::new(employees);
    let employee_id = EmployeeId(employee.trim().to_string());

    block_on("validate", current_role_state(&directory, &employee_id))?
        .map(|state| state.current_role)
        .map_err(|error| {
            let error_class = match error {
                DirectoryError::UnknownEmployee { .. } => "bad_input",
                DirectoryError::Unavailable(_) => "employee_directory",
            };
            CommandResult::application_failure("validate", error_class, error)
        })
}
