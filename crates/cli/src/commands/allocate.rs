use chrono::{NaiveDate, Utc};
use roster_core::audit::{AuditContext, InMemoryAuditSink};
use roster_core::{AllocationDraft, AllocationError, AllocationPlanner, EmployeeId};
use tracing::debug;

use crate::commands::{load_runtime, CommandResult};

#[derive(Debug, Clone, Default)]
pub struct AllocateArgs {
    pub employee: String,
    pub role: String,
    pub current: Option<String>,
    pub reporting_person: Option<String>,
    pub allocation_id: Option<String>,
    pub date: Option<NaiveDate>,
}

pub fn run(args: AllocateArgs) -> CommandResult {
    let runtime = match load_runtime("allocate") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let draft = AllocationDraft {
        allocation_id: args.allocation_id,
        employee_id: args.employee,
        current_role: args.current,
        role_id: args.role,
        reporting_person: args.reporting_person.unwrap_or_default(),
        allocated_date: args.date,
    };
    let planner =
        AllocationPlanner::new(runtime.catalog, runtime.config.validation.unknown_roles);
    let employee_id = Some(EmployeeId(draft.employee_id.trim().to_string()));
    let audit = AuditContext::new(employee_id, "cli-allocate", "roster-cli");
    let sink = InMemoryAuditSink::default();

    let prepared = planner.prepare_with_audit(&draft, Utc::now().date_naive(), &sink, &audit);
    for event in sink.events() {
        debug!(
            event_name = "cli.allocate.audit",
            audit_event = %event.action,
            outcome = ?event.outcome,
            correlation_id = %event.correlation_id,
            "allocation audit event"
        );
    }

    match prepared {
        Ok(payload) => {
            let message = format!("{} allocated to {}", payload.role_id, payload.employee_id.0);
            CommandResult::success("allocate", message, payload)
        }
        Err(AllocationError::TransitionRejected { message }) => {
            CommandResult::rejected("allocate", message, Option::<()>::None)
        }
        Err(error) => CommandResult::application_failure("allocate", "bad_input", error),
    }
}
