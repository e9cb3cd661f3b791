use roster_core::domain::role::normalize_code;
use roster_core::{ParentResolution, ReportingResolver, TOP_LEVEL_REPORTING_PERSON};
use serde::Serialize;

use crate::commands::{load_runtime, CommandResult};

#[derive(Debug, Serialize)]
struct Resolved {
    role: String,
    parent: ParentResolution,
    /// Fixed for top-level roles, otherwise chosen among the parent's holders.
    reporting_person: Option<&'static str>,
}

pub fn run(code: &str) -> CommandResult {
    let runtime = match load_runtime("resolve") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };
    let resolver = ReportingResolver::new(runtime.catalog);

    match resolver.resolve_parent_role(code) {
        Ok(parent) => {
            let (message, reporting_person) = match &parent {
                ParentResolution::NoParent => {
                    ("top-level role".to_string(), Some(TOP_LEVEL_REPORTING_PERSON))
                }
                ParentResolution::Parent(parent) => (
                    format!("reports to {} ({})", parent.parent_code, parent.parent_description),
                    None,
                ),
            };
            let role = normalize_code(code);
            CommandResult::success("resolve", message, Resolved { role, parent, reporting_person })
        }
        Err(error) => CommandResult::failure("resolve", "unknown_role", error.to_string(), 4),
    }
}
