use serde::Serialize;

use crate::commands::roles::RoleRow;
use crate::commands::{load_runtime, CommandResult};

#[derive(Debug, Serialize)]
struct RoleDetails {
    #[serde(flatten)]
    role: RoleRow,
    reporting_chain: Vec<String>,
    direct_reports: Vec<String>,
}

pub fn run(code: &str) -> CommandResult {
    let runtime = match load_runtime("describe") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };
    let catalog = &runtime.catalog;

    let details = catalog.definition(code).and_then(|role| {
        let reporting_chain =
            catalog.reporting_chain(code)?.iter().map(|link| link.code.to_string()).collect();
        let direct_reports =
            catalog.children_of(code)?.iter().map(|child| child.code.to_string()).collect();
        Ok(RoleDetails { role: RoleRow::from(role), reporting_chain, direct_reports })
    });

    match details {
        Ok(details) => {
            let message = format!("reporting chain {}", details.reporting_chain.join(" -> "));
            CommandResult::success("describe", message, details)
        }
        Err(error) => CommandResult::failure("describe", "unknown_role", error.to_string(), 4),
    }
}
