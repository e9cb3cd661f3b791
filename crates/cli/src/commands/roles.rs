use roster_core::RoleDefinition;
use serde::Serialize;

use crate::commands::{load_runtime, CommandResult};

#[derive(Debug, Serialize)]
pub struct RoleRow {
    pub code: String,
    pub description: String,
    pub parent: Option<String>,
    pub level: u32,
    pub department: Option<&'static str>,
}

impl From<&RoleDefinition> for RoleRow {
    fn from(role: &RoleDefinition) -> Self {
        Self {
            code: role.code.to_string(),
            description: role.description.clone(),
            parent: role.parent.as_ref().map(ToString::to_string),
            level: role.level,
            department: role.role_type.as_ref().map(|role_type| role_type.label()),
        }
    }
}

pub fn run(search: Option<&str>) -> CommandResult {
    let runtime = match load_runtime("roles") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let rows: Vec<RoleRow> = match search {
        Some(text) => runtime.catalog.search(text).into_iter().map(RoleRow::from).collect(),
        None => runtime.catalog.roles().iter().map(RoleRow::from).collect(),
    };

    CommandResult::success("roles", format!("{} role(s)", rows.len()), rows)
}
