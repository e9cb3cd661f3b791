use serde::{Deserialize, Serialize};

use crate::domain::role::RoleCode;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub String);

impl EmployeeId {
    pub fn matches(&self, other: &str) -> bool {
        self.0.trim() == other.trim()
    }
}

/// Employee directory record for someone currently holding a role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingCandidate {
    pub employee_id: EmployeeId,
    pub name: String,
    #[serde(default)]
    pub role_id: String,
    #[serde(default)]
    pub role_name: String,
    #[serde(default)]
    pub reporting_person: String,
}

impl ReportingCandidate {
    /// Records without a role id or a name cannot be offered as a reporting person.
    pub fn is_selectable(&self) -> bool {
        !self.role_id.trim().is_empty() && !self.name.trim().is_empty()
    }

    pub fn reporting_person_label(&self) -> String {
        let role_name = self.role_name.trim();
        if role_name.is_empty() {
            format!("{}, {}", self.employee_id.0.trim(), self.name.trim())
        } else {
            format!("{}, {}, {}", self.employee_id.0.trim(), self.name.trim(), role_name)
        }
    }

    pub fn holds(&self, code: &RoleCode) -> bool {
        RoleCode::new(&self.role_id).map(|held| &held == code).unwrap_or(false)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRoleState {
    pub employee_id: EmployeeId,
    pub current_role: Option<RoleCode>,
}
