use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::domain::employee::{EmployeeId, EmployeeRoleState, ReportingCandidate};
use crate::domain::role::RoleCode;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("employee directory unavailable: {0}")]
    Unavailable(String),
    #[error("employee `{employee_id}` is not in the employee directory")]
    UnknownEmployee { employee_id: String },
}

/// Lookup of employees and the roles they currently hold.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    async fn employees_with_role(
        &self,
        role: &RoleCode,
    ) -> Result<Vec<ReportingCandidate>, DirectoryError>;

    async fn employee(&self, id: &EmployeeId) -> Result<Option<ReportingCandidate>, DirectoryError>;
}

/// Current role of an employee; a blank role id reads as unassigned. An id the
/// directory does not know is [`DirectoryError::UnknownEmployee`].
pub async fn current_role_state<D>(
    directory: &D,
    id: &EmployeeId,
) -> Result<EmployeeRoleState, DirectoryError>
where
    D: EmployeeDirectory + ?Sized,
{
    let record = directory
        .employee(id)
        .await?
        .ok_or_else(|| DirectoryError::UnknownEmployee { employee_id: id.0.clone() })?;
    let current_role = RoleCode::parse_optional(Some(record.role_id.as_str()));

    Ok(EmployeeRoleState { employee_id: id.clone(), current_role })
}

#[derive(Debug, Default)]
pub struct InMemoryEmployeeDirectory {
    employees: RwLock<Vec<ReportingCandidate>>,
}

impl InMemoryEmployeeDirectory {
    pub fn new(employees: Vec<ReportingCandidate>) -> Self {
        Self { employees: RwLock::new(employees) }
    }

    pub async fn insert(&self, employee: ReportingCandidate) {
        let mut employees = self.employees.write().await;
        employees.retain(|existing| !existing.employee_id.matches(&employee.employee_id.0));
        employees.push(employee);
    }
}

#[async_trait]
impl EmployeeDirectory for InMemoryEmployeeDirectory {
    async fn employees_with_role(
        &self,
        role: &RoleCode,
    ) -> Result<Vec<ReportingCandidate>, DirectoryError> {
        let employees = self.employees.read().await;
        Ok(employees.iter().filter(|employee| employee.holds(role)).cloned().collect())
    }

    async fn employee(&self, id: &EmployeeId) -> Result<Option<ReportingCandidate>, DirectoryError> {
        let employees = self.employees.read().await;
        Ok(employees.iter().find(|employee| employee.employee_id.matches(&id.0)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::{current_role_state, DirectoryError, EmployeeDirectory, InMemoryEmployeeDirectory};
    use crate::domain::employee::{EmployeeId, ReportingCandidate};
    use crate::domain::role::RoleCode;

    fn employee(id: &str, name: &str, role_id: &str) -> ReportingCandidate {
        ReportingCandidate {
            employee_id: EmployeeId(id.to_owned()),
            name: name.to_owned(),
            role_id: role_id.to_owned(),
            role_name: String::new(),
            reporting_person: String::new(),
        }
    }

    #[tokio::test]
    async fn lists_holders_of_a_role_case_insensitively() {
        let directory = InMemoryEmployeeDirectory::new(vec![
            employee("EMP001", "John Doe", "ceo"),
            employee("EMP002", "Jane Smith", "CTO"),
            employee("EMP003", "Ravi Kumar", "CTO"),
        ]);

        let holders = directory
            .employees_with_role(&RoleCode::new("cto").expect("valid code"))
            .await
            .expect("directory available");
        let ids: Vec<&str> = holders.iter().map(|holder| holder.employee_id.0.as_str()).collect();
        assert_eq!(ids, vec!["EMP002", "EMP003"]);
    }

    #[tokio::test]
    async fn insert_replaces_existing_record() {
        let directory = InMemoryEmployeeDirectory::default();
        directory.insert(employee("EMP010", "Asha Rao", "SE")).await;
        directory.insert(employee("EMP010", "Asha Rao", "SSE")).await;

        let record = directory
            .employee(&EmployeeId("EMP010".to_owned()))
            .await
            .expect("directory available")
            .expect("employee exists");
        assert_eq!(record.role_id, "SSE");
    }

    #[tokio::test]
    async fn current_role_state_treats_blank_role_as_unassigned() {
        let directory = InMemoryEmployeeDirectory::new(vec![
            employee("EMP020", "Lena Park", " sa "),
            employee("EMP021", "Omar Haddad", ""),
        ]);

        let assigned = current_role_state(&directory, &EmployeeId("EMP020".to_owned()))
            .await
            .expect("directory available");
        assert_eq!(assigned.current_role, Some(RoleCode::new("SA").expect("valid code")));

        let blank = current_role_state(&directory, &EmployeeId("EMP021".to_owned()))
            .await
            .expect("directory available");
        assert_eq!(blank.current_role, None);
    }

    #[tokio::test]
    async fn current_role_state_rejects_unknown_employee() {
        let directory =
            InMemoryEmployeeDirectory::new(vec![employee("EMP021", "Lena Park", "SE")]);

        let missing = current_role_state(&directory, &EmployeeId("EMP0021".to_owned())).await;
        assert_eq!(
            missing,
            Err(DirectoryError::UnknownEmployee { employee_id: "EMP0021".to_owned() })
        );
    }
}
