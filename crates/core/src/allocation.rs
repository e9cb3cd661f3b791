use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::audit::{AuditAction, AuditContext, AuditEvent, AuditOutcome, AuditSink, RoleChange};
use crate::config::UnknownRolePolicy;
use crate::domain::employee::EmployeeId;
use crate::domain::role::RoleCode;
use crate::hierarchy::{HierarchyCatalog, RoleNotFound};
use crate::reporting::{ParentResolution, ReportingResolver, TOP_LEVEL_REPORTING_PERSON};
use crate::transition::{TransitionRequest, TransitionValidator};

/// Form input for assigning a role to an employee. Present `allocation_id` means the
/// allocation already exists and is being edited.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationDraft {
    pub allocation_id: Option<String>,
    pub employee_id: String,
    pub current_role: Option<String>,
    pub role_id: String,
    pub reporting_person: String,
    pub allocated_date: Option<NaiveDate>,
}

impl AllocationDraft {
    pub fn is_editing(&self) -> bool {
        self.allocation_id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation_id: Option<String>,
    pub employee_id: EmployeeId,
    pub role_id: RoleCode,
    pub role_name: String,
    pub parent_role: String,
    pub reporting_role_id: String,
    pub reporting_person: String,
    pub allocated_date: NaiveDate,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AllocationError {
    #[error("employee id is required")]
    MissingEmployee,
    #[error("role id is required")]
    MissingRole,
    #[error(transparent)]
    UnknownRole(#[from] RoleNotFound),
    #[error("{message}")]
    TransitionRejected { message: String },
    #[error("a reporting person is required for role {role}")]
    MissingReportingPerson { role: RoleCode },
}

/// Checks an [`AllocationDraft`] and turns it into the payload stored for the allocation.
#[derive(Clone, Debug)]
pub struct AllocationPlanner {
    validator: TransitionValidator,
    resolver: ReportingResolver,
}

impl AllocationPlanner {
    pub fn new(catalog: Arc<HierarchyCatalog>, unknown_roles: UnknownRolePolicy) -> Self {
        Self {
            validator: TransitionValidator::new(catalog.clone())
                .with_unknown_role_policy(unknown_roles),
            resolver: ReportingResolver::new(catalog),
        }
    }

    pub fn prepare(
        &self,
        draft: &AllocationDraft,
        today: NaiveDate,
    ) -> Result<AllocationPayload, AllocationError> {
        let employee_id = draft.employee_id.trim();
        if employee_id.is_empty() {
            return Err(AllocationError::MissingEmployee);
        }
        let role = RoleCode::new(&draft.role_id).map_err(|_| AllocationError::MissingRole)?;
        let definition = self.validator.catalog().definition(role.as_str())?;
        let editing = draft.is_editing();

        // Edits of an existing allocation are saved even when the move would be rejected.
        if !editing {
            let request = TransitionRequest {
                current_role: RoleCode::parse_optional(draft.current_role.as_deref()),
                proposed_role: role.clone(),
                editing,
            };
            let result = self.validator.evaluate(&request);
            if !result.allowed {
                return Err(AllocationError::TransitionRejected {
                    message: result.message.unwrap_or_else(|| {
                        format!("Role {role} cannot be assigned to employee {employee_id}")
                    }),
                });
            }
        }

        let (parent_role, reporting_role_id, reporting_person) =
            match self.resolver.resolve_parent_role(role.as_str())? {
                ParentResolution::NoParent => {
                    (String::new(), String::new(), TOP_LEVEL_REPORTING_PERSON.to_owned())
                }
                ParentResolution::Parent(parent) => {
                    let reporting_person = draft.reporting_person.trim();
                    if reporting_person.is_empty() {
                        return Err(AllocationError::MissingReportingPerson { role });
                    }
                    (
                        parent.parent_description,
                        parent.parent_code.to_string(),
                        reporting_person.to_owned(),
                    )
                }
            };

        Ok(AllocationPayload {
            allocation_id: draft
                .allocation_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_owned),
            employee_id: EmployeeId(employee_id.to_owned()),
            role_name: definition.description.clone(),
            role_id: role,
            parent_role,
            reporting_role_id,
            reporting_person,
            allocated_date: draft.allocated_date.unwrap_or(today),
        })
    }

    pub fn prepare_with_audit<S>(
        &self,
        draft: &AllocationDraft,
        today: NaiveDate,
        sink: &S,
        audit: &AuditContext,
    ) -> Result<AllocationPayload, AllocationError>
    where
        S: AuditSink,
    {
        let prepared = self.prepare(draft, today);
        let action = if draft.is_editing() {
            AuditAction::AllocationUpdated
        } else {
            AuditAction::AllocationCreated
        };
        let role_change = RoleCode::new(&draft.role_id).ok().map(|proposed_role| RoleChange {
            current_role: RoleCode::parse_optional(draft.current_role.as_deref()),
            proposed_role,
            editing: draft.is_editing(),
        });

        let event = match &prepared {
            Ok(payload) => {
                info!(
                    event_name = "allocation.prepared",
                    correlation_id = %audit.correlation_id,
                    employee_id = %payload.employee_id.0,
                    role_id = %payload.role_id,
                    "role allocation ready to submit"
                );
                AuditEvent::new(audit, action, AuditOutcome::Success)
                    .with_role_change(role_change)
                    .with_reporting_person(payload.reporting_person.clone())
            }
            Err(error) => AuditEvent::new(audit, action, AuditOutcome::Rejected)
                .with_role_change(role_change)
                .with_detail(Some(error.to_string())),
        };
        sink.emit(event);

        prepared
    }
}
