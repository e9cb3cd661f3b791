use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::employee::EmployeeId;
use crate::domain::role::RoleCode;
use crate::transition::TransitionReason;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    #[serde(rename = "transition.allowed")]
    TransitionAllowed,
    #[serde(rename = "transition.rejected")]
    TransitionRejected,
    #[serde(rename = "allocation.created")]
    AllocationCreated,
    #[serde(rename = "allocation.updated")]
    AllocationUpdated,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TransitionAllowed => "transition.allowed",
            Self::TransitionRejected => "transition.rejected",
            Self::AllocationCreated => "allocation.created",
            Self::AllocationUpdated => "allocation.updated",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditOutcome {
    Success,
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditContext {
    pub employee_id: Option<EmployeeId>,
    pub correlation_id: String,
    pub actor: String,
}

impl AuditContext {
    pub fn new(
        employee_id: Option<EmployeeId>,
        correlation_id: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self { employee_id, correlation_id: correlation_id.into(), actor: actor.into() }
    }
}

/// The role move a decision was made about; `current_role` is `None` when unassigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleChange {
    pub current_role: Option<RoleCode>,
    pub proposed_role: RoleCode,
    pub editing: bool,
}

/// One recorded transition or allocation decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_id: Uuid,
    pub employee_id: Option<EmployeeId>,
    pub correlation_id: String,
    pub actor: String,
    pub action: AuditAction,
    pub outcome: AuditOutcome,
    pub role_change: Option<RoleChange>,
    pub reason: Option<TransitionReason>,
    pub reporting_person: Option<String>,
    /// Rejection message shown to the operator.
    pub detail: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(context: &AuditContext, action: AuditAction, outcome: AuditOutcome) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            employee_id: context.employee_id.clone(),
            correlation_id: context.correlation_id.clone(),
            actor: context.actor.clone(),
            action,
            outcome,
            role_change: None,
            reason: None,
            reporting_person: None,
            detail: None,
            occurred_at: Utc::now(),
        }
    }

    pub fn with_role_change(mut self, role_change: Option<RoleChange>) -> Self {
        self.role_change = role_change;
        self
    }

    pub fn with_reason(mut self, reason: TransitionReason) -> Self {
        self.reason = Some(reason);
        self
    }

    pub fn with_reporting_person(mut self, reporting_person: impl Into<String>) -> Self {
        self.reporting_person = Some(reporting_person.into());
        self
    }

    pub fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }
}

pub trait AuditSink: Send + Sync {
    fn emit(&self, event: AuditEvent);
}

#[derive(Clone, Default)]
pub struct InMemoryAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl InMemoryAuditSink {
    pub fn events(&self) -> Vec<AuditEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AuditSink for InMemoryAuditSink {
    fn emit(&self, event: AuditEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        audit::{
            AuditAction, AuditContext, AuditEvent, AuditOutcome, AuditSink, InMemoryAuditSink,
            RoleChange,
        },
        domain::{employee::EmployeeId, role::RoleCode},
        transition::TransitionReason,
    };

    #[test]
    fn in_memory_sink_records_role_changes_with_correlation_fields() {
        let sink = InMemoryAuditSink::default();
        let context =
            AuditContext::new(Some(EmployeeId("EMP014".to_owned())), "req-77", "role-allocation");
        let change = RoleChange {
            current_role: Some(RoleCode::new("sse").expect("valid code")),
            proposed_role: RoleCode::new("sa").expect("valid code"),
            editing: false,
        };
        sink.emit(
            AuditEvent::new(&context, AuditAction::TransitionAllowed, AuditOutcome::Success)
                .with_role_change(Some(change))
                .with_reason(TransitionReason::DirectPromotion),
        );

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].correlation_id, "req-77");
        assert_eq!(events[0].actor, "role-allocation");
        assert_eq!(events[0].employee_id.as_ref().map(|id| id.0.as_str()), Some("EMP014"));
        let recorded = events[0].role_change.as_ref().expect("role change recorded");
        assert_eq!(recorded.proposed_role.as_str(), "SA");
        assert_eq!(recorded.current_role.as_ref().map(RoleCode::as_str), Some("SSE"));
        assert_eq!(events[0].reason, Some(TransitionReason::DirectPromotion));
    }

    #[test]
    fn actions_serialize_as_dotted_event_names() {
        let json = serde_json::to_value(AuditAction::AllocationUpdated).expect("serializable");
        assert_eq!(json, "allocation.updated");
        assert_eq!(AuditAction::TransitionRejected.to_string(), "transition.rejected");
    }
}
