use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::audit::{AuditAction, AuditContext, AuditEvent, AuditOutcome, AuditSink, RoleChange};
use crate::config::UnknownRolePolicy;
use crate::domain::role::{BlankRoleCode, RoleCode};
use crate::hierarchy::HierarchyCatalog;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub current_role: Option<RoleCode>,
    pub proposed_role: RoleCode,
    pub editing: bool,
}

impl TransitionRequest {
    /// A blank current role reads as "no role yet"; the proposed role must be present.
    pub fn parse(
        current_role: Option<&str>,
        proposed_role: &str,
        editing: bool,
    ) -> Result<Self, BlankRoleCode> {
        Ok(Self {
            current_role: RoleCode::parse_optional(current_role),
            proposed_role: RoleCode::new(proposed_role)?,
            editing,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionReason {
    Unassigned,
    UnchangedOnEdit,
    DuplicateRole,
    UnrecognizedRole,
    DirectPromotion,
    SameOrLowerLevel,
    HierarchyViolation,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionResult {
    pub allowed: bool,
    pub reason: TransitionReason,
    pub message: Option<String>,
}

impl TransitionResult {
    fn allow(reason: TransitionReason) -> Self {
        Self { allowed: true, reason, message: None }
    }

    fn deny(reason: TransitionReason, message: String) -> Self {
        Self { allowed: false, reason, message: Some(message) }
    }
}

/// Decides whether an employee may move from their current role to a proposed one.
///
/// Rules apply in order and the first match wins:
///
/// 1. an employee without a role may receive any role;
/// 2. re-saving the same role while editing is a no-op;
/// 3. assigning the role an employee already holds is a duplicate;
/// 4. codes missing from the catalog cannot be checked and follow [`UnknownRolePolicy`];
/// 5. moving between a role and its direct parent or direct child is always legal;
/// 6. a proposed role at the same or a deeper level is legal;
/// 7. anything else is a hierarchy violation.
#[derive(Clone, Debug)]
pub struct TransitionValidator {
    catalog: Arc<HierarchyCatalog>,
    unknown_roles: UnknownRolePolicy,
}

impl TransitionValidator {
    pub fn new(catalog: Arc<HierarchyCatalog>) -> Self {
        Self { catalog, unknown_roles: UnknownRolePolicy::default() }
    }

    pub fn with_unknown_role_policy(mut self, policy: UnknownRolePolicy) -> Self {
        self.unknown_roles = policy;
        self
    }

    pub fn catalog(&self) -> &HierarchyCatalog {
        &self.catalog
    }

    pub fn evaluate(&self, request: &TransitionRequest) -> TransitionResult {
        self.validate(request.current_role.as_ref(), &request.proposed_role, request.editing)
    }

    pub fn validate(
        &self,
        current_role: Option<&RoleCode>,
        proposed_role: &RoleCode,
        editing: bool,
    ) -> TransitionResult {
        let Some(current_role) = current_role else {
            return TransitionResult::allow(TransitionReason::Unassigned);
        };

        if current_role == proposed_role {
            if editing {
                return TransitionResult::allow(TransitionReason::UnchangedOnEdit);
            }
            return TransitionResult::deny(
                TransitionReason::DuplicateRole,
                format!("Employee already has the role {proposed_role}"),
            );
        }

        let (Some(current), Some(proposed)) =
            (self.catalog.get(current_role.as_str()), self.catalog.get(proposed_role.as_str()))
        else {
            return self.unrecognized(current_role, proposed_role);
        };

        if proposed.parent.as_ref() == Some(current_role)
            || current.parent.as_ref() == Some(proposed_role)
        {
            return TransitionResult::allow(TransitionReason::DirectPromotion);
        }

        // Larger level numbers sit lower in the organization.
        if proposed.level >= current.level {
            return TransitionResult::allow(TransitionReason::SameOrLowerLevel);
        }

        TransitionResult::deny(
            TransitionReason::HierarchyViolation,
            format!(
                "Cannot assign {} ({}) to an employee who currently has {} ({}). The new role has a higher hierarchical level.",
                proposed.code, proposed.description, current.code, current.description
            ),
        )
    }

    pub fn validate_with_audit<S>(
        &self,
        request: &TransitionRequest,
        sink: &S,
        audit: &AuditContext,
    ) -> TransitionResult
    where
        S: AuditSink,
    {
        let result = self.evaluate(request);
        let (action, outcome) = if result.allowed {
            (AuditAction::TransitionAllowed, AuditOutcome::Success)
        } else {
            (AuditAction::TransitionRejected, AuditOutcome::Rejected)
        };
        let role_change = RoleChange {
            current_role: request.current_role.clone(),
            proposed_role: request.proposed_role.clone(),
            editing: request.editing,
        };

        let event = AuditEvent::new(audit, action, outcome)
            .with_role_change(Some(role_change))
            .with_reason(result.reason)
            .with_detail(result.message.clone());
        sink.emit(event);

        result
    }

    fn unrecognized(&self, current_role: &RoleCode, proposed_role: &RoleCode) -> TransitionResult {
        let missing =
            if self.catalog.contains(current_role.as_str()) { proposed_role } else { current_role };

        match self.unknown_roles {
            UnknownRolePolicy::Permit => {
                warn!(
                    event_name = "transition.unknown_role_bypassed",
                    current_role = %current_role,
                    proposed_role = %proposed_role,
                    unknown_role = %missing,
                    "role is not in the hierarchy catalog; transition allowed without hierarchy checks"
                );
                TransitionResult::allow(TransitionReason::UnrecognizedRole)
            }
            UnknownRolePolicy::Reject => TransitionResult::deny(
                TransitionReason::UnrecognizedRole,
                format!("Role {missing} is not registered, so the transition from {current_role} to {proposed_role} cannot be validated."),
            ),
        }
    }
}
