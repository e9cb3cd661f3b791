use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::employee::{EmployeeId, ReportingCandidate};
use crate::domain::role::RoleCode;
use crate::reporting::directory::{DirectoryError, EmployeeDirectory};
use crate::reporting::resolver::{
    select_candidate, CandidateSelection, ParentResolution, ParentRole, ReportingError,
    ReportingResolver, TOP_LEVEL_REPORTING_PERSON,
};

/// Identifies one candidate lookup. Only the lookup issued for the latest role entry
/// may advance the selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateTicket(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionPhase {
    Idle,
    RoleEntered,
    ParentResolved,
    CandidatesLoaded,
    PersonSelected,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    /// The entered code is not in the catalog.
    RoleEntered { role: RoleCode },
    ParentResolved { role: RoleCode, parent: ParentResolution, pending: Option<CandidateTicket> },
    CandidatesLoaded { role: RoleCode, parent: ParentRole, candidates: Vec<ReportingCandidate> },
    PersonSelected {
        role: RoleCode,
        parent: ParentRole,
        candidates: Vec<ReportingCandidate>,
        employee_id: EmployeeId,
        reporting_person: String,
    },
}

impl SelectionState {
    pub fn phase(&self) -> SelectionPhase {
        match self {
            Self::Idle => SelectionPhase::Idle,
            Self::RoleEntered { .. } => SelectionPhase::RoleEntered,
            Self::ParentResolved { .. } => SelectionPhase::ParentResolved,
            Self::CandidatesLoaded { .. } => SelectionPhase::CandidatesLoaded,
            Self::PersonSelected { .. } => SelectionPhase::PersonSelected,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionEvent {
    /// Blank input clears the selection.
    RoleCodeChanged(String),
    CandidatesReturned { ticket: CandidateTicket, candidates: Vec<ReportingCandidate> },
    CandidateChosen(EmployeeId),
}

impl SelectionEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::RoleCodeChanged(_) => "role_code_changed",
            Self::CandidatesReturned { .. } => "candidates_returned",
            Self::CandidateChosen(_) => "candidate_chosen",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionAction {
    ClearReportingFields,
    RejectUnknownRole(RoleCode),
    FetchCandidates { ticket: CandidateTicket, parent_code: RoleCode },
    SetReportingPerson(String),
    PromptForCandidate { candidates: usize },
    ReportNoCurrentHolder(RoleCode),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionOutcome {
    pub from: SelectionPhase,
    pub to: SelectionPhase,
    pub actions: Vec<SelectionAction>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("candidate result {received:?} is stale; latest lookup is {latest:?}")]
    StaleCandidates { received: CandidateTicket, latest: CandidateTicket },
    #[error("event `{event}` is not valid in phase {phase:?}")]
    InvalidTransition { phase: SelectionPhase, event: &'static str },
    #[error(transparent)]
    Reporting(#[from] ReportingError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Drives role entry, parent resolution and reporting-person choice for one form.
///
/// Every role change issues a new [`CandidateTicket`] and discards the parent,
/// candidates and reporting person derived from the previous role.
#[derive(Clone, Debug)]
pub struct RoleSelection {
    resolver: ReportingResolver,
    state: SelectionState,
    generation: u64,
}

impl RoleSelection {
    pub fn new(resolver: ReportingResolver) -> Self {
        Self { resolver, state: SelectionState::Idle, generation: 0 }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn phase(&self) -> SelectionPhase {
        self.state.phase()
    }

    pub fn role(&self) -> Option<&RoleCode> {
        match &self.state {
            SelectionState::Idle => None,
            SelectionState::RoleEntered { role }
            | SelectionState::ParentResolved { role, .. }
            | SelectionState::CandidatesLoaded { role, .. }
            | SelectionState::PersonSelected { role, .. } => Some(role),
        }
    }

    pub fn parent(&self) -> Option<&ParentRole> {
        match &self.state {
            SelectionState::ParentResolved { parent: ParentResolution::Parent(parent), .. }
            | SelectionState::CandidatesLoaded { parent, .. }
            | SelectionState::PersonSelected { parent, .. } => Some(parent),
            _ => None,
        }
    }

    pub fn reporting_person(&self) -> Option<&str> {
        match &self.state {
            SelectionState::ParentResolved { parent: ParentResolution::NoParent, .. } => {
                Some(TOP_LEVEL_REPORTING_PERSON)
            }
            SelectionState::PersonSelected { reporting_person, .. } => Some(reporting_person),
            _ => None,
        }
    }

    pub fn selected_employee(&self) -> Option<&EmployeeId> {
        match &self.state {
            SelectionState::PersonSelected { employee_id, .. } => Some(employee_id),
            _ => None,
        }
    }

    pub fn apply(&mut self, event: SelectionEvent) -> Result<SelectionOutcome, SelectionError> {
        let from = self.phase();
        let event_name = event.name();

        let (next, actions) = match event {
            SelectionEvent::RoleCodeChanged(raw) => self.role_changed(&raw),
            SelectionEvent::CandidatesReturned { ticket, candidates } => {
                self.candidates_returned(ticket, candidates)?
            }
            SelectionEvent::CandidateChosen(employee_id) => self.candidate_chosen(&employee_id)?,
        };

        self.state = next;
        let outcome = SelectionOutcome { from, to: self.phase(), actions };
        debug!(
            event_name = "reporting.selection.transition",
            selection_event = event_name,
            from = ?outcome.from,
            to = ?outcome.to,
            "role selection advanced"
        );
        Ok(outcome)
    }

    /// Enters a role code and, when it has a parent, loads the holders of that parent
    /// from `directory` in the same step.
    pub async fn enter_role_with<D>(
        &mut self,
        raw: &str,
        directory: &D,
    ) -> Result<SelectionOutcome, SelectionError>
    where
        D: EmployeeDirectory + ?Sized,
    {
        let entered = self.apply(SelectionEvent::RoleCodeChanged(raw.to_owned()))?;
        let Some((ticket, parent_code)) = entered.actions.iter().find_map(|action| match action {
            SelectionAction::FetchCandidates { ticket, parent_code } => {
                Some((*ticket, parent_code.clone()))
            }
            _ => None,
        }) else {
            return Ok(entered);
        };

        let candidates = directory.employees_with_role(&parent_code).await?;
        let loaded = self.apply(SelectionEvent::CandidatesReturned { ticket, candidates })?;

        let mut actions = entered.actions;
        actions.extend(loaded.actions);
        Ok(SelectionOutcome { from: entered.from, to: loaded.to, actions })
    }

    fn role_changed(&mut self, raw: &str) -> (SelectionState, Vec<SelectionAction>) {
        self.generation += 1;
        let mut actions = vec![SelectionAction::ClearReportingFields];

        let Ok(role) = RoleCode::new(raw) else {
            return (SelectionState::Idle, actions);
        };

        match self.resolver.resolve_parent_role(role.as_str()) {
            Err(_) => {
                actions.push(SelectionAction::RejectUnknownRole(role.clone()));
                (SelectionState::RoleEntered { role }, actions)
            }
            Ok(ParentResolution::NoParent) => {
                actions.push(SelectionAction::SetReportingPerson(
                    TOP_LEVEL_REPORTING_PERSON.to_owned(),
                ));
                (
                    SelectionState::ParentResolved {
                        role,
                        parent: ParentResolution::NoParent,
                        pending: None,
                    },
                    actions,
                )
            }
            Ok(ParentResolution::Parent(parent)) => {
                let ticket = CandidateTicket(self.generation);
                actions.push(SelectionAction::FetchCandidates {
                    ticket,
                    parent_code: parent.parent_code.clone(),
                });
                (
                    SelectionState::ParentResolved {
                        role,
                        parent: ParentResolution::Parent(parent),
                        pending: Some(ticket),
                    },
                    actions,
                )
            }
        }
    }

    fn candidates_returned(
        &self,
        ticket: CandidateTicket,
        candidates: Vec<ReportingCandidate>,
    ) -> Result<(SelectionState, Vec<SelectionAction>), SelectionError> {
        let latest = CandidateTicket(self.generation);
        if ticket != latest {
            debug!(
                event_name = "reporting.selection.stale_candidates",
                received = ticket.0,
                latest = latest.0,
                "discarding candidates for a superseded role entry"
            );
            return Err(SelectionError::StaleCandidates { received: ticket, latest });
        }

        let SelectionState::ParentResolved {
            role,
            parent: ParentResolution::Parent(parent),
            pending: Some(pending),
        } = &self.state
        else {
            return Err(self.invalid("candidates_returned"));
        };
        if *pending != ticket {
            return Err(self.invalid("candidates_returned"));
        }

        let candidates: Vec<ReportingCandidate> =
            candidates.into_iter().filter(ReportingCandidate::is_selectable).collect();
        let role = role.clone();
        let parent = parent.clone();

        Ok(match select_candidate(&candidates, None)? {
            CandidateSelection::NoCurrentHolder => {
                let actions = vec![SelectionAction::ReportNoCurrentHolder(parent.parent_code.clone())];
                (SelectionState::CandidatesLoaded { role, parent, candidates }, actions)
            }
            CandidateSelection::AwaitingChoice { candidates: count } => {
                let actions = vec![SelectionAction::PromptForCandidate { candidates: count }];
                (SelectionState::CandidatesLoaded { role, parent, candidates }, actions)
            }
            CandidateSelection::Selected { employee_id, reporting_person, .. } => {
                let actions = vec![SelectionAction::SetReportingPerson(reporting_person.clone())];
                (
                    SelectionState::PersonSelected {
                        role,
                        parent,
                        candidates,
                        employee_id,
                        reporting_person,
                    },
                    actions,
                )
            }
        })
    }

    fn candidate_chosen(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<(SelectionState, Vec<SelectionAction>), SelectionError> {
        let (role, parent, candidates) = match &self.state {
            SelectionState::CandidatesLoaded { role, parent, candidates }
            | SelectionState::PersonSelected { role, parent, candidates, .. } => {
                (role, parent, candidates)
            }
            _ => return Err(self.invalid("candidate_chosen")),
        };

        match select_candidate(candidates, Some(employee_id.0.as_str()))? {
            CandidateSelection::Selected { employee_id, reporting_person, .. } => Ok((
                SelectionState::PersonSelected {
                    role: role.clone(),
                    parent: parent.clone(),
                    candidates: candidates.clone(),
                    employee_id,
                    reporting_person: reporting_person.clone(),
                },
                vec![SelectionAction::SetReportingPerson(reporting_person)],
            )),
            CandidateSelection::NoCurrentHolder | CandidateSelection::AwaitingChoice { .. } => {
                Err(ReportingError::CandidateNotFound { employee_id: employee_id.0.trim().to_owned() }
                    .into())
            }
        }
    }

    fn invalid(&self, event: &'static str) -> SelectionError {
        SelectionError::InvalidTransition { phase: self.phase(), event }
    }
}
