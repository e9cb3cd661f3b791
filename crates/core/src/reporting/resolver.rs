use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::employee::{EmployeeId, ReportingCandidate};
use crate::domain::role::RoleCode;
use crate::hierarchy::{HierarchyCatalog, RoleNotFound};

/// Reporting person recorded for a role that reports to nobody.
pub const TOP_LEVEL_REPORTING_PERSON: &str = "N/A — Top Level Position";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRole {
    pub parent_code: RoleCode,
    pub parent_description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParentResolution {
    NoParent,
    Parent(ParentRole),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateSelection {
    /// Nobody currently holds the reporting role.
    NoCurrentHolder,
    AwaitingChoice { candidates: usize },
    Selected { employee_id: EmployeeId, reporting_person: String, automatic: bool },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ReportingError {
    #[error("employee `{employee_id}` does not currently hold the reporting role")]
    CandidateNotFound { employee_id: String },
}

#[derive(Clone, Debug)]
pub struct ReportingResolver {
    catalog: Arc<HierarchyCatalog>,
}

impl ReportingResolver {
    pub fn new(catalog: Arc<HierarchyCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &HierarchyCatalog {
        &self.catalog
    }

    pub fn resolve_parent_role(&self, code: &str) -> Result<ParentResolution, RoleNotFound> {
        let Some(parent_code) = self.catalog.parent_of(code)? else {
            return Ok(ParentResolution::NoParent);
        };
        let parent_description = self.catalog.describe(parent_code.as_str())?.to_owned();

        Ok(ParentResolution::Parent(ParentRole {
            parent_code: parent_code.clone(),
            parent_description,
        }))
    }

    pub fn select_reporting_candidate(
        &self,
        candidates: &[ReportingCandidate],
        chosen_employee_id: Option<&str>,
    ) -> Result<CandidateSelection, ReportingError> {
        select_candidate(candidates, chosen_employee_id)
    }
}

/// Picks the reporting person among the current holders of the parent role.
///
/// Records without a role id or a name are ignored. A single remaining holder is
/// selected without a choice; with several, only an explicit choice selects one.
pub fn select_candidate(
    candidates: &[ReportingCandidate],
    chosen_employee_id: Option<&str>,
) -> Result<CandidateSelection, ReportingError> {
    let selectable: Vec<&ReportingCandidate> =
        candidates.iter().filter(|candidate| candidate.is_selectable()).collect();

    if selectable.is_empty() {
        return Ok(CandidateSelection::NoCurrentHolder);
    }

    let chosen = match chosen_employee_id {
        Some(employee_id) => selectable
            .iter()
            .find(|candidate| candidate.employee_id.matches(employee_id))
            .copied()
            .ok_or_else(|| ReportingError::CandidateNotFound {
                employee_id: employee_id.trim().to_owned(),
            })?,
        None if selectable.len() == 1 => selectable[0],
        None => return Ok(CandidateSelection::AwaitingChoice { candidates: selectable.len() }),
    };

    Ok(CandidateSelection::Selected {
        employee_id: chosen.employee_id.clone(),
        reporting_person: chosen.reporting_person_label(),
        automatic: chosen_employee_id.is_none(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{
        select_candidate, CandidateSelection, ParentResolution, ReportingError, ReportingResolver,
    };
    use crate::domain::employee::{EmployeeId, ReportingCandidate};
    use crate::hierarchy::{HierarchyCatalog, RoleNotFound};

    fn resolver() -> ReportingResolver {
        ReportingResolver::new(Arc::new(
            HierarchyCatalog::seeded().expect("standard catalog is well formed"),
        ))
    }

    fn holder(id: &str, name: &str) -> ReportingCandidate {
        ReportingCandidate {
            employee_id: EmployeeId(id.to_owned()),
            name: name.to_owned(),
            role_id: "SSE".to_owned(),
            role_name: "Senior Software Engineer".to_owned(),
            reporting_person: "EMP010, Asha Rao, Solution Architect".to_owned(),
        }
    }

    #[test]
    fn root_role_has_no_parent() {
        assert_eq!(resolver().resolve_parent_role("md"), Ok(ParentResolution::NoParent));
    }

    #[test]
    fn resolves_immediate_parent_with_description() {
        let resolution = resolver().resolve_parent_role("SE").expect("known role");
        let ParentResolution::Parent(parent) = resolution else {
            panic!("SE should report to a parent role");
        };
        assert_eq!(parent.parent_code.as_str(), "SSE");
        assert_eq!(parent.parent_description, "Senior Software Engineer");
    }

    #[test]
    fn unknown_roles_are_not_found() {
        assert_eq!(
            resolver().resolve_parent_role("ghost"),
            Err(RoleNotFound { code: "GHOST".to_owned() })
        );
    }

    #[test]
    fn single_candidate_is_selected_automatically() {
        let selection = resolver()
            .select_reporting_candidate(&[holder("EMP021", "Lena Park")], None)
            .expect("selection");
        assert_eq!(
            selection,
            CandidateSelection::Selected {
                employee_id: EmployeeId("EMP021".to_owned()),
                reporting_person: "EMP021, Lena Park, Senior Software Engineer".to_owned(),
                automatic: true,
            }
        );
    }

    #[test]
    fn chosen_candidate_wins_over_list_order() {
        let candidates = [holder("EMP021", "Lena Park"), holder("EMP034", "Omar Haddad")];

        let waiting = select_candidate(&candidates, None).expect("selection");
        assert_eq!(waiting, CandidateSelection::AwaitingChoice { candidates: 2 });

        let selection = select_candidate(&candidates, Some(" EMP034 ")).expect("selection");
        let CandidateSelection::Selected { employee_id, reporting_person, automatic } = selection
        else {
            panic!("explicit choice should select a candidate");
        };
        assert_eq!(employee_id, EmployeeId("EMP034".to_owned()));
        assert_eq!(reporting_person, "EMP034, Omar Haddad, Senior Software Engineer");
        assert!(!automatic);
    }

    #[test]
    fn unknown_choice_is_an_error() {
        let candidates = [holder("EMP021", "Lena Park"), holder("EMP034", "Omar Haddad")];
        assert_eq!(
            select_candidate(&candidates, Some("EMP999")),
            Err(ReportingError::CandidateNotFound { employee_id: "EMP999".to_owned() })
        );
    }

    #[test]
    fn empty_or_incomplete_candidates_mean_no_current_holder() {
        assert_eq!(select_candidate(&[], None), Ok(CandidateSelection::NoCurrentHolder));

        let mut nameless = holder("EMP050", "");
        nameless.name = "  ".to_owned();
        let mut roleless = holder("EMP051", "Ida");
        roleless.role_id.clear();
        assert_eq!(
            select_candidate(&[nameless, roleless.clone()], None),
            Ok(CandidateSelection::NoCurrentHolder)
        );

        let selection =
            select_candidate(&[roleless, holder("EMP052", "Noor")], None).expect("selection");
        assert!(matches!(selection, CandidateSelection::Selected { automatic: true, .. }));
    }
}
