pub mod allocation;
pub mod audit;
pub mod config;
pub mod domain;
pub mod errors;
pub mod hierarchy;
pub mod reporting;
pub mod transition;

pub use allocation::{AllocationDraft, AllocationError, AllocationPayload, AllocationPlanner};
pub use domain::employee::{EmployeeId, EmployeeRoleState, ReportingCandidate};
pub use domain::role::{RoleCode, RoleDefinition, RoleType};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use hierarchy::{
    load_catalog, CatalogIntegrityError, CatalogSourceError, HierarchyCatalog, RoleNotFound,
};
pub use reporting::{
    EmployeeDirectory, InMemoryEmployeeDirectory, ParentResolution, ReportingResolver,
    RoleSelection, SelectionError, TOP_LEVEL_REPORTING_PERSON,
};
pub use transition::{TransitionReason, TransitionRequest, TransitionResult, TransitionValidator};
