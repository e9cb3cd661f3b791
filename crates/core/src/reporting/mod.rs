pub mod directory;
pub mod resolver;
pub mod selection;

pub use directory::{current_role_state, DirectoryError, EmployeeDirectory, InMemoryEmployeeDirectory};
pub use resolver::{
    select_candidate, CandidateSelection, ParentResolution, ParentRole, ReportingError,
    ReportingResolver, TOP_LEVEL_REPORTING_PERSON,
};
pub use selection::{
    CandidateTicket, RoleSelection, SelectionAction, SelectionError, SelectionEvent,
    SelectionOutcome, SelectionPhase, SelectionState,
};
