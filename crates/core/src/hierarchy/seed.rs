use crate::domain::role::RoleType;
use crate::hierarchy::catalog::{CatalogIntegrityError, HierarchyCatalog, RoleSpec};

/// Top of the standard organization; it reports to nobody.
pub const ROOT_ROLE: &str = "MD";

const STANDARD_ROLES: &[(&str, &str, Option<&str>, RoleType)] = &[
    ("MD", "Managing Director / Founder", None, RoleType::Administration),
    ("CF", "Co - Founder", Some("MD"), RoleType::Administration),
    ("CEO", "Chief Executive Officer", Some("MD"), RoleType::HumanResource),
    ("CTO", "Chief Technology Officer", Some("MD"), RoleType::Technical),
    ("COO", "Chief Operative Officer", Some("MD"), RoleType::Sales),
    ("CFO", "Chief Financial Officer", Some("MD"), RoleType::Finance),
    ("VP", "Vice President", Some("CEO"), RoleType::Technical),
    ("AVP", "Assistant Vice President", Some("VP"), RoleType::Technical),
    ("SSA", "Senior Solution Architect", Some("AVP"), RoleType::Technical),
    ("SA", "Solution Architect", Some("SSA"), RoleType::Technical),
    ("SSE", "Senior Software Engineer", Some("SA"), RoleType::Technical),
    ("SE", "Software Engineer", Some("SSE"), RoleType::Technical),
    ("TRN", "Trainee", Some("SSE"), RoleType::Technical),
    ("INTRN", "Internship Trainee", Some("SSE"), RoleType::Technical),
];

pub fn standard_role_specs() -> Vec<RoleSpec> {
    STANDARD_ROLES
        .iter()
        .map(|(code, description, parent, role_type)| RoleSpec {
            code: (*code).to_owned(),
            description: (*description).to_owned(),
            parent: parent.map(str::to_owned),
            role_type: Some(*role_type),
        })
        .collect()
}

impl HierarchyCatalog {
    /// The standard fourteen-role organization used when no catalog file is configured.
    pub fn seeded() -> Result<Self, CatalogIntegrityError> {
        Self::from_specs(standard_role_specs())
    }
}
