use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::role::{normalize_code, RoleCode, RoleDefinition, RoleType};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("role `{code}` is not registered in the hierarchy catalog")]
pub struct RoleNotFound {
    pub code: String,
}

impl RoleNotFound {
    fn new(code: &str) -> Self {
        Self { code: normalize_code(code) }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogIntegrityError {
    #[error("hierarchy catalog must contain at least one role")]
    EmptyCatalog,
    #[error("role entry {index} has a blank role code")]
    BlankCode { index: usize },
    #[error("role `{code}` has a blank description")]
    BlankDescription { code: RoleCode },
    #[error("role code `{code}` is registered more than once")]
    DuplicateRole { code: RoleCode },
    #[error("role `{code}` reports to `{parent}` which is not registered")]
    DanglingParent { code: RoleCode, parent: RoleCode },
    #[error("role `{code}` does not reach the root role; its parent chain is cyclic")]
    Cycle { code: RoleCode },
    #[error("hierarchy catalog must have a single root role, found {roots:?}")]
    MultipleRoots { roots: Vec<RoleCode> },
}

/// Unvalidated role entry as written by a catalog author.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSpec {
    pub code: String,
    pub description: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub role_type: Option<RoleType>,
}

#[derive(Clone, Debug, Default)]
pub struct CatalogBuilder {
    specs: Vec<RoleSpec>,
}

impl CatalogBuilder {
    pub fn role(
        mut self,
        code: &str,
        description: &str,
        parent: Option<&str>,
        role_type: Option<RoleType>,
    ) -> Self {
        self.specs.push(RoleSpec {
            code: code.to_owned(),
            description: description.to_owned(),
            parent: parent.map(str::to_owned),
            role_type,
        });
        self
    }

    pub fn build(self) -> Result<HierarchyCatalog, CatalogIntegrityError> {
        HierarchyCatalog::from_specs(self.specs)
    }
}

/// Immutable registry of role codes, their descriptions and reporting parents.
///
/// Construction rejects duplicate codes, parents that are not registered, parent
/// cycles and forests with more than one root, so every lookup afterwards can rely
/// on a single acyclic tree. Levels are derived from the parent chain (root = 1).
#[derive(Clone, Debug)]
pub struct HierarchyCatalog {
    roles: Vec<RoleDefinition>,
    index: HashMap<String, usize>,
    root: usize,
}

struct PendingRole {
    code: RoleCode,
    description: String,
    parent: Option<RoleCode>,
    role_type: Option<RoleType>,
}

impl HierarchyCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn from_specs(specs: Vec<RoleSpec>) -> Result<Self, CatalogIntegrityError> {
        if specs.is_empty() {
            return Err(CatalogIntegrityError::EmptyCatalog);
        }

        let mut pending = Vec::with_capacity(specs.len());
        let mut index = HashMap::with_capacity(specs.len());
        for (position, spec) in specs.into_iter().enumerate() {
            let code = RoleCode::new(&spec.code)
                .map_err(|_| CatalogIntegrityError::BlankCode { index: position })?;
            let description = spec.description.trim().to_owned();
            if description.is_empty() {
                return Err(CatalogIntegrityError::BlankDescription { code });
            }
            if index.insert(code.as_str().to_owned(), position).is_some() {
                return Err(CatalogIntegrityError::DuplicateRole { code });
            }
            let parent = RoleCode::parse_optional(spec.parent.as_deref());
            pending.push(PendingRole { code, description, parent, role_type: spec.role_type });
        }

        for role in &pending {
            if let Some(parent) = &role.parent {
                if !index.contains_key(parent.as_str()) {
                    return Err(CatalogIntegrityError::DanglingParent {
                        code: role.code.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        let levels = derive_levels(&pending, &index)?;

        let roots: Vec<usize> = pending
            .iter()
            .enumerate()
            .filter(|(_, role)| role.parent.is_none())
            .map(|(position, _)| position)
            .collect();
        let root = match roots.as_slice() {
            [root] => *root,
            // Unreachable once levels are derived, a rootless table is cyclic.
            [] => return Err(CatalogIntegrityError::Cycle { code: pending[0].code.clone() }),
            _ => {
                return Err(CatalogIntegrityError::MultipleRoots {
                    roots: roots.iter().map(|position| pending[*position].code.clone()).collect(),
                })
            }
        };

        let roles: Vec<RoleDefinition> = pending
            .into_iter()
            .zip(levels)
            .map(|(role, level)| RoleDefinition {
                code: role.code,
                description: role.description,
                parent: role.parent,
                level,
                role_type: role.role_type,
            })
            .collect();

        debug!(
            event_name = "hierarchy.catalog.built",
            role_count = roles.len(),
            root_role = %roles[root].code,
            "hierarchy catalog built"
        );

        Ok(Self { roles, index, root })
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.position(code).is_some()
    }

    pub fn get(&self, code: &str) -> Option<&RoleDefinition> {
        self.position(code).map(|position| &self.roles[position])
    }

    pub fn definition(&self, code: &str) -> Result<&RoleDefinition, RoleNotFound> {
        self.get(code).ok_or_else(|| RoleNotFound::new(code))
    }

    pub fn describe(&self, code: &str) -> Result<&str, RoleNotFound> {
        self.definition(code).map(|role| role.description.as_str())
    }

    /// `Ok(None)` means `code` is the root role.
    pub fn parent_of(&self, code: &str) -> Result<Option<&RoleCode>, RoleNotFound> {
        self.definition(code).map(|role| role.parent.as_ref())
    }

    pub fn level_of(&self, code: &str) -> Result<u32, RoleNotFound> {
        self.definition(code).map(|role| role.level)
    }

    /// Role codes in registration order.
    pub fn all_codes(&self) -> Vec<&RoleCode> {
        self.roles.iter().map(|role| &role.code).collect()
    }

    pub fn roles(&self) -> &[RoleDefinition] {
        &self.roles
    }

    pub fn root(&self) -> &RoleDefinition {
        &self.roles[self.root]
    }

    pub fn children_of(&self, code: &str) -> Result<Vec<&RoleDefinition>, RoleNotFound> {
        let parent = &self.definition(code)?.code;
        Ok(self.roles.iter().filter(|role| role.parent.as_ref() == Some(parent)).collect())
    }

    /// The role itself followed by each ancestor, ending at the root.
    pub fn reporting_chain(&self, code: &str) -> Result<Vec<&RoleDefinition>, RoleNotFound> {
        let mut current = self.definition(code)?;
        let mut chain = vec![current];
        while let Some(parent) = current.parent.as_ref() {
            let Some(next) = self.get(parent.as_str()) else {
                break;
            };
            chain.push(next);
            current = next;
        }
        Ok(chain)
    }

    /// Case-insensitive substring match on code, description and parent code.
    pub fn search(&self, text: &str) -> Vec<&RoleDefinition> {
        let needle = text.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return self.roles.iter().collect();
        }

        self.roles
            .iter()
            .filter(|role| {
                role.code.as_str().to_ascii_lowercase().contains(&needle)
                    || role.description.to_ascii_lowercase().contains(&needle)
                    || role
                        .parent
                        .as_ref()
                        .map(|parent| parent.as_str().to_ascii_lowercase().contains(&needle))
                        .unwrap_or(false)
            })
            .collect()
    }

    fn position(&self, code: &str) -> Option<usize> {
        self.index.get(&normalize_code(code)).copied()
    }
}

fn derive_levels(
    pending: &[PendingRole],
    index: &HashMap<String, usize>,
) -> Result<Vec<u32>, CatalogIntegrityError> {
    let limit = pending.len();
    let mut levels = Vec::with_capacity(limit);

    for role in pending {
        let mut hops = 0usize;
        let mut cursor = role.parent.as_ref();
        while let Some(parent) = cursor {
            hops += 1;
            if hops > limit {
                return Err(CatalogIntegrityError::Cycle { code: role.code.clone() });
            }
            cursor = index
                .get(parent.as_str())
                .and_then(|position| pending[*position].parent.as_ref());
        }
        levels.push(hops as u32 + 1);
    }

    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::{CatalogIntegrityError, HierarchyCatalog, RoleNotFound};
    use crate::domain::role::RoleCode;

    fn code(raw: &str) -> RoleCode {
        RoleCode::new(raw).expect("valid role code")
    }

    fn small_catalog() -> HierarchyCatalog {
        HierarchyCatalog::builder()
            .role("HEAD", "Head of Studio", None, None)
            .role("LEAD", "Team Lead", Some("head"), None)
            .role("DEV", "Developer", Some("LEAD"), None)
            .role("QA", "Quality Analyst", Some("LEAD"), None)
            .build()
            .expect("valid catalog")
    }

    #[test]
    fn derives_levels_from_parent_chain() {
        let catalog = small_catalog();
        assert_eq!(catalog.level_of("HEAD"), Ok(1));
        assert_eq!(catalog.level_of("lead"), Ok(2));
        assert_eq!(catalog.level_of("dev"), Ok(3));
        assert_eq!(catalog.root().code, code("HEAD"));
    }

    #[test]
    fn lookups_are_case_insensitive_and_report_unknown_codes() {
        let catalog = small_catalog();
        assert_eq!(catalog.describe(" qa "), Ok("Quality Analyst"));
        assert_eq!(catalog.parent_of("dev"), Ok(Some(&code("LEAD"))));
        assert_eq!(catalog.parent_of("HEAD"), Ok(None));
        assert_eq!(catalog.describe("ops"), Err(RoleNotFound { code: "OPS".to_owned() }));
        assert!(catalog.level_of("ops").is_err());
    }

    #[test]
    fn all_codes_preserve_registration_order() {
        let catalog = small_catalog();
        let codes: Vec<&str> = catalog.all_codes().into_iter().map(RoleCode::as_str).collect();
        assert_eq!(codes, vec!["HEAD", "LEAD", "DEV", "QA"]);
    }

    #[test]
    fn rejects_cycles() {
        let error = HierarchyCatalog::builder()
            .role("ROOT", "Root", None, None)
            .role("A", "Role A", Some("B"), None)
            .role("B", "Role B", Some("A"), None)
            .build()
            .expect_err("cycle must be rejected");
        assert_eq!(error, CatalogIntegrityError::Cycle { code: code("A") });
    }

    #[test]
    fn rejects_self_parent_as_cycle() {
        let error = HierarchyCatalog::builder()
            .role("ROOT", "Root", None, None)
            .role("LOOP", "Loop", Some("loop"), None)
            .build()
            .expect_err("self parent must be rejected");
        assert!(matches!(error, CatalogIntegrityError::Cycle { .. }));
    }

    #[test]
    fn rejects_dangling_parents() {
        let error = HierarchyCatalog::builder()
            .role("ROOT", "Root", None, None)
            .role("DEV", "Developer", Some("LEAD"), None)
            .build()
            .expect_err("dangling parent must be rejected");
        assert_eq!(
            error,
            CatalogIntegrityError::DanglingParent { code: code("DEV"), parent: code("LEAD") }
        );
    }

    #[test]
    fn rejects_duplicates_blank_entries_and_multiple_roots() {
        let duplicate = HierarchyCatalog::builder()
            .role("ROOT", "Root", None, None)
            .role("root", "Root again", None, None)
            .build()
            .expect_err("duplicate");
        assert_eq!(duplicate, CatalogIntegrityError::DuplicateRole { code: code("ROOT") });

        let blank = HierarchyCatalog::builder()
            .role("ROOT", "Root", None, None)
            .role("  ", "Nobody", Some("ROOT"), None)
            .build()
            .expect_err("blank code");
        assert_eq!(blank, CatalogIntegrityError::BlankCode { index: 1 });

        let roots = HierarchyCatalog::builder()
            .role("A", "Role A", None, None)
            .role("B", "Role B", Some(""), None)
            .build()
            .expect_err("two roots");
        assert_eq!(roots, CatalogIntegrityError::MultipleRoots { roots: vec![code("A"), code("B")] });

        assert_eq!(
            HierarchyCatalog::builder().build().expect_err("empty"),
            CatalogIntegrityError::EmptyCatalog
        );
    }

    #[test]
    fn reporting_chain_walks_up_to_root() {
        let catalog = small_catalog();
        let chain: Vec<&str> = catalog
            .reporting_chain("qa")
            .expect("known role")
            .into_iter()
            .map(|role| role.code.as_str())
            .collect();
        assert_eq!(chain, vec!["QA", "LEAD", "HEAD"]);
    }

    #[test]
    fn children_and_search() {
        let catalog = small_catalog();
        let children: Vec<&str> = catalog
            .children_of("LEAD")
            .expect("known role")
            .into_iter()
            .map(|role| role.code.as_str())
            .collect();
        assert_eq!(children, vec!["DEV", "QA"]);

        let found: Vec<&str> =
            catalog.search("lead").into_iter().map(|role| role.code.as_str()).collect();
        assert_eq!(found, vec!["LEAD", "DEV", "QA"]);
        assert_eq!(catalog.search("   ").len(), 4);
    }
}
