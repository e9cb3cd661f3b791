use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::config::CatalogConfig;
use crate::hierarchy::catalog::{CatalogIntegrityError, HierarchyCatalog, RoleSpec};

#[derive(Debug, Error)]
pub enum CatalogSourceError {
    #[error("could not read role catalog `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse role catalog `{origin}`: {source}")]
    Parse { origin: String, source: toml::de::Error },
    #[error("role catalog `{origin}` failed integrity checks: {source}")]
    Integrity { origin: String, source: CatalogIntegrityError },
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    roles: Vec<RoleSpec>,
}

impl HierarchyCatalog {
    /// Parses a `[[roles]]` table document and builds a validated catalog from it.
    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogSourceError> {
        parse_document(raw, "inline")
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, CatalogSourceError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogSourceError::ReadFile { path: path.to_path_buf(), source })?;
        parse_document(&raw, &path.display().to_string())
    }
}

/// Builds the process-wide catalog: the configured file when present, else the standard table.
pub fn load_catalog(config: &CatalogConfig) -> Result<HierarchyCatalog, CatalogSourceError> {
    let (catalog, origin) = match &config.path {
        Some(path) => (HierarchyCatalog::from_toml_file(path)?, path.display().to_string()),
        None => (
            HierarchyCatalog::seeded().map_err(|source| CatalogSourceError::Integrity {
                origin: "standard".to_owned(),
                source,
            })?,
            "standard".to_owned(),
        ),
    };

    info!(
        event_name = "hierarchy.catalog.loaded",
        origin = %origin,
        role_count = catalog.len(),
        root_role = %catalog.root().code,
        "role hierarchy catalog loaded"
    );
    Ok(catalog)
}

fn parse_document(raw: &str, origin: &str) -> Result<HierarchyCatalog, CatalogSourceError> {
    let document = toml::from_str::<CatalogDocument>(raw)
        .map_err(|source| CatalogSourceError::Parse { origin: origin.to_owned(), source })?;
    HierarchyCatalog::from_specs(document.roles)
        .map_err(|source| CatalogSourceError::Integrity { origin: origin.to_owned(), source })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::{load_catalog, CatalogSourceError};
    use crate::config::CatalogConfig;
    use crate::domain::role::RoleType;
    use crate::hierarchy::catalog::{CatalogIntegrityError, HierarchyCatalog};

    const STUDIO: &str = r#"
[[roles]]
code = "head"
description = "Head of Studio"
role_type = "administration"

[[roles]]
code = "LEAD"
description = "Team Lead"
parent = "HEAD"

[[roles]]
code = "dev"
description = "Developer"
parent = "lead"
role_type = "technical"
"#;

    #[test]
    fn parses_role_tables() {
        let catalog = HierarchyCatalog::from_toml_str(STUDIO).expect("valid document");
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.level_of("DEV"), Ok(3));
        assert_eq!(catalog.get("head").and_then(|role| role.role_type), Some(RoleType::Administration));
        assert_eq!(catalog.get("lead").and_then(|role| role.role_type), None);
    }

    #[test]
    fn integrity_failures_surface_from_documents() {
        let error = HierarchyCatalog::from_toml_str(
            r#"
[[roles]]
code = "A"
description = "Role A"
parent = "GHOST"
"#,
        )
        .expect_err("dangling parent");
        assert!(matches!(
            error,
            CatalogSourceError::Integrity {
                source: CatalogIntegrityError::DanglingParent { .. },
                ..
            }
        ));

        let empty = HierarchyCatalog::from_toml_str("").expect_err("empty document");
        assert!(matches!(
            empty,
            CatalogSourceError::Integrity { source: CatalogIntegrityError::EmptyCatalog, .. }
        ));
    }

    #[test]
    fn malformed_documents_are_parse_errors() {
        let error = HierarchyCatalog::from_toml_str("[[roles]]\ncode = 7").expect_err("bad toml");
        assert!(matches!(error, CatalogSourceError::Parse { .. }));
    }

    #[test]
    fn load_catalog_prefers_configured_file() -> Result<(), String> {
        let dir = TempDir::new().map_err(|err| err.to_string())?;
        let path = dir.path().join("roles.toml");
        fs::write(&path, STUDIO).map_err(|err| err.to_string())?;

        let from_file = load_catalog(&CatalogConfig { path: Some(path) })
            .map_err(|err| format!("catalog load failed: {err}"))?;
        assert_eq!(from_file.root().code.as_str(), "HEAD");

        let standard = load_catalog(&CatalogConfig { path: None })
            .map_err(|err| format!("catalog load failed: {err}"))?;
        assert_eq!(standard.root().code.as_str(), "MD");
        Ok(())
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let error = load_catalog(&CatalogConfig { path: Some("does/not/exist.toml".into()) })
            .expect_err("missing file");
        assert!(matches!(error, CatalogSourceError::ReadFile { .. }));
    }
}
