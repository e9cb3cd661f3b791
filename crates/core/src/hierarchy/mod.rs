pub mod catalog;
pub mod seed;
pub mod source;

pub use catalog::{CatalogBuilder, CatalogIntegrityError, HierarchyCatalog, RoleNotFound, RoleSpec};
pub use seed::{standard_role_specs, ROOT_ROLE};
pub use source::{load_catalog, CatalogSourceError};
