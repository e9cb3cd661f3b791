use thiserror::Error;

use crate::allocation::AllocationError;
use crate::config::ConfigError;
use crate::hierarchy::{CatalogIntegrityError, CatalogSourceError, RoleNotFound};
use crate::reporting::{DirectoryError, SelectionError};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    RoleNotFound(#[from] RoleNotFound),
    #[error(transparent)]
    CatalogIntegrity(#[from] CatalogIntegrityError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error("employee `{employee_id}` is not in the employee directory")]
    UnknownEmployee { employee_id: String },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("catalog failure: {0}")]
    Catalog(String),
    #[error("employee directory failure: {0}")]
    Directory(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl From<ConfigError> for ApplicationError {
    fn from(value: ConfigError) -> Self {
        Self::Configuration(value.to_string())
    }
}

impl From<CatalogSourceError> for ApplicationError {
    fn from(value: CatalogSourceError) -> Self {
        match value {
            CatalogSourceError::Integrity { source, .. } => {
                Self::Domain(DomainError::CatalogIntegrity(source))
            }
            other => Self::Catalog(other.to_string()),
        }
    }
}

impl From<DirectoryError> for ApplicationError {
    fn from(value: DirectoryError) -> Self {
        match value {
            DirectoryError::UnknownEmployee { employee_id } => {
                Self::Domain(DomainError::UnknownEmployee { employee_id })
            }
            DirectoryError::Unavailable(message) => Self::Directory(message),
        }
    }
}

impl From<SelectionError> for ApplicationError {
    fn from(value: SelectionError) -> Self {
        match value {
            SelectionError::Directory(error) => Self::from(error),
            other => Self::Domain(DomainError::Selection(other)),
        }
    }
}

impl From<AllocationError> for ApplicationError {
    fn from(value: AllocationError) -> Self {
        Self::Domain(DomainError::Allocation(value))
    }
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::ServiceUnavailable { .. } => {
                "The service is temporarily unavailable. Please retry shortly."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. }
            | Self::ServiceUnavailable { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            // A broken catalog makes every later decision unreliable.
            ApplicationError::Domain(DomainError::CatalogIntegrity(error)) => {
                Self::Internal { message: error.to_string(), correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::Domain(error) => Self::BadRequest {
                message: error.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::Catalog(message) | ApplicationError::Directory(message) => {
                Self::ServiceUnavailable { message, correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::Configuration(message) => {
                Self::Internal { message, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}
