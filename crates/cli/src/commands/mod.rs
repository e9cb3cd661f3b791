pub mod allocate;
pub mod config;
pub mod describe;
pub mod doctor;
pub mod reporting;
pub mod resolve;
pub mod roles;
pub mod validate;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use roster_core::config::{AppConfig, LoadOptions};
use roster_core::errors::{ApplicationError, InterfaceError};
use roster_core::hierarchy::{load_catalog, HierarchyCatalog};
use roster_core::ReportingCandidate;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>, data: impl Serialize) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: Some(to_value(data)),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn rejected(command: &str, message: impl Into<String>, data: impl Serialize) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "rejected".to_string(),
            error_class: Some("transition_rejected".to_string()),
            message: message.into(),
            data: Some(to_value(data)),
        };
        Self { exit_code: 1, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Failure mapped through the interface error: bad requests exit 4, the rest exit 3.
    pub fn application_failure(
        command: &str,
        error_class: &str,
        error: impl Into<ApplicationError>,
    ) -> Self {
        let interface = error.into().into_interface(format!("cli-{command}"));
        let exit_code = match interface {
            InterfaceError::BadRequest { .. } => 4,
            InterfaceError::ServiceUnavailable { .. } | InterfaceError::Internal { .. } => 3,
        };
        Self::failure(command, error_class, interface.message(), exit_code)
    }
}

/// Configuration and role catalog shared by the catalog-backed commands.
pub struct RosterRuntime {
    pub config: AppConfig,
    pub catalog: Arc<HierarchyCatalog>,
}

pub fn load_runtime(command: &str) -> Result<RosterRuntime, CommandResult> {
    let config = AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            2,
        )
    })?;

    let catalog = load_catalog(&config.catalog)
        .map_err(|error| CommandResult::application_failure(command, "catalog", error))?;

    Ok(RosterRuntime { config, catalog: Arc::new(catalog) })
}

/// Reads a JSON array of employee records; errors render with their full cause chain.
pub fn load_employee_file(path: &Path) -> Result<Vec<ReportingCandidate>, String> {
    read_employee_file(path).map_err(|error| format!("{error:#}"))
}

fn read_employee_file(path: &Path) -> anyhow::Result<Vec<ReportingCandidate>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read employee file `{}`", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("could not parse employee file `{}`", path.display()))
}

pub fn block_on<F>(command: &str, future: F) -> Result<F::Output, CommandResult>
where
    F: std::future::Future,
{
    let runtime =
        tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
            CommandResult::failure(
                command,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            )
        })?;
    Ok(runtime.block_on(future))
}

fn to_value(data: impl Serialize) -> Value {
    serde_json::to_value(data).unwrap_or_else(|error| Value::String(error.to_string()))
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\",\"data\":null}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
