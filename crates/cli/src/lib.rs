pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use roster_core::config::{AppConfig, LoadOptions, LogFormat};

use crate::commands::allocate::AllocateArgs;
use crate::commands::validate::ValidateArgs;

#[derive(Debug, Parser)]
#[command(
    name = "roster",
    about = "Role hierarchy and reporting line CLI",
    long_about = "Inspect the role hierarchy, check role transitions, and resolve reporting lines.",
    after_help = "Examples:\n  roster validate --current SSE --proposed SA\n  roster resolve SE\n  roster reporting --role SE --employees employees.json\n  roster doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List catalog roles with level, parent and department")]
    Roles {
        #[arg(long, help = "Case-insensitive match on code, description or parent")]
        search: Option<String>,
    },
    #[command(about = "Show a role with its reporting chain and direct reports")]
    Describe { code: String },
    #[command(about = "Check whether an employee may move to a proposed role")]
    Validate {
        #[arg(long)]
        proposed: String,
        #[arg(long)]
        current: Option<String>,
        #[arg(long, help = "Treat the request as an edit of an existing allocation")]
        editing: bool,
        #[arg(long, requires = "employees", help = "Look up the current role of this employee")]
        employee: Option<String>,
        #[arg(long, help = "JSON employee directory file")]
        employees: Option<PathBuf>,
    },
    #[command(about = "Resolve the parent role a role reports to")]
    Resolve { code: String },
    #[command(about = "Run reporting-person selection for a role against an employee file")]
    Reporting {
        #[arg(long)]
        role: String,
        #[arg(long, help = "JSON employee directory file")]
        employees: PathBuf,
        #[arg(long, help = "Employee id to pick when several people hold the parent role")]
        choose: Option<String>,
    },
    #[command(about = "Prepare a role allocation payload")]
    Allocate {
        #[arg(long)]
        employee: String,
        #[arg(long)]
        role: String,
        #[arg(long)]
        current: Option<String>,
        #[arg(long)]
        reporting_person: Option<String>,
        #[arg(long, help = "Existing allocation to update; skips transition gating")]
        allocation_id: Option<String>,
        #[arg(long, help = "Allocation date as YYYY-MM-DD (defaults to today)")]
        date: Option<NaiveDate>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate configuration and role catalog integrity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Roles { search } => commands::roles::run(search.as_deref()),
        Command::Describe { code } => commands::describe::run(&code),
        Command::Validate { proposed, current, editing, employee, employees } => {
            commands::validate::run(ValidateArgs { proposed, current, editing, employee, employees })
        }
        Command::Resolve { code } => commands::resolve::run(&code),
        Command::Reporting { role, employees, choose } => {
            commands::reporting::run(&role, &employees, choose.as_deref())
        }
        Command::Allocate { employee, role, current, reporting_person, allocation_id, date } => {
            commands::allocate::run(AllocateArgs {
                employee,
                role,
                current,
                reporting_person,
                allocation_id,
                date,
            })
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout stays a single JSON document.
fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
