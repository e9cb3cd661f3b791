use roster_core::config::{AppConfig, LoadOptions};
use roster_core::hierarchy::{load_catalog, HierarchyCatalog};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            match load_catalog(&config.catalog) {
                Ok(catalog) => {
                    checks.push(DoctorCheck {
                        name: "catalog_integrity",
                        status: CheckStatus::Pass,
                        details: format!(
                            "{} role(s) rooted at {}",
                            catalog.len(),
                            catalog.root().code
                        ),
                    });
                    checks.push(check_reporting_chains(&catalog));
                }
                Err(error) => {
                    checks.push(DoctorCheck {
                        name: "catalog_integrity",
                        status: CheckStatus::Fail,
                        details: error.to_string(),
                    });
                    checks.push(skipped("reporting_chains", "catalog did not load"));
                }
            }
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(skipped("catalog_integrity", "configuration did not load"));
            checks.push(skipped("reporting_chains", "configuration did not load"));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

/// Every role must reach the root with levels increasing by one per hop.
fn check_reporting_chains(catalog: &HierarchyCatalog) -> DoctorCheck {
    let root = &catalog.root().code;
    let broken: Vec<String> = catalog
        .roles()
        .iter()
        .filter(|role| {
            let Ok(chain) = catalog.reporting_chain(role.code.as_str()) else {
                return true;
            };
            let ends_at_root = chain.last().is_some_and(|last| &last.code == root);
            let levels_step = chain.windows(2).all(|pair| pair[0].level == pair[1].level + 1);
            !(ends_at_root && levels_step)
        })
        .map(|role| role.code.to_string())
        .collect();

    if broken.is_empty() {
        DoctorCheck {
            name: "reporting_chains",
            status: CheckStatus::Pass,
            details: format!("every role reports up to {root}"),
        }
    } else {
        DoctorCheck {
            name: "reporting_chains",
            status: CheckStatus::Fail,
            details: format!("roles with broken chains: {}", broken.join(", ")),
        }
    }
}

fn skipped(name: &'static str, reason: &str) -> DoctorCheck {
    DoctorCheck { name, status: CheckStatus::Skipped, details: format!("skipped because {reason}") }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
