//! `validate` command implementation.

use std::collections::HashSet;

use anyhow::{Context, Result};
use contracts::{RouteClass, RouterBlueprint};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    name: String,
    sink_count: usize,
    standard_routes: usize,
    error_routes: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

impl ValidationResult {
    fn invalid(config_path: String, error: String) -> Self {
        Self {
            valid: false,
            config_path,
            error: Some(error),
            warnings: None,
            summary: None,
        }
    }

    fn valid(config_path: String, blueprint: &RouterBlueprint) -> Self {
        let warnings = collect_warnings(blueprint);
        Self {
            valid: true,
            config_path,
            error: None,
            warnings: (!warnings.is_empty()).then_some(warnings),
            summary: Some(ConfigSummary {
                version: format!("{:?}", blueprint.version),
                name: blueprint.name.clone(),
                sink_count: blueprint.sinks.len(),
                standard_routes: blueprint.routes.standard.len(),
                error_routes: blueprint.routes.error.len(),
            }),
        }
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        let error = format!("File not found: {config_path}");
        return ValidationResult::invalid(config_path, error);
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => ValidationResult::valid(config_path, &blueprint),
        Err(e) => ValidationResult::invalid(config_path, e.to_string()),
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &RouterBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    for class in [RouteClass::Standard, RouteClass::Error] {
        let names = blueprint.routes.for_class(class);
        if names.is_empty() {
            warnings.push(format!(
                "No {class} sinks routed - {class} records will be dropped"
            ));
        }

        let mut seen = HashSet::new();
        for name in names {
            if !seen.insert(name.as_str()) {
                warnings.push(format!(
                    "Sink '{name}' is listed more than once in routes.{class} - it will receive each record repeatedly"
                ));
            }
        }
    }

    for name in blueprint.unrouted_sinks() {
        warnings.push(format!("Sink '{name}' is defined but not routed"));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if !result.valid {
        println!("✗ {} is invalid", result.config_path);
        if let Some(ref error) = result.error {
            println!("    {error}");
        }
        return;
    }

    println!("✓ {} is valid", result.config_path);
    if let Some(ref summary) = result.summary {
        println!(
            "    router '{}' ({}), {} sink(s), routes: {} standard / {} error",
            summary.name,
            summary.version,
            summary.sink_count,
            summary.standard_routes,
            summary.error_routes
        );
    }
    for warning in result.warnings.iter().flatten() {
        println!("  ⚠ {warning}");
    }
}
