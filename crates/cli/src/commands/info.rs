//! `info` command implementation.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use anyhow::{Context, Result};
use contracts::{RouteClass, RouterBlueprint};
use serde::Serialize;
use tracing::info;

use super::load_config;
use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    attrs: IndexMap<String, String>,
    sinks: Vec<SinkInfo>,
    routes: RouteInfo,
}

#[derive(Serialize)]
struct SinkInfo {
    name: String,
    sink_type: String,
    level: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    params: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct RouteInfo {
    standard: Vec<String>,
    error: Vec<String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    let blueprint = load_config(&args.config)?;

    if args.json {
        let info = build_config_info(&blueprint, args.params);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args.params);
    }

    Ok(())
}

fn build_config_info(blueprint: &RouterBlueprint, with_params: bool) -> ConfigInfo {
    let sinks = blueprint
        .sinks
        .iter()
        .map(|s| SinkInfo {
            name: s.name.clone(),
            sink_type: s.sink_type.as_str().to_string(),
            level: s.level.to_string(),
            params: if with_params {
                s.params.clone().into_iter().collect()
            } else {
                BTreeMap::new()
            },
        })
        .collect();

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        name: blueprint.name.clone(),
        scope: blueprint.scope.clone(),
        attrs: blueprint.attrs.clone(),
        sinks,
        routes: RouteInfo {
            standard: blueprint.routes.standard.clone(),
            error: blueprint.routes.error.clone(),
        },
    }
}

fn print_config_info(blueprint: &RouterBlueprint, with_params: bool) {
    println!("Router: {} ({:?})", blueprint.name, blueprint.version);
    if let Some(ref scope) = blueprint.scope {
        println!("   ├─ Scope: {}", scope);
    }
    for (key, value) in &blueprint.attrs {
        println!("   ├─ Attr: {}={}", key, value);
    }
    println!("   └─ Threshold: {}", contracts::ERROR_THRESHOLD);

    println!("\nSinks ({})", blueprint.sinks.len());
    for (i, sink) in blueprint.sinks.iter().enumerate() {
        let is_last = i == blueprint.sinks.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        println!(
            "   {} {} ({}, level >= {})",
            prefix,
            sink.name,
            sink.sink_type.as_str(),
            sink.level
        );

        if with_params {
            let child_prefix = if is_last { "   " } else { "│  " };
            let params: BTreeMap<_, _> = sink.params.iter().collect();
            for (key, value) in params {
                println!("   {}   {} = {}", child_prefix, key, value);
            }
        }
    }

    println!("\nRoutes");
    for class in [RouteClass::Standard, RouteClass::Error] {
        let names = blueprint.routes.for_class(class);
        let target = if names.is_empty() {
            "(dropped)".to_string()
        } else {
            names.join(", ")
        };
        println!("   {:<9} -> {}", class.as_str(), target);
    }

    println!();
}
