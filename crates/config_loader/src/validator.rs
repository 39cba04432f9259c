//! Config validation
//!
//! Rules:
//! - sink names non-empty and unique
//! - route entries reference defined sinks
//! - `file` sinks carry a `path` parameter
//! - `network` sinks carry an `addr` that parses as a socket address, and a
//!   `max_packet_size`, when given, that parses as a positive integer

use std::collections::HashSet;
use std::net::SocketAddr;

use contracts::{ContractError, RouteClass, RouterBlueprint, SinkConfig, SinkType};

/// Validate a RouterBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &RouterBlueprint) -> Result<(), ContractError> {
    validate_sink_names(blueprint)?;
    validate_sink_params(blueprint)?;
    validate_routes(blueprint)?;
    Ok(())
}

/// Sink names are non-empty and unique
fn validate_sink_names(blueprint: &RouterBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (i, sink) in blueprint.sinks.iter().enumerate() {
        if sink.name.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("sinks[{i}].name"),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(sink.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
    }
    Ok(())
}

/// Type-specific required parameters
fn validate_sink_params(blueprint: &RouterBlueprint) -> Result<(), ContractError> {
    for sink in &blueprint.sinks {
        match sink.sink_type {
            SinkType::File => require_param(sink, "path").map(|_| ())?,
            SinkType::Network => {
                let addr = require_param(sink, "addr")?;
                addr.parse::<SocketAddr>().map_err(|e| {
                    ContractError::config_validation(
                        format!("sinks[{}].params.addr", sink.name),
                        format!("invalid socket address '{addr}': {e}"),
                    )
                })?;
                if let Some(size) = sink.params.get("max_packet_size") {
                    validate_packet_size(sink, size)?;
                }
            }
            SinkType::Stdout | SinkType::Stderr | SinkType::Tracing => {}
        }
    }
    Ok(())
}

fn validate_packet_size(sink: &SinkConfig, size: &str) -> Result<(), ContractError> {
    match size.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(()),
        Ok(_) => Err(ContractError::config_validation(
            format!("sinks[{}].params.max_packet_size", sink.name),
            "max_packet_size must be greater than zero",
        )),
        Err(e) => Err(ContractError::config_validation(
            format!("sinks[{}].params.max_packet_size", sink.name),
            format!("invalid max_packet_size '{size}': {e}"),
        )),
    }
}

fn require_param<'a>(sink: &'a SinkConfig, key: &str) -> Result<&'a str, ContractError> {
    match sink.params.get(key).map(String::as_str) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ContractError::config_validation(
            format!("sinks[{}].params.{key}", sink.name),
            format!("{} sink requires '{key}'", sink.sink_type.as_str()),
        )),
    }
}

/// Route tables only reference defined sinks
fn validate_routes(blueprint: &RouterBlueprint) -> Result<(), ContractError> {
    for class in [RouteClass::Standard, RouteClass::Error] {
        for name in blueprint.routes.for_class(class) {
            if blueprint.sink(name).is_none() {
                return Err(ContractError::config_validation(
                    format!("routes.{class}"),
                    format!("sink '{name}' not found"),
                ));
            }
        }
    }
    Ok(())
}
