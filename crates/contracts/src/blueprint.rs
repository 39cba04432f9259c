//! RouterBlueprint - Config Loader output
//!
//! Describes the sinks to build and which of them serve each route class.

use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use std::collections::HashMap;

use crate::{Level, RouteClass};

/// Config version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete router configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterBlueprint {
    /// Config version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Router name (used in nested error attribution)
    #[serde(default = "default_router_name")]
    pub name: String,

    /// Scope applied to every sink after construction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Fixed attributes applied to every sink after construction, in
    /// declaration order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attrs: IndexMap<String, String>,

    /// Sink definitions
    pub sinks: Vec<SinkConfig>,

    /// Route tables referencing sinks by name
    #[serde(default)]
    pub routes: RouteConfig,
}

fn default_router_name() -> String {
    "router".to_string()
}

/// Sink output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink name
    pub name: String,

    /// Sink type
    pub sink_type: SinkType,

    /// Minimum level the sink accepts
    #[serde(default)]
    pub level: Level,

    /// Type-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// Sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// JSON lines on stdout
    Stdout,
    /// JSON lines on stderr
    Stderr,
    /// JSON lines appended to a file (`path`)
    File,
    /// JSON datagrams over UDP (`addr`)
    Network,
    /// Re-emitted as tracing events
    Tracing,
}

impl SinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkType::Stdout => "stdout",
            SinkType::Stderr => "stderr",
            SinkType::File => "file",
            SinkType::Network => "network",
            SinkType::Tracing => "tracing",
        }
    }
}

/// Sink names per route class, in dispatch order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Sinks receiving below-error records
    #[serde(default)]
    pub standard: Vec<String>,

    /// Sinks receiving error-or-above records
    #[serde(default)]
    pub error: Vec<String>,
}

impl RouteConfig {
    /// Sink names for one route class
    pub fn for_class(&self, class: RouteClass) -> &[String] {
        match class {
            RouteClass::Standard => &self.standard,
            RouteClass::Error => &self.error,
        }
    }
}

impl RouterBlueprint {
    /// Look up a sink definition by name
    pub fn sink(&self, name: &str) -> Option<&SinkConfig> {
        self.sinks.iter().find(|s| s.name == name)
    }

    /// Sinks defined but not referenced by any route
    pub fn unrouted_sinks(&self) -> Vec<&str> {
        self.sinks
            .iter()
            .map(|s| s.name.as_str())
            .filter(|name| {
                !self.routes.standard.iter().any(|r| r == name)
                    && !self.routes.error.iter().any(|r| r == name)
            })
            .collect()
    }
}
