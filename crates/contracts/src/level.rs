//! Severity levels and the standard/error split.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ContractError;

/// Ordered severity of a log record
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    #[default]
    Info,
    #[serde(alias = "warning")]
    Warn,
    Error,
    Fatal,
}

/// Records at or above this level are error-class.
pub const ERROR_THRESHOLD: Level = Level::Error;

impl Level {
    /// All levels, lowest first
    pub const ALL: [Level; 6] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// Upper-case name as written by JSON sinks
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }

    /// Whether this level belongs to the error-class partition
    pub fn is_error_class(&self) -> bool {
        *self >= ERROR_THRESHOLD
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "fatal" | "critical" => Ok(Level::Fatal),
            other => Err(ContractError::Other(format!("unknown level '{other}'"))),
        }
    }
}

/// The two partitions a router distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
    /// Below [`ERROR_THRESHOLD`]
    Standard,
    /// At or above [`ERROR_THRESHOLD`]
    Error,
}

impl RouteClass {
    /// Classify a level
    pub fn of(level: Level) -> Self {
        if level.is_error_class() {
            RouteClass::Error
        } else {
            RouteClass::Standard
        }
    }

    /// Label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteClass::Standard => "standard",
            RouteClass::Error => "error",
        }
    }
}

impl fmt::Display for RouteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn test_classification_threshold() {
        assert_eq!(RouteClass::of(Level::Warn), RouteClass::Standard);
        assert_eq!(RouteClass::of(Level::Error), RouteClass::Error);
        assert_eq!(RouteClass::of(Level::Fatal), RouteClass::Error);
        assert_eq!(RouteClass::of(Level::Trace), RouteClass::Standard);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!("WARNING".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!(" error ".parse::<Level>().unwrap(), Level::Error);
        assert!("loud".parse::<Level>().is_err());
    }

    #[test]
    fn test_level_serde_lowercase() {
        let json = serde_json::to_string(&Level::Warn).unwrap();
        assert_eq!(json, "\"warn\"");
        let parsed: Level = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(parsed, Level::Warn);
    }
}
