//! Firewall application configuration.
//!
//! Configuration is a flat YAML mapping with five keys plus an optional
//! topology table:
//!
//! ```yaml
//! segment: 220
//! in_ifc: eth0
//! in_dump: in_dump.pcap
//! in_use_ifc: true
//! rule_file: firewall_rules.yml
//! topology:
//!   220: obi-220.local
//! ```
//!
//! Every key is optional. Scalar values of any YAML type are accepted and
//! kept in string form; interpretation (and the fallback to defaults when a
//! value does not parse) happens in the accessors.

use crate::error::{FirewallError, Result};
use crate::topology::StaticTopology;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::warn;

pub const PROP_SEGMENT: &str = "segment";
pub const PROP_IN_IFC: &str = "in_ifc";
pub const PROP_IN_DUMP: &str = "in_dump";
pub const PROP_IN_USE_IFC: &str = "in_use_ifc";
pub const PROP_RULE_FILE: &str = "rule_file";

pub const DEFAULT_SEGMENT: i32 = 220;
pub const DEFAULT_IN_IFC: &str = "eth0";
pub const DEFAULT_IN_DUMP: &str = "in_dump.pcap";
pub const DEFAULT_IN_USE_IFC: &str = "true";
pub const DEFAULT_RULE_FILE: &str = "firewall_rules.yml";

/// Where captured traffic enters the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrafficSource {
    /// Live capture from a network interface.
    Device { interface: String },
    /// Replay of a packet dump file.
    Dump { file_path: String },
}

impl TrafficSource {
    /// Interface name or dump path, whichever this source reads from.
    pub fn describe(&self) -> &str {
        match self {
            TrafficSource::Device { interface } => interface,
            TrafficSource::Dump { file_path } => file_path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirewallConfig {
    pub segment: String,
    pub in_ifc: String,
    pub in_dump: String,
    pub in_use_ifc: String,
    pub rule_file: String,
    pub topology: BTreeMap<i32, String>,
}

impl Default for FirewallConfig {
    fn default() -> Self {
        Self {
            segment: DEFAULT_SEGMENT.to_string(),
            in_ifc: DEFAULT_IN_IFC.to_string(),
            in_dump: DEFAULT_IN_DUMP.to_string(),
            in_use_ifc: DEFAULT_IN_USE_IFC.to_string(),
            rule_file: DEFAULT_RULE_FILE.to_string(),
            topology: BTreeMap::new(),
        }
    }
}

/// On-disk form; every value is optional and untyped.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    segment: Option<Value>,
    in_ifc: Option<Value>,
    in_dump: Option<Value>,
    in_use_ifc: Option<Value>,
    rule_file: Option<Value>,
    #[serde(default)]
    topology: BTreeMap<i32, String>,
}

fn scalar(key: &str, value: Option<Value>, default: &str) -> Result<String> {
    match value {
        None | Some(Value::Null) => Ok(default.to_string()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(other) => Err(FirewallError::ConfigError(format!(
            "{key} must be a scalar, got {other:?}"
        ))),
    }
}

impl FirewallConfig {
    /// Create a configuration with every key at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from YAML text. An empty document yields defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let raw: RawConfig = if yaml.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };

        Ok(Self {
            segment: scalar(PROP_SEGMENT, raw.segment, &DEFAULT_SEGMENT.to_string())?,
            in_ifc: scalar(PROP_IN_IFC, raw.in_ifc, DEFAULT_IN_IFC)?,
            in_dump: scalar(PROP_IN_DUMP, raw.in_dump, DEFAULT_IN_DUMP)?,
            in_use_ifc: scalar(PROP_IN_USE_IFC, raw.in_use_ifc, DEFAULT_IN_USE_IFC)?,
            rule_file: scalar(PROP_RULE_FILE, raw.rule_file, DEFAULT_RULE_FILE)?,
            topology: raw.topology,
        })
    }

    /// Read and parse a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    /// Load configuration, falling back to defaults if it cannot be read.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot load configuration file");
                warn!("Using default configuration");
                Self::default()
            }
        }
    }

    /// Set the segment value.
    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = segment.into();
        self
    }

    /// Set the rule file path.
    pub fn with_rule_file(mut self, rule_file: impl Into<String>) -> Self {
        self.rule_file = rule_file.into();
        self
    }

    /// Capture from `interface` instead of a dump.
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.in_ifc = interface.into();
        self.in_use_ifc = "true".to_string();
        self
    }

    /// Replay `file_path` instead of capturing from an interface.
    pub fn with_dump(mut self, file_path: impl Into<String>) -> Self {
        self.in_dump = file_path.into();
        self.in_use_ifc = "false".to_string();
        self
    }

    /// Numeric segment, or [`DEFAULT_SEGMENT`] if the value does not parse.
    pub fn segment_id(&self) -> i32 {
        parse_segment(&self.segment)
    }

    /// True only for `true` in any ASCII case.
    pub fn use_interface(&self) -> bool {
        self.in_use_ifc.trim().eq_ignore_ascii_case("true")
    }

    /// The source selected by `in_use_ifc`.
    pub fn traffic_source(&self) -> TrafficSource {
        if self.use_interface() {
            TrafficSource::Device {
                interface: self.in_ifc.clone(),
            }
        } else {
            TrafficSource::Dump {
                file_path: self.in_dump.clone(),
            }
        }
    }

    /// Build a resolver from the `topology` table.
    pub fn static_topology(&self) -> StaticTopology {
        self.topology
            .iter()
            .map(|(&segment, host)| (segment, host.clone()))
            .collect()
    }
}

/// Parse a segment identifier, substituting [`DEFAULT_SEGMENT`] on failure.
pub fn parse_segment(raw: &str) -> i32 {
    match raw.trim().parse::<i32>() {
        Ok(segment) => segment,
        Err(_) => {
            warn!(
                value = raw,
                "Error parsing segment property. Using default segment: {DEFAULT_SEGMENT}"
            );
            DEFAULT_SEGMENT
        }
    }
}
