//! Error types for the firewall compiler crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FirewallError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FirewallError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("YAML parsing error: {0}")]
    YamlError(String),
    #[error("Rule parse error: {0}")]
    RuleParseError(String),
    #[error("Rule set is empty")]
    EmptyRuleSet,
    #[error("Duplicate block: {0}")]
    DuplicateBlock(String),
    #[error("Unknown block: {0}")]
    UnknownBlock(String),
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),
}

impl From<std::io::Error> for FirewallError {
    fn from(err: std::io::Error) -> Self {
        FirewallError::IoError(err.to_string())
    }
}

impl From<serde_yaml::Error> for FirewallError {
    fn from(err: serde_yaml::Error) -> Self {
        FirewallError::YamlError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_rule_parse_error() {
        let error = FirewallError::RuleParseError("bad action".to_string());
        assert_eq!(error.to_string(), "Rule parse error: bad action");
        assert!(error.source().is_none());
    }

    #[test]
    fn test_empty_rule_set() {
        assert_eq!(FirewallError::EmptyRuleSet.to_string(), "Rule set is empty");
    }

    #[test]
    fn test_graph_errors_display() {
        let err = FirewallError::UnknownBlock("Log_Firewall_Rule_0_UID_0".to_string());
        assert_eq!(err.to_string(), "Unknown block: Log_Firewall_Rule_0_UID_0");

        let err = FirewallError::DuplicateBlock("Discard_Firewall".to_string());
        assert_eq!(err.to_string(), "Duplicate block: Discard_Firewall");

        let err = FirewallError::InvalidGraph("root has inbound connector".to_string());
        assert_eq!(err.to_string(), "Invalid graph: root has inbound connector");
    }

    #[test]
    fn test_error_equality() {
        let error1 = FirewallError::ConfigError("test".to_string());
        let error2 = FirewallError::ConfigError("test".to_string());
        let error3 = FirewallError::ConfigError("different".to_string());

        assert_eq!(error1, error2);
        assert_ne!(error1, error3);
        assert_ne!(
            FirewallError::IoError("test".to_string()),
            FirewallError::YamlError("test".to_string())
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FirewallError = io_error.into();

        match err {
            FirewallError::IoError(msg) => assert!(msg.contains("file not found")),
            _ => panic!("Expected IoError variant"),
        }
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("invalid: yaml: content: [")
            .unwrap_err();
        let err: FirewallError = yaml_err.into();
        assert!(matches!(err, FirewallError::YamlError(_)));
    }

    #[test]
    fn test_result_type_alias_error() {
        fn failing() -> Result<i32> {
            Err(FirewallError::EmptyRuleSet)
        }

        match failing().unwrap_err() {
            FirewallError::EmptyRuleSet => {}
            other => panic!("Expected EmptyRuleSet, got {other:?}"),
        }
    }
}
