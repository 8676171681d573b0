//! YAML rule file loader.
//!
//! A rule file holds an ordered `rules` list:
//!
//! ```yaml
//! rules:
//!   - match: { ipv4_proto: "6", tcp_dst: "22" }
//!     priority: high
//!     actions:
//!       - { type: log, message: "ssh" }
//!       - { type: output, interface: eth1 }
//!   - actions: [ { type: drop } ]
//! ```
//!
//! File order is significant: it is the rule index the compiler uses for
//! classifier order and output ports. Any read or syntax failure rejects the
//! whole file.

use crate::error::{FirewallError, Result};
use crate::rule::Rule;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<Rule>,
}

/// Parse rules from YAML text.
///
/// # Examples
///
/// ```rust
/// use firewall_compiler::parser::parse_rules;
/// use firewall_compiler::Action;
///
/// let rules = parse_rules(r#"
/// rules:
///   - match: { tcp_dst: "23" }
///     actions: [ { type: drop } ]
/// "#)?;
/// assert_eq!(rules.len(), 1);
/// assert_eq!(rules[0].actions, vec![Action::Drop]);
/// # Ok::<(), firewall_compiler::FirewallError>(())
/// ```
pub fn parse_rules(yaml: &str) -> Result<Vec<Rule>> {
    if yaml.trim().is_empty() {
        return Ok(Vec::new());
    }
    let file: RuleFile = serde_yaml::from_str(yaml)
        .map_err(|e| FirewallError::RuleParseError(e.to_string()))?;
    Ok(file.rules)
}

/// Reads a rule file from disk.
#[derive(Debug, Clone)]
pub struct RuleParser {
    path: PathBuf,
}

impl RuleParser {
    /// Create a parser for the rule file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole file. Any bad rule rejects the file.
    pub fn read(&self) -> Result<Vec<Rule>> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            FirewallError::IoError(format!("{}: {}", self.path.display(), e))
        })?;
        parse_rules(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Action, HeaderField, Priority};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const RULES: &str = r#"
rules:
  - match: { ipv4_proto: "6", tcp_dst: "22" }
    priority: high
    actions:
      - { type: log, message: "ssh" }
      - { type: output, interface: eth1 }
  - match: { udp_dst: "53" }
    actions:
      - { type: output, interface: eth1 }
  - actions:
      - { type: drop }
      - { type: log, message: "never" }
"#;

    #[test]
    fn test_parse_rules_preserves_order() {
        let rules = parse_rules(RULES).unwrap();

        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].priority, Priority::High);
        assert_eq!(rules[0].header_match.get(HeaderField::TcpDst), Some("22"));
        assert_eq!(rules[1].priority, Priority::Medium);
        assert_eq!(rules[1].actions, vec![Action::Output("eth1".to_string())]);
        assert!(rules[2].header_match.is_match_all());
        assert_eq!(rules[2].actions.len(), 2);
    }

    #[test]
    fn test_empty_file_has_no_rules() {
        assert!(parse_rules("").unwrap().is_empty());
        assert!(parse_rules("rules: []").unwrap().is_empty());
    }

    #[test]
    fn test_syntax_error() {
        let result = parse_rules("rules: [ { actions: ");
        assert!(matches!(result, Err(FirewallError::RuleParseError(_))));
    }

    #[test]
    fn test_unknown_header_field_fails_file() {
        let result = parse_rules("rules:\n  - match: { tcp_port: \"80\" }\n");
        assert!(matches!(result, Err(FirewallError::RuleParseError(_))));
    }

    #[test]
    fn test_output_without_interface_fails_file() {
        let result = parse_rules("rules:\n  - actions: [ { type: output } ]\n");
        assert!(matches!(result, Err(FirewallError::RuleParseError(_))));
    }

    #[test]
    fn test_unknown_action_kind_is_kept() {
        let rules = parse_rules("rules:\n  - actions: [ { type: mirror } ]\n").unwrap();
        assert_eq!(rules[0].actions, vec![Action::Unknown("mirror".to_string())]);
    }

    #[test]
    fn test_read_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(RULES.as_bytes()).unwrap();

        let rules = RuleParser::new(file.path()).read().unwrap();
        assert_eq!(rules.len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let parser = RuleParser::new(dir.path().join("absent.yml"));
        match parser.read() {
            Err(FirewallError::IoError(msg)) => assert!(msg.contains("absent.yml")),
            other => panic!("Expected IoError, got {other:?}"),
        }
    }
}
