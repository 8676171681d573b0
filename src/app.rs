//! Firewall application: configuration, rule loading and compilation.

use crate::compiler::GraphCompiler;
use crate::config::FirewallConfig;
use crate::graph::Statement;
use crate::parser::RuleParser;
use crate::topology::{LocationResolver, SegmentResolver};
use tracing::{info, warn};

/// Compiles the configured rule file into deployable statements.
pub struct Firewall<R = SegmentResolver> {
    config: FirewallConfig,
    resolver: R,
}

impl Firewall<SegmentResolver> {
    /// Create a firewall that places statements by segment alone.
    pub fn new(config: FirewallConfig) -> Self {
        Self::with_resolver(config, SegmentResolver)
    }
}

impl<R: LocationResolver> Firewall<R> {
    /// Create a firewall that places statements through `resolver`.
    pub fn with_resolver(config: FirewallConfig, resolver: R) -> Self {
        info!("Firewall is running on Segment {}", config.segment);
        info!("[->] Input: {}", config.traffic_source().describe());
        info!("[>|] Rule files path: {}", config.rule_file);
        Self { config, resolver }
    }

    /// Get the active configuration.
    pub fn config(&self) -> &FirewallConfig {
        &self.config
    }

    /// Build the statements to deploy.
    ///
    /// Returns a single statement, or nothing at all when the rule file
    /// cannot be read or parsed, or holds no rules.
    pub fn statements(&self) -> Vec<Statement> {
        let rules = match RuleParser::new(&self.config.rule_file).read() {
            Ok(rules) => rules,
            Err(e) => {
                warn!(path = %self.config.rule_file, "Failed to parse rule file: {e}");
                return Vec::new();
            }
        };

        if rules.is_empty() {
            warn!(path = %self.config.rule_file, "Rule file has no rules, nothing to deploy");
            return Vec::new();
        }

        let compiler = GraphCompiler::from_config(&self.config);
        match compiler.compile(&rules, self.config.segment_id(), &self.resolver) {
            Ok(statement) => {
                info!(
                    rules = rules.len(),
                    blocks = statement.graph.block_count(),
                    location = %statement.location,
                    "Compiled rule file"
                );
                vec![statement]
            }
            Err(e) => {
                warn!("Failed to compile rule file: {e}");
                Vec::new()
            }
        }
    }
}
