//! Rule-to-graph compiler.
//!
//! Turns an ordered rule list into a processing graph:
//!
//! ```text
//! source ──► HeaderClassifier ──port i──► action blocks of rule i ──► ...
//! ```
//!
//! Rule `i` becomes classifier entry `i` (order and output port both `i`),
//! and its actions are chained off that port in list order. Drop sends the
//! chain into the shared discard sink and ends it; outputs to the same
//! interface share one `ToDevice` block; alert and log blocks are created
//! per action. Unknown action kinds are skipped with a warning.
//!
//! # Examples
//!
//! ```rust
//! use firewall_compiler::{Action, GraphCompiler, HeaderMatch, Priority, Rule, TrafficSource};
//!
//! let rules = vec![
//!     Rule::new(HeaderMatch::new(), Priority::High, vec![Action::Output("eth1".into())]),
//!     Rule::new(HeaderMatch::new(), Priority::Low, vec![Action::Drop]),
//! ];
//!
//! let compiler = GraphCompiler::new(TrafficSource::Device { interface: "eth0".into() });
//! let graph = compiler.compile_graph(&rules)?;
//!
//! assert_eq!(graph.root_id(), "FromDevice_Snort");
//! assert_eq!(graph.statistics().classifier_rules, 2);
//! # Ok::<(), firewall_compiler::FirewallError>(())
//! ```

mod context;

use crate::config::{FirewallConfig, TrafficSource};
use crate::error::{FirewallError, Result};
use crate::graph::{ProcessingBlock, ProcessingGraph, Statement};
use crate::rule::Rule;
use crate::topology::LocationResolver;
use context::CompilationContext;
use tracing::debug;

/// Tag embedded in per-action block ids and the discard sink id.
pub const ID_TAG: &str = "_Firewall";

// Classifier and source ids are fixed names deployed graphs are keyed on.
pub const CLASSIFIER_ID: &str = "HeaderClassifier_Snort";
pub const DISCARD_ID: &str = "Discard_Firewall";
pub const FROM_DEVICE_ID: &str = "FromDevice_Snort";
pub const FROM_DUMP_ID: &str = "FromDump_Snort";

/// Compiles rule lists into processing graphs fed from one traffic source.
///
/// The compiler itself is stateless; all wiring state is created per call,
/// so one instance can compile any number of rule lists.
#[derive(Debug, Clone)]
pub struct GraphCompiler {
    source: TrafficSource,
}

impl GraphCompiler {
    /// Create a compiler whose graphs are rooted at `source`.
    pub fn new(source: TrafficSource) -> Self {
        Self { source }
    }

    /// Create a compiler for the traffic source selected in `config`.
    pub fn from_config(config: &FirewallConfig) -> Self {
        Self::new(config.traffic_source())
    }

    /// Get the configured traffic source.
    pub fn source(&self) -> &TrafficSource {
        &self.source
    }

    /// The root block for the configured source.
    pub fn source_block(&self) -> ProcessingBlock {
        match &self.source {
            TrafficSource::Device { interface } => {
                ProcessingBlock::from_device(FROM_DEVICE_ID, interface, true, true)
            }
            TrafficSource::Dump { file_path } => {
                ProcessingBlock::from_dump(FROM_DUMP_ID, file_path, false, true)
            }
        }
    }

    /// Compile `rules` into a validated graph rooted at the source block.
    ///
    /// # Errors
    /// [`FirewallError::EmptyRuleSet`] when `rules` is empty. Callers should
    /// treat that as "deploy nothing".
    pub fn compile_graph(&self, rules: &[Rule]) -> Result<ProcessingGraph> {
        if rules.is_empty() {
            return Err(FirewallError::EmptyRuleSet);
        }

        let mut ctx = CompilationContext::new();
        for (index, rule) in rules.iter().enumerate() {
            let index = u32::try_from(index).map_err(|_| {
                FirewallError::InvalidGraph(format!("rule index {index} exceeds port range"))
            })?;
            ctx.compile_rule(index, rule);
        }

        let graph = ctx.finish(self.source_block())?;
        let stats = graph.statistics();
        debug!(
            blocks = stats.total_blocks,
            connectors = stats.connectors,
            classifier_rules = stats.classifier_rules,
            output_sinks = stats.output_sinks,
            max_fan_in = stats.max_fan_in,
            "Compiled firewall graph"
        );

        Ok(graph)
    }

    /// Compile `rules` and bind the graph to the location of `segment`.
    pub fn compile<R>(&self, rules: &[Rule], segment: i32, resolver: &R) -> Result<Statement>
    where
        R: LocationResolver + ?Sized,
    {
        let graph = self.compile_graph(rules)?;
        let location = resolver.resolve(segment);
        debug!(%location, "Resolved deployment location");
        Ok(Statement::new(location, graph))
    }
}
