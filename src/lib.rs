//! # Firewall Compiler
//!
//! Compiles an ordered list of declarative firewall rules (header match,
//! priority, ordered actions) into a packet-processing graph for an external
//! dataflow engine to execute.
//!
//! The compiled graph always has the same shape: a traffic source feeds a
//! single header classifier, and each rule's actions hang off the classifier
//! output port matching the rule's index. Drops share one discard sink,
//! outputs to the same interface share one device sink.
//!
//! ## Quick Start
//!
//! ```rust
//! use firewall_compiler::parser::parse_rules;
//! use firewall_compiler::{GraphCompiler, SegmentResolver, TrafficSource};
//!
//! let rules = parse_rules(r#"
//! rules:
//!   - match: { ipv4_proto: "6", tcp_dst: "22" }
//!     priority: high
//!     actions:
//!       - { type: log, message: "ssh" }
//!       - { type: output, interface: eth1 }
//!   - match: { udp_dst: "53" }
//!     actions: [ { type: output, interface: eth1 } ]
//!   - actions: [ { type: drop } ]
//! "#)?;
//!
//! let compiler = GraphCompiler::new(TrafficSource::Device { interface: "eth0".into() });
//! let statement = compiler.compile(&rules, 220, &SegmentResolver)?;
//!
//! let graph = &statement.graph;
//! assert_eq!(graph.statistics().output_sinks, 1);
//! assert_eq!(graph.inbound("ToDevice_Firewall_Rule_0_UID_1").count(), 2);
//! # Ok::<(), firewall_compiler::FirewallError>(())
//! ```
//!
//! ## Application
//!
//! [`Firewall`] wires configuration, the rule file loader and the compiler
//! together and fails closed: if the rule file cannot be loaded it returns
//! no statements at all.
//!
//! ```rust,no_run
//! use firewall_compiler::{Firewall, FirewallConfig};
//!
//! let config = FirewallConfig::load_or_default("firewall.yml");
//! let firewall = Firewall::new(config);
//! for statement in firewall.statements() {
//!     println!("{}", serde_json::to_string_pretty(&statement).unwrap());
//! }
//! ```

pub mod app;
pub mod compiler;
pub mod config;
pub mod error;
pub mod graph;
pub mod parser;
pub mod rule;
pub mod topology;

#[cfg(test)]
mod testing;

pub use app::Firewall;
pub use compiler::GraphCompiler;
pub use config::{FirewallConfig, TrafficSource};
pub use error::{FirewallError, Result};
pub use graph::{
    BlockId, BlockKind, BlockRegistry, ClassifierRule, Connector, GraphStatistics,
    ProcessingBlock, ProcessingGraph, ProcessingGraphBuilder, Statement,
};
pub use parser::RuleParser;
pub use rule::{Action, HeaderField, HeaderMatch, Priority, Rule};
pub use topology::{Location, LocationResolver, SegmentResolver, StaticTopology};
