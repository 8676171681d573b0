//! Processing graph model.
//!
//! This module describes the output of compilation: the blocks (stages) a
//! dataflow engine will instantiate, the connectors wiring their ports, and
//! the validated graph with its designated root.
//!
//! - [`block`] - Stage descriptors and their identifiers
//! - [`registry`] - Compilation-scoped block deduplication
//! - [`builder`] - Graph assembly with structural validation
//! - [`types`] - Connectors, graphs, statistics and statements

pub mod block;
pub mod builder;
pub mod registry;
pub mod types;

pub use block::{BlockId, BlockKind, ClassifierRule, ProcessingBlock};
pub use builder::ProcessingGraphBuilder;
pub use registry::BlockRegistry;
pub use types::{Connector, GraphStatistics, ProcessingGraph, Statement};
