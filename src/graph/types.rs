//! Compiled processing graph types.

use super::block::{BlockId, BlockKind, ProcessingBlock};
use crate::topology::Location;
use serde::Serialize;
use std::collections::HashMap;

/// Directed edge between two blocks' ports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Connector {
    pub source_block: BlockId,
    pub source_output_port: u32,
    pub dest_block: BlockId,
    pub dest_input_port: u32,
}

impl Connector {
    /// Connect `source:port` to the single input port of `dest`.
    pub fn new(
        source_block: impl Into<BlockId>,
        source_output_port: u32,
        dest_block: impl Into<BlockId>,
    ) -> Self {
        Self {
            source_block: source_block.into(),
            source_output_port,
            dest_block: dest_block.into(),
            dest_input_port: 0,
        }
    }
}

/// A validated processing graph, ready for deployment.
///
/// Built through [`super::ProcessingGraphBuilder`], which guarantees unique
/// block ids, connectors between known blocks, a root without inbound
/// connectors and every block reachable from the root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingGraph {
    pub(crate) blocks: Vec<ProcessingBlock>,
    pub(crate) connectors: Vec<Connector>,
    pub(crate) root: BlockId,
}

impl ProcessingGraph {
    /// All blocks in insertion order.
    pub fn blocks(&self) -> &[ProcessingBlock] {
        &self.blocks
    }

    /// All connectors in emission order.
    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    /// Get the root block.
    pub fn root(&self) -> Option<&ProcessingBlock> {
        self.block(&self.root)
    }

    /// Id of the root block.
    pub fn root_id(&self) -> &str {
        &self.root
    }

    /// Look up a block by id.
    pub fn block(&self, id: &str) -> Option<&ProcessingBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Number of blocks, including the root.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of connectors.
    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    /// Blocks whose kind has the given name, e.g. `"ToDevice"`.
    pub fn blocks_of_kind<'a>(
        &'a self,
        kind: &'a str,
    ) -> impl Iterator<Item = &'a ProcessingBlock> + 'a {
        self.blocks.iter().filter(move |b| b.kind.name() == kind)
    }

    /// Connectors ending at `id`.
    pub fn inbound<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Connector> + 'a {
        self.connectors.iter().filter(move |c| c.dest_block == id)
    }

    /// Connectors leaving `id`.
    pub fn outbound<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Connector> + 'a {
        self.connectors.iter().filter(move |c| c.source_block == id)
    }

    /// The header classifier, if the graph has one.
    pub fn classifier(&self) -> Option<&ProcessingBlock> {
        self.blocks
            .iter()
            .find(|b| matches!(b.kind, BlockKind::HeaderClassifier { .. }))
    }

    /// Summarize block and edge counts.
    pub fn statistics(&self) -> GraphStatistics {
        GraphStatistics::from_graph(self)
    }
}

/// Shape summary of a compiled graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphStatistics {
    pub total_blocks: usize,
    pub connectors: usize,
    pub classifier_rules: usize,
    pub output_sinks: usize,
    pub alert_blocks: usize,
    pub log_blocks: usize,
    /// Largest number of inbound connectors on any one block
    pub max_fan_in: usize,
}

impl GraphStatistics {
    /// Collect statistics for `graph`.
    pub fn from_graph(graph: &ProcessingGraph) -> Self {
        let mut stats = GraphStatistics {
            total_blocks: graph.blocks.len(),
            connectors: graph.connectors.len(),
            ..Default::default()
        };

        for block in &graph.blocks {
            match &block.kind {
                BlockKind::HeaderClassifier { rules, .. } => stats.classifier_rules += rules.len(),
                BlockKind::ToDevice { .. } => stats.output_sinks += 1,
                BlockKind::Alert { .. } => stats.alert_blocks += 1,
                BlockKind::Log { .. } => stats.log_blocks += 1,
                BlockKind::Discard | BlockKind::FromDevice { .. } | BlockKind::FromDump { .. } => {}
            }
        }

        let mut fan_in: HashMap<&str, usize> = HashMap::new();
        for connector in &graph.connectors {
            *fan_in.entry(connector.dest_block.as_str()).or_insert(0) += 1;
        }
        stats.max_fan_in = fan_in.values().copied().max().unwrap_or(0);

        stats
    }
}

/// Unit of deployment: a graph and where it runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub location: Location,
    pub graph: ProcessingGraph,
}

impl Statement {
    /// Bind `graph` to a deployment location.
    pub fn new(location: Location, graph: ProcessingGraph) -> Self {
        Self { location, graph }
    }
}
