//! Graph assembly and structural validation.

use super::block::{BlockId, ProcessingBlock};
use super::types::{Connector, ProcessingGraph};
use crate::error::{FirewallError, Result};
use std::collections::{HashMap, HashSet, VecDeque};

/// Builder for [`ProcessingGraph`].
#[derive(Debug, Default)]
pub struct ProcessingGraphBuilder {
    blocks: Vec<ProcessingBlock>,
    connectors: Vec<Connector>,
    root: Option<BlockId>,
}

impl ProcessingGraphBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add blocks in iteration order.
    pub fn with_blocks(mut self, blocks: impl IntoIterator<Item = ProcessingBlock>) -> Self {
        self.blocks.extend(blocks);
        self
    }

    /// Add a single block.
    pub fn with_block(mut self, block: ProcessingBlock) -> Self {
        self.blocks.push(block);
        self
    }

    /// Add connectors in iteration order.
    pub fn with_connectors(mut self, connectors: impl IntoIterator<Item = Connector>) -> Self {
        self.connectors.extend(connectors);
        self
    }

    /// Set the block traffic enters the graph through.
    pub fn with_root(mut self, root: impl Into<BlockId>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Validate and build the graph.
    pub fn build(self) -> Result<ProcessingGraph> {
        let root = self
            .root
            .ok_or_else(|| FirewallError::InvalidGraph("no root block".to_string()))?;

        let mut ids: HashSet<&str> = HashSet::with_capacity(self.blocks.len());
        for block in &self.blocks {
            if !ids.insert(block.id()) {
                return Err(FirewallError::DuplicateBlock(block.id.clone()));
            }
        }

        if !ids.contains(root.as_str()) {
            return Err(FirewallError::UnknownBlock(root));
        }

        for connector in &self.connectors {
            for end in [&connector.source_block, &connector.dest_block] {
                if !ids.contains(end.as_str()) {
                    return Err(FirewallError::UnknownBlock(end.clone()));
                }
            }
            if connector.dest_block == root {
                return Err(FirewallError::InvalidGraph(format!(
                    "root {} has inbound connector from {}",
                    root, connector.source_block
                )));
            }
        }

        let unreachable = Self::unreachable_blocks(&self.blocks, &self.connectors, &root);
        if let Some(id) = unreachable.first() {
            return Err(FirewallError::InvalidGraph(format!(
                "block {id} is not reachable from root {root}"
            )));
        }

        Ok(ProcessingGraph {
            blocks: self.blocks,
            connectors: self.connectors,
            root,
        })
    }

    /// Breadth-first walk from the root; returns blocks never visited.
    fn unreachable_blocks<'a>(
        blocks: &'a [ProcessingBlock],
        connectors: &[Connector],
        root: &str,
    ) -> Vec<&'a str> {
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for connector in connectors {
            adjacency
                .entry(connector.source_block.as_str())
                .or_default()
                .push(connector.dest_block.as_str());
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(root);
        queue.push_back(root);

        while let Some(id) = queue.pop_front() {
            if let Some(next) = adjacency.get(id) {
                for &dest in next {
                    if visited.insert(dest) {
                        queue.push_back(dest);
                    }
                }
            }
        }

        blocks
            .iter()
            .map(|b| b.id())
            .filter(|id| !visited.contains(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Priority;

    fn chain() -> ProcessingGraphBuilder {
        ProcessingGraphBuilder::new()
            .with_block(ProcessingBlock::from_device("S", "eth0", true, true))
            .with_block(ProcessingBlock::header_classifier("C", vec![], Priority::High, true))
            .with_block(ProcessingBlock::discard("D"))
            .with_connectors([Connector::new("S", 0, "C"), Connector::new("C", 0, "D")])
            .with_root("S")
    }

    #[test]
    fn test_build_valid_graph() {
        let graph = chain().build().unwrap();

        assert_eq!(graph.block_count(), 3);
        assert_eq!(graph.connector_count(), 2);
        assert_eq!(graph.root_id(), "S");
        assert_eq!(graph.inbound("S").count(), 0);
        assert_eq!(graph.outbound("C").count(), 1);
    }

    #[test]
    fn test_missing_root() {
        let result = ProcessingGraphBuilder::new()
            .with_block(ProcessingBlock::discard("D"))
            .build();
        assert!(matches!(result, Err(FirewallError::InvalidGraph(_))));
    }

    #[test]
    fn test_root_not_in_blocks() {
        let result = ProcessingGraphBuilder::new()
            .with_block(ProcessingBlock::discard("D"))
            .with_root("S")
            .build();
        assert_eq!(result.unwrap_err(), FirewallError::UnknownBlock("S".to_string()));
    }

    #[test]
    fn test_duplicate_block_ids() {
        let result = chain().with_block(ProcessingBlock::discard("D")).build();
        assert_eq!(
            result.unwrap_err(),
            FirewallError::DuplicateBlock("D".to_string())
        );
    }

    #[test]
    fn test_connector_to_unknown_block() {
        let result = chain().with_connectors([Connector::new("C", 1, "X")]).build();
        assert_eq!(result.unwrap_err(), FirewallError::UnknownBlock("X".to_string()));
    }

    #[test]
    fn test_root_with_inbound_connector() {
        let result = chain().with_connectors([Connector::new("D", 0, "S")]).build();
        assert!(matches!(result, Err(FirewallError::InvalidGraph(_))));
    }

    #[test]
    fn test_unreachable_block() {
        let result = chain().with_block(ProcessingBlock::log("L", "orphan")).build();
        match result {
            Err(FirewallError::InvalidGraph(msg)) => assert!(msg.contains("L")),
            other => panic!("Expected InvalidGraph, got {other:?}"),
        }
    }
}
