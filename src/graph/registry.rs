//! Compilation-scoped block registry.
//!
//! Owns every block produced while compiling one rule list and decides which
//! of them are shared. A registry lives for exactly one compilation.

use super::block::{BlockId, ProcessingBlock};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct BlockRegistry {
    /// Blocks in first-registration order
    blocks: Vec<ProcessingBlock>,

    /// Block id to position in `blocks`
    index: HashMap<BlockId, usize>,

    /// Interface name to the `ToDevice` block serving it
    output_sinks: HashMap<String, BlockId>,
}

impl BlockRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a block keyed by its id. An existing block with the same id is
    /// kept and the new one dropped. Returns the id either way.
    pub fn register(&mut self, block: ProcessingBlock) -> BlockId {
        if let Some(&pos) = self.index.get(block.id()) {
            return self.blocks[pos].id.clone();
        }
        let id = block.id.clone();
        if let Some(interface) = block.output_interface() {
            self.output_sinks
                .entry(interface.to_string())
                .or_insert_with(|| id.clone());
        }
        self.index.insert(id.clone(), self.blocks.len());
        self.blocks.push(block);
        id
    }

    /// Return the `ToDevice` block for `interface`, building and registering
    /// one with `factory` on first use.
    pub fn get_or_create_output_sink<F>(&mut self, interface: &str, factory: F) -> &ProcessingBlock
    where
        F: FnOnce() -> ProcessingBlock,
    {
        let id = match self.output_sinks.get(interface) {
            Some(id) => id.clone(),
            None => {
                let id = self.register(factory());
                self.output_sinks
                    .entry(interface.to_string())
                    .or_insert_with(|| id.clone());
                id
            }
        };
        let pos = self.index[&id];
        &self.blocks[pos]
    }

    /// Iterate over registered blocks.
    pub fn values(&self) -> impl Iterator<Item = &ProcessingBlock> {
        self.blocks.iter()
    }

    /// Consume the registry, yielding the final block set.
    pub fn into_blocks(self) -> Vec<ProcessingBlock> {
        self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(registry: &BlockRegistry) -> Vec<&str> {
        registry.values().map(|b| b.id()).collect()
    }

    #[test]
    fn test_register_first_wins() {
        let mut registry = BlockRegistry::new();
        registry.register(ProcessingBlock::alert("A", "first"));
        let id = registry.register(ProcessingBlock::alert("A", "second"));

        assert_eq!(id, "A");
        assert_eq!(
            registry.into_blocks(),
            vec![ProcessingBlock::alert("A", "first")]
        );
    }

    #[test]
    fn test_output_sink_dedup_by_interface() {
        let mut registry = BlockRegistry::new();

        let first = registry
            .get_or_create_output_sink("eth1", || ProcessingBlock::to_device("T0", "eth1"))
            .id
            .clone();
        let mut factory_called = false;
        let second = registry
            .get_or_create_output_sink("eth1", || {
                factory_called = true;
                ProcessingBlock::to_device("T1", "eth1")
            })
            .id
            .clone();

        assert_eq!(first, "T0");
        assert_eq!(second, "T0");
        assert!(!factory_called);
        assert_eq!(ids(&registry), vec!["T0"]);
    }

    #[test]
    fn test_distinct_interfaces_get_distinct_sinks() {
        let mut registry = BlockRegistry::new();
        registry.get_or_create_output_sink("eth1", || ProcessingBlock::to_device("T0", "eth1"));
        let sink = registry
            .get_or_create_output_sink("eth2", || ProcessingBlock::to_device("T1", "eth2"));

        assert_eq!(sink.output_interface(), Some("eth2"));
        assert_eq!(ids(&registry), vec!["T0", "T1"]);
    }

    #[test]
    fn test_registered_to_device_is_visible_as_sink() {
        let mut registry = BlockRegistry::new();
        registry.register(ProcessingBlock::to_device("T0", "eth3"));

        let sink = registry
            .get_or_create_output_sink("eth3", || ProcessingBlock::to_device("T9", "eth3"));
        assert_eq!(sink.id(), "T0");
        assert_eq!(ids(&registry), vec!["T0"]);
    }

    #[test]
    fn test_values_keep_registration_order() {
        let mut registry = BlockRegistry::new();
        registry.register(ProcessingBlock::discard("D"));
        registry.register(ProcessingBlock::log("L", "x"));
        registry.register(ProcessingBlock::discard("D"));

        assert_eq!(ids(&registry), vec!["D", "L"]);
        assert_eq!(registry.into_blocks().len(), 2);
    }
}
