//! Per-compilation wiring state.

use crate::error::{FirewallError, Result};
use crate::graph::{
    BlockId, BlockRegistry, ClassifierRule, Connector, ProcessingBlock, ProcessingGraph,
    ProcessingGraphBuilder,
};
use crate::rule::{Action, Priority, Rule};
use tracing::warn;

use super::{CLASSIFIER_ID, DISCARD_ID, ID_TAG};

/// Outcome of resolving one action to a block.
enum ChainStep {
    /// Wire the block and keep extending the chain from it.
    Continue(BlockId),
    /// Wire the block and end the chain there.
    Terminate(BlockId),
    /// Nothing to wire for this action.
    Skip,
}

/// State for a single compilation run. Created fresh for every compile and
/// consumed when the graph is assembled, so nothing leaks between runs.
pub(crate) struct CompilationContext {
    /// Blocks produced so far, with output-sink and discard sharing
    registry: BlockRegistry,
    /// Edges in emission order
    connectors: Vec<Connector>,
    /// Classifier entries, one per rule, in rule order
    classifier_rules: Vec<ClassifierRule>,
}

impl CompilationContext {
    pub fn new() -> Self {
        Self {
            registry: BlockRegistry::new(),
            connectors: Vec::new(),
            classifier_rules: Vec::new(),
        }
    }

    /// Add rule `index` to the classifier and wire its action chain off the
    /// classifier port of the same number.
    pub fn compile_rule(&mut self, index: u32, rule: &Rule) {
        self.classifier_rules.push(ClassifierRule::new(
            rule.header_match.clone(),
            rule.priority,
            index,
        ));

        let mut last: BlockId = CLASSIFIER_ID.to_string();
        let mut last_port = index;
        // Counts wired actions only; skipped ones do not take a number.
        let mut uid: u32 = 0;

        for action in &rule.actions {
            let (block, terminate) = match self.resolve_action(index, uid, action) {
                ChainStep::Continue(block) => (block, false),
                ChainStep::Terminate(block) => (block, true),
                ChainStep::Skip => continue,
            };

            self.connectors
                .push(Connector::new(last, last_port, block.clone()));
            last = block;
            last_port = 0;
            uid += 1;

            if terminate {
                break;
            }
        }
    }

    /// Resolve an action to the block it runs in, registering new blocks.
    fn resolve_action(&mut self, rule: u32, uid: u32, action: &Action) -> ChainStep {
        let suffix = format!("{ID_TAG}_Rule_{rule}_UID_{uid}");

        match action {
            Action::Alert(message) => ChainStep::Continue(
                self.registry
                    .register(ProcessingBlock::alert(format!("Alert{suffix}"), message)),
            ),
            Action::Log(message) => ChainStep::Continue(
                self.registry
                    .register(ProcessingBlock::log(format!("Log{suffix}"), message)),
            ),
            Action::Output(interface) => {
                let sink = self.registry.get_or_create_output_sink(interface, || {
                    ProcessingBlock::to_device(format!("ToDevice{suffix}"), interface)
                });
                ChainStep::Continue(sink.id.clone())
            }
            Action::Drop => {
                ChainStep::Terminate(self.registry.register(ProcessingBlock::discard(DISCARD_ID)))
            }
            Action::Unknown(kind) => {
                warn!(rule, kind = %kind, "Unknown action: {kind}");
                ChainStep::Skip
            }
        }
    }

    /// Register the classifier, attach `source` as root and assemble the graph.
    pub fn finish(mut self, source: ProcessingBlock) -> Result<ProcessingGraph> {
        if self.classifier_rules.is_empty() {
            return Err(FirewallError::EmptyRuleSet);
        }

        self.registry.register(ProcessingBlock::header_classifier(
            CLASSIFIER_ID,
            self.classifier_rules,
            Priority::High,
            true,
        ));

        let root = source.id.clone();
        self.connectors
            .push(Connector::new(root.clone(), 0, CLASSIFIER_ID));

        ProcessingGraphBuilder::new()
            .with_block(source)
            .with_blocks(self.registry.into_blocks())
            .with_connectors(self.connectors)
            .with_root(root)
            .build()
    }
}
