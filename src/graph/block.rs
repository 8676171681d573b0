//! Processing-stage descriptors.

use crate::rule::{HeaderMatch, Priority};
use serde::Serialize;

/// Globally unique identifier of a processing block.
pub type BlockId = String;

/// One header-match entry inside the classifier.
///
/// `order` is the owning rule's index. It breaks priority ties and selects
/// the classifier output port that matched packets leave through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ClassifierRule {
    pub header_match: HeaderMatch,
    pub priority: Priority,
    pub order: u32,
}

impl ClassifierRule {
    /// Entry matching `header_match`, placed at `order`.
    pub fn new(header_match: HeaderMatch, priority: Priority, order: u32) -> Self {
        Self {
            header_match,
            priority,
            order,
        }
    }

    /// The classifier output port for this entry.
    pub fn output_port(&self) -> u32 {
        self.order
    }
}

/// Stage-specific configuration of a processing block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type")]
pub enum BlockKind {
    HeaderClassifier {
        rules: Vec<ClassifierRule>,
        priority: Priority,
        continue_on_no_match: bool,
    },
    Discard,
    Alert {
        message: String,
    },
    Log {
        message: String,
    },
    ToDevice {
        interface: String,
    },
    FromDevice {
        interface: String,
        promiscuous: bool,
        running: bool,
    },
    FromDump {
        file_path: String,
        promiscuous: bool,
        running: bool,
    },
}

impl BlockKind {
    /// Block type name as the engine knows it.
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::HeaderClassifier { .. } => "HeaderClassifier",
            BlockKind::Discard => "Discard",
            BlockKind::Alert { .. } => "Alert",
            BlockKind::Log { .. } => "Log",
            BlockKind::ToDevice { .. } => "ToDevice",
            BlockKind::FromDevice { .. } => "FromDevice",
            BlockKind::FromDump { .. } => "FromDump",
        }
    }

    /// Traffic sources are the only blocks allowed to act as graph roots.
    pub fn is_source(&self) -> bool {
        matches!(self, BlockKind::FromDevice { .. } | BlockKind::FromDump { .. })
    }
}

/// A node in the compiled processing graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProcessingBlock {
    pub id: BlockId,
    #[serde(flatten)]
    pub kind: BlockKind,
}

impl ProcessingBlock {
    /// Create a block of `kind`.
    pub fn new(id: impl Into<BlockId>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// Header classifier with one entry per rule.
    pub fn header_classifier(
        id: impl Into<BlockId>,
        rules: Vec<ClassifierRule>,
        priority: Priority,
        continue_on_no_match: bool,
    ) -> Self {
        Self::new(
            id,
            BlockKind::HeaderClassifier {
                rules,
                priority,
                continue_on_no_match,
            },
        )
    }

    pub fn discard(id: impl Into<BlockId>) -> Self {
        Self::new(id, BlockKind::Discard)
    }

    pub fn alert(id: impl Into<BlockId>, message: impl Into<String>) -> Self {
        Self::new(
            id,
            BlockKind::Alert {
                message: message.into(),
            },
        )
    }

    pub fn log(id: impl Into<BlockId>, message: impl Into<String>) -> Self {
        Self::new(
            id,
            BlockKind::Log {
                message: message.into(),
            },
        )
    }

    pub fn to_device(id: impl Into<BlockId>, interface: impl Into<String>) -> Self {
        Self::new(
            id,
            BlockKind::ToDevice {
                interface: interface.into(),
            },
        )
    }

    pub fn from_device(
        id: impl Into<BlockId>,
        interface: impl Into<String>,
        promiscuous: bool,
        running: bool,
    ) -> Self {
        Self::new(
            id,
            BlockKind::FromDevice {
                interface: interface.into(),
                promiscuous,
                running,
            },
        )
    }

    pub fn from_dump(
        id: impl Into<BlockId>,
        file_path: impl Into<String>,
        promiscuous: bool,
        running: bool,
    ) -> Self {
        Self::new(
            id,
            BlockKind::FromDump {
                file_path: file_path.into(),
                promiscuous,
                running,
            },
        )
    }

    /// Get the block id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Classifier entries, if this block is the header classifier.
    pub fn classifier_rules(&self) -> Option<&[ClassifierRule]> {
        match &self.kind {
            BlockKind::HeaderClassifier { rules, .. } => Some(rules),
            _ => None,
        }
    }

    /// Interface a `ToDevice` block writes to.
    pub fn output_interface(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::ToDevice { interface } => Some(interface),
            _ => None,
        }
    }
}
