//! Parsed firewall rule model.
//!
//! These are the values the rule loader hands to the graph compiler. A rule's
//! position in the rule list is its index: it decides classifier priority
//! tiebreaks and the classifier output port the rule's chain hangs off.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Classifier priority attached to a rule or to the classifier itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Packet header fields a rule may match on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HeaderField {
    EthSrc,
    EthDst,
    EthType,
    VlanVid,
    VlanPcp,
    Ipv4Proto,
    Ipv4Src,
    Ipv4Dst,
    TcpSrc,
    TcpDst,
    UdpSrc,
    UdpDst,
}

/// Header-match predicate. An empty match accepts every packet.
///
/// The compiler treats this as opaque: it is copied into the classifier
/// unchanged and its values are never interpreted here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderMatch {
    fields: BTreeMap<HeaderField, String>,
}

impl HeaderMatch {
    /// Create a match-all header match.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field constraint, replacing any previous value for the field.
    pub fn with(mut self, field: HeaderField, value: impl Into<String>) -> Self {
        self.fields.insert(field, value.into());
        self
    }

    /// Value required for `field`, if constrained.
    pub fn get(&self, field: HeaderField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn is_match_all(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// An effect applied to traffic matched by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawAction", into = "RawAction")]
pub enum Action {
    Alert(String),
    Output(String),
    Drop,
    Log(String),
    /// An action type the loader did not recognise. The compiler skips it.
    Unknown(String),
}

impl Action {
    /// The action type as written in rule files.
    pub fn kind(&self) -> &str {
        match self {
            Action::Alert(_) => "alert",
            Action::Output(_) => "output",
            Action::Drop => "drop",
            Action::Log(_) => "log",
            Action::Unknown(kind) => kind,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Alert(message) => write!(f, "alert({message})"),
            Action::Output(interface) => write!(f, "output({interface})"),
            Action::Drop => write!(f, "drop"),
            Action::Log(message) => write!(f, "log({message})"),
            Action::Unknown(kind) => write!(f, "unknown({kind})"),
        }
    }
}

/// On-disk form of an action.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawAction {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interface: Option<String>,
}

impl TryFrom<RawAction> for Action {
    type Error = String;

    fn try_from(raw: RawAction) -> std::result::Result<Self, Self::Error> {
        let action = match raw.kind.to_ascii_lowercase().as_str() {
            "alert" => Action::Alert(raw.message.unwrap_or_default()),
            "log" => Action::Log(raw.message.unwrap_or_default()),
            "drop" => Action::Drop,
            "output" => match raw.interface {
                Some(interface) if !interface.is_empty() => Action::Output(interface),
                _ => return Err("output action requires an interface".to_string()),
            },
            _ => Action::Unknown(raw.kind),
        };
        Ok(action)
    }
}

impl From<Action> for RawAction {
    fn from(action: Action) -> Self {
        let kind = action.kind().to_string();
        let (message, interface) = match action {
            Action::Alert(message) | Action::Log(message) => (Some(message), None),
            Action::Output(interface) => (None, Some(interface)),
            Action::Drop | Action::Unknown(_) => (None, None),
        };
        RawAction {
            kind,
            message,
            interface,
        }
    }
}

/// One firewall policy entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    #[serde(rename = "match", default)]
    pub header_match: HeaderMatch,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl Rule {
    /// Create a rule from its parts.
    pub fn new(header_match: HeaderMatch, priority: Priority, actions: Vec<Action>) -> Self {
        Self {
            header_match,
            priority,
            actions,
        }
    }
}
