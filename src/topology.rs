//! Segment to deployment-location resolution.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Where a statement is deployed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Location {
    /// A network segment, left for the deployment subsystem to place.
    Segment { segment: i32 },
    /// A specific execution host serving the segment.
    Host { segment: i32, host: String },
}

impl Location {
    /// Segment this location belongs to.
    pub fn segment(&self) -> i32 {
        match self {
            Location::Segment { segment } | Location::Host { segment, .. } => *segment,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Segment { segment } => write!(f, "segment {segment}"),
            Location::Host { segment, host } => write!(f, "{host} (segment {segment})"),
        }
    }
}

/// Maps a numeric segment identifier to a deployment location.
pub trait LocationResolver {
    fn resolve(&self, segment: i32) -> Location;
}

/// Resolves every segment to itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentResolver;

impl LocationResolver for SegmentResolver {
    fn resolve(&self, segment: i32) -> Location {
        Location::Segment { segment }
    }
}

/// Fixed segment-to-host table; unknown segments resolve to themselves.
#[derive(Debug, Clone, Default)]
pub struct StaticTopology {
    hosts: HashMap<i32, String>,
}

impl StaticTopology {
    /// Create a topology with no known hosts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `segment` to `host`.
    pub fn with_host(mut self, segment: i32, host: impl Into<String>) -> Self {
        self.hosts.insert(segment, host.into());
        self
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl FromIterator<(i32, String)> for StaticTopology {
    fn from_iter<T: IntoIterator<Item = (i32, String)>>(iter: T) -> Self {
        Self {
            hosts: iter.into_iter().collect(),
        }
    }
}

impl LocationResolver for StaticTopology {
    fn resolve(&self, segment: i32) -> Location {
        match self.hosts.get(&segment) {
            Some(host) => Location::Host {
                segment,
                host: host.clone(),
            },
            None => Location::Segment { segment },
        }
    }
}

impl<R: LocationResolver + ?Sized> LocationResolver for &R {
    fn resolve(&self, segment: i32) -> Location {
        (**self).resolve(segment)
    }
}

impl<R: LocationResolver + ?Sized> LocationResolver for Box<R> {
    fn resolve(&self, segment: i32) -> Location {
        (**self).resolve(segment)
    }
}
