use needle_scanner::{Declaration, Property};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, non-owning reference to a component in the registry arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeHandle(u32);

impl NodeHandle {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position in the registry arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<NodeHandle> for NodeIndex {
    fn from(handle: NodeHandle) -> Self {
        NodeIndex::new(handle.index())
    }
}

impl From<NodeIndex> for NodeHandle {
    fn from(idx: NodeIndex) -> Self {
        NodeHandle::new(idx.index())
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Component in the registry
///
/// Parent links are not stored here: they are derived per link and live in
/// the [`LinkageGraph`](crate::LinkageGraph).
#[derive(Debug, Clone)]
pub struct ComponentNode {
    pub handle: NodeHandle,
    pub declaration: Declaration,
}

impl ComponentNode {
    pub fn name(&self) -> &str {
        &self.declaration.name
    }

    pub fn dependency_protocol(&self) -> &str {
        &self.declaration.dependency_protocol_name
    }

    pub fn properties(&self) -> &[Property] {
        &self.declaration.properties
    }
}
