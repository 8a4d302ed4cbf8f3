use crate::error::{GraphError, Result};
use crate::types::{ComponentNode, NodeHandle};
use needle_scanner::Declaration;
use std::collections::HashMap;

/// Sole owner of component nodes, indexed by name
///
/// Every declaration of a full scan must be registered before linking,
/// since references may point at components scanned later.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    nodes: Vec<ComponentNode>,
    name_index: HashMap<String, NodeHandle>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register all declarations in iteration order, stopping at the first duplicate
    pub fn from_declarations<I>(declarations: I) -> Result<Self>
    where
        I: IntoIterator<Item = Declaration>,
    {
        let mut registry = Self::new();
        for declaration in declarations {
            registry.register(declaration)?;
        }
        log::debug!("Registered {} components", registry.len());
        Ok(registry)
    }

    /// Add a declaration; a duplicate name leaves the registry untouched
    pub fn register(&mut self, declaration: Declaration) -> Result<NodeHandle> {
        if let Some(&existing) = self.name_index.get(&declaration.name) {
            return Err(GraphError::AmbiguousComponent {
                name: declaration.name,
                first: self.nodes[existing.index()].declaration.file_path.clone(),
                second: declaration.file_path,
            });
        }

        let handle = NodeHandle::new(self.nodes.len());
        self.name_index.insert(declaration.name.clone(), handle);
        self.nodes.push(ComponentNode {
            handle,
            declaration,
        });

        Ok(handle)
    }

    pub fn lookup(&self, name: &str) -> Option<NodeHandle> {
        self.name_index.get(name).copied()
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&ComponentNode> {
        self.nodes.get(handle.index())
    }

    /// Name of a registered component
    ///
    /// Panics on a handle from another registry.
    pub fn name(&self, handle: NodeHandle) -> &str {
        self.nodes[handle.index()].name()
    }

    /// Nodes in registration order
    pub fn nodes(&self) -> impl Iterator<Item = &ComponentNode> {
        self.nodes.iter()
    }

    /// Handles ordered by ascending component name
    pub fn handles_by_name(&self) -> Vec<NodeHandle> {
        let mut handles: Vec<NodeHandle> = self.nodes.iter().map(|n| n.handle).collect();
        handles.sort_by(|a, b| self.name(*a).cmp(self.name(*b)));
        handles
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
