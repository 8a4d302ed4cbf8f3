use crate::error::{GraphError, Result};
use crate::graph::LinkageGraph;
use crate::registry::ComponentRegistry;
use crate::types::NodeHandle;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// One slot of the processing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduledComponent {
    pub handle: NodeHandle,

    /// No parents: an entry point that inherits no dependencies
    pub is_root: bool,
}

/// Generation order in which every parent precedes each of its children
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingOrder {
    entries: Vec<ScheduledComponent>,
}

/// Emitter-facing view of a scheduled component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub name: String,
    pub dependency_protocol: String,
    pub parents: Vec<String>,
    pub root: bool,
}

impl ProcessingOrder {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledComponent> {
        self.entries.iter()
    }

    pub fn handles(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.entries.iter().map(|e| e.handle)
    }

    /// Root components, in processing order
    pub fn roots(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.entries.iter().filter(|e| e.is_root).map(|e| e.handle)
    }

    pub fn position(&self, handle: NodeHandle) -> Option<usize> {
        self.entries.iter().position(|e| e.handle == handle)
    }

    /// Names in processing order; handles unknown to `registry` are skipped
    pub fn names<'a>(&self, registry: &'a ComponentRegistry) -> Vec<&'a str> {
        self.handles()
            .filter_map(|h| registry.node(h))
            .map(|node| node.name())
            .collect()
    }

    pub fn report(&self, graph: &LinkageGraph<'_>) -> Vec<OrderEntry> {
        self.entries
            .iter()
            .filter_map(|entry| {
                let node = graph.node(entry.handle)?;
                Some(OrderEntry {
                    name: node.name().to_string(),
                    dependency_protocol: node.dependency_protocol().to_string(),
                    parents: graph
                        .parent_names(entry.handle)
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                    root: entry.is_root,
                })
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a ProcessingOrder {
    type Item = &'a ScheduledComponent;
    type IntoIter = std::slice::Iter<'a, ScheduledComponent>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Topological scheduler over a validated linkage graph
pub struct Scheduler;

impl Scheduler {
    /// Kahn's algorithm; among simultaneously eligible nodes the smallest name goes first
    pub fn schedule(graph: &LinkageGraph<'_>) -> Result<ProcessingOrder> {
        if !graph.is_validated() {
            return Err(GraphError::scheduling(
                "graph has not passed cycle validation",
            ));
        }

        let mut pending: Vec<usize> = graph.handles().map(|h| graph.parents(h).len()).collect();
        let mut ready: BinaryHeap<Reverse<(&str, NodeHandle)>> = graph
            .handles()
            .filter(|h| pending[h.index()] == 0)
            .map(|h| Reverse((graph.name(h), h)))
            .collect();

        let mut entries = Vec::with_capacity(graph.node_count());
        while let Some(Reverse((_, handle))) = ready.pop() {
            entries.push(ScheduledComponent {
                handle,
                is_root: graph.is_root(handle),
            });

            for child in graph.children_unordered(handle) {
                let remaining = &mut pending[child.index()];
                *remaining -= 1;
                if *remaining == 0 {
                    ready.push(Reverse((graph.name(child), child)));
                }
            }
        }

        if entries.len() != graph.node_count() {
            return Err(GraphError::scheduling(format!(
                "{} of {} components could not be ordered",
                graph.node_count() - entries.len(),
                graph.node_count()
            )));
        }

        log::debug!(
            "Scheduled {} components ({} roots)",
            entries.len(),
            entries.iter().filter(|e| e.is_root).count()
        );

        Ok(ProcessingOrder { entries })
    }
}
