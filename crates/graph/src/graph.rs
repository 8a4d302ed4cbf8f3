use crate::error::{GraphError, Result};
use crate::registry::ComponentRegistry;
use crate::types::{ComponentNode, NodeHandle};
use petgraph::graph::DiGraph;
use petgraph::Direction;
use std::collections::HashSet;

/// Components plus the parent → child edges derived from their references
///
/// Borrows the registry it was linked from, so declarations cannot change
/// while a graph built from them is alive; re-linking yields a fresh graph.
/// Node indices in the backing `DiGraph` coincide with registry handles.
#[derive(Debug)]
pub struct LinkageGraph<'r> {
    registry: &'r ComponentRegistry,

    /// Directed graph (parent -> child)
    graph: DiGraph<NodeHandle, ()>,

    /// Parents per node, in discovery order
    parents: Vec<Vec<NodeHandle>>,

    /// (parent, child) pairs already linked
    links: HashSet<(NodeHandle, NodeHandle)>,

    /// Nodes that reference their own name
    self_references: Vec<NodeHandle>,

    validated: bool,
}

impl<'r> LinkageGraph<'r> {
    /// Graph with every registered node and no edges
    pub(crate) fn unlinked(registry: &'r ComponentRegistry) -> Self {
        let mut graph = DiGraph::with_capacity(registry.len(), 0);
        for node in registry.nodes() {
            graph.add_node(node.handle);
        }

        Self {
            registry,
            graph,
            parents: vec![Vec::new(); registry.len()],
            links: HashSet::new(),
            self_references: Vec::new(),
            validated: false,
        }
    }

    /// Record `parent` as an instantiator of `child`; repeated calls are no-ops
    pub(crate) fn add_parent(&mut self, child: NodeHandle, parent: NodeHandle) -> bool {
        if !self.links.insert((parent, child)) {
            return false;
        }
        self.parents[child.index()].push(parent);
        self.graph.add_edge(parent.into(), child.into(), ());
        true
    }

    pub(crate) fn record_self_reference(&mut self, handle: NodeHandle) {
        if !self.self_references.contains(&handle) {
            self.self_references.push(handle);
        }
    }

    pub(crate) fn mark_validated(&mut self) {
        self.validated = true;
    }

    pub fn registry(&self) -> &'r ComponentRegistry {
        self.registry
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&'r ComponentNode> {
        self.registry.node(handle)
    }

    pub fn name(&self, handle: NodeHandle) -> &'r str {
        self.registry.name(handle)
    }

    pub fn lookup(&self, name: &str) -> Option<NodeHandle> {
        self.registry.lookup(name)
    }

    /// All handles in registration order
    pub fn handles(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.graph.node_indices().map(NodeHandle::from)
    }

    /// Components that instantiate `handle`
    pub fn parents(&self, handle: NodeHandle) -> &[NodeHandle] {
        &self.parents[handle.index()]
    }

    pub fn parent_names(&self, handle: NodeHandle) -> Vec<&'r str> {
        self.parents(handle).iter().map(|p| self.name(*p)).collect()
    }

    /// Components instantiated by `handle`, ordered by name
    pub fn children(&self, handle: NodeHandle) -> Vec<NodeHandle> {
        let mut children: Vec<NodeHandle> = self.children_unordered(handle).collect();
        children.sort_by(|a, b| self.name(*a).cmp(self.name(*b)));
        children
    }

    pub(crate) fn children_unordered(
        &self,
        handle: NodeHandle,
    ) -> impl Iterator<Item = NodeHandle> + '_ {
        self.graph
            .neighbors_directed(handle.into(), Direction::Outgoing)
            .map(NodeHandle::from)
    }

    pub fn is_root(&self, handle: NodeHandle) -> bool {
        self.parents(handle).is_empty()
    }

    /// Parentless components, ordered by name
    pub fn roots(&self) -> Vec<NodeHandle> {
        let mut roots: Vec<NodeHandle> = self.handles().filter(|h| self.is_root(*h)).collect();
        roots.sort_by(|a, b| self.name(*a).cmp(self.name(*b)));
        roots
    }

    pub fn self_references(&self) -> &[NodeHandle] {
        &self.self_references
    }

    /// Whether cycle validation has passed on this graph
    pub fn is_validated(&self) -> bool {
        self.validated
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Every root → ... → `handle` path, ordered by the names along each path
    ///
    /// These are the ancestor chains a component's dependencies are resolved
    /// through. Only defined on a validated (acyclic) graph.
    pub fn ancestor_paths(&self, handle: NodeHandle) -> Result<Vec<Vec<NodeHandle>>> {
        if !self.validated {
            return Err(GraphError::scheduling(
                "ancestor paths requested on a graph that has not passed cycle validation",
            ));
        }

        let mut paths = Vec::new();
        let mut stack = vec![vec![handle]];

        while let Some(path) = stack.pop() {
            let head = path[path.len() - 1];
            let parents = self.parents(head);
            if parents.is_empty() {
                let mut path = path;
                path.reverse();
                paths.push(path);
                continue;
            }
            for parent in parents {
                let mut extended = path.clone();
                extended.push(*parent);
                stack.push(extended);
            }
        }

        paths.sort_by(|a, b| {
            a.iter()
                .map(|h| self.name(*h))
                .cmp(b.iter().map(|h| self.name(*h)))
        });
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CycleDetector, Linker, LinkerConfig};
    use needle_scanner::Declaration;
    use pretty_assertions::assert_eq;

    fn registry(decls: Vec<Declaration>) -> ComponentRegistry {
        ComponentRegistry::from_declarations(decls).unwrap()
    }

    fn names<'a>(graph: &LinkageGraph<'a>, handles: &[NodeHandle]) -> Vec<&'a str> {
        handles.iter().map(|h| graph.name(*h)).collect()
    }

    #[test]
    fn test_add_parent_is_idempotent() {
        let registry = registry(vec![
            Declaration::new("P", "EmptyDependency"),
            Declaration::new("C", "CDependency"),
        ]);
        let p = registry.lookup("P").unwrap();
        let c = registry.lookup("C").unwrap();

        let mut graph = LinkageGraph::unlinked(&registry);
        assert!(graph.add_parent(c, p));
        assert!(!graph.add_parent(c, p));

        assert_eq!(graph.parents(c), &[p]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_link_pairs_are_directed() {
        let registry = registry(vec![Declaration::new("P", "D"), Declaration::new("C", "D")]);
        let p = registry.lookup("P").unwrap();
        let c = registry.lookup("C").unwrap();

        let mut graph = LinkageGraph::unlinked(&registry);
        assert!(graph.add_parent(c, p));
        assert!(graph.add_parent(p, c));
        assert!(!graph.add_parent(p, c));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_many_parents_each_linked_once() {
        let mut decls: Vec<Declaration> = (0..64)
            .map(|i| {
                Declaration::new(format!("Parent{i:02}"), "EmptyDependency").reference("Shared")
            })
            .collect();
        decls.push(Declaration::new("Shared", "SharedDependency"));
        let registry = registry(decls);

        let graph = Linker::new(LinkerConfig::default()).link(&registry).unwrap();
        let shared = graph.lookup("Shared").unwrap();
        assert_eq!(graph.parents(shared).len(), 64);
        assert_eq!(graph.edge_count(), 64);
        assert_eq!(graph.parent_names(shared).first(), Some(&"Parent00"));
    }

    #[test]
    fn test_children_and_roots_sorted_by_name() {
        let registry = registry(vec![
            Declaration::new("Root", "EmptyDependency").references(["Zulu", "Alpha", "Mike"]),
            Declaration::new("Zulu", "D"),
            Declaration::new("Mike", "D"),
            Declaration::new("Alpha", "D"),
            Declaration::new("Island", "EmptyDependency"),
        ]);
        let graph = Linker::new(LinkerConfig::default()).link(&registry).unwrap();
        let root = graph.lookup("Root").unwrap();

        assert_eq!(names(&graph, &graph.children(root)), vec!["Alpha", "Mike", "Zulu"]);
        assert_eq!(names(&graph, &graph.roots()), vec!["Island", "Root"]);
    }

    #[test]
    fn test_ancestor_paths() {
        // Root -> A -> Leaf, Root -> B -> Leaf, Root -> Leaf
        let registry = registry(vec![
            Declaration::new("Leaf", "LeafDependency"),
            Declaration::new("B", "BDependency").reference("Leaf"),
            Declaration::new("A", "ADependency").reference("Leaf"),
            Declaration::new("Root", "EmptyDependency").references(["A", "B", "Leaf"]),
        ]);
        let mut graph = Linker::new(LinkerConfig::default()).link(&registry).unwrap();
        let leaf = graph.lookup("Leaf").unwrap();

        assert!(matches!(
            graph.ancestor_paths(leaf),
            Err(GraphError::Scheduling(_))
        ));

        CycleDetector::validate(&mut graph).unwrap();
        let paths: Vec<Vec<&str>> = graph
            .ancestor_paths(leaf)
            .unwrap()
            .iter()
            .map(|p| names(&graph, p))
            .collect();

        assert_eq!(
            paths,
            vec![
                vec!["Root", "A", "Leaf"],
                vec!["Root", "B", "Leaf"],
                vec!["Root", "Leaf"],
            ]
        );
    }
}
