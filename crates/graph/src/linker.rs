use crate::config::{LinkerConfig, UnparentedPolicy};
use crate::error::{GraphError, Result};
use crate::graph::LinkageGraph;
use crate::registry::ComponentRegistry;
use crate::types::{ComponentNode, NodeHandle};

/// Resolve name references between registered components into parent edges
pub struct Linker {
    config: LinkerConfig,
}

impl Linker {
    pub fn new(config: LinkerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LinkerConfig {
        &self.config
    }

    /// Build the linkage graph for a fully populated registry
    ///
    /// Pure function of the registry contents: linking twice yields the same
    /// parents per node, whatever order the declarations were registered in.
    pub fn link<'r>(&self, registry: &'r ComponentRegistry) -> Result<LinkageGraph<'r>> {
        self.config.validate()?;

        let mut graph = LinkageGraph::unlinked(registry);

        // Parents are discovered in name order so parent lists do not depend
        // on registration order
        let mut nodes: Vec<&ComponentNode> = registry.nodes().collect();
        nodes.sort_by(|a, b| a.name().cmp(b.name()));

        for parent in nodes {
            for reference in parent.declaration.unique_references() {
                match registry.lookup(reference) {
                    Some(child) if child == parent.handle => {
                        log::debug!("{} instantiates itself", parent.name());
                        graph.record_self_reference(child);
                    }
                    Some(child) => {
                        graph.add_parent(child, parent.handle);
                    }
                    None => {
                        log::trace!(
                            "{}: {} is not a component, ignoring",
                            parent.name(),
                            reference
                        );
                    }
                }
            }
        }

        self.check_unreachable(&graph)?;

        log::info!(
            "Linked component graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(graph)
    }

    /// Parentless components whose dependency protocol only a parent could satisfy
    ///
    /// Self-instantiating components are left to cycle detection.
    pub fn unreachable(&self, graph: &LinkageGraph<'_>) -> Vec<NodeHandle> {
        graph
            .roots()
            .into_iter()
            .filter(|h| !graph.self_references().contains(h))
            .filter(|h| {
                graph
                    .node(*h)
                    .map(|node| !self.config.is_root_protocol(node.dependency_protocol()))
                    .unwrap_or(false)
            })
            .collect()
    }

    fn check_unreachable(&self, graph: &LinkageGraph<'_>) -> Result<()> {
        if self.config.unparented == UnparentedPolicy::Allow {
            return Ok(());
        }

        for handle in self.unreachable(graph) {
            let Some(node) = graph.node(handle) else {
                continue;
            };

            match self.config.unparented {
                UnparentedPolicy::Deny => {
                    return Err(GraphError::UnreachableComponent {
                        name: node.name().to_string(),
                        dependency_protocol: node.dependency_protocol().to_string(),
                    });
                }
                UnparentedPolicy::Warn => {
                    log::warn!(
                        "Component {} is never instantiated but requires {}",
                        node.name(),
                        node.dependency_protocol()
                    );
                }
                UnparentedPolicy::Allow => {}
            }
        }

        Ok(())
    }
}

impl Default for Linker {
    fn default() -> Self {
        Self::new(LinkerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use needle_scanner::Declaration;
    use pretty_assertions::assert_eq;

    fn registry(decls: Vec<Declaration>) -> ComponentRegistry {
        ComponentRegistry::from_declarations(decls).unwrap()
    }

    #[test]
    fn test_link_parent_child() {
        let registry = registry(vec![
            Declaration::new("ParentComp", "EmptyDependency")
                .references(["ChildComp", "someOtherStuff"]),
            Declaration::new("ChildComp", "ChildDependency"),
        ]);

        let graph = Linker::default().link(&registry).unwrap();
        let child = graph.lookup("ChildComp").unwrap();
        let parent = graph.lookup("ParentComp").unwrap();

        assert_eq!(graph.parents(child), &[parent]);
        assert!(graph.parents(parent).is_empty());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_duplicate_references_create_one_edge() {
        let registry = registry(vec![
            Declaration::new("P", "EmptyDependency").references(["C", "C", "C"]),
            Declaration::new("C", "CDependency"),
        ]);

        let graph = Linker::default().link(&registry).unwrap();
        let c = graph.lookup("C").unwrap();
        assert_eq!(graph.parents(c).len(), 1);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_self_reference_recorded_not_parented() {
        let registry = registry(vec![Declaration::new("A", "ADependency").references(["A", "A"])]);

        let graph = Linker::default().link(&registry).unwrap();
        let a = graph.lookup("A").unwrap();
        assert!(graph.parents(a).is_empty());
        assert_eq!(graph.self_references(), &[a]);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_unknown_reference_ignored() {
        let registry = registry(vec![
            Declaration::new("P", "EmptyDependency").references(["String", "URLSession"]),
        ]);

        let graph = Linker::default().link(&registry).unwrap();
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_multiple_parents_in_name_order() {
        let registry = registry(vec![
            Declaration::new("Shared", "SharedDependency"),
            Declaration::new("Zeta", "EmptyDependency").reference("Shared"),
            Declaration::new("Alpha", "EmptyDependency").reference("Shared"),
        ]);

        let graph = Linker::default().link(&registry).unwrap();
        let shared = graph.lookup("Shared").unwrap();
        assert_eq!(graph.parent_names(shared), vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_unreachable_policies() {
        let decls = || {
            vec![
                Declaration::new("Root", "EmptyDependency"),
                Declaration::new("Orphan", "OrphanDependency"),
                Declaration::new("Looping", "LoopingDependency").reference("Looping"),
            ]
        };
        let registry = registry(decls());

        let linker = Linker::new(LinkerConfig::default());
        let unreachable: Vec<_> = linker
            .unreachable(&linker.link(&registry).unwrap())
            .into_iter()
            .map(|h| registry.name(h))
            .collect();
        assert_eq!(unreachable, vec!["Orphan"]);

        assert!(Linker::new(LinkerConfig::lenient()).link(&registry).is_ok());

        let err = Linker::new(LinkerConfig::strict()).link(&registry).unwrap_err();
        assert_eq!(
            err,
            GraphError::UnreachableComponent {
                name: "Orphan".into(),
                dependency_protocol: "OrphanDependency".into(),
            }
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = LinkerConfig {
            unparented: UnparentedPolicy::Deny,
            root_dependency_protocols: Vec::new(),
        };
        let registry = registry(vec![]);
        assert!(matches!(
            Linker::new(config).link(&registry),
            Err(GraphError::InvalidConfig(_))
        ));
    }
}
