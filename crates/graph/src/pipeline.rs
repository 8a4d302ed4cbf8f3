use crate::config::LinkerConfig;
use crate::cycles::CycleDetector;
use crate::error::Result;
use crate::graph::LinkageGraph;
use crate::linker::Linker;
use crate::registry::ComponentRegistry;
use crate::scheduler::{OrderEntry, ProcessingOrder, Scheduler};

/// Validated graph and its processing order, produced together
#[derive(Debug)]
pub struct Compilation<'r> {
    pub graph: LinkageGraph<'r>,
    pub order: ProcessingOrder,
}

impl Compilation<'_> {
    pub fn report(&self) -> Vec<OrderEntry> {
        self.order.report(&self.graph)
    }
}

/// Link, validate and schedule in one step
///
/// Either everything succeeds or nothing is returned; callers never see a
/// linked-but-unvalidated graph.
pub fn compile<'r>(
    registry: &'r ComponentRegistry,
    config: &LinkerConfig,
) -> Result<Compilation<'r>> {
    let mut graph = Linker::new(config.clone()).link(registry)?;
    CycleDetector::validate(&mut graph)?;
    let order = Scheduler::schedule(&graph)?;

    log::info!(
        "Compiled component graph: {} components, {} roots",
        order.len(),
        order.roots().count()
    );

    Ok(Compilation { graph, order })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphError;
    use needle_scanner::Declaration;

    #[test]
    fn test_compile_success() {
        let registry = ComponentRegistry::from_declarations(vec![
            Declaration::new("Root", "EmptyDependency").reference("Child"),
            Declaration::new("Child", "ChildDependency"),
        ])
        .unwrap();

        let compilation = compile(&registry, &LinkerConfig::default()).unwrap();
        assert!(compilation.graph.is_validated());
        assert_eq!(compilation.order.len(), 2);
        assert_eq!(compilation.report()[1].parents, vec!["Root".to_string()]);
    }

    #[test]
    fn test_compile_stops_at_cycle() {
        let registry = ComponentRegistry::from_declarations(vec![
            Declaration::new("A", "D").reference("B"),
            Declaration::new("B", "D").reference("A"),
        ])
        .unwrap();

        let err = compile(&registry, &LinkerConfig::default()).unwrap_err();
        assert_eq!(
            err,
            GraphError::CyclicDependency {
                path: vec!["A".into(), "B".into()]
            }
        );
    }
}
