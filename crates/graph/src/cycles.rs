use crate::error::{GraphError, Result};
use crate::graph::LinkageGraph;
use crate::types::NodeHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Gate between linking and scheduling: the parent relation must be acyclic
pub struct CycleDetector;

impl CycleDetector {
    /// Validate the graph and mark it schedulable
    ///
    /// Self-instantiation is reported as a cycle of length 1.
    pub fn validate(graph: &mut LinkageGraph<'_>) -> Result<()> {
        if let Some(cycle) = Self::find_cycle(graph) {
            let path: Vec<String> = cycle.iter().map(|h| graph.name(*h).to_string()).collect();
            log::debug!("Cycle detected: {}", path.join(" -> "));
            return Err(GraphError::CyclicDependency { path });
        }

        graph.mark_validated();
        Ok(())
    }

    /// First cycle found, rotated to start at its smallest name
    ///
    /// Full-graph DFS over parent -> child edges, starting from every node in
    /// name order, so cycles unreachable from any root are found too. Each node
    /// is expanded once.
    pub fn find_cycle(graph: &LinkageGraph<'_>) -> Option<Vec<NodeHandle>> {
        if let Some(first) = graph
            .self_references()
            .iter()
            .min_by(|a, b| graph.name(**a).cmp(graph.name(**b)))
        {
            return Some(vec![*first]);
        }

        let children: Vec<Vec<NodeHandle>> = graph.handles().map(|h| graph.children(h)).collect();
        let mut marks = vec![Mark::Unvisited; graph.node_count()];

        for start in graph.registry().handles_by_name() {
            if marks[start.index()] != Mark::Unvisited {
                continue;
            }

            // (node, index of next child to explore)
            let mut stack: Vec<(NodeHandle, usize)> = vec![(start, 0)];
            marks[start.index()] = Mark::InProgress;

            while let Some(frame) = stack.last_mut() {
                let node = frame.0;
                let Some(&child) = children[node.index()].get(frame.1) else {
                    marks[node.index()] = Mark::Done;
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                match marks[child.index()] {
                    Mark::Unvisited => {
                        marks[child.index()] = Mark::InProgress;
                        stack.push((child, 0));
                    }
                    Mark::InProgress => {
                        let from = stack.iter().position(|(h, _)| *h == child).unwrap_or(0);
                        let cycle: Vec<NodeHandle> =
                            stack[from..].iter().map(|(h, _)| *h).collect();
                        return Some(Self::canonical(graph, cycle));
                    }
                    Mark::Done => {}
                }
            }
        }

        None
    }

    fn canonical(graph: &LinkageGraph<'_>, mut cycle: Vec<NodeHandle>) -> Vec<NodeHandle> {
        let smallest = (0..cycle.len())
            .min_by(|a, b| graph.name(cycle[*a]).cmp(graph.name(cycle[*b])))
            .unwrap_or(0);
        cycle.rotate_left(smallest);
        cycle
    }
}
