//! # Needle Graph
//!
//! Component linkage for compile-time dependency injection: which component
//! instantiates which, whether that nesting is a legal hierarchy, and the
//! order in which code generation can visit components so every one of them
//! resolves its dependencies from already-processed ancestors.
//!
//! ## Architecture
//!
//! ```text
//! Declaration[]
//!     │
//!     ├──> Component Registry (arena + name index)
//!     │      └─ duplicate name → AmbiguousComponent
//!     │
//!     ├──> Linker
//!     │      ├─ referenced names → parent edges (petgraph)
//!     │      ├─ unknown names ignored (plain types)
//!     │      └─ self references recorded
//!     │
//!     ├──> Cycle Detector (three-colour DFS, full graph)
//!     │      └─ cycle → CyclicDependency { path }
//!     │
//!     └──> Scheduler (Kahn, name-ordered ties)
//!            └─ ProcessingOrder: parents first, roots flagged
//! ```
//!
//! ## Example
//!
//! ```rust
//! use needle_graph::{compile, ComponentRegistry, LinkerConfig};
//! use needle_scanner::Declaration;
//!
//! let registry = ComponentRegistry::from_declarations(vec![
//!     Declaration::new("Child", "ChildDependency"),
//!     Declaration::new("Parent", "EmptyDependency").reference("Child"),
//! ])
//! .unwrap();
//!
//! let compilation = compile(&registry, &LinkerConfig::default()).unwrap();
//! assert_eq!(compilation.order.names(&registry), vec!["Parent", "Child"]);
//! ```

mod config;
mod cycles;
mod error;
mod graph;
mod linker;
mod pipeline;
mod registry;
mod scheduler;
mod types;

pub use config::{LinkerConfig, UnparentedPolicy};
pub use cycles::CycleDetector;
pub use error::{GraphError, Result};
pub use graph::LinkageGraph;
pub use linker::Linker;
pub use pipeline::{compile, Compilation};
pub use registry::ComponentRegistry;
pub use scheduler::{OrderEntry, ProcessingOrder, ScheduledComponent, Scheduler};
pub use types::{ComponentNode, NodeHandle};
