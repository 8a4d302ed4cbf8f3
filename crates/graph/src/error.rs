use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Two declarations share a name; raised at registration
    #[error("Ambiguous component: {name} is declared more than once{}", provenance(.first, .second))]
    AmbiguousComponent {
        name: String,
        first: Option<String>,
        second: Option<String>,
    },

    /// The parent relation is not acyclic; `path` is the cycle in traversal order
    #[error("Cyclic dependency: {}", render_cycle(.path))]
    CyclicDependency { path: Vec<String> },

    /// Caller contract violation (e.g. scheduling an unvalidated graph)
    #[error("Scheduling error: {0}")]
    Scheduling(String),

    /// A component with no parents whose dependencies nothing can satisfy
    #[error("Unreachable component: {name} has no parents but requires {dependency_protocol}")]
    UnreachableComponent {
        name: String,
        dependency_protocol: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GraphError {
    pub fn scheduling(msg: impl Into<String>) -> Self {
        Self::Scheduling(msg.into())
    }

    /// True for problems in the scanned input, false for caller or config mistakes
    pub fn is_fatal_data_error(&self) -> bool {
        matches!(
            self,
            Self::AmbiguousComponent { .. }
                | Self::CyclicDependency { .. }
                | Self::UnreachableComponent { .. }
        )
    }
}

fn provenance(first: &Option<String>, second: &Option<String>) -> String {
    match (first, second) {
        (Some(a), Some(b)) => format!(" (in {a} and {b})"),
        (Some(a), None) | (None, Some(a)) => format!(" (in {a})"),
        (None, None) => String::new(),
    }
}

fn render_cycle(path: &[String]) -> String {
    match path.first() {
        Some(head) => format!("{} -> {head}", path.join(" -> ")),
        None => "<empty>".to_string(),
    }
}
