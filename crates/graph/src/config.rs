use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for linking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LinkerConfig {
    /// What to do with parentless components that still require dependencies
    pub unparented: UnparentedPolicy,

    /// Dependency protocols a parentless component may legitimately declare
    pub root_dependency_protocols: Vec<String>,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            unparented: UnparentedPolicy::Warn,
            root_dependency_protocols: vec!["EmptyDependency".to_string()],
        }
    }
}

impl LinkerConfig {
    /// Fail linking on any unreachable component
    pub fn strict() -> Self {
        Self {
            unparented: UnparentedPolicy::Deny,
            ..Default::default()
        }
    }

    /// Accept unreachable components silently
    pub fn lenient() -> Self {
        Self {
            unparented: UnparentedPolicy::Allow,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.unparented != UnparentedPolicy::Allow && self.root_dependency_protocols.is_empty() {
            return Err(GraphError::InvalidConfig(
                "root_dependency_protocols must not be empty unless unparented = \"allow\""
                    .to_string(),
            ));
        }

        if let Some(blank) = self
            .root_dependency_protocols
            .iter()
            .find(|p| p.trim().is_empty())
        {
            return Err(GraphError::InvalidConfig(format!(
                "root_dependency_protocols contains a blank entry: {blank:?}"
            )));
        }

        Ok(())
    }

    pub(crate) fn is_root_protocol(&self, protocol: &str) -> bool {
        self.root_dependency_protocols.iter().any(|p| p == protocol)
    }
}

/// Handling of components that nothing instantiates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnparentedPolicy {
    Allow,

    /// Log a warning and keep going
    #[default]
    Warn,

    /// Fail linking with `GraphError::UnreachableComponent`
    Deny,
}
