use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A component declaration extracted from source
///
/// Immutable once produced by a scanner; the graph crate only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Declaration {
    /// Component name (e.g., "LoggedInComponent")
    pub name: String,

    /// Protocol describing what the instantiating component must provide
    pub dependency_protocol_name: String,

    /// Properties exposed to descendants, in declaration order
    #[serde(default)]
    pub properties: Vec<Property>,

    /// Type names referenced in the component body (candidate children)
    ///
    /// May contain duplicates and names that are not components.
    #[serde(default)]
    pub referenced_type_names: Vec<String>,

    /// Source file the declaration came from, for diagnostics only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl Declaration {
    /// Create a declaration with no properties and no references
    pub fn new(name: impl Into<String>, dependency_protocol_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependency_protocol_name: dependency_protocol_name.into(),
            properties: Vec::new(),
            referenced_type_names: Vec::new(),
            file_path: None,
        }
    }

    /// Builder: append an exposed property
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.properties.push(Property::new(name, type_name));
        self
    }

    /// Builder: append a referenced type name
    #[must_use]
    pub fn reference(mut self, type_name: impl Into<String>) -> Self {
        self.referenced_type_names.push(type_name.into());
        self
    }

    /// Builder: append several referenced type names
    #[must_use]
    pub fn references<I, S>(mut self, type_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.referenced_type_names
            .extend(type_names.into_iter().map(Into::into));
        self
    }

    /// Builder: set source file path
    #[must_use]
    pub fn file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Referenced type names with duplicates removed, first occurrence wins
    pub fn unique_references(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.referenced_type_names
            .iter()
            .map(String::as_str)
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Check whether a property with the given name is exposed
    #[must_use]
    pub fn exposes(&self, property_name: &str) -> bool {
        self.properties.iter().any(|p| p.name == property_name)
    }
}

/// A property a component exposes to its descendants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Property {
    pub name: String,

    /// Declared type, kept verbatim (e.g., "[String: Int]?")
    pub type_name: String,
}

impl Property {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}
