use serde::{Deserialize, Serialize};

/// Configuration for pattern-based declaration scanning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScannerConfig {
    /// Module that defines the component base classes (optional qualifier in source)
    pub module_name: String,

    /// Generic base class of child components, e.g. `Component<Dep>`
    pub component_base: String,

    /// Non-generic base class of root components
    pub bootstrap_base: String,

    /// Dependency protocol assigned to bootstrap components
    pub empty_dependency_protocol: String,

    /// File extensions the CLI feeds to the scanner (without dot)
    pub file_extensions: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            module_name: "NeedleFoundation".to_string(),
            component_base: "Component".to_string(),
            bootstrap_base: "BootstrapComponent".to_string(),
            empty_dependency_protocol: "EmptyDependency".to_string(),
            file_extensions: vec!["swift".to_string()],
        }
    }
}

impl ScannerConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("module_name", &self.module_name),
            ("component_base", &self.component_base),
            ("bootstrap_base", &self.bootstrap_base),
            ("empty_dependency_protocol", &self.empty_dependency_protocol),
        ] {
            if !is_identifier(value) {
                return Err(format!("{field} must be a plain identifier, got {value:?}"));
            }
        }

        if self.component_base == self.bootstrap_base {
            return Err(format!(
                "component_base and bootstrap_base must differ (both {:?})",
                self.component_base
            ));
        }

        if self.file_extensions.is_empty() {
            return Err("file_extensions must not be empty".to_string());
        }

        Ok(())
    }

    /// Check whether a path has one of the configured extensions
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.file_extensions
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(ext))
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(ScannerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ScannerConfig::default();

        // Qualified names would break the generated expressions
        config.component_base = "Needle.Component".to_string();
        assert!(config.validate().is_err());

        config.component_base = "Component".to_string();
        config.bootstrap_base = "Component".to_string();
        assert!(config.validate().is_err());

        config.bootstrap_base = "BootstrapComponent".to_string();
        config.file_extensions.clear();
        assert!(config.validate().is_err());

        config.file_extensions.push("swift".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_accepts_extension() {
        let config = ScannerConfig::default();
        assert!(config.accepts_extension("swift"));
        assert!(config.accepts_extension("SWIFT"));
        assert!(!config.accepts_extension("rs"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ScannerConfig = toml::from_str(r#"module_name = "DI""#).unwrap();
        assert_eq!(config.module_name, "DI");
        assert_eq!(config.component_base, "Component");
    }
}
