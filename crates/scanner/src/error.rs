use thiserror::Error;

/// Result type for scanner operations
pub type Result<T> = std::result::Result<T, ScannerError>;

/// Errors that can occur while extracting declarations
#[derive(Error, Debug)]
pub enum ScannerError {
    /// A configured name produced an invalid expression
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Component header found but its body never closes
    #[error("Unbalanced body for component {name} in {file}")]
    UnbalancedBody { name: String, file: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ScannerError {
    /// Create an unbalanced body error; `file` falls back to "<input>"
    pub fn unbalanced(name: impl Into<String>, file: Option<&str>) -> Self {
        Self::UnbalancedBody {
            name: name.into(),
            file: file.unwrap_or("<input>").to_string(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
