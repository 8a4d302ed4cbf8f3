use crate::error::Result;
use crate::types::Declaration;

/// Capability: given raw source text, produce component declarations
///
/// Implementations must be pure functions of their input so files can be
/// scanned concurrently.
pub trait DeclarationScanner: Send + Sync {
    /// Extract declarations in source order
    fn scan(&self, content: &str, file_path: Option<&str>) -> Result<Vec<Declaration>>;
}

impl<S: DeclarationScanner + ?Sized> DeclarationScanner for Box<S> {
    fn scan(&self, content: &str, file_path: Option<&str>) -> Result<Vec<Declaration>> {
        (**self).scan(content, file_path)
    }
}

impl<S: DeclarationScanner + ?Sized> DeclarationScanner for &S {
    fn scan(&self, content: &str, file_path: Option<&str>) -> Result<Vec<Declaration>> {
        (**self).scan(content, file_path)
    }
}
