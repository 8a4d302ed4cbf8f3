//! # Needle Scanner
//!
//! Declaration model and source scanning for the component graph.
//!
//! The graph crate consumes [`Declaration`] values and never looks at source
//! text. Anything that can turn text into declarations implements
//! [`DeclarationScanner`]; [`PatternScanner`] is the shallow, expression-based
//! implementation used by the CLI.
//!
//! ## Architecture
//!
//! ```text
//! Source text
//!     │
//!     ├──> Quick reject (no component base names mentioned)
//!     │
//!     ├──> Sanitize (blank comments and string literals)
//!     │
//!     ├──> Header matching
//!     │    ├─> class X: [Module.]Component<XDependency>
//!     │    └─> class Root: [Module.]BootstrapComponent
//!     │
//!     └──> Body extraction (brace-balanced)
//!          ├─> Exposed properties (top-level `var name: Type`)
//!          └─> Referenced type names (`TypeName(` call sites)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use needle_scanner::{DeclarationScanner, PatternScanner, ScannerConfig};
//!
//! let scanner = PatternScanner::new(ScannerConfig::default()).unwrap();
//! let source = r#"
//! class RootComponent: BootstrapComponent {
//!     var child: ChildComponent { ChildComponent(parent: self) }
//! }
//! "#;
//!
//! let decls = scanner.scan(source, Some("Root.swift")).unwrap();
//! assert_eq!(decls[0].referenced_type_names, vec!["ChildComponent"]);
//! ```

mod config;
mod error;
mod pattern;
mod scanner;
mod types;

pub use config::ScannerConfig;
pub use error::{Result, ScannerError};
pub use pattern::PatternScanner;
pub use scanner::DeclarationScanner;
pub use types::{Declaration, Property};
