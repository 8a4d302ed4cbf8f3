use crate::config::ScannerConfig;
use crate::error::{Result, ScannerError};
use crate::scanner::DeclarationScanner;
use crate::types::{Declaration, Property};
use regex::Regex;
use std::collections::HashSet;

/// Shallow, expression-based declaration scanner
///
/// Recognizes component classes by their base class, then pulls exposed
/// properties and constructor-call sites out of the brace-balanced body.
/// Comments and string literals are blanked before matching so they never
/// contribute references.
pub struct PatternScanner {
    config: ScannerConfig,
    component_header: Regex,
    bootstrap_header: Regex,
    property: Regex,
    instantiation: Regex,
}

/// Modifiers that hide a property from descendants
const HIDDEN_MODIFIERS: &[&str] = &["private", "fileprivate"];

#[derive(Debug)]
struct Header {
    start: usize,
    end: usize,
    name: String,
    dependency_protocol: String,
}

impl PatternScanner {
    pub fn new(config: ScannerConfig) -> Result<Self> {
        config.validate().map_err(ScannerError::invalid_config)?;

        let module = regex::escape(&config.module_name);
        let component_header = Regex::new(&format!(
            r"\bclass\s+(\w+)(?:\s*<[^>{{]*>)?\s*:\s*(?:{module}\.)?{}\s*<\s*([\w.]+)\s*>",
            regex::escape(&config.component_base)
        ))?;
        let bootstrap_header = Regex::new(&format!(
            r"\bclass\s+(\w+)(?:\s*<[^>{{]*>)?\s*:\s*(?:{module}\.)?{}\b",
            regex::escape(&config.bootstrap_base)
        ))?;
        let property = Regex::new(
            r"(?m)^[ \t]*((?:@?\w+(?:\([^)]*\))?[ \t]+)*)var[ \t]+(\w+)[ \t]*:[ \t]*([^{=\n]+)",
        )?;
        let instantiation = Regex::new(r"\b([A-Z]\w*)\s*\(")?;

        Ok(Self {
            config,
            component_header,
            bootstrap_header,
            property,
            instantiation,
        })
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    fn headers(&self, text: &str) -> Vec<Header> {
        let mut headers = Vec::new();

        for caps in self.component_header.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            headers.push(Header {
                start: whole.start(),
                end: whole.end(),
                name: caps[1].to_string(),
                dependency_protocol: caps[2].to_string(),
            });
        }

        for caps in self.bootstrap_header.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            headers.push(Header {
                start: whole.start(),
                end: whole.end(),
                name: caps[1].to_string(),
                dependency_protocol: self.config.empty_dependency_protocol.clone(),
            });
        }

        headers.sort_by_key(|h| h.start);
        headers
    }

    fn declaration(
        &self,
        text: &str,
        header: &Header,
        file_path: Option<&str>,
    ) -> Result<Declaration> {
        let open = text[header.end..]
            .find('{')
            .map(|offset| header.end + offset)
            .ok_or_else(|| ScannerError::unbalanced(&header.name, file_path))?;
        let close = matching_brace(text, open)
            .ok_or_else(|| ScannerError::unbalanced(&header.name, file_path))?;
        let body = &text[open + 1..close];

        let mut declaration = Declaration::new(&header.name, &header.dependency_protocol);
        declaration.properties = self.properties(body);
        declaration.referenced_type_names = self.references(body);
        if let Some(path) = file_path {
            declaration = declaration.file_path(path);
        }

        log::debug!(
            "Scanned component {} ({} properties, {} references)",
            declaration.name,
            declaration.properties.len(),
            declaration.referenced_type_names.len()
        );

        Ok(declaration)
    }

    /// Properties declared directly in the body (nested blocks excluded)
    fn properties(&self, body: &str) -> Vec<Property> {
        let top_level = blank_nested(body);
        self.property
            .captures_iter(&top_level)
            .filter(|caps| {
                !caps[1]
                    .split_whitespace()
                    .any(|modifier| HIDDEN_MODIFIERS.contains(&modifier))
            })
            .map(|caps| Property::new(&caps[2], caps[3].trim()))
            .collect()
    }

    /// Constructor-call type names, deduplicated in first-seen order
    fn references(&self, body: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.instantiation
            .captures_iter(body)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|name| *name != "Self" && seen.insert(*name))
            .map(str::to_string)
            .collect()
    }
}

impl DeclarationScanner for PatternScanner {
    fn scan(&self, content: &str, file_path: Option<&str>) -> Result<Vec<Declaration>> {
        // Quick reject before running the expressions
        if !content.contains(self.config.component_base.as_str())
            && !content.contains(self.config.bootstrap_base.as_str())
        {
            return Ok(Vec::new());
        }

        let text = sanitize(content);
        self.headers(&text)
            .iter()
            .map(|header| self.declaration(&text, header, file_path))
            .collect()
    }
}

#[derive(Clone, Copy)]
enum LexState {
    Code,
    LineComment,
    BlockComment(usize),
    Str,
}

/// Replace comments and string contents with spaces, keeping byte offsets
fn sanitize(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut state = LexState::Code;
    let mut chars = src.chars().peekable();
    // Open paren depth per `\(` interpolation, innermost last
    let mut interpolations: Vec<usize> = Vec::new();

    while let Some(c) = chars.next() {
        match state {
            LexState::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    state = LexState::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    state = LexState::BlockComment(1);
                }
                '"' => {
                    out.push('"');
                    state = LexState::Str;
                }
                ')' if interpolations.last() == Some(&0) => {
                    interpolations.pop();
                    out.push(' ');
                    state = LexState::Str;
                }
                '(' | ')' => {
                    if let Some(depth) = interpolations.last_mut() {
                        if c == '(' {
                            *depth += 1;
                        } else {
                            *depth -= 1;
                        }
                    }
                    out.push(c);
                }
                _ => out.push(c),
            },
            LexState::LineComment => {
                if c == '\n' {
                    out.push('\n');
                    state = LexState::Code;
                } else {
                    blank(&mut out, c);
                }
            }
            LexState::BlockComment(depth) => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = if depth == 1 {
                        LexState::Code
                    } else {
                        LexState::BlockComment(depth - 1)
                    };
                } else if c == '/' && chars.peek() == Some(&'*') {
                    chars.next();
                    out.push_str("  ");
                    state = LexState::BlockComment(depth + 1);
                } else {
                    blank(&mut out, c);
                }
            }
            LexState::Str => match c {
                '\\' if chars.peek() == Some(&'(') => {
                    chars.next();
                    out.push_str("  ");
                    interpolations.push(0);
                    state = LexState::Code;
                }
                '\\' => {
                    blank(&mut out, c);
                    if let Some(escaped) = chars.next() {
                        blank(&mut out, escaped);
                    }
                }
                '"' => {
                    out.push('"');
                    state = LexState::Code;
                }
                _ => blank(&mut out, c),
            },
        }
    }

    out
}

fn blank(out: &mut String, c: char) {
    if c == '\n' {
        out.push('\n');
    } else {
        out.extend(std::iter::repeat(' ').take(c.len_utf8()));
    }
}

/// Byte offset of the `}` closing the `{` at `open`
fn matching_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, byte) in text.as_bytes()[open..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Blank everything inside nested braces, leaving only top-level text
fn blank_nested(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut depth = 0usize;

    for c in body.chars() {
        match c {
            '{' => {
                depth += 1;
                out.push(' ');
            }
            '}' => {
                depth = depth.saturating_sub(1);
                out.push(' ');
            }
            _ if depth > 0 => blank(&mut out, c),
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
import NeedleFoundation

final class RootComponent: BootstrapComponent {
    var playersStream: PlayersStream {
        return mutablePlayersStream
    }

    var mutablePlayersStream: MutablePlayersStream {
        return shared { PlayersStreamImpl() }
    }

    var loggedInBuilder: LoggedInBuilder {
        return LoggedInComponent(parent: self)
    }
}

protocol LoggedInDependency: Dependency {
    var playersStream: PlayersStream { get }
}

final class LoggedInComponent: NeedleFoundation.Component<LoggedInDependency> {
    // GameComponent(parent: self) is only mentioned here
    fileprivate var scoreStream: ScoreStream {
        return "ScoreSheet()".isEmpty ? ScoreStreamImpl() : ScoreStreamImpl()
    }

    public var gameComponent: GameComponent {
        return GameComponent(parent: self)
    }
}
"#;

    fn scanner() -> PatternScanner {
        PatternScanner::new(ScannerConfig::default()).unwrap()
    }

    #[test]
    fn test_scan_sample() {
        let decls = scanner().scan(SAMPLE, Some("Root.swift")).unwrap();
        assert_eq!(decls.len(), 2);

        let root = &decls[0];
        assert_eq!(root.name, "RootComponent");
        assert_eq!(root.dependency_protocol_name, "EmptyDependency");
        assert_eq!(
            root.properties,
            vec![
                Property::new("playersStream", "PlayersStream"),
                Property::new("mutablePlayersStream", "MutablePlayersStream"),
                Property::new("loggedInBuilder", "LoggedInBuilder"),
            ]
        );
        assert_eq!(
            root.referenced_type_names,
            vec!["PlayersStreamImpl", "LoggedInComponent"]
        );
        assert_eq!(root.file_path.as_deref(), Some("Root.swift"));

        let logged_in = &decls[1];
        assert_eq!(logged_in.name, "LoggedInComponent");
        assert_eq!(logged_in.dependency_protocol_name, "LoggedInDependency");
        assert_eq!(
            logged_in.properties,
            vec![Property::new("gameComponent", "GameComponent")]
        );
        assert_eq!(
            logged_in.referenced_type_names,
            vec!["ScoreStreamImpl", "GameComponent"]
        );
    }

    #[test]
    fn test_quick_reject() {
        let decls = scanner()
            .scan("struct Plain { let value = Foo() }", None)
            .unwrap();
        assert!(decls.is_empty());
    }

    #[test]
    fn test_self_instantiation_is_kept() {
        let src = "class Loop: Component<LoopDependency> { var next: Loop { Loop(parent: self) } }";
        let decls = scanner().scan(src, None).unwrap();
        assert_eq!(decls[0].referenced_type_names, vec!["Loop"]);
    }

    #[test]
    fn test_unbalanced_body() {
        let src = "class Broken: Component<BrokenDependency> {\n var a: A {\n";
        let err = scanner().scan(src, Some("Broken.swift")).unwrap_err();
        assert!(matches!(
            err,
            ScannerError::UnbalancedBody { ref name, ref file }
                if name == "Broken" && file == "Broken.swift"
        ));
    }

    #[test]
    fn test_custom_module_name() {
        let config = ScannerConfig {
            module_name: "DI".to_string(),
            ..ScannerConfig::default()
        };
        let scanner = PatternScanner::new(config).unwrap();
        let src = concat!(
            "class A: DI.Component<ADependency> {}\n",
            "class B: NeedleFoundation.Component<BDependency> {}",
        );
        let names: Vec<_> = scanner
            .scan(src, None)
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["A"]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ScannerConfig {
            component_base: String::new(),
            ..ScannerConfig::default()
        };
        assert!(matches!(
            PatternScanner::new(config),
            Err(ScannerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_sanitize_keeps_offsets() {
        let src = "a /* b { */ \"c } é\" // d {\ne";
        let clean = sanitize(src);
        assert_eq!(clean.len(), src.len());
        assert!(!clean.contains('{'));
        assert!(!clean.contains('}'));
        assert!(clean.ends_with("\ne"));
    }

    #[test]
    fn test_sanitize_keeps_interpolated_code() {
        let src = r#"let s = "a \(Make(x: "}")) b" + "c""#;
        let clean = sanitize(src);
        assert_eq!(clean.len(), src.len());
        assert!(clean.contains("Make(x: \" \")"));
        assert!(!clean.contains('}'));
        assert!(clean.ends_with(")   \" + \" \""));
    }
}
