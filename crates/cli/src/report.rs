use needle_graph::OrderEntry;
use std::fmt::Write;

/// One line per component in processing order; roots are starred
pub fn render_order(entries: &[OrderEntry]) -> String {
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    let mut out = String::new();

    for entry in entries {
        let marker = if entry.root { '*' } else { ' ' };
        let _ = write!(
            out,
            "{marker} {:<width$}  {}",
            entry.name, entry.dependency_protocol
        );
        if !entry.parents.is_empty() {
            let _ = write!(out, "  <- {}", entry.parents.join(", "));
        }
        out.push('\n');
    }

    out
}

pub fn render_summary(entries: &[OrderEntry]) -> String {
    let roots = entries.iter().filter(|e| e.root).count();
    format!(
        "OK: {} components, {} {}",
        entries.len(),
        roots,
        if roots == 1 { "root" } else { "roots" }
    )
}
