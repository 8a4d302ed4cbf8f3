use anyhow::{Context, Result};
use needle_scanner::{Declaration, DeclarationScanner};
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;

/// Scan every file in parallel, returning declarations in file order
///
/// Output order depends only on `files`, never on worker timing, so duplicate
/// names are reported against the same pair of files on every run.
pub fn scan_files<S>(scanner: &S, files: &[PathBuf]) -> Result<Vec<Declaration>>
where
    S: DeclarationScanner,
{
    let per_file: Vec<Vec<Declaration>> = files
        .par_iter()
        .map(|path| {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let display = path.to_string_lossy();
            scanner
                .scan(&content, Some(display.as_ref()))
                .with_context(|| format!("Failed to scan {}", path.display()))
        })
        .collect::<Result<_>>()?;

    let declarations: Vec<Declaration> = per_file.into_iter().flatten().collect();
    log::info!(
        "Scanned {} files, {} component declarations",
        files.len(),
        declarations.len()
    );
    Ok(declarations)
}
