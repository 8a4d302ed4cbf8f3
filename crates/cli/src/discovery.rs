use ignore::WalkBuilder;
use needle_scanner::ScannerConfig;
use std::path::{Path, PathBuf};

/// Files above this size are generated or vendored; never hand-written components
const MAX_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;

/// Finds source files to scan (.gitignore aware)
pub struct SourceFinder<'a> {
    config: &'a ScannerConfig,
}

impl<'a> SourceFinder<'a> {
    pub fn new(config: &'a ScannerConfig) -> Self {
        Self { config }
    }

    /// Files under the given paths, sorted and deduplicated
    ///
    /// Explicit file arguments are taken as-is; directories are walked and
    /// filtered by extension.
    pub fn find(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for path in paths {
            if path.is_file() {
                files.push(path.clone());
                continue;
            }
            if !path.is_dir() {
                log::warn!("Skipping missing path {}", path.display());
                continue;
            }
            self.walk(path, &mut files);
        }

        files.sort();
        files.dedup();
        log::info!("Found {} source files", files.len());
        files
    }

    fn walk(&self, root: &Path, files: &mut Vec<PathBuf>) {
        let mut builder = WalkBuilder::new(root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true);

        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Failed to read entry: {e}");
                    continue;
                }
            };

            let Some(file_type) = entry.file_type() else {
                continue;
            };
            if !file_type.is_file() || !self.is_source_file(entry.path()) {
                continue;
            }

            if let Ok(meta) = entry.metadata() {
                if meta.len() > MAX_FILE_SIZE_BYTES {
                    log::debug!(
                        "Skipping large file {} ({} bytes > {})",
                        entry.path().display(),
                        meta.len(),
                        MAX_FILE_SIZE_BYTES
                    );
                    continue;
                }
            }

            files.push(entry.into_path());
        }
    }

    fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.config.accepts_extension(ext))
            .unwrap_or(false)
    }
}
