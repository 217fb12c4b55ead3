//! Source file discovery.
//!
//! Expands the requested paths into the sorted list of files to check.
//! Directories are walked with symbolic links followed; every directory's
//! canonical identity is recorded so a revisit is skipped instead of looping.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::ignore_filter::IgnoreFilter;
use crate::scanner::ScanError;

/// Extensions picked up inside directories.
pub const SOURCE_EXTENSIONS: &[&str] = &[
    "c", "cc", "cpp", "cxx", "c++", "h", "hh", "hpp", "hxx", "h++", "inl", "ipp", "tpp",
];

/// Returns true for a file with a C or C++ extension.
#[must_use]
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)))
}

/// Walks requested paths into a de-duplicated file list.
#[derive(Debug, Clone, Copy)]
pub struct Discovery<'f> {
    ignore: &'f IgnoreFilter,
    strict_symlinks: bool,
}

impl<'f> Discovery<'f> {
    /// Creates a discovery pass honoring `ignore`.
    #[must_use]
    pub fn new(ignore: &'f IgnoreFilter) -> Self {
        Self {
            ignore,
            strict_symlinks: false,
        }
    }

    /// Turns directory revisits into [`ScanError::SymlinkCycle`].
    #[must_use]
    pub fn strict_symlinks(mut self, strict: bool) -> Self {
        self.strict_symlinks = strict;
        self
    }

    /// Expands `roots` into files.
    ///
    /// Files named directly are kept whatever their extension; files found
    /// inside directories must have a C or C++ extension. Each physical file
    /// appears once.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::SymlinkCycle`] in strict mode.
    pub fn discover(&self, roots: &[PathBuf]) -> Result<Vec<PathBuf>, ScanError> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for root in roots {
            if root.is_dir() {
                for path in self.walk(root)? {
                    keep_unique(&mut seen, &mut files, path);
                }
            } else if self.ignore.should_skip(root, false) {
                debug!("Ignoring {}", root.display());
            } else {
                keep_unique(&mut seen, &mut files, root.clone());
            }
        }

        files.sort();
        Ok(files)
    }

    fn walk(&self, root: &Path) -> Result<Vec<PathBuf>, ScanError> {
        let visited: Arc<Mutex<HashSet<PathBuf>>> = Arc::default();
        let revisit: Arc<Mutex<Option<PathBuf>>> = Arc::default();
        if let Ok(canonical) = root.canonicalize() {
            lock(&visited).insert(canonical);
        }

        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b));

        let ignore = self.ignore.clone();
        let filter_visited = Arc::clone(&visited);
        let filter_revisit = Arc::clone(&revisit);
        builder.filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            if ignore.should_skip(entry.path(), is_dir) {
                debug!("Ignoring {}", entry.path().display());
                return false;
            }
            if !is_dir {
                return true;
            }
            let Ok(canonical) = entry.path().canonicalize() else {
                return true;
            };
            if lock(&filter_visited).insert(canonical) {
                return true;
            }
            debug!("Skipping revisited directory {}", entry.path().display());
            lock(&filter_revisit).get_or_insert_with(|| entry.path().to_path_buf());
            false
        });

        let mut files = Vec::new();
        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let is_file = entry.file_type().is_some_and(|t| t.is_file());
                    if is_file && is_source_file(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(err) => match loop_path(&err) {
                    Some(path) if self.strict_symlinks => {
                        return Err(ScanError::SymlinkCycle {
                            path: path.to_path_buf(),
                        });
                    }
                    Some(path) => debug!("Skipping symlink cycle at {}", path.display()),
                    None => warn!("Skipping unreadable entry: {err}"),
                },
            }
        }

        if self.strict_symlinks {
            if let Some(path) = lock(&revisit).take() {
                return Err(ScanError::SymlinkCycle { path });
            }
        }
        Ok(files)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn keep_unique(seen: &mut HashSet<PathBuf>, files: &mut Vec<PathBuf>, path: PathBuf) {
    let identity = path.canonicalize().unwrap_or_else(|_| path.clone());
    if seen.insert(identity) {
        files.push(path);
    } else {
        debug!("Skipping duplicate {}", path.display());
    }
}

/// The looping link of a walker error, if it reports a cycle.
fn loop_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::Loop { child, .. } => Some(child),
        ignore::Error::WithDepth { err, .. }
        | ignore::Error::WithPath { err, .. }
        | ignore::Error::WithLineNumber { err, .. } => loop_path(err),
        _ => None,
    }
}
