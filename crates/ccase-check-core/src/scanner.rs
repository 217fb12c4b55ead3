//! Scan orchestration: discovery, parallel per-file checks, aggregation.

use miette::Diagnostic;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Configuration;
use crate::discovery::Discovery;
use crate::engine::ViolationEngine;
use crate::extractor::{self, ExtractError, Extractor, DEFAULT_MAX_DEPTH};
use crate::ignore_filter::IgnoreFilter;
use crate::types::{FileFailure, ScanReport, Violation};

/// Errors that abort a whole scan.
#[derive(Debug, Error, Diagnostic)]
pub enum ScanError {
    /// The worker pool could not be created.
    #[error("failed to start worker pool: {0}")]
    #[diagnostic(code(ccase::scan::thread_pool))]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A directory was reached twice while strict symlink checking is on.
    #[error("symbolic link cycle at {}", path.display())]
    #[diagnostic(
        code(ccase::scan::symlink_cycle),
        help("without strict symlink checking, revisited directories are skipped")
    )]
    SymlinkCycle {
        /// The link that led back to a visited directory.
        path: PathBuf,
    },
}

/// Why a single file could not be checked. Never aborts the scan.
#[derive(Debug, Error)]
pub enum FileError {
    /// The file could not be read.
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The file content is malformed.
    #[error("malformed source: {0}")]
    Malformed(#[from] ExtractError),
}

/// Builder for configuring a [`Scanner`].
#[derive(Debug)]
pub struct ScannerBuilder {
    paths: Vec<PathBuf>,
    config: Configuration,
    ignore: IgnoreFilter,
    jobs: usize,
    strict_symlinks: bool,
    max_depth: usize,
}

impl Default for ScannerBuilder {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            config: Configuration::new(),
            ignore: IgnoreFilter::none(),
            jobs: 0,
            strict_symlinks: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ScannerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file or directory to scan.
    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Adds several files or directories to scan.
    #[must_use]
    pub fn paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Configuration) -> Self {
        self.config = config;
        self
    }

    /// Sets the ignore filter.
    #[must_use]
    pub fn ignore(mut self, ignore: IgnoreFilter) -> Self {
        self.ignore = ignore;
        self
    }

    /// Sets the number of worker threads; 0 uses one per CPU.
    #[must_use]
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Makes revisited directories a fatal error.
    #[must_use]
    pub fn strict_symlinks(mut self, strict: bool) -> Self {
        self.strict_symlinks = strict;
        self
    }

    /// Sets the brace nesting limit for each file.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Builds the scanner.
    #[must_use]
    pub fn build(self) -> Scanner {
        Scanner {
            paths: self.paths,
            config: self.config,
            ignore: self.ignore,
            jobs: self.jobs,
            strict_symlinks: self.strict_symlinks,
            extractor: Extractor::new().max_depth(self.max_depth),
        }
    }
}

/// Checks a set of paths against a configuration.
///
/// Use [`Scanner::builder()`] to construct an instance.
#[derive(Debug)]
pub struct Scanner {
    paths: Vec<PathBuf>,
    config: Configuration,
    ignore: IgnoreFilter,
    jobs: usize,
    strict_symlinks: bool,
    extractor: Extractor,
}

impl Scanner {
    /// Creates a new builder for configuring a scanner.
    #[must_use]
    pub fn builder() -> ScannerBuilder {
        ScannerBuilder::new()
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Scans every discovered file.
    ///
    /// Per-file problems are recorded in [`ScanReport::failures`] and do not
    /// stop the scan.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker pool cannot start, or on a symlink
    /// cycle in strict mode.
    pub fn scan(&self) -> Result<ScanReport, ScanError> {
        info!("Starting scan of {} path(s)", self.paths.len());

        let files = Discovery::new(&self.ignore)
            .strict_symlinks(self.strict_symlinks)
            .discover(&self.paths)?;
        info!("Found {} files to check", files.len());

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()?;
        let outcomes: Vec<Result<Vec<Violation>, FileError>> = pool.install(|| {
            files
                .par_iter()
                .map(|path| self.check_file(path))
                .collect()
        });

        let mut report = ScanReport::new();
        for (path, outcome) in files.iter().zip(outcomes) {
            match outcome {
                Ok(violations) => {
                    report.violations.extend(violations);
                    report.files_checked += 1;
                }
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    report.failures.push(FileFailure::new(path, e));
                }
            }
        }
        report.sort();

        info!(
            "Scan complete: {} violations in {} files",
            report.violations.len(),
            report.files_checked
        );
        Ok(report)
    }

    /// Checks one file.
    ///
    /// # Errors
    ///
    /// Returns [`FileError`] if the file cannot be read or is malformed.
    pub fn check_file(&self, path: &Path) -> Result<Vec<Violation>, FileError> {
        debug!("Checking: {}", path.display());

        let bytes = std::fs::read(path)?;
        let text = extractor::decode(&bytes)?;
        let engine = ViolationEngine::new(&self.config).with_extractor(self.extractor);
        Ok(engine.check_source(path, text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::CaseRegistry;
    use crate::config::DocumentFormat;
    use std::fs;
    use tempfile::TempDir;

    fn pascal_classes() -> Configuration {
        Configuration::parse(
            "classDef: PascalCase\n",
            DocumentFormat::Yaml,
            &CaseRegistry::new(),
        )
        .unwrap()
    }

    #[test]
    fn builder_defaults() {
        let scanner = Scanner::builder().build();
        assert!(scanner.config().is_empty());
        assert_eq!(scanner.scan().unwrap(), ScanReport::new());
    }

    #[test]
    fn check_file_reports_unreadable_and_malformed() {
        let tmp = TempDir::new().unwrap();
        let bad = tmp.path().join("bad.cpp");
        fs::write(&bad, b"class \xff {};").unwrap();

        let scanner = Scanner::builder().config(pascal_classes()).build();
        assert!(matches!(
            scanner.check_file(&bad),
            Err(FileError::Malformed(ExtractError::NotUtf8 { offset: 6 }))
        ));
        assert!(matches!(
            scanner.check_file(&tmp.path().join("missing.cpp")),
            Err(FileError::Io(_))
        ));
    }

    #[test]
    fn failures_do_not_stop_the_scan() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.cpp"), "class bad_name {};\n").unwrap();
        fs::write(tmp.path().join("b.cpp"), "}\nclass other_bad {};\n").unwrap();
        fs::write(tmp.path().join("c.cpp"), "class Good {};\n").unwrap();

        let report = Scanner::builder()
            .path(tmp.path())
            .config(pascal_classes())
            .jobs(2)
            .build()
            .scan()
            .unwrap();

        assert_eq!(report.files_checked, 2);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].identifier, "bad_name");
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path.ends_with("b.cpp"));
        assert!(report.failures[0].reason.contains("unbalanced"));
    }

    #[test]
    fn max_depth_reaches_the_extractor() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("deep.cpp"), "void f() { { { } } }\n").unwrap();

        let report = Scanner::builder()
            .path(tmp.path())
            .max_depth(2)
            .build()
            .scan()
            .unwrap();
        assert_eq!(report.files_checked, 0);
        assert!(report.failures[0].reason.contains("nested deeper than 2"));
    }
}
