//! The scan command: request validation, configuration loading, scanning.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use ccase_check_core::{
    CaseRegistry, ConfigError, Configuration, IgnoreError, IgnoreFilter, RequestError, ScanError,
    ScanReport, ScanRequest, Scanner,
};

use crate::exit::Exit;
use crate::output::{self, OutputFormat};

/// Conditions that stop a run before or during scanning.
#[derive(Debug, Error, Diagnostic)]
pub enum Fatal {
    /// Missing input or a path of the wrong kind.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Request(#[from] RequestError),

    /// `--config` given more than once.
    #[error("--config given {count} times")]
    #[diagnostic(
        code(ccase::cli::duplicate_config),
        help("pass a single configuration file")
    )]
    DuplicateConfig {
        /// Number of occurrences.
        count: usize,
    },

    /// `--ignore` given more than once.
    #[error("--ignore given {count} times")]
    #[diagnostic(
        code(ccase::cli::duplicate_ignore),
        help("merge the rules into a single ignore file")
    )]
    DuplicateIgnore {
        /// Number of occurrences.
        count: usize,
    },

    /// The configuration document was rejected.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    /// The ignore file was rejected.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Ignore(#[from] IgnoreError),

    /// The scan itself aborted.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Scan(#[from] ScanError),
}

/// Resolved command-line options for a scan.
#[derive(Debug, Clone, Default)]
pub struct CheckArgs {
    /// Files and directories to scan.
    pub paths: Vec<PathBuf>,
    /// Every `--config` value, in order.
    pub config: Vec<PathBuf>,
    /// Every `--ignore` value, in order.
    pub ignore: Vec<PathBuf>,
    /// Report format.
    pub format: OutputFormat,
    /// Worker threads; 0 uses one per CPU.
    pub jobs: usize,
    /// Fail on directory revisits instead of skipping them.
    pub strict_symlinks: bool,
}

impl CheckArgs {
    /// Builds the scan request, rejecting repeated `--config`/`--ignore`.
    pub fn request(&self) -> Result<ScanRequest, Fatal> {
        if self.config.len() > 1 {
            return Err(Fatal::DuplicateConfig {
                count: self.config.len(),
            });
        }
        if self.ignore.len() > 1 {
            return Err(Fatal::DuplicateIgnore {
                count: self.ignore.len(),
            });
        }

        let mut request = ScanRequest::new(self.paths.iter().cloned());
        if let Some(config) = self.config.first() {
            request = request.with_config(config);
        }
        if let Some(ignore) = self.ignore.first() {
            request = request.with_ignore(ignore);
        }
        Ok(request)
    }
}

/// Runs a scan and prints the report, returning the process outcome.
pub fn run(args: &CheckArgs) -> Exit {
    let report = match scan(args) {
        Ok(report) => report,
        Err(fatal) => {
            let exit = Exit::from(&fatal);
            eprintln!("{:?}", miette::Report::new(fatal));
            return exit;
        }
    };

    if let Err(err) = output::print(&report, args.format) {
        eprintln!("error: {err:#}");
        return Exit::Internal;
    }

    if report.has_violations() {
        Exit::Violations
    } else {
        Exit::Success
    }
}

/// Validates the request, loads configuration and ignore rules, and scans.
///
/// # Errors
///
/// Returns the first fatal condition; nothing is scanned in that case unless
/// the scan itself failed.
pub fn scan(args: &CheckArgs) -> Result<ScanReport, Fatal> {
    let request = args.request()?;
    request.validate()?;

    let registry = CaseRegistry::new();
    let config = Configuration::from_file(request.config_path(), &registry)?;
    tracing::debug!(
        "Loaded {} context binding(s) from {}",
        config.len(),
        request.config_path().display()
    );

    let ignore = match &request.ignore_path {
        Some(path) => IgnoreFilter::from_file(path)?,
        None => IgnoreFilter::none(),
    };

    let report = Scanner::builder()
        .paths(request.paths)
        .config(config)
        .ignore(ignore)
        .jobs(args.jobs)
        .strict_symlinks(args.strict_symlinks)
        .build()
        .scan()?;
    Ok(report)
}
