//! Core types for naming violations and scan results.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::context::Context;

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Location {
    /// File path as it was discovered.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in characters).
    pub column: usize,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// An identifier whose spelling does not match its context's pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Where the identifier is declared.
    pub location: Location,
    /// The offending spelling.
    pub identifier: String,
    /// Structural role of the declaration.
    pub context: Context,
    /// Expected style name, or the raw pattern text for custom patterns.
    pub expected: String,
    /// Human-readable message.
    pub message: String,
    /// Respelling that satisfies the expected style, if one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        location: Location,
        identifier: impl Into<String>,
        context: Context,
        expected: impl Into<String>,
    ) -> Self {
        let identifier = identifier.into();
        let expected = expected.into();
        let message = format!("{context} '{identifier}' does not match {expected}");
        Self {
            location,
            identifier,
            context,
            expected,
            message,
            suggestion: None,
        }
    }

    /// Adds a rename suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Option<String>) -> Self {
        self.suggestion = suggestion;
        self
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!("naming violation at {}\n", self.location);
        let _ = writeln!(output, "  error: {}", self.message);
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: rename to '{suggestion}'");
        }
        output
    }
}

/// Compact single-line form: `path:line:col: context 'name' should be Style`.
impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} '{}' should be {}",
            self.location, self.context, self.identifier, self.expected
        )
    }
}

/// A file that could not be checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    /// The skipped file.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: String,
}

impl FileFailure {
    /// Creates a new failure record.
    #[must_use]
    pub fn new(path: &Path, reason: impl fmt::Display) -> Self {
        Self {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: skipped: {}", self.path.display(), self.reason)
    }
}

/// Result of a scan.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// All violations found, in (file, line, column) order.
    pub violations: Vec<Violation>,
    /// Files that could not be checked.
    pub failures: Vec<FileFailure>,
    /// Number of files checked successfully.
    pub files_checked: usize,
}

impl ScanReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any violation was found.
    #[must_use]
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Adds the results of another report.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.failures.extend(other.failures);
        self.files_checked += other.files_checked;
    }

    /// Puts violations and failures in their canonical order.
    pub fn sort(&mut self) {
        self.violations.sort_by(|a, b| {
            a.location
                .cmp(&b.location)
                .then_with(|| a.identifier.cmp(&b.identifier))
        });
        self.failures.sort_by(|a, b| a.path.cmp(&b.path));
    }

    /// One-line summary of the scan.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Found {} violation(s) in {} file(s)",
            self.violations.len(),
            self.files_checked
        );
        if !self.failures.is_empty() {
            summary.push_str(&format!(", {} file(s) skipped", self.failures.len()));
        }
        summary
    }
}
