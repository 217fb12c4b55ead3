//! Path exclusion from a gitignore-syntax rules file.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors loading an ignore file. Both abort the run before scanning.
#[derive(Debug, Error, Diagnostic)]
pub enum IgnoreError {
    /// IO error reading the ignore file.
    #[error("failed to read ignore file {}: {source}", path.display())]
    #[diagnostic(code(ccase::ignore::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A rule that is not a valid glob.
    #[error("invalid rule in ignore file {}: {message}", path.display())]
    #[diagnostic(
        code(ccase::ignore::invalid_rule),
        help("ignore files use .gitignore syntax")
    )]
    InvalidRule {
        /// The ignore file.
        path: PathBuf,
        /// Line number and matcher message.
        message: String,
    },
}

/// Predicate deciding which paths a scan leaves out.
///
/// Rules are relative to the directory holding the ignore file; paths outside
/// that directory are never skipped.
#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    matcher: Option<Matcher>,
}

#[derive(Debug, Clone)]
struct Matcher {
    root: PathBuf,
    rules: Gitignore,
}

impl IgnoreFilter {
    /// A filter that skips nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Compiles the rules in `path`.
    ///
    /// # Errors
    ///
    /// Returns [`IgnoreError::Io`] if the file cannot be read and
    /// [`IgnoreError::InvalidRule`] for a malformed rule.
    pub fn from_file(path: &Path) -> Result<Self, IgnoreError> {
        let io = |source| IgnoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        let content = std::fs::read_to_string(path).map_err(io)?;
        let canonical = path.canonicalize().map_err(io)?;
        let root = canonical
            .parent()
            .map_or_else(|| PathBuf::from("/"), Path::to_path_buf);

        let mut builder = GitignoreBuilder::new(&root);
        for (index, line) in content.lines().enumerate() {
            builder
                .add_line(Some(canonical.clone()), line)
                .map_err(|e| IgnoreError::InvalidRule {
                    path: path.to_path_buf(),
                    message: format!("line {}: {e}", index + 1),
                })?;
        }
        let rules = builder.build().map_err(|e| IgnoreError::InvalidRule {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        debug!(
            "Loaded {} ignore rule(s) rooted at {}",
            rules.num_ignores() + rules.num_whitelists(),
            root.display()
        );
        Ok(Self {
            matcher: Some(Matcher { root, rules }),
        })
    }

    /// Returns true if the filter has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matcher.as_ref().map_or(true, |m| m.rules.is_empty())
    }

    /// Returns true if `path`, or any of its ancestors below the rules
    /// root, is excluded.
    #[must_use]
    pub fn should_skip(&self, path: &Path, is_dir: bool) -> bool {
        let Some(matcher) = &self.matcher else {
            return false;
        };
        let Ok(canonical) = path.canonicalize() else {
            return false;
        };
        let Ok(relative) = canonical.strip_prefix(&matcher.root) else {
            return false;
        };
        if relative.as_os_str().is_empty() {
            return false;
        }
        matcher
            .rules
            .matched_path_or_any_parents(relative, is_dir)
            .is_ignore()
    }
}
