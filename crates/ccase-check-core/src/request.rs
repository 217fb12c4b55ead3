//! Resolved scan request and its pre-scan path checks.

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::DEFAULT_CONFIG_FILE;

/// Fatal path problems found before any file is scanned.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RequestError {
    /// No scan paths were given.
    #[error("no input files specified")]
    #[diagnostic(
        code(ccase::request::no_input),
        help("pass one or more files or directories to scan")
    )]
    NoInput,

    /// A scan path does not exist.
    #[error("scan path does not exist: {}", path.display())]
    #[diagnostic(code(ccase::request::scan_path_missing))]
    ScanPathMissing {
        /// The missing path.
        path: PathBuf,
    },

    /// The configuration file does not exist.
    #[error("config path does not exist: {}", path.display())]
    #[diagnostic(
        code(ccase::request::config_missing),
        help("create a .ccase-check file or pass --config=<path>")
    )]
    ConfigPathMissing {
        /// The missing path.
        path: PathBuf,
    },

    /// The configuration path is not a regular file.
    #[error("config path is not a file: {}", path.display())]
    #[diagnostic(code(ccase::request::config_not_file))]
    ConfigPathNotFile {
        /// The offending path.
        path: PathBuf,
    },

    /// The ignore file does not exist.
    #[error("ignore file does not exist: {}", path.display())]
    #[diagnostic(code(ccase::request::ignore_missing))]
    IgnorePathMissing {
        /// The missing path.
        path: PathBuf,
    },

    /// The ignore path is not a regular file.
    #[error("ignore path is not a file: {}", path.display())]
    #[diagnostic(code(ccase::request::ignore_not_file))]
    IgnorePathNotFile {
        /// The offending path.
        path: PathBuf,
    },
}

/// What to scan and with which configuration and ignore rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanRequest {
    /// Files and directories to scan, in command-line order.
    pub paths: Vec<PathBuf>,
    /// Explicit configuration path; [`DEFAULT_CONFIG_FILE`] when `None`.
    pub config_path: Option<PathBuf>,
    /// Optional ignore-rules file.
    pub ignore_path: Option<PathBuf>,
}

impl ScanRequest {
    /// Creates a request for `paths` with the default configuration.
    #[must_use]
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Overrides the configuration path.
    #[must_use]
    pub fn with_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Sets the ignore-rules file.
    #[must_use]
    pub fn with_ignore(mut self, path: impl Into<PathBuf>) -> Self {
        self.ignore_path = Some(path.into());
        self
    }

    /// Configuration path in effect.
    #[must_use]
    pub fn config_path(&self) -> &Path {
        self.config_path
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Checks every path, in order: input present, scan paths, config,
    /// ignore file.
    ///
    /// # Errors
    ///
    /// Returns the first [`RequestError`] found.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.paths.is_empty() {
            return Err(RequestError::NoInput);
        }

        if let Some(path) = self.paths.iter().find(|p| !p.exists()) {
            return Err(RequestError::ScanPathMissing { path: path.clone() });
        }

        let config = self.config_path();
        if !config.exists() {
            return Err(RequestError::ConfigPathMissing {
                path: config.to_path_buf(),
            });
        }
        if !config.is_file() {
            return Err(RequestError::ConfigPathNotFile {
                path: config.to_path_buf(),
            });
        }

        if let Some(ignore) = &self.ignore_path {
            if !ignore.exists() {
                return Err(RequestError::IgnorePathMissing {
                    path: ignore.clone(),
                });
            }
            if !ignore.is_file() {
                return Err(RequestError::IgnorePathNotFile {
                    path: ignore.clone(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("main.cpp"), "int main() {}").unwrap();
        fs::write(tmp.path().join("rules.yaml"), "classDef: PascalCase\n").unwrap();
        fs::write(tmp.path().join("skip.ignore"), "build/\n").unwrap();
        fs::create_dir(tmp.path().join("dir")).unwrap();
        tmp
    }

    #[test]
    fn default_config_path() {
        let request = ScanRequest::new(["src"]);
        assert_eq!(request.config_path(), Path::new(".ccase-check"));
        assert_eq!(
            request.with_config("x.yaml").config_path(),
            Path::new("x.yaml")
        );
    }

    #[test]
    fn valid_request_passes() {
        let tmp = fixture();
        let request = ScanRequest::new([tmp.path().join("main.cpp"), tmp.path().join("dir")])
            .with_config(tmp.path().join("rules.yaml"))
            .with_ignore(tmp.path().join("skip.ignore"));
        assert_eq!(request.validate(), Ok(()));
    }

    #[test]
    fn no_input() {
        let request = ScanRequest::default();
        assert_eq!(request.validate(), Err(RequestError::NoInput));
    }

    #[test]
    fn missing_scan_path_is_named() {
        let tmp = fixture();
        let missing = tmp.path().join("gone.cpp");
        let request = ScanRequest::new([tmp.path().join("main.cpp"), missing.clone()])
            .with_config(tmp.path().join("rules.yaml"));
        assert_eq!(
            request.validate(),
            Err(RequestError::ScanPathMissing { path: missing })
        );
    }

    #[test]
    fn config_checks() {
        let tmp = fixture();
        let base = ScanRequest::new([tmp.path().join("main.cpp")]);

        let missing = tmp.path().join("none.yaml");
        assert_eq!(
            base.clone().with_config(&missing).validate(),
            Err(RequestError::ConfigPathMissing { path: missing })
        );

        let dir = tmp.path().join("dir");
        assert_eq!(
            base.with_config(&dir).validate(),
            Err(RequestError::ConfigPathNotFile { path: dir })
        );
    }

    #[test]
    fn ignore_checks() {
        let tmp = fixture();
        let base = ScanRequest::new([tmp.path().join("main.cpp")])
            .with_config(tmp.path().join("rules.yaml"));

        let missing = tmp.path().join("none.ignore");
        assert_eq!(
            base.clone().with_ignore(&missing).validate(),
            Err(RequestError::IgnorePathMissing { path: missing })
        );

        let dir = tmp.path().join("dir");
        assert_eq!(
            base.with_ignore(&dir).validate(),
            Err(RequestError::IgnorePathNotFile { path: dir })
        );
    }

    #[test]
    fn scan_paths_are_checked_before_config() {
        let tmp = fixture();
        let request = ScanRequest::new([tmp.path().join("gone")])
            .with_config(tmp.path().join("none.yaml"));
        assert!(matches!(
            request.validate(),
            Err(RequestError::ScanPathMissing { .. })
        ));
    }
}
