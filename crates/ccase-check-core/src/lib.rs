//! # ccase-check-core
//!
//! Context-aware naming convention checks for C and C++ sources.
//!
//! This crate provides:
//!
//! - [`CaseRegistry`] and [`CasePattern`] for built-in case styles and custom
//!   patterns
//! - [`Configuration`] binding each declaration [`Context`] to a pattern
//! - [`Extractor`] yielding the declarations of one source text
//! - [`ViolationEngine`] joining declarations against the configuration
//! - [`Scanner`] for orchestrating a whole run
//!
//! ## Example
//!
//! ```no_run
//! use ccase_check_core::{CaseRegistry, Configuration, IgnoreFilter, Scanner};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = CaseRegistry::new();
//! let config = Configuration::from_file(Path::new(".ccase-check"), &registry)?;
//!
//! let report = Scanner::builder()
//!     .path("src")
//!     .config(config)
//!     .ignore(IgnoreFilter::none())
//!     .build()
//!     .scan()?;
//! for violation in &report.violations {
//!     println!("{violation}");
//! }
//! for failure in &report.failures {
//!     println!("{failure}");
//! }
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod case;
mod config;
mod context;
mod discovery;
mod engine;
mod extractor;
mod ignore_filter;
mod request;
mod scanner;
mod types;

pub use case::{CasePattern, CaseRegistry, CaseStyle, PatternError};
pub use config::{
    ConfigDocument, ConfigEntry, ConfigError, Configuration, DocumentFormat, DEFAULT_CONFIG_FILE,
};
pub use context::{AccessLevel, Context};
pub use discovery::{is_source_file, Discovery, SOURCE_EXTENSIONS};
pub use engine::ViolationEngine;
pub use extractor::{decode, ExtractError, Extractor, Occurrence, Occurrences, DEFAULT_MAX_DEPTH};
pub use ignore_filter::{IgnoreError, IgnoreFilter};
pub use request::{RequestError, ScanRequest};
pub use scanner::{FileError, ScanError, Scanner, ScannerBuilder};
pub use types::{FileFailure, Location, ScanReport, Violation};
