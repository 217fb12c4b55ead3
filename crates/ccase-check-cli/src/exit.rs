//! Process exit codes.
//!
//! Every fatal condition has one fixed code so scripts can tell them apart.

use clap::error::ErrorKind;
use std::process::ExitCode;

use ccase_check_core::{RequestError, ScanError};

use crate::check::Fatal;

/// Outcome of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Exit {
    /// Clean scan, help or version.
    Success = 0,
    /// At least one violation was reported.
    Violations = 1,
    /// No path to scan was given.
    NoInput = 2,
    /// A scan path does not exist.
    ScanPathMissing = 3,
    /// The configuration file does not exist.
    ConfigMissing = 4,
    /// The configuration path is not a regular file.
    ConfigNotFile = 5,
    /// The ignore file does not exist.
    IgnoreMissing = 6,
    /// The ignore path is not a regular file.
    IgnoreNotFile = 7,
    /// `--config` was given more than once.
    DuplicateConfig = 8,
    /// `--ignore` was given more than once.
    DuplicateIgnore = 9,
    /// An unrecognized option.
    UnknownOption = 10,
    /// `--help` or `--version` combined with other arguments.
    ExtraArguments = 11,
    /// The configuration could not be loaded.
    InvalidConfig = 12,
    /// The ignore file could not be loaded.
    InvalidIgnore = 13,
    /// An option value failed to parse.
    InvalidValue = 14,
    /// Anything else.
    Internal = 15,
}

impl Exit {
    /// Numeric process status.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Maps an argument parsing failure.
    pub fn from_clap(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Self::Success,
            ErrorKind::UnknownArgument => Self::UnknownOption,
            ErrorKind::ArgumentConflict => Self::ExtraArguments,
            _ => Self::InvalidValue,
        }
    }
}

impl From<&Fatal> for Exit {
    fn from(fatal: &Fatal) -> Self {
        match fatal {
            Fatal::Request(RequestError::NoInput) => Self::NoInput,
            Fatal::Request(RequestError::ScanPathMissing { .. }) => Self::ScanPathMissing,
            Fatal::Request(RequestError::ConfigPathMissing { .. }) => Self::ConfigMissing,
            Fatal::Request(RequestError::ConfigPathNotFile { .. }) => Self::ConfigNotFile,
            Fatal::Request(RequestError::IgnorePathMissing { .. }) => Self::IgnoreMissing,
            Fatal::Request(RequestError::IgnorePathNotFile { .. }) => Self::IgnoreNotFile,
            Fatal::DuplicateConfig { .. } => Self::DuplicateConfig,
            Fatal::DuplicateIgnore { .. } => Self::DuplicateIgnore,
            Fatal::Config(_) => Self::InvalidConfig,
            Fatal::Ignore(_) => Self::InvalidIgnore,
            Fatal::Scan(ScanError::ThreadPool(_) | ScanError::SymlinkCycle { .. }) => {
                Self::Internal
            }
        }
    }
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit.code())
    }
}
