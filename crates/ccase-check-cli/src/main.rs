//! ccase-check CLI tool.
//!
//! Usage:
//! ```bash
//! ccase-check [--config=PATH] [--ignore=PATH] [--format=FORMAT] PATH...
//! ccase-check --help
//! ccase-check --version
//! ```

use clap::{ArgAction, CommandFactory, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod check;
mod exit;
mod output;

use check::CheckArgs;
use exit::Exit;
use output::OutputFormat;

/// Naming convention checker for C and C++ sources
#[derive(Debug, Parser)]
#[command(name = "ccase-check", about, long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Files or directories to scan
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Configuration file (default: .ccase-check)
    #[arg(long, value_name = "PATH", action = ArgAction::Append)]
    config: Vec<PathBuf>,

    /// File of gitignore-style rules for paths to leave out
    #[arg(long, value_name = "PATH", action = ArgAction::Append)]
    ignore: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Worker threads (0 = one per CPU)
    #[arg(short, long, value_name = "N", default_value_t = 0)]
    jobs: usize,

    /// Treat a directory reached twice through symbolic links as an error
    #[arg(long)]
    strict_symlinks: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print help
    #[arg(short, long, action = ArgAction::SetTrue, exclusive = true)]
    help: bool,

    /// Print version
    #[arg(short = 'V', long, action = ArgAction::SetTrue, exclusive = true)]
    version: bool,
}

impl Cli {
    fn into_check_args(self) -> CheckArgs {
        CheckArgs {
            paths: self.paths,
            config: self.config,
            ignore: self.ignore,
            format: self.format,
            jobs: self.jobs,
            strict_symlinks: self.strict_symlinks,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return Exit::from_clap(err.kind()).into();
        }
    };

    if cli.help {
        return match Cli::command().print_help() {
            Ok(()) => Exit::Success.into(),
            Err(_) => Exit::Internal.into(),
        };
    }
    if cli.version {
        println!("ccase-check version {}", env!("CARGO_PKG_VERSION"));
        return Exit::Success.into();
    }

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    check::run(&cli.into_check_args()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("ccase-check").chain(args.iter().copied()))
    }

    fn exit_of(args: &[&str]) -> Exit {
        match parse(args) {
            Ok(_) => Exit::Success,
            Err(err) => Exit::from_clap(err.kind()),
        }
    }

    #[test]
    fn help_and_version_alone() {
        assert!(parse(&["--help"]).unwrap().help);
        assert!(parse(&["-V"]).unwrap().version);
    }

    #[test]
    fn help_or_version_with_anything_else() {
        assert_eq!(exit_of(&["--help", "src"]), Exit::ExtraArguments);
        assert_eq!(exit_of(&["--version", "--verbose"]), Exit::ExtraArguments);
        assert_eq!(exit_of(&["--help", "--version"]), Exit::ExtraArguments);
    }

    #[test]
    fn unknown_option() {
        assert_eq!(exit_of(&["--frobnicate", "src"]), Exit::UnknownOption);
    }

    #[test]
    fn invalid_option_values() {
        assert_eq!(exit_of(&["--format=xml", "src"]), Exit::InvalidValue);
        assert_eq!(exit_of(&["--jobs=many", "src"]), Exit::InvalidValue);
        assert_eq!(exit_of(&["--config"]), Exit::InvalidValue);
    }

    #[test]
    fn repeated_config_and_ignore_are_collected() {
        let cli = parse(&["--config=a.yaml", "--config=b.yaml", "--ignore=x", "src"]).unwrap();
        let args = cli.into_check_args();
        assert_eq!(args.config.len(), 2);
        assert_eq!(args.ignore.len(), 1);
        assert_eq!(args.paths, [PathBuf::from("src")]);
    }

    #[test]
    fn defaults() {
        let args = parse(&["a.cpp", "lib"]).unwrap().into_check_args();
        assert!(args.config.is_empty());
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.jobs, 0);
        assert!(!args.strict_symlinks);
    }

    #[test]
    fn no_arguments_parse_to_an_empty_request() {
        let args = parse(&[]).unwrap().into_check_args();
        assert!(args.paths.is_empty());
    }

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }
}
