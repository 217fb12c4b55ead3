//! Report formatting.

use anyhow::Result;
use std::io::{self, IsTerminal, Write};

use ccase_check_core::ScanReport;

/// Output format for scan results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// One line per violation.
    Compact,
    /// JSON output.
    Json,
}

/// Prints the report to stdout in the specified format.
pub fn print(report: &ScanReport, format: OutputFormat) -> Result<()> {
    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut out = stdout.lock();
    write(&mut out, report, format, color)?;
    out.flush()?;
    Ok(())
}

/// Writes the report to `out`. `color` only affects the text summary.
pub fn write<W: Write>(
    out: &mut W,
    report: &ScanReport,
    format: OutputFormat,
    color: bool,
) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(out, report, color)?,
        OutputFormat::Compact => write_compact(out, report)?,
        OutputFormat::Json => write_json(out, report)?,
    }
    Ok(())
}

fn write_text<W: Write>(out: &mut W, report: &ScanReport, color: bool) -> io::Result<()> {
    for violation in &report.violations {
        writeln!(out, "{}", violation.format())?;
        writeln!(out)?;
    }
    for failure in &report.failures {
        writeln!(out, "warning: {failure}")?;
    }

    let summary = report.summary();
    if !color {
        return writeln!(out, "{summary}");
    }

    let summary_color = if report.has_violations() {
        "\x1b[31m"
    } else if report.failures.is_empty() {
        "\x1b[32m"
    } else {
        "\x1b[33m"
    };
    writeln!(out, "{summary_color}{summary}\x1b[0m")
}

fn write_compact<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    for violation in &report.violations {
        writeln!(out, "{violation}")?;
    }
    for failure in &report.failures {
        writeln!(out, "{failure}")?;
    }
    Ok(())
}

fn write_json<W: Write>(out: &mut W, report: &ScanReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccase_check_core::{Context, FileFailure, Location, Violation};
    use std::path::Path;

    fn report() -> ScanReport {
        let mut report = ScanReport::new();
        report.violations.push(
            Violation::new(
                Location::new("src/a.cpp", 2, 7),
                "myClass",
                Context::Class,
                "PascalCase",
            )
            .with_suggestion(Some("MyClass".to_string())),
        );
        report
            .failures
            .push(FileFailure::new(Path::new("src/b.cpp"), "not UTF-8"));
        report.files_checked = 1;
        report
    }

    fn render(format: OutputFormat) -> String {
        let mut buf = Vec::new();
        write(&mut buf, &report(), format, false).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn compact_is_one_line_per_violation_then_skipped_files() {
        assert_eq!(
            render(OutputFormat::Compact),
            "src/a.cpp:2:7: classDef 'myClass' should be PascalCase\n\
             src/b.cpp: skipped: not UTF-8\n"
        );
    }

    #[test]
    fn text_has_help_and_summary() {
        let text = render(OutputFormat::Text);
        assert!(text.contains("= help: rename to 'MyClass'"));
        assert!(text.contains("warning: src/b.cpp: skipped: not UTF-8\n"));
        assert!(text.ends_with("Found 1 violation(s) in 1 file(s), 1 file(s) skipped\n"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn json_carries_violations_and_failures() {
        let value: serde_json::Value = serde_json::from_str(&render(OutputFormat::Json)).unwrap();
        assert_eq!(value["files_checked"], 1);
        assert_eq!(value["violations"][0]["identifier"], "myClass");
        assert_eq!(value["violations"][0]["context"], "classDef");
        assert_eq!(value["violations"][0]["location"]["line"], 2);
        assert_eq!(value["failures"][0]["reason"], "not UTF-8");
    }

    #[test]
    fn empty_report_in_color() {
        let mut buf = Vec::new();
        write(&mut buf, &ScanReport::new(), OutputFormat::Text, true).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("\x1b[32mFound 0 violation(s)"));
    }
}
