use crate::runner::RunReport;
use crossterm::style::Stylize;
use std::io::{self, Write};

use super::status::format_status;
use super::terminal::clear_screen;

const BANNER_WIDTH: usize = 65;
const SPACER_LINES: usize = 30;

/// Aggregate result of one orchestration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed { failed: usize },
}

impl Verdict {
    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::Passed => 0,
            Verdict::Failed { .. } => 1,
        }
    }
}

fn banner(label: &str) -> Vec<String> {
    let blank = " ".repeat(BANNER_WIDTH);
    vec![
        String::new(),
        blank.clone(),
        blank.clone(),
        format!("{:^width$}", label, width = BANNER_WIDTH),
        blank.clone(),
        blank,
    ]
}

fn ok_line<W: Write>(err: &mut W, text: &str) -> io::Result<()> {
    writeln!(err, "{}", text.black().on_dark_green())
}

fn error_line<W: Write>(err: &mut W, text: &str) -> io::Result<()> {
    writeln!(err, "{}", text.black().on_dark_red())
}

pub fn write_ok_banner<W: Write>(err: &mut W) -> io::Result<()> {
    for line in banner("OK") {
        ok_line(err, &line)?;
    }
    err.flush()
}

pub fn write_error_banner<W: Write>(err: &mut W) -> io::Result<()> {
    for line in banner("ERROR") {
        error_line(err, &line)?;
    }
    error_line(err, "")?;
    err.flush()
}

/// Print the end-of-run view. On failure the status view is printed before and
/// after the logs of the failing tasks, followed by the ERROR banner.
pub fn write_final_report<O: Write, E: Write>(
    report: &RunReport,
    out: &mut O,
    err: &mut E,
) -> io::Result<Verdict> {
    if report.all_succeeded() {
        write_ok_banner(err)?;
        return Ok(Verdict::Passed);
    }

    let status = format_status(&report.snapshot);

    clear_screen(out)?;
    writeln!(out, "{}", "\n".repeat(SPACER_LINES))?;
    out.flush()?;
    error_line(err, &"↓".repeat(BANNER_WIDTH))?;
    err.flush()?;
    writeln!(out, "{}", status)?;
    out.flush()?;

    let mut failed = 0;
    for outcome in report.failures() {
        failed += 1;
        writeln!(
            err,
            "------------\nLog of : {}\nFrom   : {}\n",
            outcome.command, outcome.cwd
        )?;
        writeln!(err, "{}", outcome.output)?;
    }
    writeln!(err)?;
    err.flush()?;

    writeln!(out, "{}", status)?;
    out.flush()?;
    write_error_banner(err)?;

    Ok(Verdict::Failed { failed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{RunSnapshot, RunStatus, SnapshotEntry, TaskOutcome};
    use std::time::Duration;

    fn outcome(command: &str, status: RunStatus, output: &str) -> TaskOutcome {
        TaskOutcome {
            cwd: ".".to_string(),
            command: command.to_string(),
            status,
            exit_code: Some(if status == RunStatus::Succeeded { 0 } else { 2 }),
            output: output.to_string(),
            duration: Duration::from_millis(5),
        }
    }

    fn report(outcomes: Vec<TaskOutcome>) -> RunReport {
        let entries = outcomes
            .iter()
            .map(|o| SnapshotEntry {
                cwd: o.cwd.clone(),
                command: o.command.clone(),
                status: o.status,
            })
            .collect();
        RunReport {
            outcomes,
            snapshot: RunSnapshot { entries },
            total_duration: Duration::from_millis(10),
        }
    }

    #[test]
    fn test_banner_lines_are_full_width() {
        let lines = banner("OK");
        assert_eq!(lines.len(), 6);
        assert!(lines[1..].iter().all(|l| l.chars().count() == BANNER_WIDTH));
        assert_eq!(lines[3].trim(), "OK");
    }

    #[test]
    fn test_success_prints_only_ok_banner() {
        let report = report(vec![outcome("cargo test", RunStatus::Succeeded, "[t] ok")]);
        let mut out = Vec::new();
        let mut err = Vec::new();

        let verdict = write_final_report(&report, &mut out, &mut err).unwrap();

        assert_eq!(verdict, Verdict::Passed);
        assert_eq!(verdict.exit_code(), 0);
        assert!(out.is_empty());
        let err = String::from_utf8(err).unwrap();
        assert!(err.contains(" OK "));
        assert!(!err.contains("ERROR"));
    }

    #[test]
    fn test_failure_prints_logs_of_failed_tasks_only() {
        let report = report(vec![
            outcome("cargo fmt --check", RunStatus::Succeeded, "[t] formatted"),
            outcome("cargo test", RunStatus::Failed, "[t] boom"),
        ]);
        let mut out = Vec::new();
        let mut err = Vec::new();

        let verdict = write_final_report(&report, &mut out, &mut err).unwrap();

        assert_eq!(verdict, Verdict::Failed { failed: 1 });
        assert_eq!(verdict.exit_code(), 1);

        let err = String::from_utf8(err).unwrap();
        assert!(err.contains("Log of : cargo test\nFrom   : .\n"));
        assert!(err.contains("[t] boom"));
        assert!(!err.contains("formatted"));
        assert!(err.contains("ERROR"));

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("📂 .").count(), 2);
        assert_eq!(out.matches("❌").count(), 2);
    }

    #[test]
    fn test_vacuous_success() {
        let report = report(Vec::new());
        let mut out = Vec::new();
        let mut err = Vec::new();
        let verdict = write_final_report(&report, &mut out, &mut err).unwrap();
        assert_eq!(verdict, Verdict::Passed);
    }
}
