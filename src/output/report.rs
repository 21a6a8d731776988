use crate::error::OutputError;
use crate::runner::RunReport;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub timestamp: String,
    pub duration_sec: f64,
    pub passed: bool,
    pub tasks: Vec<JsonTask>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonTask {
    pub cwd: String,
    pub command: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub duration_sec: f64,
    pub output: String,
}

impl JsonReport {
    pub fn from_run(report: &RunReport) -> Self {
        let tasks = report
            .outcomes
            .iter()
            .map(|outcome| JsonTask {
                cwd: outcome.cwd.clone(),
                command: outcome.command.clone(),
                status: outcome.status.to_string(),
                exit_code: outcome.exit_code,
                duration_sec: outcome.duration.as_secs_f64(),
                output: strip_ansi(&outcome.output),
            })
            .collect();

        Self {
            timestamp: Utc::now().to_rfc3339(),
            duration_sec: report.total_duration.as_secs_f64(),
            passed: report.all_succeeded(),
            tasks,
        }
    }
}

/// Write the run as pretty JSON, creating parent directories as needed
pub fn write_json_report(path: &Path, report: &RunReport) -> Result<(), OutputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(OutputError::WriteReport)?;
    }

    let json = serde_json::to_string_pretty(&JsonReport::from_run(report))?;
    fs::write(path, json).map_err(OutputError::WriteReport)
}

/// Remove CSI escape sequences (colors, cursor moves) from captured text
pub fn strip_ansi(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\u{1b}' && chars.peek() == Some(&'[') {
            chars.next();
            // parameters and intermediates, then one final byte in @..~
            for next in chars.by_ref() {
                if ('@'..='~').contains(&next) {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{RunSnapshot, RunStatus, TaskOutcome};
    use std::time::Duration;

    #[test]
    fn test_strip_ansi() {
        let colored = "[\u{1b}[48;5;1m12:00:00.000\u{1b}[49m] boom";
        assert_eq!(strip_ansi(colored), "[12:00:00.000] boom");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn test_write_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/report.json");
        let report = RunReport {
            outcomes: vec![TaskOutcome {
                cwd: "web".to_string(),
                command: "npm test".to_string(),
                status: RunStatus::Failed,
                exit_code: Some(1),
                output: "[\u{1b}[41mt\u{1b}[0m] failed".to_string(),
                duration: Duration::from_millis(1500),
            }],
            snapshot: RunSnapshot::default(),
            total_duration: Duration::from_secs(2),
        };

        write_json_report(&path, &report).unwrap();

        let parsed: JsonReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(!parsed.passed);
        assert_eq!(parsed.tasks.len(), 1);
        assert_eq!(parsed.tasks[0].status, "failed");
        assert_eq!(parsed.tasks[0].exit_code, Some(1));
        assert_eq!(parsed.tasks[0].output, "[t] failed");
        assert!((parsed.tasks[0].duration_sec - 1.5).abs() < f64::EPSILON);
    }
}
