use crate::task::TaskDescriptor;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(flatten)]
    pub options: RunOptions,

    /// Compare against `git merge-base <branch> HEAD` when no diff_ref is set
    #[serde(default)]
    pub merge_base: Option<String>,

    /// Also list tasks skipped by the diff filter in the status view
    #[serde(default)]
    pub show_skipped: bool,

    /// Write a JSON summary of the run here
    #[serde(default)]
    pub report_file: Option<PathBuf>,

    #[serde(default)]
    pub tasks: Vec<TaskDescriptor>,
}

/// Options for a single orchestration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct RunOptions {
    /// When false, every task runs regardless of repository state
    #[serde(default = "default_true")]
    pub check_git_diff: bool,

    /// Only staged changes count (`git diff --cached`)
    #[serde(default = "default_true")]
    pub staged_check: bool,

    /// Revision the diff is taken against
    #[serde(default)]
    pub diff_ref: Option<String>,

    /// Maximum number of tasks running at once; unbounded when absent
    #[serde(default)]
    pub max_parallel: Option<usize>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            check_git_diff: default_true(),
            staged_check: default_true(),
            diff_ref: None,
            max_parallel: None,
        }
    }
}
