use crate::error::ConfigError;
use crate::task::TaskDescriptor;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    /// Filtered out by the diff check; never assigned to a spawned instance
    Skipped,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Succeeded | RunStatus::Failed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Pending => write!(f, "pending"),
            RunStatus::Running => write!(f, "running"),
            RunStatus::Succeeded => write!(f, "succeeded"),
            RunStatus::Failed => write!(f, "failed"),
            RunStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// What a finished instance produced
#[derive(Debug, Clone, Default)]
pub struct TaskResult {
    pub success: bool,
    pub exit_code: Option<i32>,
    /// Merged output, trimmed
    pub output: String,
    pub duration: Duration,
}

/// One task admitted past the diff filter
#[derive(Debug)]
pub struct RunInstance {
    pub cwd: String,
    pub argv: Vec<String>,
    status: Mutex<RunStatus>,
    result: Mutex<Option<TaskResult>>,
}

impl RunInstance {
    pub fn from_task(task: &TaskDescriptor) -> Result<Self, ConfigError> {
        Ok(Self {
            cwd: task.cwd.clone(),
            argv: task.cmd.argv()?,
            status: Mutex::new(RunStatus::Pending),
            result: Mutex::new(None),
        })
    }

    pub fn command_line(&self) -> String {
        self.argv.join(" ")
    }

    pub fn status(&self) -> RunStatus {
        *lock(&self.status)
    }

    pub fn result(&self) -> Option<TaskResult> {
        lock(&self.result).clone()
    }

    pub(super) fn set_status(&self, status: RunStatus) {
        *lock(&self.status) = status;
    }

    pub(super) fn set_result(&self, result: TaskResult) {
        *lock(&self.result) = Some(result);
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
