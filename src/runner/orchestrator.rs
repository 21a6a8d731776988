use crate::error::RunnerError;
use crate::process::ProcessRunner;
use crate::task::TaskDescriptor;
use futures::stream::{FuturesUnordered, StreamExt};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info, warn};

use super::board::{RunBoard, RunEvent, RunObserver, RunSnapshot};
use super::instance::{RunInstance, RunStatus, TaskResult};

#[derive(Debug)]
pub struct RunReport {
    /// One outcome per instance, in input order
    pub outcomes: Vec<TaskOutcome>,
    /// Final status view, including skipped entries when they are shown
    pub snapshot: RunSnapshot,
    pub total_duration: Duration,
}

impl RunReport {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| o.status == RunStatus::Succeeded)
    }

    pub fn failures(&self) -> impl Iterator<Item = &TaskOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status != RunStatus::Succeeded)
    }
}

#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub cwd: String,
    pub command: String,
    pub status: RunStatus,
    pub exit_code: Option<i32>,
    pub output: String,
    pub duration: Duration,
}

impl TaskOutcome {
    fn from_instance(instance: &RunInstance) -> Self {
        let result = instance.result().unwrap_or_default();
        Self {
            cwd: instance.cwd.clone(),
            command: instance.command_line(),
            status: instance.status(),
            exit_code: result.exit_code,
            output: result.output,
            duration: result.duration,
        }
    }
}

/// Runs tasks with at most `max_parallel` of them active at once
pub struct Orchestrator {
    max_parallel: Option<usize>,
    runner: Arc<ProcessRunner>,
    observers: Vec<Arc<dyn RunObserver>>,
    skipped: Vec<TaskDescriptor>,
}

impl Orchestrator {
    pub fn new(max_parallel: Option<usize>, runner: Arc<ProcessRunner>) -> Self {
        Self {
            max_parallel,
            runner,
            observers: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Tasks filtered out upstream, listed in snapshots as skipped
    pub fn with_skipped(mut self, skipped: Vec<TaskDescriptor>) -> Self {
        self.skipped = skipped;
        self
    }

    pub async fn run(&self, tasks: Vec<TaskDescriptor>) -> Result<RunReport, RunnerError> {
        let start = Instant::now();

        let instances = tasks
            .iter()
            .map(RunInstance::from_task)
            .collect::<Result<Vec<_>, _>>()?;
        let board = Arc::new(RunBoard::new(
            instances,
            &self.skipped,
            self.observers.clone(),
        ));

        self.runner.reset_process_count();
        board.publish(RunEvent::Scheduled);

        // unbounded still needs at least one permit for the empty case
        let permits = self
            .max_parallel
            .unwrap_or(board.len())
            .clamp(1, Semaphore::MAX_PERMITS);
        let semaphore = Arc::new(Semaphore::new(permits));

        info!(
            "Running {} tasks with max parallelism {}",
            board.len(),
            self.max_parallel
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unbounded".to_string())
        );

        let mut futures = FuturesUnordered::new();

        // permits are acquired in input order, so admission is FIFO
        for index in 0..board.len() {
            let permit = semaphore.clone().acquire_owned().await?;
            let mut admission = Admission {
                board: board.clone(),
                index,
                finished: false,
                _permit: permit,
            };
            let runner = self.runner.clone();

            let handle = tokio::spawn(async move {
                execute_instance(&admission.board, index, &runner).await;
                admission.finished = true;
            });
            futures.push(async move { (index, handle.await) });
        }

        while let Some((index, joined)) = futures.next().await {
            if let Err(e) = joined {
                warn!("Task {} panicked: {}", index, e);
                board.finish(
                    index,
                    TaskResult {
                        success: false,
                        exit_code: None,
                        output: format!("task panicked: {}", e),
                        duration: Duration::ZERO,
                    },
                );
            }
        }

        let outcomes: Vec<_> = board
            .instances()
            .iter()
            .map(TaskOutcome::from_instance)
            .collect();

        let report = RunReport {
            outcomes,
            snapshot: board.snapshot(),
            total_duration: start.elapsed(),
        };
        info!(
            "Completed {} tasks in {:.1}s, {} failed",
            report.outcomes.len(),
            report.total_duration.as_secs_f64(),
            report.failures().count()
        );
        Ok(report)
    }
}

/// Holds a task's permit. An instance that stops short of a terminal
/// transition is marked failed before the permit goes back.
struct Admission {
    board: Arc<RunBoard>,
    index: usize,
    finished: bool,
    _permit: OwnedSemaphorePermit,
}

impl Drop for Admission {
    fn drop(&mut self) {
        if !self.finished {
            self.board.abandon(self.index, "task did not finish");
        }
    }
}

async fn execute_instance(board: &RunBoard, index: usize, runner: &ProcessRunner) {
    let instance = board.instance(index);
    debug!("Starting `{}` in {}", instance.command_line(), instance.cwd);
    board.start(index);

    let start = Instant::now();
    let result = match runner.run(Path::new(&instance.cwd), &instance.argv).await {
        Ok(outcome) => TaskResult {
            success: outcome.success,
            exit_code: outcome.exit_code,
            output: outcome.output.trim().to_string(),
            duration: outcome.duration,
        },
        Err(e) => {
            warn!("`{}` could not run: {}", instance.command_line(), e);
            TaskResult {
                success: false,
                exit_code: None,
                output: e.to_string(),
                duration: start.elapsed(),
            }
        }
    };

    board.finish(index, result);
}
