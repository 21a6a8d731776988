//! One pre-commit run: diff filter, bounded execution, live status, final report

use crate::config::RunOptions;
use crate::diff::{filter_tasks, DiffPredicate, GitDiff};
use crate::error::{OutputError, PrecommitError};
use crate::output::{
    write_final_report, write_json_report, CursorGuard, Renderer, StatusReporter,
    TerminalRenderer, Verdict,
};
use crate::process::ProcessRunner;
use crate::runner::{Orchestrator, RunObserver, RunReport};
use crate::task::TaskDescriptor;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Where the cursor toggles, final status view and logs are written
pub struct Console {
    pub out: Box<dyn Write + Send>,
    pub err: Box<dyn Write + Send>,
}

impl Console {
    pub fn stdio() -> Self {
        Self {
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
        }
    }
}

pub struct PreCommit {
    options: RunOptions,
    show_skipped: bool,
    report_file: Option<PathBuf>,
    diff: Arc<dyn DiffPredicate>,
    renderer: Arc<dyn Renderer>,
    runner: Arc<ProcessRunner>,
    console: Console,
}

impl PreCommit {
    /// Git-backed diff filter, terminal rendering and stdio
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            show_skipped: false,
            report_file: None,
            diff: Arc::new(GitDiff::default()),
            renderer: Arc::new(TerminalRenderer),
            runner: Arc::new(ProcessRunner::new()),
            console: Console::stdio(),
        }
    }

    pub fn with_diff(mut self, diff: Arc<dyn DiffPredicate>) -> Self {
        self.diff = diff;
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_runner(mut self, runner: Arc<ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    pub fn show_skipped(mut self, show: bool) -> Self {
        self.show_skipped = show;
        self
    }

    pub fn with_report_file(mut self, path: Option<PathBuf>) -> Self {
        self.report_file = path;
        self
    }

    /// Run the tasks and print the final report. The cursor is hidden for the
    /// duration and restored on every path, including filter errors.
    pub async fn run(self, tasks: Vec<TaskDescriptor>) -> Result<Verdict, PrecommitError> {
        self.options.validate()?;

        let PreCommit {
            options,
            show_skipped,
            report_file,
            diff,
            renderer,
            runner,
            mut console,
        } = self;

        let result = {
            let _cursor = CursorGuard::hide(&mut console.out)?;
            execute(
                &options,
                show_skipped,
                tasks,
                &*diff,
                renderer,
                runner.clone(),
            )
            .await
        };
        runner.sanitize();
        let report = result?;

        let verdict = write_final_report(&report, &mut console.out, &mut console.err)
            .map_err(OutputError::Terminal)?;

        // a report write failure leaves the verdict unchanged
        if let Some(path) = &report_file {
            match write_json_report(path, &report) {
                Ok(()) => info!("Wrote report to {}", path.display()),
                Err(e) => warn!("Could not write report to {}: {}", path.display(), e),
            }
        }
        Ok(verdict)
    }
}

async fn execute(
    options: &RunOptions,
    show_skipped: bool,
    tasks: Vec<TaskDescriptor>,
    diff: &dyn DiffPredicate,
    renderer: Arc<dyn Renderer>,
    runner: Arc<ProcessRunner>,
) -> Result<RunReport, PrecommitError> {
    let filtered = filter_tasks(tasks, options, diff).await?;
    let skipped = if show_skipped {
        filtered.skipped
    } else {
        Vec::new()
    };

    let reporter: Arc<dyn RunObserver> = Arc::new(StatusReporter::new(renderer));
    let orchestrator = Orchestrator::new(options.max_parallel, runner)
        .with_observer(reporter)
        .with_skipped(skipped);

    Ok(orchestrator.run(filtered.included).await?)
}

/// Run with git, the terminal and stdio
pub async fn run_pre_commit(
    tasks: Vec<TaskDescriptor>,
    options: RunOptions,
) -> Result<Verdict, PrecommitError> {
    PreCommit::new(options).run(tasks).await
}
