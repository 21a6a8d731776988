//! Spawn commands and capture stdout and stderr as one timestamped stream

mod stream;

pub use stream::{stamp_stderr, stamp_stdout, timestamp};

use crate::error::ProcessError;
use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use stream::{forward_lines, StreamKind};

#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
    /// Merged stdout/stderr in arrival order, one stamped line per entry
    pub output: String,
    pub duration: Duration,
}

/// Runs commands in allow-fail mode and keeps count of spawned and live children
#[derive(Debug, Default)]
pub struct ProcessRunner {
    spawned: AtomicUsize,
    live: AtomicUsize,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_process_count(&self) {
        self.spawned.store(0, Ordering::SeqCst);
    }

    pub fn spawned(&self) -> usize {
        self.spawned.load(Ordering::SeqCst)
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Check that no child outlived its run. Returns the number still live.
    pub fn sanitize(&self) -> usize {
        let live = self.live();
        if live > 0 {
            warn!("{} processes still running at cleanup", live);
        } else {
            debug!("{} processes spawned, none left running", self.spawned());
        }
        live
    }

    /// Run `argv` in `cwd`. A non-zero exit is a normal outcome, not an error.
    pub async fn run(&self, cwd: &Path, argv: &[String]) -> Result<ProcessOutcome, ProcessError> {
        let (program, args) = argv.split_first().ok_or(ProcessError::EmptyCommand)?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let start = Instant::now();
        let mut child = cmd.spawn().map_err(|e| ProcessError::Spawn {
            program: program.clone(),
            cwd: cwd.to_path_buf(),
            source: e,
        })?;
        self.spawned.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_add(1, Ordering::SeqCst);
        let _live = LiveGuard(&self.live);

        let (tx, mut rx) = mpsc::unbounded_channel();
        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_lines(stdout, StreamKind::Stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_lines(stderr, StreamKind::Stderr, tx.clone()));
        }
        drop(tx);

        let mut lines = Vec::new();
        while let Some(line) = rx.recv().await {
            lines.push(line);
        }

        let status = child.wait().await?;
        debug!("{} exited with {} after {:?}", program, status, start.elapsed());

        Ok(ProcessOutcome {
            success: status.success(),
            exit_code: status.code(),
            output: lines.join("\n"),
            duration: start.elapsed(),
        })
    }
}

struct LiveGuard<'a>(&'a AtomicUsize);

impl Drop for LiveGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
