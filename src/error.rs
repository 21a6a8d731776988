use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrecommitError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Diff error: {0}")]
    Diff(#[from] DiffError),

    #[error("Runner error: {0}")]
    Runner(#[from] RunnerError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("No tasks configured")]
    NoTasks,

    #[error("max_parallel must be at least 1")]
    ZeroParallelism,

    #[error("Task {index} has an empty command")]
    EmptyCommand { index: usize },

    #[error("Cannot split command '{0}' into arguments (unbalanced quotes?)")]
    InvalidCommandLine(String),
}

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Failed to run git for '{path}': {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git diff failed for '{path}' (exit status {status})")]
    GitDiff { path: String, status: String },

    #[error("git merge-base failed for '{branch}': {stderr}")]
    MergeBase { branch: String, stderr: String },
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to spawn '{program}' in '{cwd}': {source}")]
    Spawn {
        program: String,
        cwd: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Empty command")]
    EmptyCommand,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to acquire semaphore: {0}")]
    Semaphore(#[from] tokio::sync::AcquireError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write terminal output: {0}")]
    Terminal(std::io::Error),

    #[error("Failed to write report: {0}")]
    WriteReport(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
