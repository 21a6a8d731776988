pub mod run;
pub mod schema;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pre-commit-progress")]
#[command(
    author,
    version,
    about = "Run pre-commit checks on changed directories in parallel, with live progress"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the configured checks
    Run(RunArgs),

    /// Print JSON Schema for config validation
    Schema,
}

#[derive(Parser, Clone)]
pub struct RunArgs {
    /// Path to config file
    #[arg(short, long, default_value = pre_commit_progress::config::default_config_path())]
    pub config: PathBuf,

    /// Run every task, ignoring the git diff check
    #[arg(long)]
    pub all: bool,

    /// Count unstaged changes too, not only staged ones
    #[arg(long)]
    pub unstaged: bool,

    /// Compare against this revision (e.g., HEAD~1, a commit hash)
    #[arg(long, env = "PRE_COMMIT_DIFF_REF")]
    pub diff_ref: Option<String>,

    /// Compare against the merge base of this branch and HEAD (e.g., origin/main)
    #[arg(long, conflicts_with = "diff_ref")]
    pub merge_base: Option<String>,

    /// Override max parallel tasks
    #[arg(long)]
    pub max_parallel: Option<usize>,

    /// List tasks without changes in the status view
    #[arg(long)]
    pub show_skipped: bool,

    /// Write a JSON summary of the run
    #[arg(long)]
    pub report_file: Option<PathBuf>,

    /// Show which tasks would run without executing them
    #[arg(long)]
    pub dry_run: bool,
}
