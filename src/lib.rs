//! Run pre-commit checks only where there are changes, with live progress.
//!
//! ```no_run
//! use pre_commit_progress::{run_pre_commit, RunOptions, TaskDescriptor};
//!
//! # async fn example() -> Result<(), pre_commit_progress::error::PrecommitError> {
//! let verdict = run_pre_commit(
//!     vec![
//!         TaskDescriptor::new("cargo fmt --check"),
//!         TaskDescriptor::new("npm test").in_dir("web"),
//!     ],
//!     RunOptions {
//!         max_parallel: Some(2),
//!         ..Default::default()
//!     },
//! )
//! .await?;
//! std::process::exit(verdict.exit_code());
//! # }
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod output;
pub mod process;
pub mod runner;
pub mod session;
pub mod task;

pub use config::{Config, RunOptions};
pub use output::Verdict;
pub use session::{run_pre_commit, Console, PreCommit};
pub use task::{CommandSpec, TaskDescriptor};
