//! Decide which tasks run based on outstanding changes under their paths

mod git;

pub use git::{diff_args, resolve_merge_base, GitDiff};

use crate::config::RunOptions;
use crate::error::DiffError;
use crate::task::TaskDescriptor;
use async_trait::async_trait;
use tracing::{debug, info};

#[async_trait]
pub trait DiffPredicate: Send + Sync {
    /// Whether `path` has changes relative to the index or `diff_ref`
    async fn has_diff(
        &self,
        path: &str,
        staged_only: bool,
        diff_ref: Option<&str>,
    ) -> Result<bool, DiffError>;
}

/// Tasks split by the diff filter, both in input order
#[derive(Debug, Default)]
pub struct FilterResult {
    pub included: Vec<TaskDescriptor>,
    pub skipped: Vec<TaskDescriptor>,
}

/// Apply the diff filter. The first predicate error aborts the whole filter.
pub async fn filter_tasks(
    tasks: Vec<TaskDescriptor>,
    options: &RunOptions,
    predicate: &dyn DiffPredicate,
) -> Result<FilterResult, DiffError> {
    if !options.check_git_diff {
        debug!("Diff check disabled, including all {} tasks", tasks.len());
        return Ok(FilterResult {
            included: tasks,
            skipped: Vec::new(),
        });
    }

    let mut result = FilterResult::default();
    for task in tasks {
        let changed = predicate
            .has_diff(
                task.diff_target(),
                options.staged_check,
                options.diff_ref.as_deref(),
            )
            .await?;

        if changed {
            result.included.push(task);
        } else {
            debug!("No changes under {}, skipping", task.diff_target());
            result.skipped.push(task);
        }
    }

    info!(
        "{} tasks have changes, {} skipped",
        result.included.len(),
        result.skipped.len()
    );
    Ok(result)
}
