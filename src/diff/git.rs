use super::DiffPredicate;
use crate::error::DiffError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Diff predicate backed by `git diff --exit-code`
#[derive(Debug, Clone, Default)]
pub struct GitDiff {
    /// Directory git runs in; the process cwd when unset
    repo: Option<PathBuf>,
}

impl GitDiff {
    pub fn in_repo(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: Some(repo.into()),
        }
    }

    fn git(&self) -> Command {
        let mut command = Command::new("git");
        if let Some(repo) = &self.repo {
            command.current_dir(repo);
        }
        command.stdin(Stdio::null());
        command
    }

    /// Resolve `git merge-base <branch> HEAD` to a commit hash
    pub async fn merge_base(&self, branch: &str) -> Result<String, DiffError> {
        let output = self
            .git()
            .args(["merge-base", branch, "HEAD"])
            .output()
            .await
            .map_err(|e| DiffError::Spawn {
                path: branch.to_string(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DiffError::MergeBase {
                branch: branch.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Arguments for `git diff` checking one path
pub fn diff_args(path: &str, staged_only: bool, diff_ref: Option<&str>) -> Vec<String> {
    let mut args = vec!["diff".to_string()];
    if staged_only {
        args.push("--cached".to_string());
    }
    args.push("--exit-code".to_string());
    if let Some(reference) = diff_ref.filter(|r| !r.is_empty()) {
        args.push(reference.to_string());
    }
    args.push("--".to_string());
    args.push(path.to_string());
    args
}

#[async_trait]
impl DiffPredicate for GitDiff {
    async fn has_diff(
        &self,
        path: &str,
        staged_only: bool,
        diff_ref: Option<&str>,
    ) -> Result<bool, DiffError> {
        let args = diff_args(path, staged_only, diff_ref);
        debug!("git {}", args.join(" "));

        let status = self
            .git()
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| DiffError::Spawn {
                path: path.to_string(),
                source: e,
            })?;

        // --exit-code: 0 means no changes, 1 means the path differs
        match status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(DiffError::GitDiff {
                path: path.to_string(),
                status: status.to_string(),
            }),
        }
    }
}

/// `git merge-base <branch> HEAD` in the current directory
pub async fn resolve_merge_base(branch: &str) -> Result<String, DiffError> {
    GitDiff::default().merge_base(branch).await
}
