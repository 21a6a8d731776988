//! Task descriptors as read from config or built by library callers

use crate::error::ConfigError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_cwd() -> String {
    ".".to_string()
}

/// A command given either as one shell-style line or as an argument list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum CommandSpec {
    Line(String),
    Args(Vec<String>),
}

impl CommandSpec {
    /// Resolve to an ordered argument vector. Lines are split with POSIX
    /// shell word rules, so `--ignore="a,b"` stays a single argument.
    pub fn argv(&self) -> Result<Vec<String>, ConfigError> {
        match self {
            CommandSpec::Line(line) => {
                shlex::split(line).ok_or_else(|| ConfigError::InvalidCommandLine(line.clone()))
            }
            CommandSpec::Args(args) => Ok(args.clone()),
        }
    }
}

impl From<&str> for CommandSpec {
    fn from(line: &str) -> Self {
        CommandSpec::Line(line.to_string())
    }
}

impl From<Vec<String>> for CommandSpec {
    fn from(args: Vec<String>) -> Self {
        CommandSpec::Args(args)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct TaskDescriptor {
    /// Working directory the command runs in
    #[serde(default = "default_cwd")]
    pub cwd: String,

    pub cmd: CommandSpec,

    /// Path checked for changes; defaults to `cwd`
    #[serde(default)]
    pub diff_path: Option<String>,
}

impl TaskDescriptor {
    pub fn new(cmd: impl Into<CommandSpec>) -> Self {
        Self {
            cwd: default_cwd(),
            cmd: cmd.into(),
            diff_path: None,
        }
    }

    pub fn in_dir(mut self, cwd: impl Into<String>) -> Self {
        self.cwd = cwd.into();
        self
    }

    pub fn with_diff_path(mut self, path: impl Into<String>) -> Self {
        self.diff_path = Some(path.into());
        self
    }

    /// The path handed to the diff predicate
    pub fn diff_target(&self) -> &str {
        self.diff_path.as_deref().unwrap_or(&self.cwd)
    }
}
