mod defaults;
mod types;

pub use defaults::default_config_path;
pub use types::*;

use crate::error::ConfigError;
use defaults::*;
use std::path::Path;

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            options: RunOptions::default(),
            merge_base: None,
            show_skipped: false,
            report_file: None,
            tasks: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tasks.is_empty() {
            return Err(ConfigError::NoTasks);
        }

        self.options.validate()?;

        for (index, task) in self.tasks.iter().enumerate() {
            if task.cmd.argv()?.is_empty() {
                return Err(ConfigError::EmptyCommand { index });
            }
        }

        Ok(())
    }
}

impl RunOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_parallel == Some(0) {
            return Err(ConfigError::ZeroParallelism);
        }
        Ok(())
    }
}
