use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{error::Error, types::duration_serde, types::ResourceLimits};

/// Runtime configuration for the execution service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Wall-clock budget shared by the compile and run steps
    #[serde(with = "duration_serde")]
    pub timeout: Duration,

    /// Maximum characters kept from each of stdout and stderr
    pub max_output_chars: usize,

    /// Maximum number of executions running at once
    pub max_concurrent_executions: usize,

    /// Directory under which per-execution work areas are created
    pub work_root: PathBuf,

    /// Report raw internal error text to callers
    pub expose_internal_errors: bool,

    /// Per-process resource limits
    pub limits: ResourceLimits,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_output_chars: 10_000,
            max_concurrent_executions: 10,
            work_root: std::env::temp_dir(),
            expose_internal_errors: true,
            limits: ResourceLimits::default(),
        }
    }
}

impl ExecutorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::Config(e.message().to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_output_chars(mut self, max_output_chars: usize) -> Self {
        self.max_output_chars = max_output_chars;
        self
    }

    pub fn with_max_concurrent_executions(mut self, max: usize) -> Self {
        self.max_concurrent_executions = max;
        self
    }

    pub fn with_work_root(mut self, work_root: impl Into<PathBuf>) -> Self {
        self.work_root = work_root.into();
        self
    }

    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_expose_internal_errors(mut self, expose: bool) -> Self {
        self.expose_internal_errors = expose;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".to_string()));
        }
        if self.max_output_chars == 0 {
            return Err(Error::Config(
                "max_output_chars must be greater than zero".to_string(),
            ));
        }
        if self.max_concurrent_executions == 0 {
            return Err(Error::Config(
                "max_concurrent_executions must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
