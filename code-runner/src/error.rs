use std::time::Duration;
use thiserror::Error;

use crate::types::ExecutionStatus;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported language: {language}. Available: {}", available.join(", "))]
    UnsupportedLanguage {
        language: String,
        available: Vec<&'static str>,
    },

    #[error("Compilation error")]
    CompilationError {
        stderr: String,
        exit_code: Option<i32>,
    },

    #[error("Compilation timeout (>{}s)", seconds(.0))]
    CompilationTimeout(Duration),

    #[error("Execution timeout (>{}s). Your code took too long to execute.", seconds(.0))]
    Timeout(Duration),

    #[error("{tool} is not installed or not in PATH.\n\nInstallation: {hint}\n\nAfter installation, restart the server.")]
    ToolchainMissing { tool: String, hint: &'static str },

    #[error("Sandbox error: {0}")]
    Sandbox(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Result status reported to callers for this failure
    pub fn status(&self) -> ExecutionStatus {
        match self {
            Error::UnsupportedLanguage { .. } => ExecutionStatus::UnsupportedLanguage,
            Error::CompilationError { .. } => ExecutionStatus::CompilationError,
            Error::CompilationTimeout(_) => ExecutionStatus::CompilationTimeout,
            Error::Timeout(_) => ExecutionStatus::Timeout,
            Error::ToolchainMissing { .. } => ExecutionStatus::ToolchainMissing,
            Error::Sandbox(_) | Error::Config(_) | Error::Io(_) => ExecutionStatus::InternalError,
        }
    }

    /// Whether this is an orchestration failure rather than an outcome of the user's code
    pub fn is_internal(&self) -> bool {
        self.status() == ExecutionStatus::InternalError
    }
}

/// Whole budgets print as `10`, fractional ones as `0.05`
fn seconds(budget: &Duration) -> String {
    if budget.subsec_nanos() == 0 {
        budget.as_secs().to_string()
    } else {
        let text = format!("{:.3}", budget.as_secs_f64());
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
