//! # Code Runner
//!
//! Runs untrusted source code in one of 17 languages. Each execution gets a
//! private work area, a wall-clock budget shared by compilation and the run,
//! and bounded output capture. Every outcome, including toolchain gaps and
//! timeouts, comes back as an [`ExecutionResult`].

mod config;
mod error;
mod executor;
pub mod languages;
mod output;
mod reaper;
mod sandbox;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use config::ExecutorConfig;
pub use error::Error;
pub use executor::CodeExecutor;
pub use languages::{LanguageInfo, LanguageProfile};
pub use output::{STDERR_TRUNCATION_MARKER, STDOUT_TRUNCATION_MARKER};
pub use sandbox::Sandbox;
pub use service::CodeExecutionService;
pub use types::{ExecutionRequest, ExecutionResult, ExecutionStatus, ProcessOutput, ResourceLimits};

/// Result type for code execution operations
pub type Result<T> = std::result::Result<T, Error>;
