use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::Error;

/// Code execution request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Language identifier, matched case-insensitively against the profile table
    pub language: String,
    /// Source code to execute
    pub code: String,
    /// Data piped to the program's stdin
    #[serde(default)]
    pub input: String,
}

impl ExecutionRequest {
    pub fn new(language: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            code: code.into(),
            input: String::new(),
        }
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }
}

/// Execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Success,
    UnsupportedLanguage,
    CompilationError,
    CompilationTimeout,
    Timeout,
    ToolchainMissing,
    RuntimeError,
    InternalError,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Success => "success",
            ExecutionStatus::UnsupportedLanguage => "unsupported_language",
            ExecutionStatus::CompilationError => "compilation_error",
            ExecutionStatus::CompilationTimeout => "compilation_timeout",
            ExecutionStatus::Timeout => "timeout",
            ExecutionStatus::ToolchainMissing => "toolchain_missing",
            ExecutionStatus::RuntimeError => "runtime_error",
            ExecutionStatus::InternalError => "internal_error",
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Timeout | ExecutionStatus::CompilationTimeout
        )
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one finished child process, already bounded
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub exit_code: Option<i32>,
    pub signal: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Execution result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub status: ExecutionStatus,
    /// Program output (stdout), truncated to the configured cap
    pub stdout: String,
    /// Program or compiler errors (stderr), truncated to the configured cap
    pub stderr: String,
    /// Absent when the process never started or was killed on timeout
    pub exit_code: Option<i32>,
    /// Wall-clock time from the start of compilation to the end of the run
    pub elapsed_seconds: f64,
    /// Human-readable failure description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    /// Result of a run step that completed, successfully or not
    pub fn completed(output: ProcessOutput, elapsed: Duration) -> Self {
        let success = output.success();
        let error = match (output.exit_code, output.signal) {
            _ if success => None,
            (Some(code), _) => Some(format!("Process exited with code {}", code)),
            (None, Some(signal)) => Some(format!("Process terminated by signal {}", signal)),
            (None, None) => Some("Process exited abnormally".to_string()),
        };

        Self {
            success,
            status: if success {
                ExecutionStatus::Success
            } else {
                ExecutionStatus::RuntimeError
            },
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code: output.exit_code,
            elapsed_seconds: round_seconds(elapsed),
            error,
        }
    }

    /// Failure result for any error kind
    pub fn from_error(error: Error, elapsed: Duration) -> Self {
        let status = error.status();
        let message = error.to_string();
        let (stderr, exit_code) = match error {
            Error::CompilationError { stderr, exit_code } => (stderr, exit_code),
            _ => (String::new(), None),
        };

        Self {
            success: false,
            status,
            stdout: String::new(),
            stderr,
            exit_code,
            elapsed_seconds: round_seconds(elapsed),
            error: Some(message),
        }
    }
}

/// Resource limits applied to every child process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLimits {
    /// Maximum CPU time (seconds)
    pub cpu_time: u64,
    /// Maximum size of any file the process writes (bytes)
    pub file_size: u64,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            cpu_time: 30,
            file_size: 64 * 1024 * 1024, // 64MB
        }
    }
}

fn round_seconds(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 1000.0).round() / 1000.0
}

pub(crate) mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
