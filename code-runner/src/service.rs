use std::sync::Arc;
use std::time::Duration;
use tokio::{fs, sync::Semaphore};
use tracing::{debug, info};

use crate::{
    config::ExecutorConfig,
    error::Error,
    executor::CodeExecutor,
    languages::{self, LanguageInfo},
    types::{ExecutionRequest, ExecutionResult},
};

#[derive(Clone)]
pub struct CodeExecutionService {
    executor: Arc<CodeExecutor>,
    semaphore: Arc<Semaphore>,
}

impl CodeExecutionService {
    pub async fn new(mut config: ExecutorConfig) -> Result<Self, Error> {
        config.validate()?;

        fs::create_dir_all(&config.work_root).await.map_err(|e| {
            Error::Config(format!(
                "Failed to create work root {}: {}",
                config.work_root.display(),
                e
            ))
        })?;
        // Artifact paths handed to the sandbox must be absolute
        config.work_root = fs::canonicalize(&config.work_root).await.map_err(|e| {
            Error::Config(format!(
                "Failed to resolve work root {}: {}",
                config.work_root.display(),
                e
            ))
        })?;

        info!(
            "Code execution service ready: timeout={:?} max_output={} max_concurrent={} work_root={}",
            config.timeout,
            config.max_output_chars,
            config.max_concurrent_executions,
            config.work_root.display()
        );

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_executions)),
            executor: Arc::new(CodeExecutor::new(config)),
        })
    }

    /// Run a request to completion. Failures are reported in the result.
    pub async fn execute(&self, request: ExecutionRequest) -> ExecutionResult {
        // Acquire execution permit
        let _permit = match self.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                return self.executor.failure(
                    Error::Sandbox(format!("Failed to acquire execution permit: {}", e)),
                    Duration::ZERO,
                )
            }
        };

        debug!(
            "Starting code execution for language: {}",
            request.language
        );

        self.executor.execute(&request).await
    }

    pub async fn execute_code(&self, code: &str, language: &str, input: &str) -> ExecutionResult {
        self.execute(ExecutionRequest::new(language, code).with_input(input))
            .await
    }

    pub fn languages(&self) -> Vec<LanguageInfo> {
        languages::supported_languages()
    }

    pub fn config(&self) -> &ExecutorConfig {
        self.executor.config()
    }

    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }
}
