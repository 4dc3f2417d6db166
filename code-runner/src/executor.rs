use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::{
    config::ExecutorConfig,
    error::Error,
    languages::{self, CommandTemplate, LanguageProfile, ToolCheck, WorkPaths},
    sandbox::Sandbox,
    types::{ExecutionRequest, ExecutionResult, ExecutionStatus, ProcessOutput},
};

/// Runs requests against the language table, one sandbox per request
pub struct CodeExecutor {
    config: ExecutorConfig,
}

impl CodeExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Execute a request in a fresh sandbox. Never fails: every error kind is
    /// reported through the returned result.
    pub async fn execute(&self, request: &ExecutionRequest) -> ExecutionResult {
        let Some(profile) = languages::lookup(&request.language) else {
            debug!("Rejecting unsupported language: {}", request.language);
            return self.failure(languages::unsupported(&request.language), Duration::ZERO);
        };

        if let Err(e) = profile.check_tools() {
            return self.failure(e, Duration::ZERO);
        }

        let sandbox = match Sandbox::new(&self.config.work_root).await {
            Ok(sandbox) => sandbox,
            Err(e) => return self.failure(e, Duration::ZERO),
        };

        let result = self.execute_in_sandbox(profile, request, &sandbox).await;
        info!(
            "Execution in sandbox {} finished: language={} status={} elapsed={}s",
            sandbox.id(),
            profile.id,
            result.status,
            result.elapsed_seconds
        );
        result
    }

    /// Execute code in a specific sandbox
    pub async fn execute_in_sandbox(
        &self,
        profile: &LanguageProfile,
        request: &ExecutionRequest,
        sandbox: &Sandbox,
    ) -> ExecutionResult {
        if let Err(e) = sandbox
            .write_source(&profile.source_file_name(), &request.code)
            .await
        {
            return self.failure(e, Duration::ZERO);
        }

        let paths = WorkPaths::new(&sandbox.root_dir, profile);
        let started = Instant::now();
        let deadline = started + self.config.timeout;

        let outcome = self
            .compile_and_run(profile, &paths, sandbox, &request.input, deadline)
            .await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(output) => ExecutionResult::completed(output, elapsed),
            Err(e) => self.failure(e, elapsed),
        }
    }

    async fn compile_and_run(
        &self,
        profile: &LanguageProfile,
        paths: &WorkPaths,
        sandbox: &Sandbox,
        input: &str,
        deadline: Instant,
    ) -> Result<ProcessOutput, Error> {
        if let Some(compile) = &profile.compile {
            self.compile(compile, paths, sandbox, deadline).await?;
        }

        let (program, args) = profile.run.render(paths);
        self.run_step(sandbox, &program, &args, input, deadline)
            .await
            .map_err(|e| match e {
                Error::Timeout(_) => Error::Timeout(self.config.timeout),
                other => other,
            })
    }

    async fn compile(
        &self,
        compile: &CommandTemplate,
        paths: &WorkPaths,
        sandbox: &Sandbox,
        deadline: Instant,
    ) -> Result<(), Error> {
        let (program, args) = compile.render(paths);
        let output = self
            .run_step(sandbox, &program, &args, "", deadline)
            .await
            .map_err(|e| match e {
                Error::Timeout(_) => Error::CompilationTimeout(self.config.timeout),
                other => other,
            })?;

        if !output.success() {
            // Some compilers (csc) report diagnostics on stdout
            let stderr = if output.stderr.trim().is_empty() {
                output.stdout
            } else {
                output.stderr
            };
            return Err(Error::CompilationError {
                stderr,
                exit_code: output.exit_code,
            });
        }

        Ok(())
    }

    /// Run one process with whatever is left of the shared budget
    async fn run_step(
        &self,
        sandbox: &Sandbox,
        program: &str,
        args: &[String],
        input: &str,
        deadline: Instant,
    ) -> Result<ProcessOutput, Error> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(Error::Timeout(self.config.timeout));
        }

        sandbox
            .execute(
                program,
                args,
                input,
                remaining,
                &self.config.limits,
                self.config.max_output_chars,
            )
            .await
    }

    pub(crate) fn failure(&self, error: Error, elapsed: Duration) -> ExecutionResult {
        match error.status() {
            ExecutionStatus::InternalError => {
                error!("Code execution failed: {}", error);
                let message = if self.config.expose_internal_errors {
                    format!("Execution error: {}", error)
                } else {
                    "Execution error: internal failure".to_string()
                };
                let mut result = ExecutionResult::from_error(error, elapsed);
                result.error = Some(message);
                result
            }
            ExecutionStatus::ToolchainMissing => {
                warn!("{}", error);
                ExecutionResult::from_error(error, elapsed)
            }
            _ => ExecutionResult::from_error(error, elapsed),
        }
    }
}
