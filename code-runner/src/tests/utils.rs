pub mod defaults {
    use crate::{CodeExecutionService, ExecutorConfig, ResourceLimits, Result};
    use std::path::Path;
    use tempfile::TempDir;
    use tokio::time::Duration;

    pub fn default_test_limits() -> ResourceLimits {
        ResourceLimits {
            cpu_time: 60,
            file_size: 64 * 1024 * 1024, // 64MB
        }
    }

    pub fn default_timeout() -> Duration {
        Duration::from_secs(10)
    }

    /// Budget for toolchains with slow compilers (kotlinc, scalac, swift)
    pub fn extended_timeout() -> Duration {
        Duration::from_secs(60)
    }

    pub fn short_timeout() -> Duration {
        Duration::from_secs(1)
    }

    pub fn test_config(work_root: &Path, timeout: Duration) -> ExecutorConfig {
        ExecutorConfig::default()
            .with_work_root(work_root)
            .with_timeout(timeout)
            .with_max_concurrent_executions(4)
            .with_limits(default_test_limits())
    }

    /// Service whose work areas live in a private temp dir
    pub async fn setup_test_service(timeout: Duration) -> Result<(TempDir, CodeExecutionService)> {
        setup_test_service_with(|config| config.with_timeout(timeout)).await
    }

    pub async fn setup_test_service_with(
        configure: impl FnOnce(ExecutorConfig) -> ExecutorConfig,
    ) -> Result<(TempDir, CodeExecutionService)> {
        let dir = tempfile::tempdir()?;
        let config = configure(test_config(dir.path(), default_timeout()));
        let service = CodeExecutionService::new(config).await?;
        Ok((dir, service))
    }

    pub fn assert_work_root_empty(work_root: &Path) {
        let leftovers: Vec<_> = std::fs::read_dir(work_root)
            .expect("work root readable")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name())
            .collect();
        assert!(leftovers.is_empty(), "work areas left behind: {:?}", leftovers);
    }
}

pub mod processes {
    use std::path::Path;
    use std::time::{Duration, Instant};

    /// Pids a test script wrote to `path`, one per line
    pub fn read_pids(path: &Path) -> std::io::Result<Vec<i32>> {
        Ok(std::fs::read_to_string(path)?
            .lines()
            .filter_map(|line| line.trim().parse().ok())
            .collect())
    }

    /// Whether a pid names a live, non-zombie process
    pub fn is_alive(pid: i32) -> bool {
        match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
            Ok(stat) => match stat.rfind(')') {
                Some(idx) => !matches!(stat[idx + 1..].trim_start().chars().next(), Some('Z' | 'X')),
                None => true,
            },
            Err(_) => false,
        }
    }

    pub async fn wait_until_dead(pid: i32, within: Duration) -> bool {
        let deadline = Instant::now() + within;
        while Instant::now() < deadline {
            if !is_alive(pid) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        !is_alive(pid)
    }
}
