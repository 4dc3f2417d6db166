use super::utils::defaults::{assert_work_root_empty, setup_test_service};
use crate::{
    languages::{lookup, skip_if_not_available, ToolCheck},
    ExecutionRequest, ExecutionStatus, Result,
};
use tokio::time::Duration;

mod compiled;
mod interpreted;

/// Runs a hello program and checks the full result shape. Skips when the
/// language's toolchain is not installed.
pub(crate) async fn test_language_execution(
    language: &str,
    code: &str,
    expected: &str,
    timeout: Duration,
) -> Result<()> {
    let profile = lookup(language).expect("known language");
    if skip_if_not_available(&profile.required_tools()) {
        return Ok(());
    }

    let (dir, service) = setup_test_service(timeout).await?;
    let result = service.execute(ExecutionRequest::new(language, code)).await;

    assert!(result.success, "{} failed: {:?}", language, result);
    assert_eq!(result.status, ExecutionStatus::Success);
    assert_eq!(result.exit_code, Some(0));
    assert_eq!(result.stdout.trim_end(), expected);
    assert!(result.error.is_none());
    assert_work_root_empty(dir.path());
    Ok(())
}
