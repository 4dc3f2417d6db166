use super::super::{fixtures::code_samples::*, utils::defaults::default_timeout};
use super::test_language_execution;
use crate::Result;

#[tokio::test]
async fn test_python_basic() -> Result<()> {
    test_language_execution("python", PYTHON_HELLO, "Hello from Python!", default_timeout()).await
}

#[tokio::test]
async fn test_javascript_basic() -> Result<()> {
    test_language_execution("javascript", JS_HELLO, "Hello from JavaScript!", default_timeout())
        .await
}

#[tokio::test]
async fn test_typescript_basic() -> Result<()> {
    test_language_execution("typescript", TS_HELLO, "Hello from TypeScript!", default_timeout())
        .await
}

#[tokio::test]
async fn test_ruby_basic() -> Result<()> {
    test_language_execution("ruby", RUBY_HELLO, "Hello from Ruby!", default_timeout()).await
}

#[tokio::test]
async fn test_php_basic() -> Result<()> {
    test_language_execution("php", PHP_HELLO, "Hello from PHP!", default_timeout()).await
}

#[tokio::test]
async fn test_r_basic() -> Result<()> {
    test_language_execution("r", R_HELLO, "Hello from R!", default_timeout()).await
}

#[tokio::test]
async fn test_perl_basic() -> Result<()> {
    test_language_execution("perl", PERL_HELLO, "Hello from Perl!", default_timeout()).await
}

#[tokio::test]
async fn test_bash_basic() -> Result<()> {
    test_language_execution("bash", BASH_HELLO, "Hello from Bash!", default_timeout()).await
}

// `go run` compiles internally but has no separate compile step here
#[tokio::test]
async fn test_go_basic() -> Result<()> {
    test_language_execution("go", GO_HELLO, "Hello from Go!", default_timeout()).await
}
