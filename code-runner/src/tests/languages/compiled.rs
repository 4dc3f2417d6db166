use super::super::{
    fixtures::code_samples::*,
    utils::defaults::{default_timeout, extended_timeout},
};
use super::test_language_execution;
use crate::Result;

#[tokio::test]
async fn test_cpp_basic() -> Result<()> {
    test_language_execution("cpp", CPP_HELLO, "Hello from C++!", default_timeout()).await
}

#[tokio::test]
async fn test_c_basic() -> Result<()> {
    test_language_execution("c", C_HELLO, "Hello from C!", default_timeout()).await
}

#[tokio::test]
async fn test_rust_basic() -> Result<()> {
    test_language_execution("rust", RUST_HELLO, "Hello from Rust!", extended_timeout()).await
}

#[tokio::test]
async fn test_java_basic() -> Result<()> {
    test_language_execution("java", JAVA_HELLO, "Hello from Java!", extended_timeout()).await
}

#[tokio::test]
async fn test_swift_basic() -> Result<()> {
    test_language_execution("swift", SWIFT_HELLO, "Hello from Swift!", extended_timeout()).await
}

#[tokio::test]
async fn test_kotlin_basic() -> Result<()> {
    test_language_execution("kotlin", KOTLIN_HELLO, "Hello from Kotlin!", extended_timeout()).await
}

#[tokio::test]
async fn test_scala_basic() -> Result<()> {
    test_language_execution("scala", SCALA_HELLO, "Hello from Scala!", extended_timeout()).await
}

#[tokio::test]
async fn test_csharp_basic() -> Result<()> {
    // main.exe only runs directly when the kernel hands PE files to mono
    if !std::path::Path::new("/proc/sys/fs/binfmt_misc/cli").exists() {
        eprintln!("Skipping test: no binfmt handler for .exe");
        return Ok(());
    }
    test_language_execution("csharp", CSHARP_HELLO, "Hello from C#!", extended_timeout()).await
}
