//! Language profiles and toolchain checks

mod table;

pub use table::PROFILES;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use which::which;

use crate::error::Error;

/// Placeholder for the absolute path of the written source file
pub const SOURCE: &str = "{source}";
/// Placeholder for the absolute path of the compiled artifact
pub const ARTIFACT: &str = "{artifact}";
/// Placeholder for the work area directory
pub const DIR: &str = "{dir}";

/// A program plus argument template. `program` is either a tool name looked
/// up on PATH or a placeholder for a path inside the work area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandTemplate {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl CommandTemplate {
    pub const fn new(program: &'static str, args: &'static [&'static str]) -> Self {
        Self { program, args }
    }

    /// The external tool this command needs, if it is not a work area artifact
    pub fn tool(&self) -> Option<&'static str> {
        if self.program.contains('{') {
            None
        } else {
            Some(self.program)
        }
    }

    pub fn render(&self, paths: &WorkPaths) -> (String, Vec<String>) {
        (
            paths.substitute(self.program),
            self.args.iter().map(|arg| paths.substitute(arg)).collect(),
        )
    }
}

/// Immutable per-language execution configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub version: &'static str,
    /// Source file extension, including the leading dot
    pub extension: &'static str,
    /// Fixed source file name without extension
    pub source_stem: &'static str,
    /// Fixed compiled artifact name, for toolchains that take an output path
    pub artifact: Option<&'static str>,
    pub compile: Option<CommandTemplate>,
    pub run: CommandTemplate,
}

impl LanguageProfile {
    pub fn source_file_name(&self) -> String {
        format!("{}{}", self.source_stem, self.extension)
    }

    pub fn needs_compile(&self) -> bool {
        self.compile.is_some()
    }

    pub fn info(&self) -> LanguageInfo {
        LanguageInfo {
            id: self.id.to_string(),
            name: self.name.to_string(),
            version: self.version.to_string(),
            extension: self.extension.to_string(),
        }
    }
}

/// Absolute paths a command template can refer to
#[derive(Debug, Clone)]
pub struct WorkPaths {
    pub dir: PathBuf,
    pub source: PathBuf,
    pub artifact: PathBuf,
}

impl WorkPaths {
    pub fn new(dir: &Path, profile: &LanguageProfile) -> Self {
        Self {
            dir: dir.to_path_buf(),
            source: dir.join(profile.source_file_name()),
            artifact: dir.join(profile.artifact.unwrap_or(profile.source_stem)),
        }
    }

    fn substitute(&self, template: &str) -> String {
        template
            .replace(SOURCE, &self.source.to_string_lossy())
            .replace(ARTIFACT, &self.artifact.to_string_lossy())
            .replace(DIR, &self.dir.to_string_lossy())
    }
}

/// Public description of a supported language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub id: String,
    pub name: String,
    pub version: String,
    pub extension: String,
}

/// Find the profile for a language id, ignoring case and surrounding whitespace
pub fn lookup(id: &str) -> Option<&'static LanguageProfile> {
    let id = id.trim();
    PROFILES
        .iter()
        .find(|profile| profile.id.eq_ignore_ascii_case(id))
}

/// All supported ids, sorted
pub fn supported_ids() -> Vec<&'static str> {
    let mut ids: Vec<_> = PROFILES.iter().map(|profile| profile.id).collect();
    ids.sort_unstable();
    ids
}

pub fn supported_languages() -> Vec<LanguageInfo> {
    PROFILES.iter().map(LanguageProfile::info).collect()
}

pub fn unsupported(language: &str) -> Error {
    Error::UnsupportedLanguage {
        language: language.to_string(),
        available: supported_ids(),
    }
}

pub trait ToolCheck {
    fn required_tools(&self) -> Vec<&'static str>;

    /// Fails with `ToolchainMissing` for the first tool that is not on PATH
    fn check_tools(&self) -> Result<(), Error> {
        match self
            .required_tools()
            .into_iter()
            .find(|tool| which(tool).is_err())
        {
            Some(tool) => Err(toolchain_missing(tool)),
            None => Ok(()),
        }
    }
}

impl ToolCheck for LanguageProfile {
    fn required_tools(&self) -> Vec<&'static str> {
        self.compile
            .iter()
            .chain(std::iter::once(&self.run))
            .filter_map(CommandTemplate::tool)
            .collect()
    }
}

/// Resolve a tool on PATH
pub(crate) fn resolve_tool(tool: &str) -> Result<PathBuf, Error> {
    which(tool).map_err(|_| toolchain_missing(tool))
}

pub(crate) fn toolchain_missing(tool: &str) -> Error {
    Error::ToolchainMissing {
        tool: tool.to_string(),
        hint: install_hint(tool),
    }
}

/// Remediation text for a missing compiler or interpreter
pub fn install_hint(tool: &str) -> &'static str {
    match tool {
        "python3" | "python" => "Install from https://python.org or run: apt-get install python3",
        "node" => "Install from https://nodejs.org or run: apt-get install nodejs",
        "ts-node" => "Run: npm install -g ts-node typescript",
        "javac" | "java" => "Install a JDK, e.g. apt-get install openjdk-17-jdk",
        "g++" => "Run: apt-get install g++",
        "gcc" => "Run: apt-get install gcc",
        "go" => "Install from https://go.dev/dl/ or run: apt-get install golang",
        "rustc" => "Install from https://rustup.rs/",
        "ruby" => "Install from https://www.ruby-lang.org/ or run: apt-get install ruby",
        "php" => "Install from https://www.php.net/ or run: apt-get install php-cli",
        "swift" => "Install from https://www.swift.org/download/",
        "kotlinc" | "kotlin" => "Install from https://kotlinlang.org/docs/command-line.html",
        "Rscript" => "Install R from https://cran.r-project.org/ or run: apt-get install r-base",
        "perl" => "Install from https://www.perl.org/ or run: apt-get install perl",
        "bash" => "Run: apt-get install bash",
        "csc" => "Install the .NET SDK from https://dotnet.microsoft.com/ or Mono (apt-get install mono-mcs)",
        "scala" | "scalac" => "Install from https://www.scala-lang.org/download/",
        _ => "Check the language installation documentation",
    }
}

#[cfg(test)]
pub(crate) fn skip_if_not_available(tools: &[&str]) -> bool {
    let missing: Vec<_> = tools
        .iter()
        .filter(|tool| which(**tool).is_err())
        .map(|s| (*s).to_string())
        .collect();

    if !missing.is_empty() {
        eprintln!("Skipping test: {} not available", missing.join(", "));
        return true;
    }
    false
}
