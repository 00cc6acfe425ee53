//! Immutable configuration values handed to each stage.

use std::path::PathBuf;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static JAVA_PACKAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)*$")
        .expect("package pattern is valid")
});

/// Options for the compiler core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Emit the schema table alongside the class model.
    pub schema: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { schema: true }
    }
}

/// Options for the code renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub package: String,
    pub version: String,
    /// Stamped into file headers. The only input that varies between runs.
    pub date: NaiveDate,
}

impl RenderOptions {
    pub fn new(package: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            package: package.into(),
            version: "1.0".to_string(),
            date,
        }
    }
}

/// Where and how artifacts are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub root: PathBuf,
    pub package: String,
    pub javadoc_dir: Option<PathBuf>,
    /// Let javadoc print to the terminal instead of discarding its output.
    pub verbose: bool,
}

impl OutputConfig {
    /// Directory the package lives in: `<root>/<package with . as />`.
    pub fn package_dir(&self) -> PathBuf {
        self.package
            .split('.')
            .fold(self.root.clone(), |dir, seg| dir.join(seg))
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("\"{0}\" is not a valid Java package name")]
pub struct InvalidPackage(pub String);

pub fn validate_package(package: &str) -> Result<(), InvalidPackage> {
    if JAVA_PACKAGE.is_match(package) {
        Ok(())
    } else {
        Err(InvalidPackage(package.to_string()))
    }
}
