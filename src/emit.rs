//! Writes compiled modules to disk and optionally runs `javadoc` over them.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::codegen;
use crate::compile::Compilation;
use crate::config::{OutputConfig, RenderOptions};
use crate::diag::{Diagnostic, DiagnosticKind};
use crate::error::EmitError;
use crate::hierarchy;
use crate::schema;

#[derive(Debug)]
pub struct WriteReport {
    /// Directory the artifacts actually went to.
    pub dir: PathBuf,
    pub written: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Write every artifact of `compilation`: per module the schema (when
/// compiled) and one `.java` file per class, then one `package-info.java`
/// for the whole package. Classes with colliding names overwrite each other
/// in statement order.
pub fn write_artifacts(
    compilation: &Compilation,
    render: &RenderOptions,
    output: &OutputConfig,
) -> Result<WriteReport, EmitError> {
    let mut diagnostics = Vec::new();
    let mut written = Vec::new();
    let dir = prepare_dir(output, &mut diagnostics)?;
    tracing::debug!(dir = %dir.display(), "generating files");

    for module in &compilation.modules {
        if let Some(table) = &module.schema {
            let name = format!("{}.schema", module.model.root.name);
            write(&dir.join(name), &schema::render_schema(table), &mut written)?;
        }
        for class in codegen::render_module(&module.model, render) {
            write(&dir.join(&class.file_name), &class.source, &mut written)?;
        }
        tracing::info!(module = %module.model.module, "java classes generation complete");
    }

    let package_info =
        hierarchy::render_package_info(compilation.modules.iter().map(|m| &m.model), &render.package);
    write(&dir.join("package-info.java"), &package_info, &mut written)?;

    if let Some(javadoc_dir) = &output.javadoc_dir {
        diagnostics.extend(generate_javadoc(&dir, javadoc_dir, output.verbose));
    }
    Ok(WriteReport { dir, written, diagnostics })
}

/// Create the package directory. When a regular file sits where one of its
/// directories should go, report it and fall back to the output root.
fn prepare_dir(output: &OutputConfig, diagnostics: &mut Vec<Diagnostic>) -> Result<PathBuf, EmitError> {
    let dir = output.package_dir();
    match fs::create_dir_all(&dir) {
        Ok(()) => Ok(dir),
        Err(source) => match blocking_file(&dir) {
            Some(file) => {
                let diagnostic = Diagnostic {
                    path: file.display().to_string(),
                    kind: DiagnosticKind::OutputDirConflict { dir: dir.display().to_string() },
                };
                tracing::warn!(%diagnostic, "falling back to output root");
                diagnostics.push(diagnostic);
                fs::create_dir_all(&output.root).map_err(|source| EmitError::CreateDir {
                    path: output.root.clone(),
                    source,
                })?;
                Ok(output.root.clone())
            }
            None => Err(EmitError::CreateDir { path: dir, source }),
        },
    }
}

fn blocking_file(dir: &Path) -> Option<PathBuf> {
    let mut ancestors: Vec<&Path> = dir.ancestors().collect();
    ancestors.reverse();
    ancestors
        .into_iter()
        .find(|p| p.exists() && !p.is_dir())
        .map(Path::to_path_buf)
}

fn write(path: &Path, contents: &str, written: &mut Vec<PathBuf>) -> Result<(), EmitError> {
    tracing::debug!(path = %path.display(), "writing");
    fs::write(path, contents).map_err(|source| EmitError::Write { path: path.to_path_buf(), source })?;
    written.push(path.to_path_buf());
    Ok(())
}

/// Run `javadoc -d <javadoc_dir> <dir>/*.java`. Failure never affects the
/// artifacts already written; it comes back as a diagnostic.
pub fn generate_javadoc(dir: &Path, javadoc_dir: &Path, verbose: bool) -> Option<Diagnostic> {
    let failed = |reason: String| Diagnostic {
        path: javadoc_dir.display().to_string(),
        kind: DiagnosticKind::JavadocFailed { reason },
    };

    let sources = match java_sources(dir) {
        Ok(sources) => sources,
        Err(error) => return Some(failed(error.to_string())),
    };
    if sources.is_empty() {
        return Some(failed(format!("no java sources in {}", dir.display())));
    }

    tracing::debug!(sources = sources.len(), "generating javadoc");
    let mut cmd = Command::new("javadoc");
    cmd.arg("-d").arg(javadoc_dir).args(&sources);
    if !verbose {
        cmd.stdout(Stdio::null()).stderr(Stdio::null());
    }
    match cmd.status() {
        Ok(status) if status.success() => {
            tracing::info!("javadoc generation complete");
            None
        }
        Ok(status) => Some(failed(format!("javadoc exited with {status}"))),
        Err(error) => Some(failed(error.to_string())),
    }
}

/// `.java` files directly inside `dir`, sorted. The directory name is taken
/// literally, so glob metacharacters in it are harmless.
fn java_sources(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "java") {
            sources.push(path);
        }
    }
    sources.sort();
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::config::CompileOptions;
    use crate::stmt::StatementTree;
    use chrono::NaiveDate;
    use serde_json::json;

    fn compilation(schema: bool) -> Compilation {
        let tree = StatementTree::from_value(json!({
            "keyword": "module", "arg": "sys", "substmts": [
                {"keyword": "namespace", "arg": "urn:sys"},
                {"keyword": "prefix", "arg": "sys"},
                {"keyword": "container", "arg": "system", "substmts": [
                    {"keyword": "leaf", "arg": "hostname", "substmts": [{"keyword": "type", "arg": "string"}]}
                ]}
            ]
        }))
        .unwrap();
        compile(&tree, &CompileOptions { schema }).unwrap()
    }

    fn config(root: &Path) -> (RenderOptions, OutputConfig) {
        let render = RenderOptions::new("com.example", NaiveDate::from_ymd_opt(2012, 6, 1).unwrap());
        let output = OutputConfig {
            root: root.to_path_buf(),
            package: "com.example".into(),
            javadoc_dir: None,
            verbose: false,
        };
        (render, output)
    }

    #[test]
    fn writes_into_package_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let (render, output) = config(tmp.path());
        let report = write_artifacts(&compilation(true), &render, &output).unwrap();

        let dir = tmp.path().join("com").join("example");
        assert_eq!(report.dir, dir);
        assert!(report.diagnostics.is_empty());
        for name in ["Sys.schema", "Sys.java", "System.java", "package-info.java"] {
            assert!(dir.join(name).is_file(), "missing {name}");
        }
        assert_eq!(report.written.len(), 4);
        let schema = fs::read_to_string(dir.join("Sys.schema")).unwrap();
        assert!(schema.contains("<tagpath>/system/hostname/</tagpath>"));
    }

    #[test]
    fn no_schema_file_without_schema() {
        let tmp = tempfile::tempdir().unwrap();
        let (render, output) = config(tmp.path());
        let report = write_artifacts(&compilation(false), &render, &output).unwrap();
        assert!(!report.dir.join("Sys.schema").exists());
        assert_eq!(report.written.len(), 3);
    }

    #[test]
    fn file_in_the_way_falls_back_to_root() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("com"), "not a directory").unwrap();
        let (render, output) = config(tmp.path());
        let report = write_artifacts(&compilation(true), &render, &output).unwrap();

        assert_eq!(report.dir, tmp.path());
        assert!(tmp.path().join("System.java").is_file());
        assert_eq!(report.diagnostics.len(), 1);
        assert!(matches!(
            report.diagnostics[0].kind,
            DiagnosticKind::OutputDirConflict { .. }
        ));
        assert_eq!(report.diagnostics[0].path, tmp.path().join("com").display().to_string());
    }

    #[test]
    fn javadoc_without_sources_is_a_diagnostic() {
        let tmp = tempfile::tempdir().unwrap();
        let diagnostic = generate_javadoc(tmp.path(), &tmp.path().join("doc"), false).unwrap();
        assert!(matches!(diagnostic.kind, DiagnosticKind::JavadocFailed { .. }));
    }

    #[test]
    fn java_sources_found_under_glob_like_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("out[1]");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("B.java"), "class B {}").unwrap();
        fs::write(dir.join("A.java"), "class A {}").unwrap();
        fs::write(dir.join("A.schema"), "<schema>\n</schema>\n").unwrap();

        let sources = java_sources(&dir).unwrap();
        assert_eq!(sources, vec![dir.join("A.java"), dir.join("B.java")]);
    }
}
