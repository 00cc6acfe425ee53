//! CLI: load statement trees → compile → (generate | schema)
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indexmap::IndexMap;
use tracing_subscriber::EnvFilter;

use crate::compile::compile;
use crate::config::{validate_package, CompileOptions, OutputConfig, RenderOptions};
use crate::diag::Diagnostic;
use crate::error::InputError;
use crate::stmt::{RawDocument, StatementTree};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// compile parsed YANG statement trees into ConfM Java classes and a path-indexed schema
#[derive(Parser, Debug)]
#[command(name = "yang-classgen", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// compile and write Java classes, the schema and package-info.java
    Generate(GenerateOut),
    /// compile and print the schema artifact
    Schema(SchemaOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select the statement tree in each document (e.g. /modules)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more JSON statement trees. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone, Copy)]
struct LogSettings {
    /// print progress (debug level)
    #[arg(long)]
    debug: bool,

    /// print everything (trace level); also shows javadoc output
    #[arg(long)]
    verbose: bool,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// Java package of the generated classes; also their directory below the output root
    #[arg(short = 'd', long = "java-package")]
    java_package: Option<String>,

    /// directory the package directory is created in
    #[arg(long, default_value = ".")]
    output_root: PathBuf,

    /// do not generate the <Prefix>.schema file
    #[arg(long)]
    no_schema: bool,

    /// run javadoc over the generated classes into this directory
    #[arg(long, value_name = "DIR")]
    javadoc: Option<PathBuf>,

    #[command(flatten)]
    log: LogSettings,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// print the records as JSON instead of the XML artifact
    #[arg(long)]
    json: bool,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    log: LogSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Merge every input, in order, into one statement tree.
    fn load(&self) -> Result<StatementTree, InputError> {
        let mut tree = StatementTree::new();
        for source_path in resolve_file_path_patterns(&self.input)? {
            tracing::debug!(path = %source_path.display(), "loading statement tree");
            let source = std::fs::read_to_string(&source_path).map_err(|source| InputError::Io {
                path: source_path.clone(),
                source,
            })?;
            let mut value = crate::path_de::from_str_with_path::<serde_json::Value>(&source, &source_path)?;
            if let Some(pointer) = self.json_pointer.as_deref() {
                value = value
                    .pointer(pointer)
                    .cloned()
                    .ok_or_else(|| InputError::PointerMiss {
                        path: source_path.clone(),
                        pointer: pointer.to_string(),
                    })?;
            }
            let document = crate::path_de::from_value_with_path::<RawDocument>(value, &source_path)?;
            for raw in document.into_statements() {
                tree.push_root(raw);
            }
        }
        Ok(tree)
    }
}

impl LogSettings {
    fn init(self) {
        let level = if self.verbose {
            "trace"
        } else if self.debug {
            "debug"
        } else {
            "warn"
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                target.log.init();
                let Some(package) = target.java_package.clone() else {
                    anyhow::bail!("missing mandatory option -d/--java-package");
                };
                validate_package(&package)?;

                // 1) load & compile
                let tree = target.input_settings.load().context("failed to load statement trees")?;
                let options = CompileOptions { schema: !target.no_schema };
                let compilation = compile(&tree, &options)?;

                // 2) render & write
                let render = RenderOptions::new(package.clone(), chrono::Local::now().date_naive());
                let output = OutputConfig {
                    root: target.output_root.clone(),
                    package,
                    javadoc_dir: target.javadoc.clone(),
                    verbose: target.log.verbose,
                };
                let report = crate::emit::write_artifacts(&compilation, &render, &output)
                    .context("failed to write generated files")?;

                report_diagnostics(compilation.diagnostics.iter().chain(&report.diagnostics));
                eprintln!(
                    "{} {} files in {}",
                    "generated".green().bold(),
                    report.written.len(),
                    report.dir.display()
                );
            }
            Command::Schema(target) => {
                target.log.init();
                let tree = target.input_settings.load().context("failed to load statement trees")?;
                let compilation = compile(&tree, &CompileOptions { schema: true })?;
                report_diagnostics(compilation.diagnostics.iter());

                let tables = compilation
                    .modules
                    .iter()
                    .filter_map(|m| m.schema.as_ref().map(|s| (m.model.module.as_str(), s)));
                let schema_src = if target.json {
                    let tables: IndexMap<&str, _> = tables.collect();
                    serde_json::to_string_pretty(&tables)?
                } else {
                    tables.map(|(_, s)| crate::schema::render_schema(s)).collect::<String>()
                };
                match target.out.as_ref() {
                    Some(out) => write_output(out, &schema_src)?,
                    None => print!("{schema_src}"),
                }
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn report_diagnostics<'a>(diagnostics: impl Iterator<Item = &'a Diagnostic>) {
    let mut count = 0;
    for diagnostic in diagnostics {
        eprintln!("{} {diagnostic}", "warning:".yellow().bold());
        count += 1;
    }
    if count > 0 {
        tracing::warn!(count, "compilation finished with diagnostics");
    }
}

fn write_output(out: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, contents).with_context(|| format!("failed to write {}", out.display()))
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, InputError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let before = out.len();
            for entry in glob::glob(pattern)? {
                out.push(entry?);
            }
            if out.len() == before {
                // an explicit glob that matched nothing is an error
                return Err(InputError::NoMatches(pattern.to_string()));
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    const MODULE: &str = r#"{"keyword": "module", "arg": "m", "substmts": [
        {"keyword": "namespace", "arg": "urn:m"},
        {"keyword": "prefix", "arg": "m"}
    ]}"#;

    #[test]
    fn globs_expand_and_literals_pass_through() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.json", MODULE);
        write(tmp.path(), "b.json", MODULE);
        let pattern = tmp.path().join("*.json").to_string_lossy().to_string();
        let paths = resolve_file_path_patterns([pattern.as_str(), "literal.json"]).unwrap();
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[2], PathBuf::from("literal.json"));

        let empty = tmp.path().join("*.yang").to_string_lossy().to_string();
        assert!(matches!(
            resolve_file_path_patterns([empty.as_str()]),
            Err(InputError::NoMatches(_))
        ));
    }

    #[test]
    fn inputs_merge_and_pointer_selects() {
        let tmp = tempfile::tempdir().unwrap();
        let a = write(tmp.path(), "a.json", MODULE);
        let b = write(tmp.path(), "b.json", &format!(r#"{{"modules": [{MODULE}, {MODULE}]}}"#));

        let plain = InputSettings { json_pointer: None, input: vec![a.to_string_lossy().into()] };
        assert_eq!(plain.load().unwrap().roots().len(), 1);

        let pointed = InputSettings {
            json_pointer: Some("/modules".into()),
            input: vec![b.to_string_lossy().into()],
        };
        assert_eq!(pointed.load().unwrap().roots().len(), 2);

        let missing = InputSettings { json_pointer: Some("/nope".into()), ..pointed };
        assert!(matches!(missing.load(), Err(InputError::PointerMiss { .. })));
    }

    #[test]
    fn missing_package_is_an_error() {
        let cli = CommandLineInterface::try_parse_from(["yang-classgen", "generate", "-i", "m.json"]).unwrap();
        let err = cli.run().unwrap_err();
        assert!(err.to_string().contains("-d/--java-package"));
    }
}
