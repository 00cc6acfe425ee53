//! Error types. Anything here aborts the whole pass; recoverable conditions
//! are [`crate::diag::Diagnostic`]s instead.

use std::path::PathBuf;
use thiserror::Error;

/// Input-fatal conditions found while compiling the statement tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A list's `key` argument names a leaf the list does not define.
    #[error("list \"{list}\" names key \"{key}\" but has no leaf with that name")]
    MissingKeyDefinition { list: String, key: String },

    /// A list without a `key` statement.
    #[error("list \"{list}\" has no key statement")]
    MissingKeyStatement { list: String },

    /// A required sub-statement (e.g. `namespace`, `prefix`) is absent.
    #[error("{parent_keyword} \"{parent}\" is missing its {keyword} statement")]
    MissingStatement {
        parent_keyword: String,
        parent: String,
        keyword: String,
    },

    /// A root that is neither `module` nor `submodule`.
    #[error("unrecognized keyword: {keyword}, top-level element should be module or submodule")]
    UnexpectedTopLevelKeyword { keyword: String },
}

/// Failures loading the serialized statement tree.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid statement tree in {path}: at JSON path {json_path} → {message}")]
    Json {
        path: PathBuf,
        json_path: String,
        message: String,
    },

    #[error("JSON pointer {pointer} selects nothing in {path}")]
    PointerMiss { path: PathBuf, pointer: String },

    #[error("invalid input pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("failed to expand input pattern: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("glob pattern matched no files: {0}")]
    NoMatches(String),
}

/// Failures writing generated artifacts.
#[derive(Error, Debug)]
pub enum EmitError {
    #[error("failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
