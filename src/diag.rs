//! Return-side diagnostics channel.
//!
//! Diagnostics never change generated content, only how complete its type
//! fidelity is. The compiler collects them; the caller decides how to
//! surface them.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::stmt::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnsupportedType { type_name: String },
    UnsupportedStatement { keyword: String, arg: String },
    SubmoduleSkipped { name: String },
    DuplicateClassName { class_name: String },
    DuplicateTagPath,
    OutputDirConflict { dir: String },
    JavadocFailed { reason: String },
}

impl DiagnosticKind {
    fn tag(&self) -> &'static str {
        match self {
            Self::UnsupportedType { .. } => "unsupported-type",
            Self::UnsupportedStatement { .. } => "unsupported-statement",
            Self::SubmoduleSkipped { .. } => "submodule-skipped",
            Self::DuplicateClassName { .. } => "duplicate-class-name",
            Self::DuplicateTagPath => "duplicate-tag-path",
            Self::OutputDirConflict { .. } => "output-dir-conflict",
            Self::JavadocFailed { .. } => "javadoc-failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Tag-path (or filesystem path) the diagnostic is about.
    pub path: String,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::UnsupportedType { type_name } => write!(
                f,
                "{}: no support for type \"{type_name}\", defaulting to string",
                self.path
            ),
            DiagnosticKind::UnsupportedStatement { keyword, arg } => write!(
                f,
                "{}: {keyword} \"{arg}\" is not expanded and contributes no class members",
                self.path
            ),
            DiagnosticKind::SubmoduleSkipped { name } => {
                write!(f, "{}: no support for submodule \"{name}\", skipped", self.path)
            }
            DiagnosticKind::DuplicateClassName { class_name } => write!(
                f,
                "{}: class {class_name} was already generated and will be overwritten",
                self.path
            ),
            DiagnosticKind::DuplicateTagPath => write!(
                f,
                "{}: tag-path already has a schema record, duplicate left out",
                self.path
            ),
            DiagnosticKind::OutputDirConflict { dir } => write!(
                f,
                "{}: unable to use directory {dir}, probably a non-directory file with the same name exists",
                self.path
            ),
            DiagnosticKind::JavadocFailed { reason } => {
                write!(f, "{}: javadoc generation failed: {reason}", self.path)
            }
        }
    }
}

/// Collector that records each (node, kind) pair at most once.
#[derive(Debug, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
    seen: HashSet<(NodeId, &'static str)>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, node: NodeId, path: impl Into<String>, kind: DiagnosticKind) {
        if !self.seen.insert((node, kind.tag())) {
            return;
        }
        let diagnostic = Diagnostic { path: path.into(), kind };
        tracing::debug!(%diagnostic, "diagnostic");
        self.records.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stmt::StatementTree;
    use serde_json::json;

    #[test]
    fn one_record_per_node_and_kind() {
        let tree = StatementTree::from_value(json!([
            {"keyword": "leaf", "arg": "a"},
            {"keyword": "leaf", "arg": "b"}
        ]))
        .unwrap();
        let (a, b) = (tree.roots()[0], tree.roots()[1]);
        let unsupported = |t: &str| DiagnosticKind::UnsupportedType { type_name: t.into() };

        let mut diags = Diagnostics::new();
        diags.report(a, "/a/", unsupported("decimal64"));
        diags.report(a, "/a/", unsupported("decimal64"));
        diags.report(a, "/a/", DiagnosticKind::DuplicateClassName { class_name: "A".into() });
        diags.report(b, "/b/", unsupported("decimal64"));
        assert!(!diags.is_empty());
        assert_eq!(diags.into_vec().len(), 3);
    }

    #[test]
    fn serializes_flat_with_kind_tag() {
        let d = Diagnostic {
            path: "/c/ratio/".into(),
            kind: DiagnosticKind::UnsupportedType { type_name: "decimal64".into() },
        };
        assert_eq!(
            serde_json::to_value(&d).unwrap(),
            json!({"path": "/c/ratio/", "kind": "unsupported_type", "type_name": "decimal64"})
        );
        assert_eq!(d.to_string(), "/c/ratio/: no support for type \"decimal64\", defaulting to string");
    }
}
