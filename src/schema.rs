//! Path-indexed schema table, emitted in lock-step with the class model.
//!
//! One record per module, container, list and leaf, keyed by tag-path
//! (`/`, `/system/`, `/system/user/`, ...). The runtime loads the rendered
//! artifact to look up occurrence bounds and child order per tag-path.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::diag::{DiagnosticKind, Diagnostics};
use crate::stmt::{Keyword, NodeId, StatementTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum MaxOccurs {
    Bounded(u32),
    Unbounded,
}

impl fmt::Display for MaxOccurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(n) => write!(f, "{n}"),
            Self::Unbounded => f.write_str("-1"),
        }
    }
}

impl From<MaxOccurs> for String {
    fn from(value: MaxOccurs) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaNodeRecord {
    pub tag_path: String,
    pub namespace: String,
    pub min_occurs: u32,
    pub max_occurs: MaxOccurs,
    pub children: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct SchemaTable {
    records: IndexMap<String, SchemaNodeRecord>,
}

impl SchemaTable {
    pub fn get(&self, tag_path: &str) -> Option<&SchemaNodeRecord> {
        self.records.get(tag_path)
    }

    pub fn records(&self) -> impl Iterator<Item = &SchemaNodeRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns `false`, leaving the table unchanged, when the tag-path is
    /// already taken.
    fn insert(&mut self, record: SchemaNodeRecord) -> bool {
        match self.records.entry(record.tag_path.clone()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
        }
    }
}

/// Whether a statement gets a schema record.
pub fn in_schema(keyword: &Keyword) -> bool {
    keyword.is_container(false) || keyword.is_module() || *keyword == Keyword::Leaf
}

/// Schema records for `node` and every in-schema statement beneath it,
/// pre-order. A sibling reusing a taken tag-path keeps the first record; the
/// duplicate and its subtree are reported and left out.
pub fn emit_schema(
    tree: &StatementTree,
    node: NodeId,
    tag_path: &str,
    namespace: &str,
    diagnostics: &mut Diagnostics,
) -> SchemaTable {
    let mut table = SchemaTable::default();
    table.insert(schema_node(tree, node, tag_path, namespace));
    schema_nodes(tree, node, tag_path, namespace, &mut table, diagnostics);
    tracing::info!(records = table.len(), "schema generation complete");
    table
}

fn schema_nodes(
    tree: &StatementTree,
    parent: NodeId,
    tag_path: &str,
    namespace: &str,
    table: &mut SchemaTable,
    diagnostics: &mut Diagnostics,
) {
    for &stmt in tree.children(parent) {
        if !in_schema(tree.keyword(stmt)) {
            continue;
        }
        let path = format!("{tag_path}{}/", tree.arg(stmt));
        if !table.insert(schema_node(tree, stmt, &path, namespace)) {
            diagnostics.report(stmt, path.as_str(), DiagnosticKind::DuplicateTagPath);
            continue;
        }
        schema_nodes(tree, stmt, &path, namespace, table, diagnostics);
    }
}

fn schema_node(tree: &StatementTree, stmt: NodeId, tag_path: &str, namespace: &str) -> SchemaNodeRecord {
    tracing::trace!(tag_path, "generating schema node");
    let (min_occurs, max_occurs) = occurs(tree, stmt);
    let children = tree
        .children(stmt)
        .iter()
        .filter(|c| tree.keyword(**c).is_data_node())
        .map(|c| tree.arg(*c).to_string())
        .collect();
    SchemaNodeRecord {
        tag_path: tag_path.to_string(),
        namespace: namespace.to_string(),
        min_occurs,
        max_occurs,
        children,
    }
}

/// Occurrence bounds. Rules apply in order; later ones only tighten:
///
/// 1. default `0..*`
/// 2. module, key leaf, or container directly inside a container/list: `1..1`
/// 3. `mandatory true`: min 1
/// 4. `unique true`, a container, or a non-list child of a container/list:
///    max 1
pub fn occurs(tree: &StatementTree, stmt: NodeId) -> (u32, MaxOccurs) {
    let keyword = tree.keyword(stmt);
    let parent_is_container = tree
        .parent(stmt)
        .is_some_and(|p| tree.keyword(p).is_container(false));

    let mut min = 0;
    let mut max = MaxOccurs::Unbounded;
    if keyword.is_module()
        || tree.is_key_leaf(stmt)
        || (parent_is_container && keyword.is_container(true))
    {
        min = 1;
        max = MaxOccurs::Bounded(1);
    }
    if tree.flag(stmt, &Keyword::Mandatory) {
        min = 1;
    }
    if tree.flag(stmt, &Keyword::Unique)
        || (parent_is_container && *keyword != Keyword::List)
        || keyword.is_container(true)
    {
        max = MaxOccurs::Bounded(1);
    }
    (min, max)
}

/// Render the schema artifact.
pub fn render_schema(table: &SchemaTable) -> String {
    let mut out = String::from("<schema>\n");
    for record in table.records() {
        out.push_str("    <node>\n");
        let fields = [
            ("tagpath", record.tag_path.clone()),
            ("namespace", record.namespace.clone()),
            ("primitive_type", String::new()),
            ("min_occurs", record.min_occurs.to_string()),
            ("max_occurs", record.max_occurs.to_string()),
            ("children", record.children.join(" ")),
            ("flags", String::new()),
            ("desc", String::new()),
        ];
        for (tag, value) in fields {
            out.push_str(&format!("        <{tag}>{}</{tag}>\n", escape_xml(&value)));
        }
        out.push_str("    </node>\n");
    }
    out.push_str("</schema>\n");
    out
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
