//! Arena-backed statement tree, adapted once from the external parser's
//! JSON output. The compiler only ever reads it.
//!
//! Nodes are addressed by [`NodeId`]; each node stores its parent's id, so
//! upward lookups ("is this leaf a key of the enclosing list?") are index
//! lookups rather than back-pointers.

use serde::Deserialize;

/// Closed set of keywords the compiler distinguishes. Decided once on load.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Keyword {
    Module,
    Submodule,
    Container,
    List,
    Leaf,
    LeafList,
    Key,
    Type,
    Namespace,
    Prefix,
    BelongsTo,
    Revision,
    Mandatory,
    Unique,
    Uses,
    Grouping,
    Other(String),
}

impl Keyword {
    pub fn parse(s: &str) -> Self {
        match s {
            "module" => Self::Module,
            "submodule" => Self::Submodule,
            "container" => Self::Container,
            "list" => Self::List,
            "leaf" => Self::Leaf,
            "leaf-list" => Self::LeafList,
            "key" => Self::Key,
            "type" => Self::Type,
            "namespace" => Self::Namespace,
            "prefix" => Self::Prefix,
            "belongs-to" => Self::BelongsTo,
            "revision" => Self::Revision,
            "mandatory" => Self::Mandatory,
            "unique" => Self::Unique,
            "uses" => Self::Uses,
            "grouping" => Self::Grouping,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Module => "module",
            Self::Submodule => "submodule",
            Self::Container => "container",
            Self::List => "list",
            Self::Leaf => "leaf",
            Self::LeafList => "leaf-list",
            Self::Key => "key",
            Self::Type => "type",
            Self::Namespace => "namespace",
            Self::Prefix => "prefix",
            Self::BelongsTo => "belongs-to",
            Self::Revision => "revision",
            Self::Mandatory => "mandatory",
            Self::Unique => "unique",
            Self::Uses => "uses",
            Self::Grouping => "grouping",
            Self::Other(s) => s,
        }
    }

    pub fn is_module(&self) -> bool {
        matches!(self, Self::Module | Self::Submodule)
    }

    /// Container, or (unless `strict`) list.
    pub fn is_container(&self, strict: bool) -> bool {
        match self {
            Self::Container => true,
            Self::List => !strict,
            _ => false,
        }
    }

    /// Nodes that carry instance data and show up in `childrenNames()`.
    pub fn is_data_node(&self) -> bool {
        matches!(self, Self::Container | Self::List | Self::Leaf | Self::LeafList)
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct Statement {
    pub keyword: Keyword,
    pub arg: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

/// Wire shape produced by the external parser.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStatement {
    pub keyword: String,
    #[serde(default)]
    pub arg: String,
    #[serde(default)]
    pub substmts: Vec<RawStatement>,
}

/// A document is either one statement or an array of top-level statements.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawDocument {
    Many(Vec<RawStatement>),
    One(RawStatement),
}

impl RawDocument {
    pub fn into_statements(self) -> Vec<RawStatement> {
        match self {
            Self::Many(xs) => xs,
            Self::One(x) => vec![x],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatementTree {
    nodes: Vec<Statement>,
    roots: Vec<NodeId>,
}

impl StatementTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_raw<I>(raws: I) -> Self
    where
        I: IntoIterator<Item = RawStatement>,
    {
        let mut tree = Self::new();
        for raw in raws {
            tree.push_root(raw);
        }
        tree
    }

    /// Convenience for tests and callers holding a `serde_json::Value`.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let doc: RawDocument = serde_json::from_value(value)?;
        Ok(Self::from_raw(doc.into_statements()))
    }

    pub fn push_root(&mut self, raw: RawStatement) -> NodeId {
        let id = self.insert(raw, None);
        self.roots.push(id);
        id
    }

    fn insert(&mut self, raw: RawStatement, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Statement {
            keyword: Keyword::parse(&raw.keyword),
            arg: raw.arg,
            children: Vec::with_capacity(raw.substmts.len()),
            parent,
        });
        for sub in raw.substmts {
            let child = self.insert(sub, Some(id));
            self.nodes[id.0].children.push(child);
        }
        id
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Statement {
        &self.nodes[id.0]
    }

    pub fn keyword(&self, id: NodeId) -> &Keyword {
        &self.nodes[id.0].keyword
    }

    pub fn arg(&self, id: NodeId) -> &str {
        &self.nodes[id.0].arg
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// First child with `keyword`, in parse order.
    pub fn search_one(&self, id: NodeId, keyword: &Keyword) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|c| self.keyword(*c) == keyword)
    }

    /// First child with `keyword` whose argument is `arg`.
    pub fn search_one_arg(&self, id: NodeId, keyword: &Keyword, arg: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|c| self.keyword(*c) == keyword && self.arg(*c) == arg)
    }

    /// All children with `keyword`, in parse order.
    pub fn search<'a>(
        &'a self,
        id: NodeId,
        keyword: &'a Keyword,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(id)
            .iter()
            .copied()
            .filter(move |c| self.keyword(*c) == keyword)
    }

    /// `true` when `mandatory`/`unique`-style flag children carry `"true"`.
    pub fn flag(&self, id: NodeId, keyword: &Keyword) -> bool {
        self.search_one(id, keyword)
            .is_some_and(|f| self.arg(f) == "true")
    }

    /// Key identifiers declared on this node's `key` statement, in order.
    pub fn key_names(&self, id: NodeId) -> Vec<&str> {
        self.search(id, &Keyword::Key)
            .flat_map(|k| self.arg(k).split_whitespace())
            .collect()
    }

    /// Whether `id` is a leaf named by its parent's `key` statement.
    pub fn is_key_leaf(&self, id: NodeId) -> bool {
        if *self.keyword(id) != Keyword::Leaf {
            return false;
        }
        match self.parent(id) {
            Some(parent) => self.key_names(parent).contains(&self.arg(id)),
            None => false,
        }
    }

    /// Latest `revision` argument of a module, if any.
    pub fn latest_revision(&self, id: NodeId) -> Option<&str> {
        self.search(id, &Keyword::Revision)
            .map(|r| self.arg(r))
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> StatementTree {
        StatementTree::from_value(json!({
            "keyword": "module", "arg": "m",
            "substmts": [
                {"keyword": "namespace", "arg": "urn:m"},
                {"keyword": "revision", "arg": "2012-01-01"},
                {"keyword": "revision", "arg": "2013-06-30"},
                {"keyword": "list", "arg": "entry", "substmts": [
                    {"keyword": "key", "arg": "x y"},
                    {"keyword": "leaf", "arg": "x"},
                    {"keyword": "leaf", "arg": "y"},
                    {"keyword": "leaf", "arg": "z"}
                ]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn parent_links_and_lookup() {
        let tree = sample();
        let module = tree.roots()[0];
        let list = tree.search_one(module, &Keyword::List).unwrap();
        assert_eq!(tree.parent(list), Some(module));
        let z = tree.search_one_arg(list, &Keyword::Leaf, "z").unwrap();
        assert_eq!(tree.parent(z), Some(list));
        assert_eq!(tree.search(list, &Keyword::Leaf).count(), 3);
    }

    #[test]
    fn key_membership_uses_split_key_argument() {
        let tree = sample();
        let list = tree.search_one(tree.roots()[0], &Keyword::List).unwrap();
        let leaves: Vec<_> = tree.search(list, &Keyword::Leaf).collect();
        assert!(tree.is_key_leaf(leaves[0]));
        assert!(tree.is_key_leaf(leaves[1]));
        assert!(!tree.is_key_leaf(leaves[2]));
        assert_eq!(tree.key_names(list), vec!["x", "y"]);
    }

    #[test]
    fn latest_revision_is_max() {
        let tree = sample();
        assert_eq!(tree.latest_revision(tree.roots()[0]), Some("2013-06-30"));
    }

    #[test]
    fn unknown_keywords_are_kept_verbatim() {
        let tree = StatementTree::from_value(json!([
            {"keyword": "choice", "arg": "c"},
            {"keyword": "module", "arg": "m"}
        ]))
        .unwrap();
        assert_eq!(tree.roots().len(), 2);
        assert_eq!(*tree.keyword(tree.roots()[0]), Keyword::Other("choice".into()));
        assert_eq!(tree.keyword(tree.roots()[0]).as_str(), "choice");
    }
}
