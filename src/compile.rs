//! Class model builder: one recursive pass over the statement tree.
//!
//! Each module yields a root [`ClassSpec`] whose children are the classes
//! of its top-level containers and lists, nested the way the statements
//! nest. Accessors and child classes keep statement order so output is
//! deterministic and diffable. The schema table is emitted alongside,
//! from the same tree, by [`crate::schema`].
pub mod keys;
pub mod methods;
pub mod types;

use std::collections::HashMap;

use crate::config::CompileOptions;
use crate::diag::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::CompileError;
use crate::model::{
    class_name, ClassKind, ClassSpec, CloneSpec, ConstructorMode, ConstructorSpec, ModuleModel,
    SkippedStatement, TypeRepr,
};
use crate::schema::{self, SchemaTable};
use crate::stmt::{Keyword, NodeId, StatementTree};

pub use keys::extract_keys;

/// One compiled module: its class model and (optionally) its schema table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledModule {
    pub model: ModuleModel,
    pub schema: Option<SchemaTable>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compilation {
    pub modules: Vec<CompiledModule>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Compile every top-level statement of `tree`.
pub fn compile(tree: &StatementTree, options: &CompileOptions) -> Result<Compilation, CompileError> {
    let mut compiler = Compiler::new(tree, options);
    let mut modules = Vec::new();
    for &root in tree.roots() {
        match tree.keyword(root) {
            Keyword::Module => modules.push(compiler.compile_module(root)?),
            Keyword::Submodule => compiler.diagnostics.report(
                root,
                "/",
                DiagnosticKind::SubmoduleSkipped { name: tree.arg(root).to_string() },
            ),
            other => {
                return Err(CompileError::UnexpectedTopLevelKeyword { keyword: other.to_string() });
            }
        }
    }
    Ok(Compilation { modules, diagnostics: compiler.diagnostics.into_vec() })
}

pub struct Compiler<'t> {
    tree: &'t StatementTree,
    options: &'t CompileOptions,
    diagnostics: Diagnostics,
    /// Class name → tag-path of the class that claimed it first.
    claimed: HashMap<String, String>,
}

impl<'t> Compiler<'t> {
    pub fn new(tree: &'t StatementTree, options: &'t CompileOptions) -> Self {
        Self {
            tree,
            options,
            diagnostics: Diagnostics::new(),
            claimed: HashMap::new(),
        }
    }

    fn required_arg(&self, node: NodeId, keyword: Keyword) -> Result<&'t str, CompileError> {
        let tree = self.tree;
        tree.search_one(node, &keyword)
            .map(|n| tree.arg(n))
            .ok_or_else(|| CompileError::MissingStatement {
                parent_keyword: tree.keyword(node).to_string(),
                parent: tree.arg(node).to_string(),
                keyword: keyword.to_string(),
            })
    }

    pub fn compile_module(&mut self, module: NodeId) -> Result<CompiledModule, CompileError> {
        let tree = self.tree;
        let namespace = self.required_arg(module, Keyword::Namespace)?;
        let prefix = self.required_arg(module, Keyword::Prefix)?;
        let root_class = class_name(prefix);
        self.claim(module, &root_class, "/");

        let mut children = Vec::new();
        let mut skipped = Vec::new();
        for &stmt in tree.children(module) {
            match tree.keyword(stmt) {
                Keyword::Container | Keyword::List => {
                    children.push(self.build(stmt, "/", namespace, &root_class, true)?);
                }
                Keyword::Uses | Keyword::Grouping => {
                    skipped.push(self.skip_unsupported(stmt, "/"));
                }
                _ => {}
            }
        }

        let root = ClassSpec {
            name: root_class.clone(),
            tag: tree.arg(module).to_string(),
            kind: ClassKind::Module,
            namespace: namespace.to_string(),
            root_class,
            prefix: Some(prefix.to_string()),
            path: "/".to_string(),
            fields: Vec::new(),
            keys: None,
            constructors: Vec::new(),
            clones: Vec::new(),
            key_names: Vec::new(),
            children_names: Vec::new(),
            accessors: Vec::new(),
            add_child_support: false,
            skipped,
            children,
        };
        tracing::info!(module = tree.arg(module), classes = root.walk().len(), "class model complete");

        let schema = if self.options.schema {
            Some(schema::emit_schema(tree, module, "/", namespace, &mut self.diagnostics))
        } else {
            None
        };

        Ok(CompiledModule {
            model: ModuleModel {
                module: tree.arg(module).to_string(),
                revision: tree.latest_revision(module).map(str::to_string),
                root,
            },
            schema,
        })
    }

    /// Build the class for a container or list statement and, recursively,
    /// for every container and list beneath it.
    pub fn build(
        &mut self,
        node: NodeId,
        path_prefix: &str,
        namespace: &str,
        root_class: &str,
        top_level: bool,
    ) -> Result<ClassSpec, CompileError> {
        let tree = self.tree;
        let tag = tree.arg(node);
        let name = class_name(tag);
        let path = format!("{path_prefix}{tag}/");
        tracing::debug!(%path, class = %name, "building class");
        self.claim(node, &name, &path);

        let key_names: Vec<String> = tree.key_names(node).into_iter().map(str::to_string).collect();
        let mut fields = Vec::new();
        let mut accessors = Vec::new();
        let mut children = Vec::new();
        let mut skipped = Vec::new();

        for &sub in tree.children(node) {
            let arg = tree.arg(sub);
            match tree.keyword(sub) {
                Keyword::List => {
                    children.push(self.build(sub, &path, namespace, root_class, false)?);
                    let (keys, _) = extract_keys(tree, sub)?;
                    accessors.extend(methods::list(arg, &keys));
                }
                Keyword::Container => {
                    children.push(self.build(sub, &path, namespace, root_class, false)?);
                    fields.push(arg.to_string());
                    accessors.extend(methods::container(arg));
                }
                Keyword::Leaf => {
                    let repr = self.leaf_type(sub, &path);
                    let is_key = key_names.iter().any(|k| k == arg);
                    accessors.extend(methods::leaf(arg, &repr, is_key));
                }
                Keyword::LeafList => {
                    let repr = self.leaf_type(sub, &path);
                    accessors.extend(methods::leaf_list(arg, &repr));
                }
                Keyword::Uses | Keyword::Grouping => {
                    skipped.push(self.skip_unsupported(sub, &path));
                }
                Keyword::Key => {}
                other => {
                    tracing::trace!(%path, keyword = %other, arg, "statement contributes no members");
                    skipped.push(SkippedStatement { keyword: other.to_string(), arg: arg.to_string() });
                }
            }
        }

        let children_names = tree
            .children(node)
            .iter()
            .filter(|c| tree.keyword(**c).is_data_node())
            .map(|c| tree.arg(*c).to_string())
            .collect();
        let add_child_support = tree
            .children(node)
            .iter()
            .any(|c| tree.keyword(*c).is_container(false));

        let (kind, keys, constructors, clones) = if *tree.keyword(node) == Keyword::List {
            let (keys, all_strings) = extract_keys(tree, node)?;
            let mut modes = vec![
                ConstructorMode::NoArgs,
                ConstructorMode::KeyedWrapped,
                ConstructorMode::KeyedString,
            ];
            if !all_strings {
                modes.push(ConstructorMode::KeyedPrimitive);
            }
            let constructors = modes
                .into_iter()
                .map(|mode| ConstructorSpec {
                    mode,
                    args: if mode == ConstructorMode::NoArgs { Vec::new() } else { keys.0.clone() },
                    sets_prefix: top_level,
                })
                .collect();
            let key_ids: Vec<String> = keys.identifiers().map(str::to_string).collect();
            let clones = vec![
                CloneSpec { shallow: false, keys: key_ids.clone() },
                CloneSpec { shallow: true, keys: key_ids },
            ];
            (ClassKind::List, Some(keys), constructors, clones)
        } else {
            let constructors = vec![ConstructorSpec {
                mode: ConstructorMode::NoArgs,
                args: Vec::new(),
                sets_prefix: top_level,
            }];
            let clones = vec![
                CloneSpec { shallow: false, keys: Vec::new() },
                CloneSpec { shallow: true, keys: Vec::new() },
            ];
            (ClassKind::Container, None, constructors, clones)
        };

        Ok(ClassSpec {
            name,
            tag: tag.to_string(),
            kind,
            namespace: namespace.to_string(),
            root_class: root_class.to_string(),
            prefix: None,
            path,
            fields,
            keys,
            constructors,
            clones,
            key_names,
            children_names,
            accessors,
            add_child_support,
            skipped,
            children,
        })
    }

    fn leaf_type(&mut self, leaf: NodeId, parent_path: &str) -> TypeRepr {
        let repr = keys::leaf_type(self.tree, leaf);
        if repr.defaulted {
            self.diagnostics.report(
                leaf,
                format!("{parent_path}{}/", self.tree.arg(leaf)),
                DiagnosticKind::UnsupportedType { type_name: repr.yang_type.clone() },
            );
        }
        repr
    }

    fn skip_unsupported(&mut self, stmt: NodeId, parent_path: &str) -> SkippedStatement {
        let keyword = self.tree.keyword(stmt).to_string();
        let arg = self.tree.arg(stmt).to_string();
        self.diagnostics.report(
            stmt,
            parent_path,
            DiagnosticKind::UnsupportedStatement { keyword: keyword.clone(), arg: arg.clone() },
        );
        SkippedStatement { keyword, arg }
    }

    fn claim(&mut self, node: NodeId, name: &str, path: &str) {
        if self.claimed.contains_key(name) {
            self.diagnostics.report(
                node,
                path,
                DiagnosticKind::DuplicateClassName { class_name: name.to_string() },
            );
        } else {
            self.claimed.insert(name.to_string(), path.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Accessor, Lookup, MemberKind};
    use serde_json::{json, Value};

    fn leaf(name: &str, ty: &str) -> Value {
        json!({"keyword": "leaf", "arg": name, "substmts": [{"keyword": "type", "arg": ty}]})
    }

    fn module(body: Vec<Value>) -> StatementTree {
        let mut substmts = vec![
            json!({"keyword": "namespace", "arg": "urn:test"}),
            json!({"keyword": "prefix", "arg": "t"}),
        ];
        substmts.extend(body);
        StatementTree::from_value(json!({"keyword": "module", "arg": "test", "substmts": substmts}))
            .unwrap()
    }

    fn compile_one(tree: &StatementTree) -> Compilation {
        compile(tree, &CompileOptions::default()).unwrap()
    }

    #[test]
    fn two_string_keys_yield_three_constructors() {
        let tree = module(vec![json!({"keyword": "list", "arg": "entry", "substmts": [
            {"keyword": "key", "arg": "x y"}, leaf("x", "string"), leaf("y", "string")
        ]})]);
        let out = compile_one(&tree);
        let entry = &out.modules[0].model.root.children[0];
        assert_eq!(entry.name, "Entry");
        assert_eq!(entry.kind, ClassKind::List);
        assert_eq!(entry.constructors.len(), 3);
        let keys = entry.keys.as_ref().unwrap();
        assert_eq!(keys.identifiers().collect::<Vec<_>>(), vec!["x", "y"]);
        assert!(keys.all_strings());
    }

    #[test]
    fn numeric_key_yields_primitive_constructor() {
        let tree = module(vec![json!({"keyword": "list", "arg": "entry", "substmts": [
            {"keyword": "key", "arg": "id"}, leaf("id", "uint32")
        ]})]);
        let out = compile_one(&tree);
        let entry = &out.modules[0].model.root.children[0];
        assert_eq!(entry.constructors.len(), 4);
        let primitive = &entry.constructors[3];
        assert_eq!(primitive.mode, ConstructorMode::KeyedPrimitive);
        assert_eq!(primitive.args[0].param_type(crate::model::ValueForm::Primitive), "long");
        assert_ne!(primitive.args[0].repr.wrapper, primitive.args[0].repr.primitive);
        assert_eq!(entry.clones[0].keys, vec!["id"]);
    }

    #[test]
    fn unrecognized_leaf_type_reports_once_and_keeps_accessors() {
        let tree = module(vec![json!({"keyword": "container", "arg": "c", "substmts": [
            leaf("ratio", "decimal64")
        ]})]);
        let out = compile_one(&tree);
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(
            out.diagnostics[0].kind,
            DiagnosticKind::UnsupportedType { type_name: "decimal64".into() }
        );
        assert_eq!(out.diagnostics[0].path, "/c/ratio/");

        let c = &out.modules[0].model.root.children[0];
        let get = &c.accessors[0];
        assert_eq!(get.op, Accessor::Get(Lookup::None));
        assert!(get.repr.as_ref().unwrap().is_string());
        assert!(c.accessors.iter().any(|a| matches!(a.op, Accessor::Set(_))));
    }

    #[test]
    fn unrecognized_leaf_list_type_falls_back_to_string() {
        let tree = module(vec![json!({"keyword": "container", "arg": "c", "substmts": [
            {"keyword": "leaf-list", "arg": "r", "substmts": [{"keyword": "type", "arg": "decimal64"}]}
        ]})]);
        let out = compile_one(&tree);
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].path, "/c/r/");
        assert_eq!(
            out.diagnostics[0].kind,
            DiagnosticKind::UnsupportedType { type_name: "decimal64".into() }
        );

        let c = &out.modules[0].model.root.children[0];
        let r: Vec<_> = c
            .accessors
            .iter()
            .filter(|a| a.member.kind == MemberKind::LeafList)
            .collect();
        assert!(!r.is_empty());
        assert!(r.iter().all(|a| {
            let repr = a.repr.as_ref().unwrap();
            repr.is_string() && repr.defaulted
        }));
        let sets = r.iter().filter(|a| matches!(a.op, Accessor::Set(_))).count();
        let deletes = r
            .iter()
            .filter(|a| matches!(a.op, Accessor::Delete(Lookup::Value(_))))
            .count();
        let marks = r.iter().filter(|a| matches!(a.op, Accessor::Mark(..))).count();
        assert_eq!((sets, deletes, marks), (2, 2, 8));
    }

    #[test]
    fn defaulted_key_type_reports_once() {
        let tree = module(vec![json!({"keyword": "container", "arg": "c", "substmts": [
            {"keyword": "list", "arg": "entry", "substmts": [
                {"keyword": "key", "arg": "k"}, leaf("k", "decimal64")
            ]}
        ]})]);
        let out = compile_one(&tree);
        assert_eq!(out.diagnostics.len(), 1);
    }

    #[test]
    fn container_children_become_fields_and_lists_do_not() {
        let tree = module(vec![json!({"keyword": "container", "arg": "system", "substmts": [
            {"keyword": "container", "arg": "ntp"},
            {"keyword": "list", "arg": "user", "substmts": [
                {"keyword": "key", "arg": "name"}, leaf("name", "string")
            ]},
            leaf("hostname", "string"),
        ]})]);
        let out = compile_one(&tree);
        let system = &out.modules[0].model.root.children[0];
        assert_eq!(system.fields, vec!["ntp"]);
        assert!(system.add_child_support);
        assert_eq!(system.children_names, vec!["ntp", "user", "hostname"]);
        assert_eq!(
            system.children.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["Ntp", "User"]
        );
        let kinds: Vec<MemberKind> = system.accessors.iter().map(|a| a.member.kind).collect();
        let first_list = kinds.iter().position(|k| *k == MemberKind::List).unwrap();
        let first_leaf = kinds.iter().position(|k| *k == MemberKind::Leaf).unwrap();
        assert!(kinds[0] == MemberKind::Container && first_list < first_leaf);
        assert_eq!(system.children[1].path, "/system/user/");
    }

    #[test]
    fn uses_and_grouping_are_recorded_not_expanded() {
        let tree = module(vec![json!({"keyword": "container", "arg": "c", "substmts": [
            {"keyword": "uses", "arg": "g"},
            {"keyword": "grouping", "arg": "h"},
        ]})]);
        let out = compile_one(&tree);
        let c = &out.modules[0].model.root.children[0];
        assert!(c.accessors.is_empty());
        assert_eq!(c.skipped.len(), 2);
        assert_eq!(out.diagnostics.len(), 2);
    }

    #[test]
    fn submodules_are_skipped_with_a_diagnostic() {
        let tree = StatementTree::from_value(json!([
            {"keyword": "submodule", "arg": "sub"}
        ]))
        .unwrap();
        let out = compile_one(&tree);
        assert!(out.modules.is_empty());
        assert_eq!(out.diagnostics[0].kind, DiagnosticKind::SubmoduleSkipped { name: "sub".into() });
    }

    #[test]
    fn unexpected_top_level_is_fatal() {
        let tree = StatementTree::from_value(json!({"keyword": "container", "arg": "c"})).unwrap();
        assert_eq!(
            compile(&tree, &CompileOptions::default()).unwrap_err(),
            CompileError::UnexpectedTopLevelKeyword { keyword: "container".into() }
        );
    }

    #[test]
    fn missing_key_definition_aborts() {
        let tree = module(vec![json!({"keyword": "list", "arg": "entry", "substmts": [
            {"keyword": "key", "arg": "ghost"}
        ]})]);
        assert!(matches!(
            compile(&tree, &CompileOptions::default()),
            Err(CompileError::MissingKeyDefinition { .. })
        ));
    }

    #[test]
    fn duplicate_class_names_are_reported() {
        let tree = module(vec![
            json!({"keyword": "container", "arg": "a", "substmts": [{"keyword": "container", "arg": "config"}]}),
            json!({"keyword": "container", "arg": "b", "substmts": [{"keyword": "container", "arg": "config"}]}),
        ]);
        let out = compile_one(&tree);
        assert_eq!(
            out.diagnostics,
            vec![Diagnostic {
                path: "/b/config/".into(),
                kind: DiagnosticKind::DuplicateClassName { class_name: "Config".into() },
            }]
        );
    }

    #[test]
    fn only_top_level_constructors_set_prefix() {
        let tree = module(vec![json!({"keyword": "container", "arg": "a", "substmts": [
            {"keyword": "container", "arg": "b"}
        ]})]);
        let out = compile_one(&tree);
        let a = &out.modules[0].model.root.children[0];
        assert!(a.constructors[0].sets_prefix);
        assert!(!a.children[0].constructors[0].sets_prefix);
    }

    #[test]
    fn schema_can_be_disabled() {
        let tree = module(vec![]);
        let out = compile(&tree, &CompileOptions { schema: false }).unwrap();
        assert!(out.modules[0].schema.is_none());
        assert_eq!(out.modules[0].model.provenance(), "module \"test\", revision: \"unknown\".");
    }
}
