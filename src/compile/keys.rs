use crate::error::CompileError;
use crate::model::{KeyLeaf, KeySpec, TypeRepr};
use crate::stmt::{Keyword, NodeId, StatementTree};

use super::types;

/// Resolved type of a leaf or leaf-list. A missing `type` resolves like an
/// unknown one.
pub fn leaf_type(tree: &StatementTree, leaf: NodeId) -> TypeRepr {
    let name = tree
        .search_one(leaf, &Keyword::Type)
        .map(|t| tree.arg(t))
        .unwrap_or_default();
    types::resolve(name)
}

/// Key leaves of `list` in `key` statement order, and whether every key is
/// string-typed.
pub fn extract_keys(tree: &StatementTree, list: NodeId) -> Result<(KeySpec, bool), CompileError> {
    let list_name = tree.arg(list);
    let key = tree
        .search_one(list, &Keyword::Key)
        .ok_or_else(|| CompileError::MissingKeyStatement {
            list: list_name.to_string(),
        })?;

    let mut leaves = Vec::new();
    for ident in tree.arg(key).split_whitespace() {
        let leaf = tree.search_one_arg(list, &Keyword::Leaf, ident).ok_or_else(|| {
            CompileError::MissingKeyDefinition {
                list: list_name.to_string(),
                key: ident.to_string(),
            }
        })?;
        leaves.push(KeyLeaf {
            identifier: ident.to_string(),
            repr: leaf_type(tree, leaf),
        });
    }

    // `key ""` declares nothing.
    if leaves.is_empty() {
        return Err(CompileError::MissingKeyStatement { list: list_name.to_string() });
    }

    let spec = KeySpec(leaves);
    let all_strings = spec.all_strings();
    Ok((spec, all_strings))
}
