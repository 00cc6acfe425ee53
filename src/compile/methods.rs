//! Accessor synthesis per child kind.
//!
//! | child            | accessors                                                    |
//! |------------------|--------------------------------------------------------------|
//! | key leaf         | get (read-back for clone; keys are set by constructors)      |
//! | optional leaf    | get, set per representation, unset, add-empty, mark x4       |
//! | leaf-list        | iterate, set per representation, delete x2, add-empty, mark x8 |
//! | container        | add (instance / no-arg), delete                              |
//! | list             | get x2, iterate, add x4, delete x2                           |

use crate::model::{
    Accessor, AccessorFlags, AccessorSpec, EditOp, KeySpec, Lookup, Member, MemberKind, TypeRepr,
    ValueForm,
};

fn member(kind: MemberKind, name: &str) -> Member {
    Member { kind, name: name.to_string() }
}

/// Setter representations for a type: wrapped and string always, the
/// primitive one only when it differs from `String`.
fn set_forms(repr: &TypeRepr) -> Vec<ValueForm> {
    let mut forms = vec![ValueForm::Wrapped, ValueForm::String];
    if !repr.is_string() {
        forms.push(ValueForm::Primitive);
    }
    forms
}

pub fn leaf(name: &str, repr: &TypeRepr, is_key: bool) -> Vec<AccessorSpec> {
    let kind = if is_key { MemberKind::KeyLeaf } else { MemberKind::Leaf };
    let flags = AccessorFlags { optional: !is_key, field: false };
    let spec = |op| AccessorSpec {
        member: member(kind, name),
        repr: Some(repr.clone()),
        op,
        flags,
    };

    let mut out = vec![spec(Accessor::Get(Lookup::None))];
    if is_key {
        return out;
    }
    out.extend(set_forms(repr).into_iter().map(|f| spec(Accessor::Set(f))));
    out.push(spec(Accessor::Unset));
    out.push(spec(Accessor::AddEmpty));
    out.extend(EditOp::ALL.into_iter().map(|op| spec(Accessor::Mark(op, None))));
    out
}

pub fn leaf_list(name: &str, repr: &TypeRepr) -> Vec<AccessorSpec> {
    let spec = |op| AccessorSpec {
        member: member(MemberKind::LeafList, name),
        repr: Some(repr.clone()),
        op,
        flags: AccessorFlags::default(),
    };

    let mut out = vec![spec(Accessor::Iterate)];
    out.extend(set_forms(repr).into_iter().map(|f| spec(Accessor::Set(f))));
    out.push(spec(Accessor::Delete(Lookup::Value(ValueForm::Wrapped))));
    out.push(spec(Accessor::Delete(Lookup::Value(ValueForm::String))));
    out.push(spec(Accessor::AddEmpty));
    for op in EditOp::ALL {
        out.push(spec(Accessor::Mark(op, Some(ValueForm::Wrapped))));
        out.push(spec(Accessor::Mark(op, Some(ValueForm::String))));
    }
    out
}

pub fn container(name: &str) -> Vec<AccessorSpec> {
    let spec = |op| AccessorSpec {
        member: member(MemberKind::Container, name),
        repr: None,
        op,
        flags: AccessorFlags { optional: false, field: true },
    };
    vec![
        spec(Accessor::AddChild(Lookup::Instance)),
        spec(Accessor::AddChild(Lookup::None)),
        spec(Accessor::Delete(Lookup::None)),
    ]
}

pub fn list(name: &str, keys: &KeySpec) -> Vec<AccessorSpec> {
    let spec = |op| AccessorSpec {
        member: member(MemberKind::List, name),
        repr: None,
        op,
        flags: AccessorFlags::default(),
    };
    let by = |form| Lookup::Keys { keys: keys.clone(), form };
    vec![
        spec(Accessor::Get(by(ValueForm::Wrapped))),
        spec(Accessor::Get(by(ValueForm::String))),
        spec(Accessor::Iterate),
        spec(Accessor::AddChild(Lookup::Instance)),
        spec(Accessor::AddChild(by(ValueForm::Wrapped))),
        spec(Accessor::AddChild(by(ValueForm::String))),
        spec(Accessor::AddChild(Lookup::None)),
        spec(Accessor::Delete(by(ValueForm::Wrapped))),
        spec(Accessor::Delete(by(ValueForm::String))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::types::resolve;

    #[test]
    fn optional_string_leaf() {
        let ops: Vec<_> = leaf("name", &resolve("string"), false)
            .into_iter()
            .map(|a| a.op)
            .collect();
        assert_eq!(
            ops,
            vec![
                Accessor::Get(Lookup::None),
                Accessor::Set(ValueForm::Wrapped),
                Accessor::Set(ValueForm::String),
                Accessor::Unset,
                Accessor::AddEmpty,
                Accessor::Mark(EditOp::Replace, None),
                Accessor::Mark(EditOp::Merge, None),
                Accessor::Mark(EditOp::Create, None),
                Accessor::Mark(EditOp::Delete, None),
            ]
        );
    }

    #[test]
    fn numeric_leaf_gets_primitive_setter() {
        let sets = leaf("mtu", &resolve("uint32"), false)
            .into_iter()
            .filter(|a| matches!(a.op, Accessor::Set(_)))
            .count();
        assert_eq!(sets, 3);
    }

    #[test]
    fn key_leaf_is_read_only() {
        let acc = leaf("id", &resolve("uint32"), true);
        assert_eq!(acc.len(), 1);
        assert_eq!(acc[0].op, Accessor::Get(Lookup::None));
        assert_eq!(acc[0].member.kind, MemberKind::KeyLeaf);
        assert!(!acc[0].flags.optional);
    }

    #[test]
    fn leaf_list_marks_both_representations() {
        let acc = leaf_list("server", &resolve("string"));
        let marks = acc.iter().filter(|a| matches!(a.op, Accessor::Mark(..))).count();
        assert_eq!(marks, 8);
        assert_eq!(acc[0].op, Accessor::Iterate);
        assert_eq!(acc.iter().filter(|a| a.string_keyed()).count(), 1 + 1 + 4);
    }

    #[test]
    fn list_child_family() {
        let acc = list("entry", &KeySpec::default());
        assert_eq!(acc.len(), 9);
        assert_eq!(acc.iter().filter(|a| matches!(a.op, Accessor::AddChild(_))).count(), 4);
        assert_eq!(acc.iter().filter(|a| matches!(a.op, Accessor::Delete(_))).count(), 2);
    }

    #[test]
    fn container_child_is_field_based() {
        let acc = container("config");
        assert_eq!(acc.len(), 3);
        assert!(acc.iter().all(|a| a.flags.field));
    }
}
