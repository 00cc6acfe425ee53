// Strongly-typed class model for codegen. No source text here.

/// Resolved value representation of a YANG type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRepr {
    pub yang_type: String,
    pub wrapper: &'static str,   // fully-qualified ConfM class
    pub primitive: &'static str, // plain Java type
    pub defaulted: bool,         // unrecognized, fell back to string
}

impl TypeRepr {
    pub fn is_string(&self) -> bool {
        self.primitive == "String"
    }
}

/// Which representation a method parameter takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueForm {
    Wrapped,
    String,
    Primitive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLeaf {
    pub identifier: String,
    pub repr: TypeRepr,
}

impl KeyLeaf {
    pub fn param_type(&self, form: ValueForm) -> &'static str {
        match form {
            ValueForm::Wrapped => self.repr.wrapper,
            ValueForm::String => "String",
            ValueForm::Primitive => self.repr.primitive,
        }
    }
}

/// Key leaves of a list, in `key` statement order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeySpec(pub Vec<KeyLeaf>);

impl KeySpec {
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|k| k.identifier.as_str())
    }

    pub fn all_strings(&self) -> bool {
        self.0.iter().all(|k| k.repr.is_string())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructorMode {
    NoArgs,
    KeyedWrapped,
    KeyedString,
    KeyedPrimitive,
}

impl ConstructorMode {
    pub fn form(self) -> Option<ValueForm> {
        match self {
            Self::NoArgs => None,
            Self::KeyedWrapped => Some(ValueForm::Wrapped),
            Self::KeyedString => Some(ValueForm::String),
            Self::KeyedPrimitive => Some(ValueForm::Primitive),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorSpec {
    pub mode: ConstructorMode,
    pub args: Vec<KeyLeaf>,
    pub sets_prefix: bool,
}

/// Deep or shallow copy that rebuilds the instance from its key accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneSpec {
    pub shallow: bool,
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Leaf,
    KeyLeaf,
    LeafList,
    Container,
    List,
}

impl MemberKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Leaf => "leaf",
            Self::KeyLeaf => "key",
            Self::LeafList => "leaf-list",
            Self::Container => "container",
            Self::List => "list",
        }
    }
}

/// The child node an accessor was synthesized for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub kind: MemberKind,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Replace,
    Merge,
    Create,
    Delete,
}

impl EditOp {
    pub const ALL: [EditOp; 4] = [Self::Replace, Self::Merge, Self::Create, Self::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Merge => "merge",
            Self::Create => "create",
            Self::Delete => "delete",
        }
    }
}

/// How an accessor selects or supplies its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// No argument: a leaf value, a container field, or a filter entry.
    None,
    /// The child object itself is the argument.
    Instance,
    /// List entry keys in the given representation.
    Keys { keys: KeySpec, form: ValueForm },
    /// A leaf-list value in the given representation.
    Value(ValueForm),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    Get(Lookup),
    Set(ValueForm),
    Unset,
    AddEmpty,
    AddChild(Lookup),
    Delete(Lookup),
    Mark(EditOp, Option<ValueForm>),
    Iterate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessorFlags {
    pub optional: bool,
    pub field: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorSpec {
    pub member: Member,
    pub repr: Option<TypeRepr>,
    pub op: Accessor,
    pub flags: AccessorFlags,
}

impl AccessorSpec {
    pub fn string_keyed(&self) -> bool {
        match &self.op {
            Accessor::Get(l) | Accessor::AddChild(l) | Accessor::Delete(l) => matches!(
                l,
                Lookup::Keys { form: ValueForm::String, .. } | Lookup::Value(ValueForm::String)
            ),
            Accessor::Set(form) => *form == ValueForm::String,
            Accessor::Mark(_, form) => *form == Some(ValueForm::String),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Module,
    Container,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedStatement {
    pub keyword: String,
    pub arg: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSpec {
    pub name: String,
    pub tag: String,
    pub kind: ClassKind,
    pub namespace: String,
    /// Class holding `NAMESPACE` and `PREFIX` for this module.
    pub root_class: String,
    /// Module prefix; set on the module root only.
    pub prefix: Option<String>,
    pub path: String,
    pub fields: Vec<String>,
    pub keys: Option<KeySpec>,
    pub constructors: Vec<ConstructorSpec>,
    pub clones: Vec<CloneSpec>,
    pub key_names: Vec<String>,
    pub children_names: Vec<String>,
    pub accessors: Vec<AccessorSpec>,
    pub add_child_support: bool,
    pub skipped: Vec<SkippedStatement>,
    pub children: Vec<ClassSpec>,
}

impl ClassSpec {
    pub fn file_name(&self) -> String {
        format!("{}.java", self.name)
    }

    /// Pre-order walk over this class and every nested class.
    pub fn walk(&self) -> Vec<&ClassSpec> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

/// Everything compiled from one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleModel {
    pub module: String,
    pub revision: Option<String>,
    pub root: ClassSpec,
}

impl ModuleModel {
    /// Origin line written into every generated file.
    pub fn provenance(&self) -> String {
        format!(
            "module \"{}\", revision: \"{}\".",
            self.module,
            self.revision.as_deref().unwrap_or("unknown")
        )
    }
}

/// Class name for a YANG identifier: `-` and `.` separated segments are
/// joined with their first letter upper-cased. Idempotent.
pub fn class_name(ident: &str) -> String {
    ident
        .split(['-', '.'])
        .filter(|seg| !seg.is_empty())
        .map(|seg| {
            let mut chars = seg.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn class_names_are_camel_cased() {
        assert_eq!(class_name("interfaces"), "Interfaces");
        assert_eq!(class_name("ip-address"), "IpAddress");
        assert_eq!(class_name("ifIndex"), "IfIndex");
        assert_eq!(class_name("a-b"), "AB");
        assert_eq!(class_name("if.stats"), "IfStats");
        assert_eq!(class_name("-a..b-"), "AB");
        assert_eq!(class_name("IPv4"), "IPv4");
        assert_eq!(class_name("über-ß"), "ÜberSS");
        assert_eq!(class_name("--"), "");
    }

    proptest! {
        #[test]
        fn class_name_is_idempotent(ident in "[-.a-zA-Z0-9äöüßéǆ]{0,16}") {
            let once = class_name(&ident);
            prop_assert_eq!(class_name(&once), once);
        }
    }
}
