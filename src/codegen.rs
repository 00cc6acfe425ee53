//! Java source renderer for the class model.
//!
//! Pure formatting: every member the model holds is rendered, in the order
//! the model holds it. Nothing here decides what a class contains.

use crate::config::RenderOptions;
use crate::model::{
    class_name, Accessor, AccessorSpec, ClassKind, ClassSpec, CloneSpec, ConstructorMode,
    ConstructorSpec, EditOp, KeyLeaf, KeySpec, Lookup, MemberKind, ModuleModel, TypeRepr,
    ValueForm,
};

const JAVA_RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while",
];

/// lowerCamelCase form of a YANG identifier.
fn lower_camel(ident: &str) -> String {
    let upper = class_name(ident);
    let mut chars = upper.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Java field/variable name for a YANG identifier.
pub fn member_name(ident: &str) -> String {
    let mut name = lower_camel(ident);
    if JAVA_RESERVED.contains(&name.as_str()) {
        name.push('_');
    }
    name
}

/// Parameter carrying a value for `ident`, e.g. `nameValue`.
fn value_param(ident: &str) -> String {
    format!("{}Value", lower_camel(ident))
}

fn form_type(repr: &TypeRepr, form: ValueForm) -> &'static str {
    match form {
        ValueForm::Wrapped => repr.wrapper,
        ValueForm::String => "String",
        ValueForm::Primitive => repr.primitive,
    }
}

/// `name[a='" + aValue + "'][b='" + bValue + "']`, body of a Java string
/// literal selecting a list entry.
fn key_xpath(tag: &str, keys: &KeySpec) -> String {
    let mut path = tag.to_string();
    for key in &keys.0 {
        path.push_str(&format!(
            "[{}='\" + {} + \"']",
            key.identifier,
            value_param(&key.identifier)
        ));
    }
    path
}

fn key_params(keys: &[KeyLeaf], form: ValueForm) -> String {
    keys.iter()
        .map(|k| format!("{} {}", k.param_type(form), value_param(&k.identifier)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn key_args(keys: &KeySpec) -> String {
    keys.identifiers().map(value_param).collect::<Vec<_>>().join(", ")
}

// ————————————————————————————————————————————————————————————————————————————
// CODEGEN
// ————————————————————————————————————————————————————————————————————————————

/// One rendered `.java` unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedClass {
    pub file_name: String,
    pub source: String,
}

/// Every class of a module, pre-order.
pub fn render_module(model: &ModuleModel, options: &RenderOptions) -> Vec<RenderedClass> {
    let provenance = model.provenance();
    model
        .root
        .walk()
        .into_iter()
        .map(|class| {
            let mut cg = Codegen::new(options);
            cg.emit_class(class, &provenance);
            RenderedClass { file_name: class.file_name(), source: cg.into_string() }
        })
        .collect()
}

pub struct Codegen<'a> {
    options: &'a RenderOptions,
    out: String,
}

impl<'a> Codegen<'a> {
    pub fn new(options: &'a RenderOptions) -> Self {
        Self { options, out: String::new() }
    }

    pub fn into_string(self) -> String {
        self.out
    }

    pub fn emit_class(&mut self, class: &ClassSpec, provenance: &str) {
        tracing::trace!(class = %class.name, "rendering");
        self.header(class, provenance);
        match class.kind {
            ClassKind::Module => self.module_body(class),
            ClassKind::Container | ClassKind::List => self.element_body(class),
        }
        self.out.push_str("}\n");
    }

    fn push(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }

    fn header(&mut self, class: &ClassSpec, provenance: &str) {
        let options = self.options;
        let RenderOptions { package, version, date } = options;
        self.push("/*");
        self.push(&format!(
            " * @(#){}        {version} {}",
            class.file_name(),
            date.format("%-d/%-m/%y")
        ));
        self.push(" *");
        self.push(" * This file has been auto-generated by yang-classgen.");
        self.push(&format!(" * Origin: {provenance}"));
        self.push(" */");
        self.push("");
        self.push(&format!("package {package};"));
        self.push("");
        self.push("import com.tailf.confm.*;");
        self.push("import com.tailf.inm.*;");
        if class.kind == ClassKind::Module {
            self.push("import java.util.Hashtable;");
        }
        self.push("");
        self.push("/**");
        match &class.prefix {
            Some(prefix) => {
                self.push(&format!(
                    " * The root class for namespace {} (accessible from",
                    class.namespace
                ));
                self.push(&format!(
                    " * {0}.NAMESPACE) with prefix \"{prefix}\" ({0}.PREFIX).",
                    class.name
                ));
            }
            None => {
                self.push(&format!(
                    " * This class represents a \"{}\" element",
                    class.path.trim_end_matches('/')
                ));
                self.push(&format!(" * from the namespace {}", class.namespace));
            }
        }
        self.push(" *");
        self.push(&format!(" * @version    {version} {}", date.format("%Y-%-m-%-d")));
        self.push(" * @author    Auto Generated");
        self.push(" */");
        match class.kind {
            ClassKind::Module => self.push(&format!("public class {} {{", class.name)),
            _ => self.push(&format!("public class {} extends Container {{", class.name)),
        }
    }

    /// A method with its doc comment, preceded by a blank line.
    fn method(&mut self, doc: &[String], signature: &str, throws: bool, body: &[String]) {
        self.push("");
        self.push("    /**");
        for line in doc {
            self.push(&format!("     * {line}"));
        }
        self.push("     */");
        if throws {
            self.push(&format!("    public {signature}"));
            self.push("        throws INMException {");
        } else {
            self.push(&format!("    public {signature} {{"));
        }
        for line in body {
            self.push(&format!("        {line}"));
        }
        self.push("    }");
    }

    fn section(&mut self, title: &str) {
        self.push("");
        self.push("    /**");
        self.push("     * -------------------------------------------------------");
        self.push(&format!("     * {title}"));
        self.push("     * -------------------------------------------------------");
        self.push("     */");
    }

    // ————————————————————————————————————————————————————————————————————
    // ROOT CLASS
    // ————————————————————————————————————————————————————————————————————

    fn module_body(&mut self, class: &ClassSpec) {
        let prefix = class.prefix.as_deref().unwrap_or_default();
        self.push("");
        self.push(&format!("    public static final String NAMESPACE = \"{}\";", class.namespace));
        self.push("");
        self.push(&format!("    public static final String PREFIX = \"{prefix}\";"));
        self.method(
            &[
                "Enable the elements in this namespace to be aware".into(),
                "of the data model and use the generated classes.".into(),
            ],
            "static void enable()",
            true,
            &[
                "Container.setPackage(NAMESPACE, PREFIX);".into(),
                format!("{}.registerSchema();", class.name),
            ],
        );
        let schema = format!("{}.schema", class.name);
        self.method(
            &[
                "Register the schema for this namespace in the global".into(),
                "schema table (CsTree) making it possible to lookup".into(),
                "CsNode entries for all tagpaths".into(),
            ],
            "static void registerSchema()",
            true,
            &[
                "StackTraceElement[] sTrace = (new Exception()).getStackTrace();".into(),
                "ClassLoader loader = sTrace[0].getClass().getClassLoader();".into(),
                format!("java.net.URL schemaUrl = loader.getSystemResource(\"{schema}\");"),
                "SchemaParser parser = new SchemaParser();".into(),
                "Hashtable h = CsTree.create(NAMESPACE);".into(),
                "if (schemaUrl == null)".into(),
                format!("    parser.readFile(\"{schema}\", h);"),
                "else".into(),
                "    parser.readFile(schemaUrl, h);".into(),
            ],
        );
    }

    // ————————————————————————————————————————————————————————————————————
    // CONTAINER / LIST CLASS
    // ————————————————————————————————————————————————————————————————————

    fn element_body(&mut self, class: &ClassSpec) {
        for field in &class.fields {
            self.push("");
            self.push("    /**");
            self.push(&format!("     * Field for child container \"{field}\"."));
            self.push("     */");
            self.push(&format!("    public {} {} = null;", class_name(field), member_name(field)));
        }
        for ctor in &class.constructors {
            self.constructor(class, ctor);
        }
        for clone in &class.clones {
            self.clone_method(class, clone);
        }
        self.key_names(class);
        self.children_names(class);

        let mut current: Option<(&MemberKind, &str)> = None;
        for spec in &class.accessors {
            let member = (&spec.member.kind, spec.member.name.as_str());
            if current != Some(member) {
                let optional = if spec.flags.optional { "optional " } else { "" };
                self.section(&format!(
                    "Access methods for {optional}{} child: \"{}\".",
                    spec.member.kind.keyword(),
                    spec.member.name
                ));
                current = Some(member);
            }
            self.accessor(class, spec);
        }

        if class.add_child_support {
            self.add_child_support(class);
        }
    }

    fn constructor(&mut self, class: &ClassSpec, ctor: &ConstructorSpec) {
        let root = &class.root_class;
        let mut doc = Vec::new();
        let mut body = vec![format!("super({root}.NAMESPACE, \"{}\");", class.tag)];
        let params = match ctor.mode.form() {
            None => {
                doc.push(format!("Constructor for an empty {} object.", class.name));
                String::new()
            }
            Some(form) => {
                doc.push(format!("Constructor for an initialized {} object,", class.name));
                doc.push(match ctor.mode {
                    ConstructorMode::KeyedString => "with Strings for the keys.".to_string(),
                    ConstructorMode::KeyedPrimitive => "with primitive Java types.".to_string(),
                    _ => "with the keys as ConfM values.".to_string(),
                });
                for key in &ctor.args {
                    let param = value_param(&key.identifier);
                    let local = member_name(&key.identifier);
                    let value = match form {
                        ValueForm::Wrapped => param.clone(),
                        _ => format!("new {}({param})", key.repr.wrapper),
                    };
                    doc.push(format!("@param {param} Key argument of child."));
                    body.push(format!("// Set key element: {}", key.identifier));
                    body.push(format!(
                        "Leaf {local} = new Leaf({root}.NAMESPACE, \"{}\");",
                        key.identifier
                    ));
                    body.push(format!("{local}.setValue({value});"));
                    body.push(format!("insertChild({local}, childrenNames());"));
                }
                key_params(&ctor.args, form)
            }
        };
        if ctor.sets_prefix {
            body.push("setDefaultPrefix();".into());
            body.push(format!("setPrefix({root}.PREFIX);"));
        }
        let throws = class.kind == ClassKind::List;
        self.method(&doc, &format!("{}({params})", class.name), throws, &body);
    }

    fn clone_method(&mut self, class: &ClassSpec, clone: &CloneSpec) {
        let getters = clone
            .keys
            .iter()
            .map(|k| format!("get{}Value()", class_name(k)))
            .collect::<Vec<_>>()
            .join(", ");
        let (doc, signature, call) = if clone.shallow {
            (
                vec![
                    "Clones this object, returning a shallow copy.".to_string(),
                    "@return A clone of the object. Children are not included.".to_string(),
                ],
                "Element cloneShallow()",
                format!("return cloneShallowContent(new {}({getters}));", class.name),
            )
        } else {
            (
                vec![
                    "Clones this object, returning an exact copy.".to_string(),
                    "@return A clone of the object.".to_string(),
                ],
                "Object clone()",
                format!("return ({0})cloneContent(new {0}({getters}));", class.name),
            )
        };
        let body = if clone.keys.is_empty() {
            vec![call]
        } else {
            // Reading a key back only fails on a corrupt instance.
            vec![
                "try {".to_string(),
                format!("    {call}"),
                "} catch (INMException e) { return null; }".to_string(),
            ]
        };
        self.method(&doc, signature, false, &body);
    }

    fn key_names(&mut self, class: &ClassSpec) {
        let body = if class.key_names.is_empty() {
            vec!["return null;".to_string()]
        } else {
            string_array(&class.key_names)
        };
        self.method(
            &[
                "Structure information which specifies".into(),
                "the keys for the list entries.".into(),
            ],
            "String[] keyNames()",
            false,
            &body,
        );
    }

    fn children_names(&mut self, class: &ClassSpec) {
        self.method(
            &[
                "Structure information with the names of the children.".into(),
                "Makes it possible to order the children.".into(),
            ],
            "String[] childrenNames()",
            false,
            &string_array(&class.children_names),
        );
    }

    fn add_child_support(&mut self, class: &ClassSpec) {
        self.section("Support method for addChild.");
        let mut body = vec!["super.addChild(child);".to_string()];
        for (i, field) in class.fields.iter().enumerate() {
            let else_ = if i == 0 { "" } else { "else " };
            body.push(format!(
                "{else_}if (child instanceof {0}) {1} = ({0})child;",
                class_name(field),
                member_name(field)
            ));
        }
        self.method(&["Adds a child to this object.".into()], "void addChild(Element child)", false, &body);
    }

    // ————————————————————————————————————————————————————————————————————
    // ACCESSORS
    // ————————————————————————————————————————————————————————————————————

    fn accessor(&mut self, class: &ClassSpec, spec: &AccessorSpec) {
        let root = &class.root_class;
        let tag = spec.member.name.as_str();
        let cls = class_name(tag);
        let var = member_name(tag);
        let param = value_param(tag);
        let keyword = match spec.member.kind {
            MemberKind::KeyLeaf => "leaf",
            other => other.keyword(),
        };
        let leaf_list = spec.member.kind == MemberKind::LeafList;
        let set_leaf = if leaf_list { "setLeafListValue" } else { "setLeafValue" };
        let string_repr = crate::compile::types::resolve("string");
        let repr = spec.repr.as_ref().unwrap_or(&string_repr);

        match &spec.op {
            Accessor::Get(Lookup::Keys { keys, form }) => {
                let mut doc = vec![
                    format!("Get method for {keyword} entry: \"{tag}\"."),
                    "Return the child with the specified keys (if any).".to_string(),
                ];
                if *form == ValueForm::String {
                    doc.push("The keys are specified as Strings".into());
                }
                doc.extend(keys.identifiers().map(|k| format!("@param {} Key argument of child.", value_param(k))));
                doc.push(format!("@return The {keyword} entry with the specified keys."));
                self.method(
                    &doc,
                    &format!("{cls} get{cls}({})", key_params(&keys.0, *form)),
                    true,
                    &[
                        format!("String path = \"{}\";", key_xpath(tag, keys)),
                        format!("return ({cls})getListContainer(path);"),
                    ],
                );
            }
            Accessor::Get(_) => {
                self.method(
                    &[
                        format!("Return the value for child {keyword} \"{tag}\"."),
                        format!("@return The value of the {keyword}."),
                    ],
                    &format!("{} get{cls}Value()", repr.wrapper),
                    true,
                    &[format!("return ({})getValue(\"{tag}\");", repr.wrapper)],
                );
            }
            Accessor::Set(form) => {
                let (note, what) = match form {
                    ValueForm::Wrapped => ("", ""),
                    ValueForm::String => (", using a string value", "string representation of the "),
                    ValueForm::Primitive => (", using the java primitive value", ""),
                };
                let body = match form {
                    ValueForm::Wrapped => vec![
                        format!("{set_leaf}({root}.NAMESPACE,"),
                        format!("    \"{tag}\","),
                        format!("    {param},"),
                        "    childrenNames());".to_string(),
                    ],
                    _ => vec![format!("set{cls}Value(new {}({param}));", repr.wrapper)],
                };
                self.method(
                    &[
                        format!("Sets the value for child {keyword} \"{tag}\"{note}."),
                        format!("@param {param} The {what}value to set."),
                    ],
                    &format!("void set{cls}Value({} {param})", form_type(repr, *form)),
                    true,
                    &body,
                );
            }
            Accessor::Unset => {
                self.method(
                    &[format!("Unsets the value for child {keyword} \"{tag}\".")],
                    &format!("void unset{cls}Value()"),
                    true,
                    &[format!("delete(\"{tag}\");")],
                );
            }
            Accessor::AddEmpty => {
                let name = if leaf_list { format!("Empty{cls}") } else { cls.clone() };
                self.method(
                    &[
                        "This method is used for creating a subtree filter.".into(),
                        format!("The added \"{tag}\" {keyword} will not have a value."),
                    ],
                    &format!("void add{name}()"),
                    true,
                    &[
                        format!("{set_leaf}({root}.NAMESPACE,"),
                        format!("    \"{tag}\","),
                        "    null,".to_string(),
                        "    childrenNames());".to_string(),
                    ],
                );
            }
            Accessor::Mark(op, form) => self.mark(tag, keyword, repr, *op, *form),
            Accessor::Iterate => {
                let iterator = if leaf_list { "ElementLeafListValueIterator" } else { "ElementChildrenIterator" };
                self.method(
                    &[
                        format!("Iterator method for the {keyword} \"{tag}\"."),
                        format!("@return An iterator for the {keyword}."),
                    ],
                    &format!("{iterator} {var}Iterator()"),
                    false,
                    &[format!("return new {iterator}(children, \"{tag}\");")],
                );
            }
            Accessor::AddChild(lookup) => {
                let mut doc = vec![format!("Adds {keyword} entry \"{tag}\".")];
                let mut body = Vec::new();
                let params = match lookup {
                    Lookup::Instance => {
                        doc.push(format!("@param {var} Child to be added to children"));
                        format!("{cls} {var}")
                    }
                    Lookup::Keys { keys, form } => {
                        doc[0] = format!("Adds {keyword} entry \"{tag}\", with given key arguments.");
                        if *form == ValueForm::String {
                            doc.push("The keys are specified as strings".into());
                        }
                        doc.extend(keys.identifiers().map(|k| format!("@param {} Key argument of child", value_param(k))));
                        body.push(format!("{cls} {var} = new {cls}({});", key_args(keys)));
                        key_params(&keys.0, *form)
                    }
                    _ => {
                        doc.push("This method is used for creating subtree filters.".into());
                        body.push(format!("{cls} {var} = new {cls}();"));
                        String::new()
                    }
                };
                if spec.flags.field {
                    body.push(format!("this.{var} = {var};"));
                }
                body.push(format!("insertChild({var}, childrenNames());"));
                body.push(format!("return {var};"));
                doc.push("@return The added child.".into());
                self.method(&doc, &format!("{cls} add{cls}({params})"), true, &body);
            }
            Accessor::Delete(lookup) => {
                let mut doc = vec![format!("Deletes {keyword} entry \"{tag}\".")];
                let mut body = Vec::new();
                let (params, path) = match lookup {
                    Lookup::Keys { keys, form } => {
                        doc[0] = format!("Deletes {keyword} entry \"{tag}\", with specified keys.");
                        if *form == ValueForm::String {
                            doc.push("The keys are specified as Strings".into());
                        }
                        doc.extend(keys.identifiers().map(|k| format!("@param {} Key argument of child.", value_param(k))));
                        (key_params(&keys.0, *form), key_xpath(tag, keys))
                    }
                    Lookup::Value(form) => {
                        if *form == ValueForm::String {
                            doc.push("The value is specified as a String".into());
                        }
                        doc.push(format!("@param {param} Child to be removed."));
                        (
                            format!("{} {param}", form_type(repr, *form)),
                            format!("{tag}[name='\" + {param} + \"']"),
                        )
                    }
                    _ => {
                        if spec.flags.field {
                            body.push(format!("this.{var} = null;"));
                        }
                        (String::new(), tag.to_string())
                    }
                };
                body.push(format!("String path = \"{path}\";"));
                body.push("delete(path);".into());
                self.method(&doc, &format!("void delete{cls}({params})"), true, &body);
            }
        }
    }

    fn mark(&mut self, tag: &str, keyword: &str, repr: &TypeRepr, op: EditOp, form: Option<ValueForm>) {
        let cls = class_name(tag);
        let verb = class_name(op.as_str());
        let mut doc = vec![format!("Marks the \"{tag}\" {keyword} with operation \"{}\".", op.as_str())];
        let (params, path) = match form {
            Some(form) => {
                let param = value_param(tag);
                let given = if form == ValueForm::String { ", given as a String" } else { "" };
                doc.push(format!("@param {param} The value to mark{given}"));
                (
                    format!("{} {param}", form_type(repr, form)),
                    format!("{tag}[name='\" + {param} + \"']"),
                )
            }
            None => (String::new(), tag.to_string()),
        };
        self.method(
            &doc,
            &format!("void mark{cls}{verb}({params})"),
            true,
            &[format!("markLeaf{verb}(\"{path}\");")],
        );
    }
}

fn string_array(names: &[String]) -> Vec<String> {
    let mut body = vec!["return new String[] {".to_string()];
    let last = names.len().saturating_sub(1);
    for (i, name) in names.iter().enumerate() {
        let comma = if i == last { "" } else { "," };
        body.push(format!("    \"{name}\"{comma}"));
    }
    body.push("};".to_string());
    body
}
