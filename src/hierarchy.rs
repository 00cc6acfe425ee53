//! Containment index of the generated classes, and the `package-info.java`
//! documentation unit built from it.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::{ClassSpec, ModuleModel};

/// One class in the documentation index. Entries without children are the
/// leaves of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub class_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<IndexEntry>,
}

/// Nest every class under the class of its enclosing statement, in statement
/// order. A class name is indexed once: when two classes collide only the
/// first one (with its subtree) is listed.
pub fn index<'a>(roots: impl IntoIterator<Item = &'a ClassSpec>) -> Vec<IndexEntry> {
    let mut seen = HashSet::new();
    roots
        .into_iter()
        .filter_map(|root| entry(root, &mut seen))
        .collect()
}

fn entry(class: &ClassSpec, seen: &mut HashSet<String>) -> Option<IndexEntry> {
    if !seen.insert(class.name.clone()) {
        tracing::debug!(class = %class.name, path = %class.path, "already indexed");
        return None;
    }
    let children = class
        .children
        .iter()
        .filter_map(|child| entry(child, seen))
        .collect();
    Some(IndexEntry { class_name: class.name.clone(), children })
}

// ————————————————————————————————————————————————————————————————————————————
// PACKAGE-INFO
// ————————————————————————————————————————————————————————————————————————————

const SEE_ALSO: &[(&str, &str)] = &[
    (
        "https://www.rfc-editor.org/rfc/rfc6020",
        "RFC 6020: YANG - A Data Modeling Language for the Network Configuration Protocol (NETCONF)",
    ),
    ("https://www.rfc-editor.org/rfc/rfc6241", "RFC 6241: Network Configuration Protocol (NETCONF)"),
    (
        "https://www.rfc-editor.org/rfc/rfc6242",
        "RFC 6242: Using the NETCONF Protocol over Secure Shell (SSH)",
    ),
];

/// Render `package-info.java` for every class generated from `modules`.
pub fn render_package_info<'a>(
    modules: impl IntoIterator<Item = &'a ModuleModel>,
    package: &str,
) -> String {
    let modules: Vec<&ModuleModel> = modules.into_iter().collect();
    let mut body = Vec::<String>::new();
    body.push(String::new());
    let origin = modules
        .iter()
        .map(|m| {
            format!(
                "module \"{}\" (rev \"{}\")",
                m.module,
                m.revision.as_deref().unwrap_or("unknown")
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    let plural = if modules.len() > 1 { "s" } else { "" };
    body.push(format!("This class hierarchy was generated from the YANG module{plural}"));
    body.push(format!("{origin}."));
    body.push("The generated classes may be used to manipulate pieces of configuration data".into());
    body.push("with NETCONF operations such as edit-config, delete-config and lock.".into());
    body.push(String::new());

    let entries = index(modules.iter().map(|m| &m.root));
    html_list(&entries, 0, &mut body);

    let mut out = String::from("/**\n");
    for line in &body {
        if line.is_empty() {
            out.push_str(" *\n");
        } else {
            out.push_str(&format!(" * {line}\n"));
        }
    }
    out.push_str(" *\n");
    for (href, title) in SEE_ALSO {
        out.push_str(&format!(" * @see <a target=\"_top\" href=\"{href}\">{title}</a>\n"));
    }
    out.push_str(" */\n");
    out.push_str(&format!("package {package};\n"));
    out
}

fn html_list(entries: &[IndexEntry], depth: usize, out: &mut Vec<String>) {
    let pad = "    ".repeat(depth * 2);
    out.push(format!("{pad}<ul>"));
    for entry in entries {
        let link = format!("<a href=\"{0}.html\">{0}</a>", entry.class_name);
        if entry.children.is_empty() {
            out.push(format!("{pad}    <li>{link}</li>"));
        } else {
            out.push(format!("{pad}    <li>{link}"));
            html_list(&entry.children, depth + 1, out);
            out.push(format!("{pad}    </li>"));
        }
    }
    out.push(format!("{pad}</ul>"));
}
