//! Built-in template sets.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;

use crate::errors::{Result, WeftError};
use crate::weave::TemplateSet;

/// Built-in template sets, lazily initialized.
static BUILTIN_TEMPLATE_SETS: Lazy<Vec<TemplateSet>> = Lazy::new(|| vec![rst(), html(), latex()]);

fn rst() -> TemplateSet {
    TemplateSet {
        name: "rst".into(),
        extension: "rst".into(),
        cb_template: "\n..  _`${seq}`:\n..  rubric:: ${fullName} (${seq}) =\n..  parsed-literal::\n    :class: code\n\n".into(),
        ce_template: "\n..\n\n    ..  class:: small\n\n        |loz| *${fullName} (${seq})*. ${references}\n".into(),
        fb_template: "\n..  _`${seq}`:\n..  rubric:: ${fullName} (${seq}) =\n..  parsed-literal::\n    :class: code\n\n".into(),
        fe_template: "\n..\n\n    ..  class:: small\n\n        |loz| *${fullName} (${seq})*. ${references}\n".into(),
        ref_template: "Used by: ${refList}".into(),
        ref_item_template: "${fullName} (`${seq}`_)".into(),
        refto_name_template: "|srarr|\\ ${fullName} (`${seq}`_)".into(),
        refto_seq_template: "`${seq}`_".into(),
        xref_head_template: "\n".into(),
        xref_foot_template: "\n".into(),
        xref_item_template: ":${fullName}:\n    ${refList}\n".into(),
        name_def_template: "[`${seq}`_]".into(),
        name_ref_template: "`${seq}`_".into(),
    }
}

fn html() -> TemplateSet {
    TemplateSet {
        name: "html".into(),
        extension: "html".into(),
        cb_template: "\n<a name=\"weft${seq}\"></a>\n<p><em>${fullName}</em> (${seq})&nbsp;=</p>\n<pre><code>\n".into(),
        ce_template: "</code></pre>\n<p>${references}</p>\n".into(),
        fb_template: "\n<a name=\"weft${seq}\"></a>\n<p><code>${fullName}</code> (${seq})&nbsp;=</p>\n<pre><code>\n".into(),
        fe_template: "</code></pre>\n<p>${references}</p>\n".into(),
        ref_template: "Used by ${refList}.".into(),
        ref_item_template: "<a href=\"#weft${seq}\"><em>${fullName}</em>&nbsp;(${seq})</a>".into(),
        refto_name_template: "<a href=\"#weft${seq}\">&rarr;<em>${fullName}</em> (${seq})</a>".into(),
        refto_seq_template: "<a href=\"#weft${seq}\">(${seq})</a>".into(),
        xref_head_template: "<dl>\n".into(),
        xref_foot_template: "</dl>\n".into(),
        xref_item_template: "<dt>${fullName}</dt><dd>${refList}</dd>\n".into(),
        name_def_template: "<strong>${seq}</strong>".into(),
        name_ref_template: "<a href=\"#weft${seq}\">${seq}</a>".into(),
    }
}

fn latex() -> TemplateSet {
    TemplateSet {
        name: "latex".into(),
        extension: "tex".into(),
        cb_template: "\n\\label{weft${seq}}\n\\textit{${fullName} (${seq})} =\n\\begin{Verbatim}\n".into(),
        ce_template: "\\end{Verbatim}\n${references}\n".into(),
        fb_template: "\n\\label{weft${seq}}\n\\textbf{${fullName} (${seq})} =\n\\begin{Verbatim}\n".into(),
        fe_template: "\\end{Verbatim}\n${references}\n".into(),
        ref_template: "\\footnotesize Used by: ${refList} \\normalsize".into(),
        ref_item_template: "${fullName} (Sect. \\ref{weft${seq}}, p. \\pageref{weft${seq}})".into(),
        refto_name_template: "$\\triangleright$ ${fullName} (${seq})".into(),
        refto_seq_template: "\\ref{weft${seq}}".into(),
        xref_head_template: "\\begin{description}\n".into(),
        xref_foot_template: "\\end{description}\n".into(),
        xref_item_template: "\\item[${fullName}] ${refList}\n".into(),
        name_def_template: "\\underline{${seq}}".into(),
        name_ref_template: "${seq}".into(),
    }
}

/// Returns the built-in template sets.
pub fn builtin_template_sets() -> &'static [TemplateSet] {
    &BUILTIN_TEMPLATE_SETS
}

/// Finds a built-in template set by name.
pub fn find_template_set(name: &str) -> Option<TemplateSet> {
    builtin_template_sets()
        .iter()
        .find(|set| set.name == name)
        .cloned()
}

/// Resolves a template-set spec: a built-in name, or a path to a TOML file
/// defining the same fields.
pub fn load_template_set(spec: &str) -> Result<TemplateSet> {
    if let Some(set) = find_template_set(spec) {
        return Ok(set);
    }
    let path = Path::new(spec);
    if path.exists() {
        let content = fs::read_to_string(path)?;
        return Ok(toml::from_str(&content)?);
    }
    Err(WeftError::Config(format!(
        "unknown template set '{}': not a built-in (rst, html, latex) and no such file",
        spec
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_find_builtins() {
        for name in ["rst", "html", "latex"] {
            let set = find_template_set(name).unwrap();
            assert_eq!(set.name, name);
        }
        assert!(find_template_set("markdown").is_none());
    }

    #[test]
    fn test_extensions() {
        assert_eq!(find_template_set("rst").unwrap().extension, "rst");
        assert_eq!(find_template_set("latex").unwrap().extension, "tex");
    }

    #[test]
    fn test_load_builtin_by_name() {
        let set = load_template_set("html").unwrap();
        assert_eq!(set.name, "html");
    }

    #[test]
    fn test_load_custom_set_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.toml");

        // Serialize a built-in, tweak it, read it back as a custom set.
        let mut custom = find_template_set("rst").unwrap();
        custom.name = "plain".into();
        custom.extension = "txt".into();
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", toml::to_string(&custom).unwrap()).unwrap();

        let loaded = load_template_set(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded, custom);
    }

    #[test]
    fn test_unknown_set_is_error() {
        let err = load_template_set("no-such-set").unwrap_err();
        assert!(matches!(err, WeftError::Config(_)));
    }
}
