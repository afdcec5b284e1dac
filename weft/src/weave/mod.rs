//! Weaving: rendering the web through a template set.

pub mod template;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::model::{ChunkKind, Command, Web};

use template::substitute;

/// How the "used by" list of a woven chunk is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ReferenceStyle {
    /// Each direct referrer, once.
    #[default]
    Simple,
    /// The full chain of referrers up to the output files.
    Transitive,
}

impl ReferenceStyle {
    /// Returns the style name as a static string.
    pub fn name(&self) -> &'static str {
        match self {
            ReferenceStyle::Simple => "simple",
            ReferenceStyle::Transitive => "transitive",
        }
    }

    /// Chunk indices to list as referrers of `index`, in discovery order.
    fn referrers(&self, web: &Web, index: usize) -> Vec<usize> {
        match self {
            ReferenceStyle::Simple => web.get(index).referenced_by.clone(),
            ReferenceStyle::Transitive => {
                let mut seen = Vec::new();
                let mut queue: std::collections::VecDeque<usize> =
                    web.get(index).referenced_by.iter().copied().collect();
                while let Some(referrer) = queue.pop_front() {
                    if seen.contains(&referrer) {
                        continue;
                    }
                    seen.push(referrer);
                    queue.extend(web.get(referrer).referenced_by.iter().copied());
                }
                seen
            }
        }
    }
}

impl std::fmt::Display for ReferenceStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ReferenceStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(ReferenceStyle::Simple),
            "transitive" => Ok(ReferenceStyle::Transitive),
            _ => Err(format!(
                "Unknown reference style '{}'. Valid styles: simple, transitive",
                s
            )),
        }
    }
}

/// A named collection of output templates: the weaver's whole knowledge of
/// the target markup.
///
/// Templates are opaque strings with `${identifier}` placeholders; the
/// weaver substitutes the fields documented on each slot and nothing else.
/// A custom weaver is just a custom template set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSet {
    /// Set name, e.g. `rst`.
    pub name: String,
    /// Extension of the woven document, without the dot.
    pub extension: String,

    /// Begin/end of a named chunk body. Placeholders: `seq`, `fullName`,
    /// `concat`, `lineNumber`, `references`.
    pub cb_template: String,
    pub ce_template: String,

    /// Begin/end of an output chunk body. Same placeholders as `cb`/`ce`.
    pub fb_template: String,
    pub fe_template: String,

    /// "Used by" list: `ref_template` wraps `refList`, `ref_item_template`
    /// renders one `(seq, fullName)` referrer.
    pub ref_template: String,
    pub ref_item_template: String,

    /// An in-body `@<name@>` reference: `fullName`, `seq`.
    pub refto_name_template: String,
    /// A bare sequence link inside cross-reference lists: `seq`.
    pub refto_seq_template: String,

    /// Cross-reference blocks for `@f`/`@m`/`@u`: head and foot take no
    /// placeholders, each item takes `fullName` and `refList`.
    pub xref_head_template: String,
    pub xref_foot_template: String,
    pub xref_item_template: String,

    /// User-identifier links: the defining chunk vs a mention. Both: `seq`.
    pub name_def_template: String,
    pub name_ref_template: String,
}

/// Weaves the whole web into a single document.
pub fn weave_web(web: &Web, templates: &TemplateSet, style: ReferenceStyle) -> Result<String> {
    let weaver = Weaver {
        web,
        templates,
        style,
        out: String::new(),
    };
    weaver.run()
}

struct Weaver<'w> {
    web: &'w Web,
    templates: &'w TemplateSet,
    style: ReferenceStyle,
    out: String,
}

impl Weaver<'_> {
    fn run(mut self) -> Result<String> {
        for index in 0..self.web.len() {
            let chunk = self.web.get(index);
            match &chunk.kind {
                ChunkKind::Anonymous => {
                    for command in &chunk.commands {
                        if let Some(text) = command.text() {
                            self.out.push_str(text);
                        }
                    }
                }
                ChunkKind::Named { .. } => {
                    self.weave_code_chunk(index, true)?;
                }
                ChunkKind::Output { .. } => {
                    self.weave_code_chunk(index, false)?;
                }
            }
        }
        Ok(self.out)
    }

    fn weave_code_chunk(&mut self, index: usize, named: bool) -> Result<()> {
        let (begin, begin_slot, end, end_slot) = if named {
            (
                &self.templates.cb_template,
                "cb_template",
                &self.templates.ce_template,
                "ce_template",
            )
        } else {
            (
                &self.templates.fb_template,
                "fb_template",
                &self.templates.fe_template,
                "fe_template",
            )
        };

        let values = self.chunk_values(index)?;
        let pairs: Vec<(&str, &str)> = values.iter().map(|(k, v)| (*k, v.as_str())).collect();

        let begin_rendered = substitute(begin, begin_slot, &pairs)?;
        let end_rendered = substitute(end, end_slot, &pairs)?;

        self.out.push_str(&begin_rendered);
        self.weave_body(index)?;
        self.out.push_str(&end_rendered);
        Ok(())
    }

    /// The substitution record shared by the begin and end templates.
    fn chunk_values(&self, index: usize) -> Result<Vec<(&'static str, String)>> {
        let chunk = self.web.get(index);
        let full_name = chunk.full_name().unwrap_or_default();

        let siblings: &[usize] = match &chunk.kind {
            ChunkKind::Named { name, .. } => self.web.chunks_for_name(name),
            ChunkKind::Output { path } => self
                .web
                .output_index()
                .get(path)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            ChunkKind::Anonymous => &[],
        };
        let concat = siblings.iter().position(|&i| i == index).map_or(1, |p| p + 1);

        Ok(vec![
            ("seq", chunk.seq.to_string()),
            ("fullName", full_name),
            ("concat", concat.to_string()),
            ("lineNumber", chunk.location.line.to_string()),
            ("references", self.render_used_by(index)?),
        ])
    }

    /// The "used by" list, honoring the configured reference style.
    fn render_used_by(&self, index: usize) -> Result<String> {
        let referrers = self.style.referrers(self.web, index);
        if referrers.is_empty() {
            return Ok(String::new());
        }

        let mut items = Vec::new();
        for referrer in referrers {
            let chunk = self.web.get(referrer);
            let seq = chunk.seq.to_string();
            let full_name = chunk.full_name().unwrap_or_default();
            items.push(substitute(
                &self.templates.ref_item_template,
                "ref_item_template",
                &[("seq", seq.as_str()), ("fullName", full_name.as_str())],
            )?);
        }

        let ref_list = items.join(", ");
        substitute(
            &self.templates.ref_template,
            "ref_template",
            &[("refList", ref_list.as_str())],
        )
    }

    fn weave_body(&mut self, index: usize) -> Result<()> {
        let chunk = self.web.get(index);
        for command in &chunk.commands {
            match command {
                Command::Text { text, .. } | Command::Code { text, .. } => {
                    self.out.push_str(text);
                }
                Command::Reference { name, .. } => {
                    let seq = self
                        .web
                        .chunks_for_name(name)
                        .first()
                        .map_or(0, |&i| self.web.get(i).seq)
                        .to_string();
                    let rendered = substitute(
                        &self.templates.refto_name_template,
                        "refto_name_template",
                        &[("fullName", name.as_str()), ("seq", seq.as_str())],
                    )?;
                    self.out.push_str(&rendered);
                }
                Command::FileXref { .. } => {
                    let items = self.web.file_xref().into_iter().collect::<Vec<_>>();
                    self.seq_xref_block(items)?;
                }
                Command::MacroXref { .. } => {
                    let items = self.web.macro_xref().into_iter().collect::<Vec<_>>();
                    self.seq_xref_block(items)?;
                }
                Command::UserIdXref { .. } => {
                    self.user_id_xref_block()?;
                }
            }
        }
        Ok(())
    }

    /// `@f`/`@m`: one item per file or macro, refList is its definition seqs.
    fn seq_xref_block(&mut self, items: Vec<(String, Vec<usize>)>) -> Result<()> {
        let mut rendered = Vec::new();
        for (full_name, seqs) in items {
            let mut links = Vec::new();
            for seq in seqs {
                let seq = seq.to_string();
                links.push(substitute(
                    &self.templates.refto_seq_template,
                    "refto_seq_template",
                    &[("seq", seq.as_str())],
                )?);
            }
            rendered.push((full_name, links.join(" ")));
        }
        self.xref_block(rendered)
    }

    /// `@u`: the defining chunk is merged into the mention list in sequence
    /// order, rendered through `name_def_template`; mentions through
    /// `name_ref_template`.
    fn user_id_xref_block(&mut self) -> Result<()> {
        let mut rendered = Vec::new();
        for (id, (def_seq, mentions)) in self.web.user_id_xref() {
            let mut seqs = mentions;
            if !seqs.contains(&def_seq) {
                seqs.push(def_seq);
            }
            seqs.sort_unstable();

            let mut links = Vec::new();
            for seq in seqs {
                let (slot_template, slot) = if seq == def_seq {
                    (&self.templates.name_def_template, "name_def_template")
                } else {
                    (&self.templates.name_ref_template, "name_ref_template")
                };
                let seq = seq.to_string();
                links.push(substitute(slot_template, slot, &[("seq", seq.as_str())])?);
            }
            rendered.push((id, links.join(" ")));
        }
        self.xref_block(rendered)
    }

    fn xref_block(&mut self, items: Vec<(String, String)>) -> Result<()> {
        let rendered = substitute(&self.templates.xref_head_template, "xref_head_template", &[])?;
        self.out.push_str(&rendered);
        for (full_name, ref_list) in items {
            let rendered = substitute(
                &self.templates.xref_item_template,
                "xref_item_template",
                &[("fullName", full_name.as_str()), ("refList", ref_list.as_str())],
            )?;
            self.out.push_str(&rendered);
        }
        let rendered = substitute(&self.templates.xref_foot_template, "xref_foot_template", &[])?;
        self.out.push_str(&rendered);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::WeftError;
    use crate::readers::{parse_web, ReaderOptions};

    fn test_set() -> TemplateSet {
        TemplateSet {
            name: "test".into(),
            extension: "txt".into(),
            cb_template: "[cb ${seq} ${fullName} ${concat}]".into(),
            ce_template: "[ce ${seq}${references}]".into(),
            fb_template: "[fb ${seq} ${fullName}]".into(),
            fe_template: "[fe ${seq}${references}]".into(),
            ref_template: " used by ${refList}".into(),
            ref_item_template: "${fullName}(${seq})".into(),
            refto_name_template: "<ref ${fullName} ${seq}>".into(),
            refto_seq_template: "#${seq}".into(),
            xref_head_template: "(xref ".into(),
            xref_foot_template: ")".into(),
            xref_item_template: "${fullName}=${refList};".into(),
            name_def_template: "[${seq}]".into(),
            name_ref_template: "${seq}".into(),
        }
    }

    fn weave(input: &str, style: ReferenceStyle) -> String {
        let web = parse_web(input, None, &ReaderOptions::default()).unwrap();
        weave_web(&web, &test_set(), style).unwrap()
    }

    #[test]
    fn test_prose_only_weaves_verbatim() {
        let input = "Just prose, no markers.\nSecond line.\n";
        assert_eq!(weave(input, ReferenceStyle::Simple), input);
    }

    #[test]
    fn test_named_and_output_chunks_are_wrapped() {
        let woven = weave(
            "intro\n@d body @{x = 1@}\n@o out.py @{@<body@>@}\n",
            ReferenceStyle::Simple,
        );
        assert_eq!(
            woven,
            "intro\n[cb 2 body 1]x = 1[ce 2 used by out.py(3)][fb 3 out.py]<ref body 2>[fe 3]"
        );
    }

    #[test]
    fn test_concat_counts_definitions_of_same_name() {
        let woven = weave(
            "@d parts @{A@}\n@d parts @{B@}\n@o out @{@<parts@>@}",
            ReferenceStyle::Simple,
        );
        assert!(woven.contains("[cb 1 parts 1]"));
        assert!(woven.contains("[cb 2 parts 2]"));
    }

    #[test]
    fn test_escaped_at_weaves_as_literal() {
        let woven = weave("mail me at user@@example.com\n", ReferenceStyle::Simple);
        assert_eq!(woven, "mail me at user@example.com\n");
    }

    #[test]
    fn test_transitive_reference_style_lists_whole_chain() {
        let input = "@d a @{A@}\n@d b @{@<a@>@}\n@o f @{@<b@>@}";

        let simple = weave(input, ReferenceStyle::Simple);
        assert!(simple.contains("[ce 1 used by b(2)]"));

        let transitive = weave(input, ReferenceStyle::Transitive);
        assert!(transitive.contains("[ce 1 used by b(2), f(3)]"));
    }

    #[test]
    fn test_file_xref_block() {
        let woven = weave("@o out @{X@}\n@d idx @{@f@}", ReferenceStyle::Simple);
        assert!(woven.contains("(xref out=#1;)"));
    }

    #[test]
    fn test_macro_xref_block() {
        let woven = weave(
            "@d alpha @{a@}\n@d alpha @{b@}\n@d idx @{@m@}",
            ReferenceStyle::Simple,
        );
        assert!(woven.contains("alpha=#1 #2;"));
        assert!(woven.contains("idx=#3;"));
    }

    #[test]
    fn test_user_id_xref_marks_definition() {
        let input = "@d decl @{int x;\n@| x @}\n@d use @{x += 1;@}\n@d idx @{@u@}";
        let woven = weave(input, ReferenceStyle::Simple);
        assert!(woven.contains("(xref x=[1] 2;)"), "got: {}", woven);
    }

    #[test]
    fn test_undefined_placeholder_in_template_is_error() {
        let web = parse_web("@d a @{x@}", None, &ReaderOptions::default()).unwrap();
        let mut set = test_set();
        set.cb_template = "${nonsense}".into();
        let err = weave_web(&web, &set, ReferenceStyle::Simple).unwrap_err();
        assert!(matches!(err, WeftError::UndefinedPlaceholder { .. }));
    }

    #[test]
    fn test_reference_style_parsing() {
        assert_eq!(
            "simple".parse::<ReferenceStyle>().unwrap(),
            ReferenceStyle::Simple
        );
        assert_eq!(
            "Transitive".parse::<ReferenceStyle>().unwrap(),
            ReferenceStyle::Transitive
        );
        assert!("updown".parse::<ReferenceStyle>().is_err());
        assert_eq!(format!("{}", ReferenceStyle::Simple), "simple");
    }
}
