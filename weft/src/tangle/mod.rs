//! Tangling: expanding output chunks into source files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::errors::{Result, WeftError};
use crate::io::update_file;
use crate::model::{Chunk, ChunkName, Command, IndentRule, Web};
use crate::text_location::TextLocation;
use crate::weave::template::substitute;

/// Options for a tangle run.
#[derive(Debug, Clone, Default)]
pub struct TangleOptions {
    /// Comment template emitted at each chunk boundary, e.g.
    /// `# line ${line} "${file}"`. `None` disables source line comments.
    pub line_comment: Option<String>,
}

/// What a tangle run did, per output file.
#[derive(Debug, Clone, Default)]
pub struct TangleSummary {
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
}

impl TangleSummary {
    /// One-line human-readable summary.
    pub fn describe(&self) -> String {
        format!(
            "tangled {} file(s): {} written, {} unchanged",
            self.written.len() + self.unchanged.len(),
            self.written.len(),
            self.unchanged.len()
        )
    }
}

/// Cycle detector for reference expansion.
#[derive(Debug, Clone, Default)]
pub struct CycleDetector {
    /// Names currently being expanded, for error reporting.
    stack: Vec<ChunkName>,
    /// Set for O(1) membership checks.
    seen: HashSet<ChunkName>,
}

impl CycleDetector {
    /// Creates a new cycle detector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a name, failing if that would close a cycle.
    pub fn enter(&mut self, name: &ChunkName) -> Result<()> {
        if self.seen.contains(name) {
            let mut cycle = self.stack.clone();
            cycle.push(name.clone());
            return Err(WeftError::CycleDetected(cycle));
        }
        self.seen.insert(name.clone());
        self.stack.push(name.clone());
        Ok(())
    }

    /// Leaves the most recently entered name.
    pub fn exit(&mut self) {
        if let Some(name) = self.stack.pop() {
            self.seen.remove(&name);
        }
    }

    /// Current expansion depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Emitter that applies contextual indentation.
///
/// The stack holds absolute indents; the top is in effect. `add_indent`
/// pushes relative to the top (nested references accumulate), `set_indent`
/// pushes an absolute column for `-noindent` chunks.
struct Tangler {
    out: String,
    indents: Vec<usize>,
    at_line_start: bool,
}

impl Tangler {
    fn new() -> Self {
        Self {
            out: String::new(),
            indents: vec![0],
            at_line_start: true,
        }
    }

    fn current_indent(&self) -> usize {
        *self.indents.last().unwrap_or(&0)
    }

    fn add_indent(&mut self, by: usize) {
        self.indents.push(self.current_indent() + by);
    }

    fn set_indent(&mut self, column: usize) {
        // A `-noindent` body starts at column 0 even when the reference sits
        // after indentation already emitted on the current line.
        if !self.at_line_start {
            let line_start = self.out.rfind('\n').map_or(0, |i| i + 1);
            if self.out[line_start..].chars().all(|c| c == ' ' || c == '\t') {
                self.out.truncate(line_start);
                self.at_line_start = true;
            }
        }
        self.indents.push(column);
    }

    fn clr_indent(&mut self) {
        self.indents.pop();
    }

    /// Writes text, prefixing the current indent after each line break.
    /// Blank lines stay blank.
    fn code_block(&mut self, text: &str) {
        for piece in text.split_inclusive('\n') {
            if self.at_line_start && piece != "\n" {
                for _ in 0..self.current_indent() {
                    self.out.push(' ');
                }
            }
            self.out.push_str(piece);
            self.at_line_start = piece.ends_with('\n');
        }
    }

    fn into_string(self) -> String {
        self.out
    }
}

/// Produces the tangled content of one output file.
pub fn tangle_output(web: &Web, path: &Path, options: &TangleOptions) -> Result<String> {
    let indices = web
        .output_index()
        .get(path)
        .ok_or_else(|| WeftError::Config(format!("no output chunk for {}", path.display())))?;

    let mut tangler = Tangler::new();
    let mut detector = CycleDetector::new();

    for &index in indices {
        emit_chunk(web, web.get(index), &mut tangler, &mut detector, options)?;
    }

    Ok(tangler.into_string())
}

/// Tangles every output file of the web into `output_dir`.
///
/// Files whose bytes would not change are left untouched.
pub fn tangle_web(web: &Web, output_dir: &Path, options: &TangleOptions) -> Result<TangleSummary> {
    let mut summary = TangleSummary::default();

    if web.output_index().is_empty() {
        tracing::warn!("web defines no output files; nothing to tangle");
        return Ok(summary);
    }

    for path in web.output_index().keys() {
        let content = tangle_output(web, path, options)?;
        let target = output_dir.join(path);
        if update_file(&target, &content)? {
            tracing::info!("wrote {}", target.display());
            summary.written.push(target);
        } else {
            tracing::debug!("unchanged {}", target.display());
            summary.unchanged.push(target);
        }
    }

    Ok(summary)
}

/// Emits one chunk's commands, expanding references.
fn emit_chunk(
    web: &Web,
    chunk: &Chunk,
    tangler: &mut Tangler,
    detector: &mut CycleDetector,
    options: &TangleOptions,
) -> Result<()> {
    emit_line_comment(chunk, tangler, options)?;

    for command in &chunk.commands {
        match command {
            Command::Text { text, .. } | Command::Code { text, .. } => tangler.code_block(text),
            Command::Reference {
                name,
                column,
                location,
            } => expand_reference(web, name, *column, location, tangler, detector, options)?,
            Command::FileXref { line }
            | Command::MacroXref { line }
            | Command::UserIdXref { line } => {
                return Err(WeftError::XrefInTangle {
                    location: TextLocation::new(chunk.location.file.clone(), *line),
                });
            }
        }
    }
    Ok(())
}

/// Expands a reference: every definition of the name, in source order, each
/// under the indent rule that chunk carries.
fn expand_reference(
    web: &Web,
    name: &ChunkName,
    column: usize,
    location: &TextLocation,
    tangler: &mut Tangler,
    detector: &mut CycleDetector,
    options: &TangleOptions,
) -> Result<()> {
    detector.enter(name)?;

    let indices = web.chunks_for_name(name);
    if indices.is_empty() {
        // Resolution catches this at load time; re-checked for webs
        // assembled by hand.
        return Err(WeftError::UndefinedReference {
            location: location.clone(),
            name: name.clone(),
        });
    }

    for &index in indices {
        let chunk = web.get(index);
        match chunk.indent_rule() {
            IndentRule::Indent => tangler.add_indent(column),
            IndentRule::NoIndent => tangler.set_indent(0),
        }
        emit_chunk(web, chunk, tangler, detector, options)?;
        tangler.clr_indent();
    }

    detector.exit();
    Ok(())
}

/// Writes the source line comment for a chunk, if configured.
fn emit_line_comment(chunk: &Chunk, tangler: &mut Tangler, options: &TangleOptions) -> Result<()> {
    let Some(template) = &options.line_comment else {
        return Ok(());
    };
    if !chunk.is_code() {
        return Ok(());
    }

    let file = chunk
        .location
        .file
        .as_ref()
        .map_or_else(String::new, |p| p.display().to_string());
    let line = chunk.location.line.to_string();
    let comment = substitute(
        template,
        "line_comment",
        &[("file", file.as_str()), ("line", line.as_str())],
    )?;

    if !tangler.at_line_start {
        tangler.code_block("\n");
    }
    tangler.code_block(&comment);
    tangler.code_block("\n");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::{parse_web, ReaderOptions};
    use std::fs;
    use tempfile::tempdir;

    fn web_from(input: &str) -> Web {
        parse_web(input, None, &ReaderOptions::default()).unwrap()
    }

    fn tangled(input: &str, file: &str) -> String {
        let web = web_from(input);
        tangle_output(&web, Path::new(file), &TangleOptions::default()).unwrap()
    }

    #[test]
    fn test_minimal_tangle() {
        assert_eq!(tangled("@o out.txt @{hello@}", "out.txt"), "hello");
    }

    #[test]
    fn test_reference_expansion_with_indentation() {
        let input = "@o out.py @{def f():\n    @<body@>\n@}\n@d body @{x = 1\ny = 2@}";
        assert_eq!(tangled(input, "out.py"), "def f():\n    x = 1\n    y = 2\n");
    }

    #[test]
    fn test_multi_definition_concatenation() {
        let input = "@d parts @{A@}\n@d parts @{B@}\n@o out @{@<parts@>@}";
        assert_eq!(tangled(input, "out"), "AB");
    }

    #[test]
    fn test_noindent_override() {
        let input = "@o out @{    @<raw@>@}\n@d raw -noindent @{line1\nline2@}";
        assert_eq!(tangled(input, "out"), "line1\nline2");
    }

    #[test]
    fn test_nested_references_accumulate_indent() {
        let input = concat!(
            "@o out @{if a:\n  @<inner@>\n@}\n",
            "@d inner @{for x in y:\n  @<deep@>\n@}\n",
            "@d deep @{emit(x)@}",
        );
        assert_eq!(
            tangled(input, "out"),
            "if a:\n  for x in y:\n    emit(x)\n\n"
        );
    }

    #[test]
    fn test_blank_lines_carry_no_indent() {
        let input = "@o out @{  @<body@>\n@}\n@d body @{a\n\nb@}";
        assert_eq!(tangled(input, "out"), "  a\n\n  b\n");
    }

    #[test]
    fn test_empty_body_tangles_to_empty_file() {
        assert_eq!(tangled("@o .nojekyll @{@}", ".nojekyll"), "");
    }

    #[test]
    fn test_cycle_detection_reports_path() {
        let input = concat!(
            "@o out @{@<a@>@}\n",
            "@d a @{@<b@>@}\n",
            "@d b @{@<a@>@}",
        );
        let web = web_from(input);
        let err = tangle_output(&web, Path::new("out"), &TangleOptions::default()).unwrap_err();
        let WeftError::CycleDetected(cycle) = err else {
            panic!("expected cycle error");
        };
        assert_eq!(cycle.first(), Some(&ChunkName::new("a")));
        assert_eq!(cycle.last(), Some(&ChunkName::new("a")));
    }

    #[test]
    fn test_diamond_reference_is_not_a_cycle() {
        // The same chunk expanded twice along different paths is fine.
        let input = concat!(
            "@o out @{@<left@>@<right@>@}\n",
            "@d left @{L@<shared@>@}\n",
            "@d right @{R@<shared@>@}\n",
            "@d shared @{S@}",
        );
        assert_eq!(tangled(input, "out"), "LSRS");
    }

    #[test]
    fn test_xref_marker_in_tangled_chunk_is_error() {
        let input = "@o out @{@f@}";
        let web = web_from(input);
        let err = tangle_output(&web, Path::new("out"), &TangleOptions::default()).unwrap_err();
        assert!(matches!(err, WeftError::XrefInTangle { .. }));
    }

    #[test]
    fn test_line_comment_template() {
        let input = "@o out.py @{x = 1\n@<more@>\n@}\n@d more @{y = 2@}";
        let web = web_from(input);
        let options = TangleOptions {
            line_comment: Some("# line ${line} \"${file}\"".to_string()),
        };
        let content = tangle_output(&web, Path::new("out.py"), &options).unwrap();
        assert!(content.starts_with("# line 1 \"\"\n"));
        assert!(content.contains("# line 4"));
        assert!(content.contains("y = 2"));
    }

    #[test]
    fn test_tangle_web_writes_files() {
        let dir = tempdir().unwrap();
        let web = web_from("@o a.txt @{A@}\n@o b.txt @{B@}");

        let summary = tangle_web(&web, dir.path(), &TangleOptions::default()).unwrap();
        assert_eq!(summary.written.len(), 2);
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "A");
        assert_eq!(fs::read_to_string(dir.path().join("b.txt")).unwrap(), "B");
    }

    #[test]
    fn test_tangle_is_deterministic_and_idempotent() {
        let dir = tempdir().unwrap();
        let web = web_from("@o out.txt @{stable@}");

        let first = tangle_web(&web, dir.path(), &TangleOptions::default()).unwrap();
        assert_eq!(first.written.len(), 1);

        let second = tangle_web(&web, dir.path(), &TangleOptions::default()).unwrap();
        assert!(second.written.is_empty());
        assert_eq!(second.unchanged.len(), 1);
    }

    #[test]
    fn test_prose_only_web_tangles_nothing() {
        let dir = tempdir().unwrap();
        let web = web_from("Only prose here.\n");

        let summary = tangle_web(&web, dir.path(), &TangleOptions::default()).unwrap();
        assert!(summary.written.is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_cycle_detector_unit() {
        let mut detector = CycleDetector::new();
        detector.enter(&ChunkName::new("a")).unwrap();
        detector.enter(&ChunkName::new("b")).unwrap();
        assert_eq!(detector.depth(), 2);

        assert!(detector.enter(&ChunkName::new("a")).is_err());

        detector.exit();
        detector.exit();
        assert_eq!(detector.depth(), 0);

        // A name may be re-entered once left.
        detector.enter(&ChunkName::new("a")).unwrap();
    }
}
