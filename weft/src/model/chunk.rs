//! Chunks: contiguous slices of the WEB document.

use std::path::{Path, PathBuf};

use crate::text_location::TextLocation;

use super::chunk_name::ChunkName;
use super::command::Command;

/// Whether a chunk honors ambient indentation when expanded by reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndentRule {
    /// Continuation lines inherit the reference site's column (default).
    #[default]
    Indent,
    /// The body is emitted at column 0 regardless of the reference site.
    NoIndent,
}

/// The three chunk variants of a WEB document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkKind {
    /// Prose between code chunks; woven verbatim, never tangled.
    Anonymous,
    /// A `@d name` macro definition.
    Named { name: ChunkName, indent: IndentRule },
    /// An `@o path` output-file definition.
    Output { path: PathBuf },
}

/// A contiguous slice of the document: some prose, or one `@d`/`@o` body.
///
/// Chunks are created by the reader and immutable afterwards, except for
/// `referenced_by`, which [`super::Web::create_used_by`] fills in once after
/// parsing completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub kind: ChunkKind,
    /// Position in the web (1-based); assigned by [`super::Web::add`].
    pub seq: usize,
    /// Location of the opening command.
    pub location: TextLocation,
    pub commands: Vec<Command>,
    /// User identifiers declared with `@|` before the closing `@}`.
    pub user_ids: Vec<String>,
    /// Indices of chunks that reference this one, in discovery order.
    pub referenced_by: Vec<usize>,
}

impl Chunk {
    fn with_kind(kind: ChunkKind, location: TextLocation) -> Self {
        Self {
            kind,
            seq: 0,
            location,
            commands: Vec::new(),
            user_ids: Vec::new(),
            referenced_by: Vec::new(),
        }
    }

    /// Creates an anonymous prose chunk.
    pub fn anonymous(location: TextLocation) -> Self {
        Self::with_kind(ChunkKind::Anonymous, location)
    }

    /// Creates a named (`@d`) chunk.
    pub fn named(name: ChunkName, indent: IndentRule, location: TextLocation) -> Self {
        Self::with_kind(ChunkKind::Named { name, indent }, location)
    }

    /// Creates an output (`@o`) chunk.
    pub fn output(path: impl Into<PathBuf>, location: TextLocation) -> Self {
        Self::with_kind(ChunkKind::Output { path: path.into() }, location)
    }

    /// The canonical name, for named chunks.
    pub fn name(&self) -> Option<&ChunkName> {
        match &self.kind {
            ChunkKind::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The output file path, for output chunks.
    pub fn output_path(&self) -> Option<&Path> {
        match &self.kind {
            ChunkKind::Output { path } => Some(path),
            _ => None,
        }
    }

    /// The display name: chunk name or output path.
    pub fn full_name(&self) -> Option<String> {
        match &self.kind {
            ChunkKind::Anonymous => None,
            ChunkKind::Named { name, .. } => Some(name.to_string()),
            ChunkKind::Output { path } => Some(path.display().to_string()),
        }
    }

    /// The indentation rule in effect when this chunk is expanded.
    pub fn indent_rule(&self) -> IndentRule {
        match &self.kind {
            ChunkKind::Named { indent, .. } => *indent,
            _ => IndentRule::Indent,
        }
    }

    /// True for `@d` and `@o` chunks (everything that can be tangled).
    pub fn is_code(&self) -> bool {
        !matches!(self.kind, ChunkKind::Anonymous)
    }

    /// Appends a command.
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Appends prose text, merging into a trailing `Text` command.
    pub fn append_text(&mut self, text: &str, line: usize) {
        if let Some(Command::Text { text: existing, .. }) = self.commands.last_mut() {
            existing.push_str(text);
            return;
        }
        self.commands.push(Command::Text {
            text: text.to_string(),
            line,
        });
    }

    /// Appends code text, merging into a trailing `Code` command.
    pub fn append_code(&mut self, text: &str, line: usize) {
        if let Some(Command::Code { text: existing, .. }) = self.commands.last_mut() {
            existing.push_str(text);
            return;
        }
        self.commands.push(Command::Code {
            text: text.to_string(),
            line,
        });
    }

    /// Iterates over the names this chunk references.
    pub fn references(&self) -> impl Iterator<Item = &ChunkName> {
        self.commands.iter().filter_map(|c| c.reference_name())
    }

    /// True if any `Code` command mentions `pattern` (a compiled word search).
    pub fn mentions(&self, pattern: &regex::Regex) -> bool {
        self.commands.iter().any(|c| match c {
            Command::Code { text, .. } => pattern.is_match(text),
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_text_merges() {
        let mut chunk = Chunk::anonymous(TextLocation::line(1));
        chunk.append_text("hi mom", 1);
        chunk.append_text(" & more text", 1);
        assert_eq!(chunk.commands.len(), 1);
        assert_eq!(chunk.commands[0].text(), Some("hi mom & more text"));
    }

    #[test]
    fn test_append_after_reference_starts_new_command() {
        let mut chunk = Chunk::named(ChunkName::new("main"), IndentRule::Indent, TextLocation::line(1));
        chunk.append_code("before ", 1);
        chunk.push(Command::Reference {
            name: ChunkName::new("body"),
            column: 7,
            location: TextLocation::line(1),
        });
        chunk.append_code(" after", 1);
        assert_eq!(chunk.commands.len(), 3);
    }

    #[test]
    fn test_full_name() {
        let named = Chunk::named(ChunkName::new("overheads"), IndentRule::Indent, TextLocation::line(1));
        assert_eq!(named.full_name().as_deref(), Some("overheads"));

        let output = Chunk::output("src/main.rs", TextLocation::line(1));
        assert_eq!(output.full_name().as_deref(), Some("src/main.rs"));

        assert_eq!(Chunk::anonymous(TextLocation::line(1)).full_name(), None);
    }

    #[test]
    fn test_indent_rule() {
        let noindent = Chunk::named(ChunkName::new("raw"), IndentRule::NoIndent, TextLocation::line(1));
        assert_eq!(noindent.indent_rule(), IndentRule::NoIndent);
        assert_eq!(
            Chunk::output("a.txt", TextLocation::line(1)).indent_rule(),
            IndentRule::Indent
        );
    }

    #[test]
    fn test_mentions() {
        let mut chunk = Chunk::named(ChunkName::new("decls"), IndentRule::Indent, TextLocation::line(1));
        chunk.append_code("int counter = 0;", 2);
        let pat = regex::Regex::new(r"\bcounter\b").unwrap();
        assert!(chunk.mentions(&pat));
        let other = regex::Regex::new(r"\bcount\b").unwrap();
        assert!(!chunk.mentions(&other));
    }
}
