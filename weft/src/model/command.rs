//! Commands: the atoms inside a chunk.

use crate::text_location::TextLocation;

use super::chunk_name::ChunkName;

/// One atom of a chunk's content.
///
/// Commands never nest; a chunk's command list is flat. `Text` appears in
/// anonymous (prose) chunks, `Code` inside `@d`/`@o` bodies. The escape
/// marker `@@` is already rewritten to a literal lead character by the
/// reader, so `text` holds exactly what should be emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Prose text between markers.
    Text { text: String, line: usize },

    /// Literal code inside a `@{ ... @}` body.
    Code { text: String, line: usize },

    /// A `@<name@>` reference to a named chunk.
    ///
    /// `column` is the 0-based source column of the `@<` marker; continuation
    /// lines of the expansion are indented to it at tangle time.
    Reference {
        name: ChunkName,
        column: usize,
        location: TextLocation,
    },

    /// `@f`: placeholder for the output-file cross reference.
    FileXref { line: usize },

    /// `@m`: placeholder for the named-chunk cross reference.
    MacroXref { line: usize },

    /// `@u`: placeholder for the user-identifier cross reference.
    UserIdXref { line: usize },
}

impl Command {
    /// Source line the command starts on.
    pub fn line(&self) -> usize {
        match self {
            Command::Text { line, .. }
            | Command::Code { line, .. }
            | Command::FileXref { line }
            | Command::MacroXref { line }
            | Command::UserIdXref { line } => *line,
            Command::Reference { location, .. } => location.line,
        }
    }

    /// The literal text carried by a `Text` or `Code` command.
    pub fn text(&self) -> Option<&str> {
        match self {
            Command::Text { text, .. } | Command::Code { text, .. } => Some(text),
            _ => None,
        }
    }

    /// The target name of a `Reference` command.
    pub fn reference_name(&self) -> Option<&ChunkName> {
        match self {
            Command::Reference { name, .. } => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_accessor() {
        let text = Command::Text {
            text: "hello".into(),
            line: 4,
        };
        assert_eq!(text.line(), 4);

        let reference = Command::Reference {
            name: ChunkName::new("body"),
            column: 8,
            location: TextLocation::line(9),
        };
        assert_eq!(reference.line(), 9);
    }

    #[test]
    fn test_text_accessor() {
        let code = Command::Code {
            text: "x = 1".into(),
            line: 2,
        };
        assert_eq!(code.text(), Some("x = 1"));
        assert_eq!(Command::FileXref { line: 1 }.text(), None);
    }
}
