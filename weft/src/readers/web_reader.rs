//! The WEB reader: a command-driven state machine over the token stream.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::{Result, WeftError};
use crate::model::{Chunk, ChunkName, Command, Web};
use crate::text_location::TextLocation;

use super::options::{parse_definition_header, parse_output_header};
use super::tokenizer::{Token, TokenKind, Tokenizer};

/// Options controlling how a WEB source is read.
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Command lead character.
    pub command: char,
    /// Markers whose missing-include failures downgrade to warnings,
    /// e.g. `["@i"]`.
    pub permit: Vec<String>,
    /// Reject unknown markers in prose instead of passing them through.
    pub strict: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            command: '@',
            permit: Vec::new(),
            strict: false,
        }
    }
}

impl ReaderOptions {
    fn permits(&self, marked: char) -> bool {
        let marker = format!("{}{}", self.command, marked);
        self.permit.iter().any(|p| p == &marker)
    }
}

/// Token cursor that tracks the current source column.
///
/// Columns are 0-based and measured in characters of the raw source, so a
/// `@<` marker's column is exactly where the reference sits on its line.
struct Cursor<'a> {
    tokens: Tokenizer<'a>,
    column: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str, command: char) -> Self {
        Self {
            tokens: Tokenizer::new(input, command),
            column: 0,
        }
    }

    /// Returns the next token and the column it starts at.
    fn next(&mut self) -> Option<(Token, usize)> {
        let token = self.tokens.next()?;
        let start = self.column;
        self.column = match &token.kind {
            TokenKind::Text(text) => self.column + text.chars().count(),
            TokenKind::Newline => 0,
            TokenKind::Marker(_) => self.column + 2,
        };
        Some((token, start))
    }
}

/// Reads WEB sources into a [`Web`], maintaining the `@i` include stack.
///
/// `@` is forbidden inside `@<...@>` reference names; `@@` does not escape
/// there, and any marker other than the closing `@>` is rejected.
pub struct WebReader<'o> {
    options: &'o ReaderOptions,
    include_stack: Vec<PathBuf>,
}

/// Parses a WEB document from a string.
///
/// `source` names the file the text came from; it anchors diagnostics and
/// resolves `@i` paths. After reading, abbreviations and references are
/// resolved and the referenced-by links populated, so the returned web is
/// ready to tangle or weave.
pub fn parse_web(input: &str, source: Option<&Path>, options: &ReaderOptions) -> Result<Web> {
    let mut web = Web::new(source.map(Path::to_path_buf));
    let mut reader = WebReader::new(options);
    if let Some(path) = source {
        reader.include_stack.push(path.to_path_buf());
    }
    reader.read_source(&mut web, input, source)?;
    web.resolve_names()?;
    web.create_used_by();
    Ok(web)
}

/// Reads and parses a WEB file.
pub fn load_web(path: &Path, options: &ReaderOptions) -> Result<Web> {
    let text = fs::read_to_string(path)?;
    parse_web(&text, Some(path), options)
}

impl<'o> WebReader<'o> {
    /// Creates a reader with the given options.
    pub fn new(options: &'o ReaderOptions) -> Self {
        Self {
            options,
            include_stack: Vec::new(),
        }
    }

    fn location(&self, file: Option<&Path>, line: usize) -> TextLocation {
        TextLocation::new(file.map(Path::to_path_buf), line)
    }

    fn read_source(&mut self, web: &mut Web, input: &str, file: Option<&Path>) -> Result<()> {
        let mut cursor = Cursor::new(input, self.options.command);
        self.read_prose(web, &mut cursor, file)
    }

    /// Prose state: accumulate text, dispatch on `@o`/`@d`/`@i`.
    fn read_prose(&mut self, web: &mut Web, cursor: &mut Cursor, file: Option<&Path>) -> Result<()> {
        let mut prose = String::new();
        let mut prose_line = 1;

        while let Some((token, _)) = cursor.next() {
            if prose.is_empty() {
                prose_line = token.line;
            }
            match token.kind {
                TokenKind::Text(text) => prose.push_str(&text),
                TokenKind::Newline => prose.push('\n'),
                TokenKind::Marker(c) if c == self.options.command => {
                    prose.push(self.options.command);
                }
                TokenKind::Marker(c @ ('o' | 'd')) => {
                    self.flush_prose(web, &mut prose, prose_line, file);
                    self.read_chunk(web, cursor, file, token.line, c == 'd')?;
                }
                TokenKind::Marker('i') => {
                    self.flush_prose(web, &mut prose, prose_line, file);
                    self.read_include(web, cursor, file, token.line)?;
                }
                TokenKind::Marker(c) => {
                    if self.options.strict {
                        return Err(WeftError::UnknownCommand {
                            location: self.location(file, token.line),
                            marker: format!("{}{}", self.options.command, c),
                        });
                    }
                    prose.push(self.options.command);
                    prose.push(c);
                }
            }
        }

        self.flush_prose(web, &mut prose, prose_line, file);
        Ok(())
    }

    /// Materializes the buffered prose as an anonymous chunk, unless it is
    /// pure whitespace.
    fn flush_prose(&self, web: &mut Web, prose: &mut String, line: usize, file: Option<&Path>) {
        if prose.chars().any(|c| !c.is_whitespace()) {
            let mut chunk = Chunk::anonymous(self.location(file, line));
            chunk.append_text(prose, line);
            web.add(chunk);
        }
        prose.clear();
    }

    /// Reads a `@d`/`@o` header up to `@{`, then the body.
    fn read_chunk(
        &mut self,
        web: &mut Web,
        cursor: &mut Cursor,
        file: Option<&Path>,
        open_line: usize,
        is_definition: bool,
    ) -> Result<()> {
        let location = self.location(file, open_line);
        let mut header = String::new();

        loop {
            let Some((token, _)) = cursor.next() else {
                return Err(WeftError::UnclosedChunk { location });
            };
            match token.kind {
                TokenKind::Text(text) => header.push_str(&text),
                TokenKind::Newline => header.push(' '),
                TokenKind::Marker(c) if c == self.options.command => {
                    header.push(self.options.command);
                }
                TokenKind::Marker('{') => break,
                TokenKind::Marker(c) => {
                    return Err(WeftError::UnknownCommand {
                        location: self.location(file, token.line),
                        marker: format!("{}{}", self.options.command, c),
                    });
                }
            }
        }

        let chunk = if is_definition {
            let parsed = parse_definition_header(&header, &location)?;
            Chunk::named(parsed.name, parsed.indent, location.clone())
        } else {
            let path = parse_output_header(&header, &location)?;
            Chunk::output(path, location.clone())
        };

        self.read_body(web, cursor, file, chunk, location)
    }

    /// Body state: accumulate code, dispatch on `@<`, `@|`, xref markers.
    fn read_body(
        &mut self,
        web: &mut Web,
        cursor: &mut Cursor,
        file: Option<&Path>,
        mut chunk: Chunk,
        open_location: TextLocation,
    ) -> Result<()> {
        let mut code = String::new();
        let mut code_line = open_location.line;

        loop {
            let Some((token, column)) = cursor.next() else {
                return Err(WeftError::UnclosedChunk {
                    location: open_location,
                });
            };
            if code.is_empty() {
                code_line = token.line;
            }
            match token.kind {
                TokenKind::Text(text) => code.push_str(&text),
                TokenKind::Newline => code.push('\n'),
                TokenKind::Marker(c) if c == self.options.command => {
                    code.push(self.options.command);
                }
                TokenKind::Marker('}') => {
                    Self::flush_code(&mut chunk, &mut code, code_line);
                    web.add(chunk);
                    return Ok(());
                }
                TokenKind::Marker('<') => {
                    Self::flush_code(&mut chunk, &mut code, code_line);
                    let name = self.read_reference_name(cursor, file, token.line)?;
                    chunk.push(Command::Reference {
                        name,
                        column,
                        location: self.location(file, token.line).at_column(column),
                    });
                }
                TokenKind::Marker('f') => {
                    Self::flush_code(&mut chunk, &mut code, code_line);
                    chunk.push(Command::FileXref { line: token.line });
                }
                TokenKind::Marker('m') => {
                    Self::flush_code(&mut chunk, &mut code, code_line);
                    chunk.push(Command::MacroXref { line: token.line });
                }
                TokenKind::Marker('u') => {
                    Self::flush_code(&mut chunk, &mut code, code_line);
                    chunk.push(Command::UserIdXref { line: token.line });
                }
                TokenKind::Marker('|') => {
                    Self::flush_code(&mut chunk, &mut code, code_line);
                    self.read_user_ids(cursor, file, &mut chunk, &open_location)?;
                    web.add(chunk);
                    return Ok(());
                }
                TokenKind::Marker('o' | 'd' | 'i') => {
                    return Err(WeftError::UnclosedChunk {
                        location: open_location,
                    });
                }
                TokenKind::Marker(c) => {
                    return Err(WeftError::UnknownCommand {
                        location: self.location(file, token.line),
                        marker: format!("{}{}", self.options.command, c),
                    });
                }
            }
        }
    }

    fn flush_code(chunk: &mut Chunk, code: &mut String, line: usize) {
        if !code.is_empty() {
            chunk.append_code(code, line);
            code.clear();
        }
    }

    /// Reads the name between `@<` and `@>`. No markers are allowed inside.
    fn read_reference_name(
        &self,
        cursor: &mut Cursor,
        file: Option<&Path>,
        open_line: usize,
    ) -> Result<ChunkName> {
        let mut raw = String::new();
        loop {
            let Some((token, _)) = cursor.next() else {
                return Err(WeftError::UnclosedChunk {
                    location: self.location(file, open_line),
                });
            };
            match token.kind {
                TokenKind::Text(text) => raw.push_str(&text),
                TokenKind::Newline => raw.push(' '),
                TokenKind::Marker('>') => return Ok(ChunkName::new(raw)),
                TokenKind::Marker(c) => {
                    return Err(WeftError::UnknownCommand {
                        location: self.location(file, token.line),
                        marker: format!("{}{}", self.options.command, c),
                    });
                }
            }
        }
    }

    /// Reads the user-identifier list between `@|` and the closing `@}`.
    fn read_user_ids(
        &self,
        cursor: &mut Cursor,
        file: Option<&Path>,
        chunk: &mut Chunk,
        open_location: &TextLocation,
    ) -> Result<()> {
        let mut ids = String::new();
        loop {
            let Some((token, _)) = cursor.next() else {
                return Err(WeftError::UnclosedChunk {
                    location: open_location.clone(),
                });
            };
            match token.kind {
                TokenKind::Text(text) => ids.push_str(&text),
                TokenKind::Newline => ids.push(' '),
                TokenKind::Marker('}') => break,
                TokenKind::Marker(c) => {
                    return Err(WeftError::UnknownCommand {
                        location: self.location(file, token.line),
                        marker: format!("{}{}", self.options.command, c),
                    });
                }
            }
        }
        chunk
            .user_ids
            .extend(ids.split_whitespace().map(String::from));
        Ok(())
    }

    /// Handles `@i path` (path runs to end of line).
    fn read_include(
        &mut self,
        web: &mut Web,
        cursor: &mut Cursor,
        file: Option<&Path>,
        open_line: usize,
    ) -> Result<()> {
        let location = self.location(file, open_line);
        let mut name = String::new();
        loop {
            match cursor.next() {
                None => break,
                Some((token, _)) => match token.kind {
                    TokenKind::Text(text) => name.push_str(&text),
                    TokenKind::Newline => break,
                    TokenKind::Marker(c) if c == self.options.command => {
                        name.push(self.options.command);
                    }
                    TokenKind::Marker(c) => {
                        return Err(WeftError::UnknownCommand {
                            location: self.location(file, token.line),
                            marker: format!("{}{}", self.options.command, c),
                        });
                    }
                },
            }
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(WeftError::MissingName { location });
        }

        // Include paths resolve relative to the including file.
        let path = match file.and_then(Path::parent) {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(name),
            _ => PathBuf::from(name),
        };

        if self.include_stack.contains(&path) {
            return Err(WeftError::RecursiveInclude { location, path });
        }

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if self.options.permits('i') {
                    tracing::warn!("{}: skipping missing include {:?}", location, path);
                    return Ok(());
                }
                return Err(WeftError::MissingInclude { location, path });
            }
            Err(e) => return Err(e.into()),
        };

        // The open file is scoped: pushed here, popped on every exit path.
        self.include_stack.push(path.clone());
        let result = self.read_source(web, &text, Some(&path));
        self.include_stack.pop();
        result
    }
}
