//! Splitter tokenizer for WEB sources.

use regex::Regex;

/// What a token is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A two-character command marker; carries the character after the lead.
    Marker(char),
    /// A line break. Emitted separately so `@i path` can end at the line.
    Newline,
    /// An opaque run of text between markers (never contains a newline).
    Text(String),
}

/// One token with the line it starts on (1-indexed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

/// Lazy, non-restartable token stream over a WEB source.
///
/// The stream is produced by applying the pattern `@.|\n` (with the lead
/// character configurable) and yielding the matches and the between-match
/// fragments in order. Unknown markers pass through; classifying them is the
/// reader's job. A lone lead character at end of input falls out as text.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    pattern: Regex,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer with the given command lead character.
    pub fn new(input: &'a str, command: char) -> Self {
        let pattern = Regex::new(&format!("{}.|\n", regex::escape(&command.to_string())))
            .expect("splitter pattern is well-formed for any escaped lead");
        Self {
            input,
            pos: 0,
            line: 1,
            pattern,
        }
    }

    /// The line the next token will start on.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.pos >= self.input.len() {
            return None;
        }
        let rest = &self.input[self.pos..];
        let line = self.line;

        match self.pattern.find(rest) {
            Some(m) if m.start() == 0 => {
                self.pos += m.end();
                if m.as_str() == "\n" {
                    self.line += 1;
                    Some(Token {
                        kind: TokenKind::Newline,
                        line,
                    })
                } else {
                    let marked = m.as_str().chars().nth(1).expect("marker is two characters");
                    Some(Token {
                        kind: TokenKind::Marker(marked),
                        line,
                    })
                }
            }
            Some(m) => {
                let text = &rest[..m.start()];
                self.pos += m.start();
                Some(Token {
                    kind: TokenKind::Text(text.to_string()),
                    line,
                })
            }
            None => {
                self.pos = self.input.len();
                Some(Token {
                    kind: TokenKind::Text(rest.to_string()),
                    line,
                })
            }
        }
    }
}
