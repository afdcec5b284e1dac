//! Source locations for diagnostics.

use std::fmt;
use std::path::PathBuf;

/// A position within a WEB source file.
///
/// The file is optional so that webs parsed from strings (tests, stdin)
/// still produce usable diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TextLocation {
    /// The file the position refers to, if known.
    pub file: Option<PathBuf>,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (0-indexed; 0 also means "whole line").
    pub column: usize,
}

impl TextLocation {
    /// Creates a location from an optional file and a line.
    pub fn new(file: Option<PathBuf>, line: usize) -> Self {
        Self {
            file,
            line,
            column: 0,
        }
    }

    /// Creates a line-only location with no file.
    pub fn line(line: usize) -> Self {
        Self::new(None, line)
    }

    /// Attaches a column to this location.
    pub fn at_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }
}

impl fmt::Display for TextLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(path) => write!(f, "{}:{}", path.display(), self.line)?,
            None => write!(f, "line {}", self.line)?,
        }
        if self.column > 0 {
            write!(f, ":{}", self.column)?;
        }
        Ok(())
    }
}
