//! Canonical chunk names.

use std::fmt;

/// The canonical name of a named chunk.
///
/// Two spellings denote the same chunk iff their canonical forms are equal:
/// construction collapses interior whitespace runs to single spaces and trims
/// the ends. A name ending in `...` is an *abbreviation* that resolves to the
/// unique full name sharing its prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkName(String);

impl ChunkName {
    /// Creates a canonical name from a raw spelling.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let canonical = raw
            .as_ref()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        Self(canonical)
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if this spelling is an abbreviation (ends in `...`).
    pub fn is_abbreviated(&self) -> bool {
        self.0.ends_with("...")
    }

    /// The prefix an abbreviation must match, with the dots stripped.
    ///
    /// For a full name this is the whole name.
    pub fn prefix(&self) -> &str {
        self.0.strip_suffix("...").unwrap_or(&self.0).trim_end()
    }

    /// True if this abbreviation could denote `full`.
    pub fn abbreviates(&self, full: &ChunkName) -> bool {
        self.is_abbreviated() && full.as_str().starts_with(self.prefix())
    }
}

impl fmt::Display for ChunkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChunkName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for ChunkName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_normalization() {
        assert_eq!(ChunkName::new("foo bar"), ChunkName::new("  foo    bar "));
        assert_eq!(ChunkName::new(" a\tb ").as_str(), "a b");
    }

    #[test]
    fn test_abbreviation() {
        let abbrev = ChunkName::new("long chunk...");
        assert!(abbrev.is_abbreviated());
        assert_eq!(abbrev.prefix(), "long chunk");

        let full = ChunkName::new("long chunk name");
        assert!(abbrev.abbreviates(&full));
        assert!(!abbrev.abbreviates(&ChunkName::new("other name")));
    }

    #[test]
    fn test_full_name_is_not_abbreviation() {
        let full = ChunkName::new("plain name");
        assert!(!full.is_abbreviated());
        assert_eq!(full.prefix(), "plain name");
        assert!(!full.abbreviates(&ChunkName::new("plain name extended")));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ChunkName::new("weave  overheads...")), "weave overheads...");
    }
}
