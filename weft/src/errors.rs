//! Error types for the weft system.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::ChunkName;
use crate::text_location::TextLocation;

/// Main error type for weft operations.
///
/// Every diagnostic class from parsing, name resolution, tangling and
/// weaving has its own variant; variants that point at the input carry a
/// [`TextLocation`].
#[derive(Error, Debug)]
pub enum WeftError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("{location}: unknown command {marker:?}")]
    UnknownCommand {
        location: TextLocation,
        marker: String,
    },

    #[error("{location}: chunk opened here is never closed")]
    UnclosedChunk { location: TextLocation },

    #[error("{location}: missing name after command")]
    MissingName { location: TextLocation },

    #[error("{location}: unknown option {option:?}")]
    UnknownOption {
        location: TextLocation,
        option: String,
    },

    #[error("{location}: duplicate option {option:?}")]
    DuplicateOption {
        location: TextLocation,
        option: String,
    },

    #[error("{location}: cannot include {path:?}: file not found")]
    MissingInclude {
        location: TextLocation,
        path: PathBuf,
    },

    #[error("{location}: include of {path:?} is recursive")]
    RecursiveInclude {
        location: TextLocation,
        path: PathBuf,
    },

    #[error("{location}: cannot resolve '{name}': no such chunk")]
    UndefinedReference {
        location: TextLocation,
        name: ChunkName,
    },

    #[error("{location}: abbreviation '{name}' is ambiguous: matches {}", .candidates.join(", "))]
    AmbiguousAbbreviation {
        location: TextLocation,
        name: ChunkName,
        candidates: Vec<String>,
    },

    #[error("cycle detected in chunk references: {}", format_cycle(.0))]
    CycleDetected(Vec<ChunkName>),

    #[error("{location}: cross-reference markers cannot appear in tangled output")]
    XrefInTangle { location: TextLocation },

    #[error("template {template:?} uses undefined placeholder ${{{placeholder}}}")]
    UndefinedPlaceholder {
        template: String,
        placeholder: String,
    },

    #[error("{}", join_errors(.0))]
    Multiple(Vec<WeftError>),
}

impl WeftError {
    /// Process exit code for this error class.
    pub fn exit_code(&self) -> u8 {
        match self {
            WeftError::Io(_) => 2,
            _ => 1,
        }
    }

    /// Wraps a list of errors, unwrapping the trivial cases.
    ///
    /// Returns `Ok(())` for an empty list and the error itself for a
    /// singleton, so callers can collect freely.
    pub fn from_list(mut errors: Vec<WeftError>) -> Result<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(WeftError::Multiple(errors)),
        }
    }
}

fn format_cycle(names: &[ChunkName]) -> String {
    names
        .iter()
        .map(|n| n.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn join_errors(errors: &[WeftError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result type alias for weft operations.
pub type Result<T> = std::result::Result<T, WeftError>;
