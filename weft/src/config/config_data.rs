//! Configuration data structures.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::readers::ReaderOptions;
use crate::tangle::TangleOptions;
use crate::weave::ReferenceStyle;

/// Main configuration for weft.
///
/// Loaded from `weft.toml` when present; every field has a default so the
/// file is optional, and the CLI overrides individual fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Command lead character (a one-character string).
    #[serde(default = "default_command")]
    pub command: String,

    /// Directory tangled and woven files are written to.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Template set: a built-in name (`rst`, `html`, `latex`) or a path to a
    /// TOML template file.
    #[serde(default = "default_templates")]
    pub templates: String,

    /// How "used by" lists are computed when weaving.
    #[serde(default)]
    pub reference_style: ReferenceStyle,

    /// Markers whose missing includes are warnings, e.g. `["@i"]`.
    #[serde(default)]
    pub permit: Vec<String>,

    /// Reject unknown markers in prose.
    #[serde(default)]
    pub strict: bool,

    /// Source line-comment template for tangled files, e.g.
    /// `# line ${line} "${file}"`. Off when absent.
    #[serde(default)]
    pub line_comment: Option<String>,
}

fn default_command() -> String {
    "@".to_string()
}

fn default_templates() -> String {
    "rst".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command: default_command(),
            output_dir: None,
            templates: default_templates(),
            reference_style: ReferenceStyle::default(),
            permit: Vec::new(),
            strict: false,
            line_comment: None,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The command lead character.
    pub fn command_char(&self) -> char {
        self.command.chars().next().unwrap_or('@')
    }

    /// The output directory, if configured.
    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Reader options derived from this configuration.
    pub fn reader_options(&self) -> ReaderOptions {
        ReaderOptions {
            command: self.command_char(),
            permit: self.permit.clone(),
            strict: self.strict,
        }
    }

    /// Tangle options derived from this configuration.
    pub fn tangle_options(&self) -> TangleOptions {
        TangleOptions {
            line_comment: self.line_comment.clone(),
        }
    }
}
