//! Execution context for weft operations.

use std::path::{Path, PathBuf};

use crate::config::{read_config, Config};
use crate::errors::Result;

/// Context shared by all actions: the configuration and the directory
/// paths are resolved against.
#[derive(Debug, Clone)]
pub struct Context {
    /// Configuration.
    pub config: Config,
    /// Base directory for relative paths.
    pub base_dir: PathBuf,
}

impl Context {
    /// Creates a context with the given configuration.
    pub fn new(config: Config, base_dir: PathBuf) -> Self {
        Self { config, base_dir }
    }

    /// Creates a context for a directory, discovering `weft.toml` upward
    /// from it.
    pub fn from_dir(base_dir: PathBuf) -> Result<Self> {
        let config = read_config(&base_dir)?;
        Ok(Self::new(config, base_dir))
    }

    /// Resolves a path relative to the base directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// The directory output files are written to.
    pub fn output_dir(&self) -> PathBuf {
        match self.config.output_dir() {
            Some(dir) => self.resolve_path(dir),
            None => self.base_dir.clone(),
        }
    }
}
