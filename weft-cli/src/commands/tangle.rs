//! Tangle command implementation.

use std::path::PathBuf;

use weft::errors::Result;
use weft::interface::{actions, Context};

/// Options for the tangle command.
#[derive(Debug, Clone, Default)]
pub struct TangleOptions {
    /// WEB source file.
    pub file: PathBuf,
    /// Suppress normal output.
    pub quiet: bool,
}

/// Executes the tangle command: Load then Tangle.
pub fn tangle(ctx: &Context, options: TangleOptions) -> Result<()> {
    let (web, load_summary) = actions::load(ctx, &options.file)?;
    let tangle_summary = actions::tangle(ctx, &web)?;

    if !options.quiet {
        println!("{}", load_summary);
        println!("{}", tangle_summary);
    }
    Ok(())
}
