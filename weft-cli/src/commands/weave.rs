//! Weave command implementation.

use std::path::PathBuf;

use weft::errors::Result;
use weft::interface::{actions, Context};

/// Options for the weave command.
#[derive(Debug, Clone, Default)]
pub struct WeaveOptions {
    /// WEB source file.
    pub file: PathBuf,
    /// Suppress normal output.
    pub quiet: bool,
}

/// Executes the weave command: Load then Weave.
pub fn weave(ctx: &Context, options: WeaveOptions) -> Result<()> {
    let (web, load_summary) = actions::load(ctx, &options.file)?;
    let weave_summary = actions::weave(ctx, &web)?;

    if !options.quiet {
        println!("{}", load_summary);
        println!("{}", weave_summary);
    }
    Ok(())
}
