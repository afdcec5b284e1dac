//! Build command: tangle and weave against one loaded web.

use std::path::PathBuf;

use weft::errors::Result;
use weft::interface::{actions, Context};

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// WEB source file.
    pub file: PathBuf,
    /// Suppress normal output.
    pub quiet: bool,
}

/// Executes the build command: Load, Tangle, Weave.
///
/// The web is loaded once and shared; tangle and weave are both read-only
/// against it.
pub fn build(ctx: &Context, options: BuildOptions) -> Result<()> {
    let (web, load_summary) = actions::load(ctx, &options.file)?;
    let tangle_summary = actions::tangle(ctx, &web)?;
    let weave_summary = actions::weave(ctx, &web)?;

    if !options.quiet {
        println!("{}", load_summary);
        println!("{}", tangle_summary);
        println!("{}", weave_summary);
    }
    Ok(())
}
