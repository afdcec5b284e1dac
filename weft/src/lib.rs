//! Weft - Literate Programming Engine
//!
//! This library implements the core of the weft literate programming system.
//! A single WEB source document interleaves prose and code; weft produces two
//! artifacts from it: a *woven* document (typeset prose with cross-referenced
//! code blocks) and any number of *tangled* source files (code assembled from
//! named chunks in dependency order, with contextual indentation).
//!
//! # Features
//!
//! - **Tangle**: expand `@o` output chunks, following `@<name@>` references
//! - **Weave**: render the document through a pluggable template set
//! - **Includes**: `@i file` splices another WEB file into the input
//! - **Cross references**: `@f`/`@m`/`@u` index files, macros and identifiers
//!
//! # Example
//!
//! ```no_run
//! use weft::interface::{actions, Context};
//! use std::path::Path;
//!
//! let ctx = Context::from_dir(std::env::current_dir().unwrap()).unwrap();
//! let (web, summary) = actions::load(&ctx, Path::new("doc.w")).unwrap();
//! println!("{}", summary);
//! let summary = actions::tangle(&ctx, &web).unwrap();
//! println!("{}", summary);
//! ```

pub mod config;
pub mod errors;
pub mod interface;
pub mod io;
pub mod model;
pub mod readers;
pub mod tangle;
pub mod text_location;
pub mod weave;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use errors::{Result, WeftError};
pub use interface::Context;
pub use model::{Chunk, ChunkKind, ChunkName, Command, Web};
pub use weave::{ReferenceStyle, TemplateSet};
