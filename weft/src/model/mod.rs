//! Core model types for weft.

mod chunk;
mod chunk_name;
mod command;
mod web;

pub use chunk::{Chunk, ChunkKind, IndentRule};
pub use chunk_name::ChunkName;
pub use command::Command;
pub use web::Web;
