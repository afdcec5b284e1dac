//! The action driver surface: Context plus Load/Tangle/Weave.

pub mod actions;
mod context;

pub use context::Context;
