//! CLI command implementations.

pub mod build;
pub mod tangle;
pub mod weave;

pub use build::{build, BuildOptions};
pub use tangle::{tangle, TangleOptions};
pub use weave::{weave, WeaveOptions};
