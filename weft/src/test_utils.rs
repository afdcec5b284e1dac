//! Shared test utilities.

use crate::model::{Chunk, ChunkName, Command, IndentRule};
use crate::text_location::TextLocation;

/// Creates a named chunk with a single code command.
pub fn named_chunk(name: &str, source: &str) -> Chunk {
    let mut chunk = Chunk::named(ChunkName::new(name), IndentRule::Indent, TextLocation::line(1));
    chunk.append_code(source, 1);
    chunk
}

/// Creates an output chunk with a single code command.
pub fn output_chunk(path: &str, source: &str) -> Chunk {
    let mut chunk = Chunk::output(path, TextLocation::line(1));
    chunk.append_code(source, 1);
    chunk
}

/// Creates a reference command.
pub fn reference(name: &str, column: usize, line: usize) -> Command {
    Command::Reference {
        name: ChunkName::new(name),
        column,
        location: TextLocation::line(line).at_column(column),
    }
}
