//! Reading WEB sources into the model.

mod options;
mod tokenizer;
mod web_reader;

pub use options::{parse_definition_header, parse_output_header, DefinitionHeader};
pub use tokenizer::{Token, TokenKind, Tokenizer};
pub use web_reader::{load_web, parse_web, ReaderOptions, WebReader};
