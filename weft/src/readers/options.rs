//! Shell-style option parsing for `@d` and `@o` headers.

use std::path::PathBuf;

use crate::errors::{Result, WeftError};
use crate::model::{ChunkName, IndentRule};
use crate::text_location::TextLocation;

/// Parsed `@d` header: option flags plus the chunk name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionHeader {
    pub name: ChunkName,
    pub indent: IndentRule,
}

/// Parses the argument tail of a `@d` header.
///
/// Whitespace separates tokens; the positional tokens joined by single
/// spaces form the chunk name. The recognized flags `-indent` (default) and
/// `-noindent` are accepted in any position; any other token beginning with
/// `-` is an error before the name starts and name text afterwards.
pub fn parse_definition_header(text: &str, location: &TextLocation) -> Result<DefinitionHeader> {
    let mut indent: Option<IndentRule> = None;
    let mut positional: Vec<&str> = Vec::new();

    for token in text.split_whitespace() {
        let rule = match token {
            "-indent" => Some(IndentRule::Indent),
            "-noindent" => Some(IndentRule::NoIndent),
            _ => None,
        };
        if let Some(rule) = rule {
            if indent.is_some() {
                return Err(WeftError::DuplicateOption {
                    location: location.clone(),
                    option: token.to_string(),
                });
            }
            indent = Some(rule);
        } else if positional.is_empty() && token.starts_with('-') {
            return Err(WeftError::UnknownOption {
                location: location.clone(),
                option: token.to_string(),
            });
        } else {
            positional.push(token);
        }
    }

    if positional.is_empty() {
        return Err(WeftError::MissingName {
            location: location.clone(),
        });
    }

    Ok(DefinitionHeader {
        name: ChunkName::new(positional.join(" ")),
        indent: indent.unwrap_or_default(),
    })
}

/// Parses the argument tail of an `@o` header.
///
/// No options are recognized; the positional tail is the output file path.
pub fn parse_output_header(text: &str, location: &TextLocation) -> Result<PathBuf> {
    let mut positional: Vec<&str> = Vec::new();

    for token in text.split_whitespace() {
        if positional.is_empty() && token.starts_with('-') {
            return Err(WeftError::UnknownOption {
                location: location.clone(),
                option: token.to_string(),
            });
        }
        positional.push(token);
    }

    if positional.is_empty() {
        return Err(WeftError::MissingName {
            location: location.clone(),
        });
    }

    Ok(PathBuf::from(positional.join(" ")))
}
