//! The Web: the in-memory representation of a whole WEB document.

use std::path::PathBuf;

use indexmap::IndexMap;
use regex::Regex;

use crate::errors::{Result, WeftError};
use crate::text_location::TextLocation;

use super::chunk::{Chunk, ChunkKind};
use super::chunk_name::ChunkName;
use super::command::Command;

/// The top-level container: all chunks in source order, plus the name and
/// output-file indices.
///
/// The object graph is a tree (`Web` owns `Chunk`s, chunks own `Command`s);
/// references between chunks go through the name index, never through direct
/// ownership, so macro cycles cannot produce cycles at the object level.
#[derive(Debug, Clone, Default)]
pub struct Web {
    /// The root WEB source file, if known.
    source: Option<PathBuf>,

    /// All chunks, in source order. A chunk's `seq` is its index + 1.
    chunks: Vec<Chunk>,

    /// Canonical name -> chunk indices, in first-definition order.
    named_index: IndexMap<ChunkName, Vec<usize>>,

    /// Output file path -> chunk indices, in first-definition order.
    output_index: IndexMap<PathBuf, Vec<usize>>,
}

impl Web {
    /// Creates an empty web for the given source file.
    pub fn new(source: Option<PathBuf>) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    /// The root source file.
    pub fn source(&self) -> Option<&PathBuf> {
        self.source.as_ref()
    }

    /// Adds a chunk, assigning its sequence number. Returns its index.
    pub fn add(&mut self, mut chunk: Chunk) -> usize {
        let index = self.chunks.len();
        chunk.seq = index + 1;

        match &chunk.kind {
            ChunkKind::Anonymous => {}
            ChunkKind::Named { name, .. } => {
                self.named_index
                    .entry(name.clone())
                    .or_default()
                    .push(index);
            }
            ChunkKind::Output { path } => {
                self.output_index
                    .entry(path.clone())
                    .or_default()
                    .push(index);
            }
        }

        self.chunks.push(chunk);
        index
    }

    /// All chunks in source order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// A chunk by index.
    pub fn get(&self, index: usize) -> &Chunk {
        &self.chunks[index]
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True if the web holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The name index.
    pub fn named_index(&self) -> &IndexMap<ChunkName, Vec<usize>> {
        &self.named_index
    }

    /// The output-file index.
    pub fn output_index(&self) -> &IndexMap<PathBuf, Vec<usize>> {
        &self.output_index
    }

    /// Indices of the chunks defining `name`, in source order.
    pub fn chunks_for_name(&self, name: &ChunkName) -> &[usize] {
        self.named_index.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolves a possibly abbreviated name to its full form.
    ///
    /// Returns `None` for unknown names and for ambiguous abbreviations.
    pub fn full_name_for(&self, name: &ChunkName) -> Option<ChunkName> {
        if self.named_index.contains_key(name) {
            return Some(name.clone());
        }
        if !name.is_abbreviated() {
            return None;
        }
        let mut matches = self.named_index.keys().filter(|full| name.abbreviates(full));
        match (matches.next(), matches.next()) {
            (Some(full), None) => Some(full.clone()),
            _ => None,
        }
    }

    /// Resolves every abbreviated name in the web, definitions first, then
    /// references. Collects all failures rather than stopping at the first.
    pub fn resolve_names(&mut self) -> Result<()> {
        let mut errors = Vec::new();

        self.unify_defined_abbreviations(&mut errors);
        self.resolve_references(&mut errors);

        WeftError::from_list(errors)
    }

    /// Merges `@d foo...` definitions into their unique full name.
    ///
    /// An abbreviation matching no full name stays a name in its own right.
    fn unify_defined_abbreviations(&mut self, errors: &mut Vec<WeftError>) {
        let full_names: Vec<ChunkName> = self
            .named_index
            .keys()
            .filter(|n| !n.is_abbreviated())
            .cloned()
            .collect();

        let mut renames: Vec<(ChunkName, ChunkName)> = Vec::new();
        for abbrev in self.named_index.keys().filter(|n| n.is_abbreviated()) {
            let matches: Vec<&ChunkName> =
                full_names.iter().filter(|f| abbrev.abbreviates(f)).collect();
            match matches.len() {
                0 => {}
                1 => renames.push((abbrev.clone(), matches[0].clone())),
                _ => {
                    let location = self.named_index[abbrev]
                        .first()
                        .map(|&i| self.chunks[i].location.clone())
                        .unwrap_or_default();
                    errors.push(WeftError::AmbiguousAbbreviation {
                        location,
                        name: abbrev.clone(),
                        candidates: matches.iter().map(|n| n.to_string()).collect(),
                    });
                }
            }
        }

        if renames.is_empty() {
            return;
        }

        for (abbrev, full) in &renames {
            for chunk in &mut self.chunks {
                if let ChunkKind::Named { name, .. } = &mut chunk.kind {
                    if name == abbrev {
                        *name = full.clone();
                    }
                }
            }
        }

        // Rebuild the index from scratch: merged lists come out in source
        // order, entries in first-definition order.
        let mut rebuilt: IndexMap<ChunkName, Vec<usize>> = IndexMap::new();
        for (index, chunk) in self.chunks.iter().enumerate() {
            if let ChunkKind::Named { name, .. } = &chunk.kind {
                rebuilt.entry(name.clone()).or_default().push(index);
            }
        }
        self.named_index = rebuilt;
    }

    /// Rewrites every `Reference` command to the full name it denotes.
    fn resolve_references(&mut self, errors: &mut Vec<WeftError>) {
        let keys: Vec<ChunkName> = self.named_index.keys().cloned().collect();

        for chunk in &mut self.chunks {
            for command in &mut chunk.commands {
                let Command::Reference { name, location, .. } = command else {
                    continue;
                };
                if keys.contains(name) {
                    continue;
                }
                if !name.is_abbreviated() {
                    errors.push(WeftError::UndefinedReference {
                        location: location.clone(),
                        name: name.clone(),
                    });
                    continue;
                }
                let matches: Vec<&ChunkName> =
                    keys.iter().filter(|full| name.abbreviates(full)).collect();
                match matches.len() {
                    0 => errors.push(WeftError::UndefinedReference {
                        location: location.clone(),
                        name: name.clone(),
                    }),
                    1 => *name = matches[0].clone(),
                    _ => errors.push(WeftError::AmbiguousAbbreviation {
                        location: location.clone(),
                        name: name.clone(),
                        candidates: matches.iter().map(|n| n.to_string()).collect(),
                    }),
                }
            }
        }
    }

    /// Populates the referenced-by back-links.
    ///
    /// Run once, after [`Web::resolve_names`] and before any tangle or weave.
    pub fn create_used_by(&mut self) {
        let mut links: Vec<(usize, usize)> = Vec::new(); // (target, referrer)
        for (referrer, chunk) in self.chunks.iter().enumerate() {
            for name in chunk.references() {
                for &target in self.chunks_for_name(name) {
                    links.push((target, referrer));
                }
            }
        }
        for (target, referrer) in links {
            let backrefs = &mut self.chunks[target].referenced_by;
            if !backrefs.contains(&referrer) {
                backrefs.push(referrer);
            }
        }
    }

    /// Output-file cross reference: path -> sequence numbers of its chunks.
    pub fn file_xref(&self) -> IndexMap<String, Vec<usize>> {
        self.output_index
            .iter()
            .map(|(path, indices)| {
                let seqs = indices.iter().map(|&i| self.chunks[i].seq).collect();
                (path.display().to_string(), seqs)
            })
            .collect()
    }

    /// Named-chunk cross reference: name -> sequence numbers of its chunks.
    pub fn macro_xref(&self) -> IndexMap<String, Vec<usize>> {
        self.named_index
            .iter()
            .map(|(name, indices)| {
                let seqs = indices.iter().map(|&i| self.chunks[i].seq).collect();
                (name.to_string(), seqs)
            })
            .collect()
    }

    /// User-identifier cross reference: id -> (defining seq, mentioning seqs).
    ///
    /// A mention is any code chunk whose body contains the identifier as a
    /// whole word.
    pub fn user_id_xref(&self) -> IndexMap<String, (usize, Vec<usize>)> {
        let mut xref: IndexMap<String, (usize, Vec<usize>)> = IndexMap::new();

        for chunk in &self.chunks {
            for id in &chunk.user_ids {
                xref.entry(id.clone()).or_insert((chunk.seq, Vec::new()));
            }
        }

        for (id, (_, mentions)) in xref.iter_mut() {
            let Ok(pattern) = Regex::new(&format!(r"\b{}\b", regex::escape(id))) else {
                continue;
            };
            for chunk in self.chunks.iter().filter(|c| c.is_code()) {
                if chunk.mentions(&pattern) {
                    mentions.push(chunk.seq);
                }
            }
        }

        xref
    }

    /// Location helper for diagnostics about the web as a whole.
    pub fn location(&self) -> TextLocation {
        TextLocation::new(self.source.clone(), 1)
    }
}
